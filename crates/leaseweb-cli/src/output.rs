use colored::Colorize;
use leaseweb_framework::{Diagnostic, Diagnostics, Severity};
use serde_json::Value;
use std::path::Path;

fn render(diag: &Diagnostic) -> String {
    let label = match diag.severity {
        Severity::Error => "✗ Error".red().bold(),
        Severity::Warning => "! Warning".yellow().bold(),
    };
    let mut out = format!("{}: {}", label, diag.summary);
    if let Some(path) = &diag.attribute {
        out.push_str(&format!(" ({})", path.to_string().cyan()));
    }
    if !diag.detail.is_empty() {
        out.push_str(&format!("\n  {}", diag.detail));
    }
    out
}

/// Print diagnostics to stderr. Fails when any of them is an error.
pub fn report(diags: &Diagnostics) -> anyhow::Result<()> {
    for diag in diags.iter() {
        eprintln!("{}", render(diag));
    }
    if diags.has_error() {
        anyhow::bail!("{} error(s)", diags.errors().count());
    }
    Ok(())
}

/// Print `value` as pretty JSON to stdout, or write it to `out`.
pub fn emit(value: &Value, out: Option<&Path>) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            std::fs::write(path, text + "\n")?;
            eprintln!("{} {}", "✓ State written to".green(), path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaseweb_framework::AttributePath;

    #[test]
    fn test_render_includes_path_and_detail() {
        colored::control::set_override(false);
        let diag = Diagnostic::attribute_error(
            AttributePath::root("contract").at_name("term"),
            "Invalid Contract Term",
            "must be 0",
        );
        assert_eq!(
            render(&diag),
            "✗ Error: Invalid Contract Term (contract.term)\n  must be 0"
        );
    }

    #[test]
    fn test_report_fails_on_error() {
        let mut diags = Diagnostics::new();
        diags.add_warning("Heads up", "");
        assert!(report(&diags).is_ok());

        diags.add_error("Broken", "detail");
        assert_eq!(report(&diags).unwrap_err().to_string(), "1 error(s)");
    }
}
