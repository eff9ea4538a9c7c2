//! Import identifier parsing

use crate::diag::Diagnostic;
use crate::path::AttributePath;
use crate::resource::ImportStateResponse;

/// Split a comma-separated import identifier into exactly `N` non-empty
/// parts. `names` are the attribute names, used to render the template.
///
/// ```
/// use leaseweb_framework::parse_import_id;
///
/// let [domain, name, kind] =
///     parse_import_id("example.com,www.,A", ["domain_name", "name", "type"]).unwrap();
/// assert_eq!((domain.as_str(), name.as_str(), kind.as_str()), ("example.com", "www.", "A"));
///
/// assert!(parse_import_id("a,b", ["domain_name", "name", "type"]).is_err());
/// ```
pub fn parse_import_id<const N: usize>(
    id: &str,
    names: [&str; N],
) -> std::result::Result<[String; N], Diagnostic> {
    let parts: Vec<&str> = id.split(',').collect();
    if parts.len() != N || parts.iter().any(|p| p.is_empty()) {
        return Err(Diagnostic::error(
            "Unexpected Import Identifier",
            format!(
                "Expected import identifier with format: {}. Got: {}",
                names.join(","),
                id
            ),
        ));
    }
    Ok(std::array::from_fn(|i| parts[i].to_string()))
}

/// Write the import identifier verbatim into a root-level attribute.
pub fn import_state_passthrough_id(attribute: &str, id: &str, resp: &mut ImportStateResponse) {
    let path = AttributePath::root(attribute);
    resp.state
        .set_attribute(&path, &id.to_string(), &mut resp.diagnostics);
}
