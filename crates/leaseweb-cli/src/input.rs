use anyhow::Context as _;
use serde_json::{Value, json};
use std::io::Read;
use std::path::Path;

/// Read a JSON document from `path`, or stdin when `path` is `-`.
pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?
    };
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Like [`read_json`], with an empty object when no path is given.
pub fn read_optional_json(path: Option<&Path>) -> anyhow::Result<Value> {
    match path {
        Some(path) => read_json(path),
        None => Ok(json!({})),
    }
}

/// Prior state for plan and apply; a missing file means no prior state.
pub fn read_state(path: Option<&Path>) -> anyhow::Result<Value> {
    match path {
        Some(path) => read_json(path),
        None => Ok(Value::Null),
    }
}
