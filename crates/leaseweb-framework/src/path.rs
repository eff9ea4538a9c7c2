//! Attribute paths into resource data

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of an attribute path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathStep {
    Attribute(String),
    Index(usize),
}

/// Path to an attribute, e.g. `contract.term` or `ips[0].ip`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributePath(Vec<PathStep>);

impl AttributePath {
    /// The empty path, addressing the whole object.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn root(name: impl Into<String>) -> Self {
        Self(vec![PathStep::Attribute(name.into())])
    }

    pub fn at_name(&self, name: impl Into<String>) -> Self {
        let mut steps = self.0.clone();
        steps.push(PathStep::Attribute(name.into()));
        Self(steps)
    }

    pub fn at_index(&self, index: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(PathStep::Index(index));
        Self(steps)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last attribute name of the path, if any.
    pub fn last_name(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|step| match step {
            PathStep::Attribute(name) => Some(name.as_str()),
            PathStep::Index(_) => None,
        })
    }

    /// Resolve the path against a raw object. Missing steps resolve to `None`.
    pub fn lookup<'a>(&self, raw: &'a serde_json::Value) -> Option<&'a serde_json::Value> {
        let mut current = raw;
        for step in &self.0 {
            current = match step {
                PathStep::Attribute(name) => current.as_object()?.get(name)?,
                PathStep::Index(i) => current.as_array()?.get(*i)?,
            };
        }
        Some(current)
    }

    /// Resolve the path, treating anything missing as null.
    pub fn lookup_or_null(&self, raw: &serde_json::Value) -> serde_json::Value {
        self.lookup(raw).cloned().unwrap_or(serde_json::Value::Null)
    }

    /// Write a value at the path, creating intermediate objects as needed.
    ///
    /// Returns `false` when the path crosses a non-object or an index that
    /// does not exist.
    pub fn set(&self, raw: &mut serde_json::Value, value: serde_json::Value) -> bool {
        let Some((last, parents)) = self.0.split_last() else {
            *raw = value;
            return true;
        };

        let mut current = raw;
        for step in parents {
            current = match step {
                PathStep::Attribute(name) => {
                    if current.is_null() {
                        *current = serde_json::Value::Object(Default::default());
                    }
                    let Some(object) = current.as_object_mut() else {
                        return false;
                    };
                    object
                        .entry(name.clone())
                        .or_insert(serde_json::Value::Null)
                }
                PathStep::Index(i) => match current.as_array_mut().and_then(|a| a.get_mut(*i)) {
                    Some(element) => element,
                    None => return false,
                },
            };
        }

        match last {
            PathStep::Attribute(name) => {
                if current.is_null() {
                    *current = serde_json::Value::Object(Default::default());
                }
                match current.as_object_mut() {
                    Some(object) => {
                        object.insert(name.clone(), value);
                        true
                    }
                    None => false,
                }
            }
            PathStep::Index(i) => match current.as_array_mut().and_then(|a| a.get_mut(*i)) {
                Some(element) => {
                    *element = value;
                    true
                }
                None => false,
            },
        }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{}", name)?,
                PathStep::Attribute(name) => write!(f, ".{}", name)?,
                PathStep::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display() {
        let path = AttributePath::root("ips").at_index(0).at_name("ip");
        assert_eq!(path.to_string(), "ips[0].ip");
        assert_eq!(path.last_name(), Some("ip"));
    }

    #[test]
    fn test_lookup_and_set() {
        let mut raw = json!({"contract": {"term": 3}, "ips": [{"ip": "10.0.0.1"}]});

        let term = AttributePath::root("contract").at_name("term");
        assert_eq!(term.lookup(&raw), Some(&json!(3)));

        assert!(term.set(&mut raw, json!(0)));
        assert_eq!(raw["contract"]["term"], json!(0));

        let ip = AttributePath::root("ips").at_index(0).at_name("ip");
        assert_eq!(ip.lookup_or_null(&raw), json!("10.0.0.1"));

        let missing = AttributePath::root("ips").at_index(4).at_name("ip");
        assert_eq!(missing.lookup_or_null(&raw), json!(null));
        assert!(!missing.set(&mut raw, json!("x")));
    }

    #[test]
    fn test_set_creates_objects() {
        let mut raw = json!(null);
        assert!(AttributePath::root("iso").at_name("id").set(&mut raw, json!("abc")));
        assert_eq!(raw, json!({"iso": {"id": "abc"}}));
    }
}
