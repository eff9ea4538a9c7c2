//! Attribute validators
//!
//! Validators run at config-validation time and only ever see known values;
//! the engine skips null and unknown attributes. Validators that need
//! upstream data live with the resource and run from `modify_plan`.

use crate::diag::Diagnostics;
use crate::path::AttributePath;
use regex::Regex;
use std::sync::Arc;

/// Input to a validator
pub struct ValidateRequest<'a> {
    pub path: &'a AttributePath,
    pub value: &'a serde_json::Value,
    /// Whole configuration object, for cross-attribute checks.
    pub config: &'a serde_json::Value,
}

/// Config-time attribute validator
pub trait Validator: Send + Sync {
    fn description(&self) -> String;

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics);
}

fn quoted_list<T: std::fmt::Debug>(values: &[T]) -> String {
    let inner: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", inner.join(" "))
}

/// String value must be one of a fixed set
pub struct OneOfStrings {
    values: Vec<String>,
}

pub fn one_of_strings(values: &[&str]) -> Arc<dyn Validator> {
    Arc::new(OneOfStrings {
        values: values.iter().map(|v| v.to_string()).collect(),
    })
}

impl Validator for OneOfStrings {
    fn description(&self) -> String {
        format!("value must be one of: {}", quoted_list(&self.values))
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = req.value.as_str() else {
            return;
        };
        if !self.values.iter().any(|v| v == value) {
            diags.add_attribute_error(
                req.path.clone(),
                "Invalid Attribute Value Match",
                format!(
                    "Attribute {} {}, got: {:?}",
                    req.path,
                    self.description(),
                    value
                ),
            );
        }
    }
}

/// Integer value must be one of a fixed set
pub struct OneOfInts {
    values: Vec<i64>,
}

pub fn one_of_ints(values: &[i64]) -> Arc<dyn Validator> {
    Arc::new(OneOfInts {
        values: values.to_vec(),
    })
}

impl Validator for OneOfInts {
    fn description(&self) -> String {
        format!("value must be one of: {}", quoted_list(&self.values))
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = req.value.as_i64() else {
            return;
        };
        if !self.values.contains(&value) {
            diags.add_attribute_error(
                req.path.clone(),
                "Invalid Attribute Value Match",
                format!(
                    "Attribute {} {}, got: {}",
                    req.path,
                    self.description(),
                    value
                ),
            );
        }
    }
}

/// Integer value must lie within an inclusive range
pub struct IntBetween {
    min: i64,
    max: i64,
}

pub fn int_between(min: i64, max: i64) -> Arc<dyn Validator> {
    Arc::new(IntBetween { min, max })
}

impl Validator for IntBetween {
    fn description(&self) -> String {
        format!("value must be between {} and {}", self.min, self.max)
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = req.value.as_i64() else {
            return;
        };
        if value < self.min || value > self.max {
            diags.add_attribute_error(
                req.path.clone(),
                "Invalid Attribute Value",
                format!(
                    "Attribute {} {}, got: {}",
                    req.path,
                    self.description(),
                    value
                ),
            );
        }
    }
}

/// String length (in characters) must lie within an inclusive range
pub struct StringLengthBetween {
    min: usize,
    max: usize,
}

pub fn string_length_between(min: usize, max: usize) -> Arc<dyn Validator> {
    Arc::new(StringLengthBetween { min, max })
}

impl Validator for StringLengthBetween {
    fn description(&self) -> String {
        format!(
            "string length must be between {} and {}",
            self.min, self.max
        )
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = req.value.as_str() else {
            return;
        };
        let length = value.chars().count();
        if length < self.min || length > self.max {
            diags.add_attribute_error(
                req.path.clone(),
                "Invalid Attribute Value Length",
                format!(
                    "Attribute {} {}, got: {}",
                    req.path,
                    self.description(),
                    length
                ),
            );
        }
    }
}

/// String must match a regular expression
pub struct StringMatches {
    regex: Regex,
    message: String,
}

pub fn string_matches(regex: Regex, message: impl Into<String>) -> Arc<dyn Validator> {
    Arc::new(StringMatches {
        regex,
        message: message.into(),
    })
}

impl Validator for StringMatches {
    fn description(&self) -> String {
        if self.message.is_empty() {
            format!("value must match regular expression '{}'", self.regex)
        } else {
            self.message.clone()
        }
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = req.value.as_str() else {
            return;
        };
        if !self.regex.is_match(value) {
            diags.add_attribute_error(
                req.path.clone(),
                "Invalid Attribute Value Match",
                format!(
                    "Attribute {} {}, got: {:?}",
                    req.path,
                    self.description(),
                    value
                ),
            );
        }
    }
}

/// List must contain at least `min` elements
pub struct ListSizeAtLeast {
    min: usize,
}

pub fn list_size_at_least(min: usize) -> Arc<dyn Validator> {
    Arc::new(ListSizeAtLeast { min })
}

impl Validator for ListSizeAtLeast {
    fn description(&self) -> String {
        format!("list must contain at least {} elements", self.min)
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        let Some(items) = req.value.as_array() else {
            return;
        };
        if items.len() < self.min {
            diags.add_attribute_error(
                req.path.clone(),
                "Invalid Attribute Value",
                format!(
                    "Attribute {} {}, got: {}",
                    req.path,
                    self.description(),
                    items.len()
                ),
            );
        }
    }
}

/// Every string element of a list must be non-empty
pub struct ListItemsNotEmpty;

pub fn list_items_not_empty() -> Arc<dyn Validator> {
    Arc::new(ListItemsNotEmpty)
}

impl Validator for ListItemsNotEmpty {
    fn description(&self) -> String {
        "list elements must not be empty".to_string()
    }

    fn validate(&self, req: &ValidateRequest<'_>, diags: &mut Diagnostics) {
        let Some(items) = req.value.as_array() else {
            return;
        };
        for (i, item) in items.iter().enumerate() {
            if item.as_str().is_some_and(str::is_empty) {
                diags.add_attribute_error(
                    req.path.at_index(i),
                    "Invalid Attribute Value Length",
                    format!("Attribute {} element {} must not be empty", req.path, i),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(validator: &Arc<dyn Validator>, value: serde_json::Value) -> Diagnostics {
        let path = AttributePath::root("attr");
        let config = json!({});
        let mut diags = Diagnostics::new();
        validator.validate(
            &ValidateRequest {
                path: &path,
                value: &value,
                config: &config,
            },
            &mut diags,
        );
        diags
    }

    #[test]
    fn test_one_of_strings() {
        let v = one_of_strings(&["HOURLY", "MONTHLY"]);
        assert!(!run(&v, json!("HOURLY")).has_error());

        let diags = run(&v, json!("YEARLY"));
        assert!(diags.has_error());
        let detail = &diags.iter().next().unwrap().detail;
        assert!(detail.contains("\"HOURLY\" \"MONTHLY\""));
        assert!(detail.contains("\"YEARLY\""));
    }

    #[test]
    fn test_one_of_ints() {
        let v = one_of_ints(&[0, 1, 3, 6, 12]);
        assert!(!run(&v, json!(6)).has_error());
        assert!(run(&v, json!(2)).has_error());
    }

    #[test]
    fn test_int_between() {
        let v = int_between(5, 1000);
        assert!(!run(&v, json!(5)).has_error());
        assert!(!run(&v, json!(1000)).has_error());
        assert!(run(&v, json!(4)).has_error());
        assert!(run(&v, json!(1001)).has_error());
    }

    #[test]
    fn test_string_length_between() {
        let v = string_length_between(1, 3);
        assert!(run(&v, json!("")).has_error());
        assert!(!run(&v, json!("abc")).has_error());
        assert!(run(&v, json!("abcd")).has_error());
    }

    #[test]
    fn test_string_matches() {
        let v = string_matches(Regex::new(r"^[a-z]+$").unwrap(), "");
        assert!(!run(&v, json!("abc")).has_error());
        assert!(run(&v, json!("ABC")).has_error());
    }

    #[test]
    fn test_list_validators() {
        let size = list_size_at_least(1);
        assert!(run(&size, json!([])).has_error());
        assert!(!run(&size, json!(["1.2.3.4"])).has_error());

        let items = list_items_not_empty();
        let diags = run(&items, json!(["a", ""]));
        assert_eq!(diags.len(), 1);
        assert_eq!(
            diags.iter().next().unwrap().attribute,
            Some(AttributePath::root("attr").at_index(1))
        );
    }
}
