//! Conversions between SDK DTOs and typed state
//!
//! SDK types stay on this side of the boundary: resources project DTOs into
//! their models with these helpers, and lower models into request options
//! with the `optional_*` functions. Projected nested objects are checked
//! against their attribute type; values that do not conform are reported
//! and become unknown.

use chrono::{DateTime, Utc};
use leaseweb_framework::{AttrType, Attribute, AttributePath, Attributes, Diagnostics, Value};
use serde::Serialize;
use std::fmt::Display;

/// `2024-03-01 10:00:00 +0000 UTC`, with fractional seconds when non-zero.
pub fn format_time(time: &DateTime<Utc>) -> String {
    let mut out = time.format("%Y-%m-%d %H:%M:%S").to_string();
    let nanos = time.timestamp_subsec_nanos();
    if nanos != 0 {
        let fraction = format!("{:09}", nanos);
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out.push_str(" +0000 UTC");
    out
}

pub fn adapt_time(time: &DateTime<Utc>) -> Value<String> {
    Value::Known(format_time(time))
}

pub fn adapt_nullable_time(time: Option<&DateTime<Utc>>) -> Value<String> {
    Value::from_option(time.map(format_time))
}

pub fn adapt_nullable_string(value: Option<&str>) -> Value<String> {
    Value::from_option(value.map(str::to_string))
}

/// Enums and other displayable values as a list of strings.
pub fn adapt_string_list<T: Display>(items: &[T]) -> Value<Vec<String>> {
    Value::Known(items.iter().map(ToString::to_string).collect())
}

/// Type of an object with the given attributes, for list elements and
/// nested objects.
pub fn object_type(attributes: Attributes) -> AttrType {
    Attribute::single_nested(attributes).attr_type()
}

fn conform<M: Serialize>(model: M, attr_type: &AttrType, diags: &mut Diagnostics) -> Value<M> {
    let raw = match serde_json::to_value(&model) {
        Ok(raw) => raw,
        Err(e) => {
            diags.add_error(
                "Value Conversion Error",
                format!("Unable to convert the upstream object. {}", e),
            );
            return Value::Unknown;
        }
    };
    match attr_type.check(&raw, &AttributePath::empty()) {
        Ok(()) => Value::Known(model),
        Err(e) => {
            diags.push(e.to_diagnostic());
            Value::Unknown
        }
    }
}

/// Project a DTO into a nested object value of type `attr_type`.
pub fn adapt_sdk_model_to_resource_object<S, M, F>(
    sdk: &S,
    attr_type: &AttrType,
    adapt: F,
    diags: &mut Diagnostics,
) -> Value<M>
where
    M: Serialize,
    F: FnOnce(&S) -> M,
{
    conform(adapt(sdk), attr_type, diags)
}

/// Like [`adapt_sdk_model_to_resource_object`], with an unset DTO mapping
/// to a null object.
pub fn adapt_nullable_sdk_model_to_resource_object<S, M, F>(
    sdk: Option<&S>,
    attr_type: &AttrType,
    adapt: F,
    diags: &mut Diagnostics,
) -> Value<M>
where
    M: Serialize,
    F: FnOnce(&S) -> M,
{
    match sdk {
        Some(sdk) => adapt_sdk_model_to_resource_object(sdk, attr_type, adapt, diags),
        None => Value::Null,
    }
}

/// Project DTOs into a list whose elements are of type `element_type`.
/// An empty slice gives an empty known list.
pub fn adapt_sdk_models_to_list_value<S, M, F>(
    sdks: &[S],
    element_type: &AttrType,
    adapt: F,
    diags: &mut Diagnostics,
) -> Value<Vec<M>>
where
    M: Serialize,
    F: Fn(&S) -> M,
{
    let items: Vec<M> = sdks.iter().map(adapt).collect();
    conform(items, &AttrType::list(element_type.clone()), diags)
}

/// Known strings, empty ones included. Null and unknown are omitted.
pub fn optional_string(value: &Value<String>) -> Option<String> {
    value.as_known().cloned()
}

/// Known, non-empty strings.
pub fn optional_non_empty_string(value: &Value<String>) -> Option<String> {
    value.as_known().filter(|v| !v.is_empty()).cloned()
}

/// Known, non-zero numbers. Zero means "not set" in update payloads.
pub fn optional_non_zero<T: Copy + Default + PartialEq>(value: &Value<T>) -> Option<T> {
    value.as_known().copied().filter(|v| *v != T::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Serialize, PartialEq)]
    struct IsoModel {
        id: Value<String>,
        name: Value<String>,
    }

    fn iso_type() -> AttrType {
        AttrType::object([("id", AttrType::String), ("name", AttrType::String)])
    }

    struct Iso {
        id: &'static str,
        name: &'static str,
    }

    fn adapt_iso(iso: &Iso) -> IsoModel {
        IsoModel {
            id: Value::string(iso.id),
            name: Value::string(iso.name),
        }
    }

    #[test]
    fn test_format_time() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 5).unwrap();
        assert_eq!(format_time(&time), "2024-03-01 10:00:05 +0000 UTC");

        let time = time + chrono::Duration::milliseconds(250);
        assert_eq!(format_time(&time), "2024-03-01 10:00:05.25 +0000 UTC");
    }

    #[test]
    fn test_nullable_fields() {
        assert_eq!(adapt_nullable_string(None), Value::Null);
        assert_eq!(adapt_nullable_string(Some("")), Value::string(""));
        assert_eq!(adapt_nullable_time(None), Value::Null);
    }

    #[test]
    fn test_object_projection() {
        let mut diags = Diagnostics::new();
        let iso = Iso {
            id: "UBUNTU_22_04",
            name: "Ubuntu 22.04",
        };
        let value = adapt_sdk_model_to_resource_object(&iso, &iso_type(), adapt_iso, &mut diags);
        assert_eq!(
            value.as_known().unwrap().name,
            Value::string("Ubuntu 22.04")
        );
        assert!(diags.is_empty());

        let value =
            adapt_nullable_sdk_model_to_resource_object(None, &iso_type(), adapt_iso, &mut diags);
        assert!(value.is_null());
    }

    #[test]
    fn test_nonconforming_object_is_unknown() {
        let mut diags = Diagnostics::new();
        let iso = Iso { id: "x", name: "y" };
        let narrower = AttrType::object([("id", AttrType::String)]);
        let value = adapt_sdk_model_to_resource_object(&iso, &narrower, adapt_iso, &mut diags);
        assert!(value.is_unknown());
        assert!(diags.has_error());
    }

    #[test]
    fn test_empty_list_is_known() {
        let mut diags = Diagnostics::new();
        let value = adapt_sdk_models_to_list_value(&[], &iso_type(), adapt_iso, &mut diags);
        assert_eq!(value, Value::Known(vec![]));
    }

    #[test]
    fn test_options_lowering() {
        assert_eq!(optional_string(&Value::string("")), Some(String::new()));
        assert_eq!(optional_string(&Value::Unknown), None);
        assert_eq!(optional_non_empty_string(&Value::string("")), None);
        assert_eq!(optional_non_zero(&Value::Known(0)), None);
        assert_eq!(optional_non_zero(&Value::Known(3)), Some(3));
        assert_eq!(optional_non_zero::<i32>(&Value::Null), None);
    }
}
