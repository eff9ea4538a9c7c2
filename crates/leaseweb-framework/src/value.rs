//! Tri-state attribute values
//!
//! Every attribute the host hands to the provider is either known, null
//! (absent or cleared) or unknown (computed during apply). `Option<T>` cannot
//! express the last state, so all models are built from [`Value<T>`].
//!
//! On the host boundary values are JSON. `null` is [`Value::Null`], the
//! string [`UNKNOWN_VALUE`] is [`Value::Unknown`] for any type, and anything
//! else decodes into [`Value::Known`].

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Wire sentinel for a value that is not known until apply.
pub const UNKNOWN_VALUE: &str = "74D93920-ED26-11E3-AC10-0800200C9A66";

/// A value that may be known, null, or unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<T> {
    /// Attribute is absent or was cleared.
    Null,
    /// Attribute will be computed during apply.
    Unknown,
    /// Concrete value.
    Known(T),
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Null
    }
}

impl<T> Value<T> {
    pub fn known(value: T) -> Self {
        Value::Known(value)
    }

    pub fn null() -> Self {
        Value::Null
    }

    pub fn unknown() -> Self {
        Value::Unknown
    }

    /// `None` maps to null, mirroring an unset nullable upstream field.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Value::Known(v),
            None => Value::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Value::Unknown)
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Value::Known(_))
    }

    pub fn is_null_or_unknown(&self) -> bool {
        !self.is_known()
    }

    pub fn as_known(&self) -> Option<&T> {
        match self {
            Value::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_known(self) -> Option<T> {
        match self {
            Value::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Value<&T> {
        match self {
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
            Value::Known(v) => Value::Known(v),
        }
    }

    /// Map the known value, keeping null and unknown as they are.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Value<U> {
        match self {
            Value::Null => Value::Null,
            Value::Unknown => Value::Unknown,
            Value::Known(v) => Value::Known(f(v)),
        }
    }
}

impl<T: Clone + Default> Value<T> {
    /// The known value, or `T::default()` for null and unknown.
    pub fn value_or_default(&self) -> T {
        match self {
            Value::Known(v) => v.clone(),
            _ => T::default(),
        }
    }
}

impl Value<String> {
    pub fn string(value: impl Into<String>) -> Self {
        Value::Known(value.into())
    }

    /// Borrow the known string, or `""` for null and unknown.
    pub fn as_str(&self) -> &str {
        match self {
            Value::Known(v) => v.as_str(),
            _ => "",
        }
    }
}

impl<T> From<Option<T>> for Value<T> {
    fn from(value: Option<T>) -> Self {
        Value::from_option(value)
    }
}

impl<T: Serialize> Serialize for Value<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Unknown => serializer.serialize_str(UNKNOWN_VALUE),
            Value::Known(v) => v.serialize(serializer),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Value<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        if raw.is_null() {
            return Ok(Value::Null);
        }
        if is_unknown(&raw) {
            return Ok(Value::Unknown);
        }
        serde_json::from_value(raw)
            .map(Value::Known)
            .map_err(serde::de::Error::custom)
    }
}

/// Raw JSON encoding of an unknown value.
pub fn unknown() -> serde_json::Value {
    serde_json::Value::String(UNKNOWN_VALUE.to_string())
}

/// Whether a raw JSON value is the unknown sentinel.
pub fn is_unknown(raw: &serde_json::Value) -> bool {
    matches!(raw, serde_json::Value::String(s) if s == UNKNOWN_VALUE)
}

/// Whether a raw JSON value is neither null nor unknown.
pub fn is_known(raw: &serde_json::Value) -> bool {
    !raw.is_null() && !is_unknown(raw)
}

/// Whether a raw JSON value is, or contains, an unknown.
pub fn contains_unknown(raw: &serde_json::Value) -> bool {
    match raw {
        serde_json::Value::Array(items) => items.iter().any(contains_unknown),
        serde_json::Value::Object(fields) => fields.values().any(contains_unknown),
        other => is_unknown(other),
    }
}
