//! Resource, data source and provider schemas
//!
//! A schema describes the attributes of an object: their types, whether the
//! user must, may, or cannot set them, and which validators and plan
//! modifiers apply. The plan engine and the server walk schemas; models are
//! plain serde structs whose field names match the attribute names.

use crate::error::{FrameworkError, Result};
use crate::path::{AttributePath, PathStep};
use crate::planmodifier::PlanModifier;
use crate::validator::Validator;
use crate::value;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Attribute value type
#[derive(Debug, Clone, PartialEq)]
pub enum AttrType {
    String,
    Bool,
    Int32,
    Int64,
    Float64,
    List(Box<AttrType>),
    Object(BTreeMap<String, AttrType>),
}

impl AttrType {
    pub fn list(element: AttrType) -> Self {
        AttrType::List(Box::new(element))
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, AttrType)>) -> Self {
        AttrType::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Type name as shown in schema output.
    pub fn name(&self) -> String {
        match self {
            AttrType::String => "string".to_string(),
            AttrType::Bool => "bool".to_string(),
            AttrType::Int32 => "int32".to_string(),
            AttrType::Int64 => "int64".to_string(),
            AttrType::Float64 => "float64".to_string(),
            AttrType::List(element) => format!("list({})", element.name()),
            AttrType::Object(fields) => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, v.name()))
                    .collect();
                format!("object({})", inner.join(","))
            }
        }
    }

    /// Check that a raw value conforms to this type.
    ///
    /// Null and unknown conform to every type. Objects must carry exactly
    /// the declared attributes.
    pub fn check(&self, raw: &serde_json::Value, path: &AttributePath) -> Result<()> {
        if raw.is_null() || value::is_unknown(raw) {
            return Ok(());
        }

        let mismatch = || {
            FrameworkError::conversion(
                path.clone(),
                format!("expected {}, got {}", self.name(), raw),
            )
        };

        match self {
            AttrType::String => raw.is_string().then_some(()).ok_or_else(mismatch),
            AttrType::Bool => raw.is_boolean().then_some(()).ok_or_else(mismatch),
            AttrType::Int32 => raw
                .as_i64()
                .filter(|v| i32::try_from(*v).is_ok())
                .map(|_| ())
                .ok_or_else(mismatch),
            AttrType::Int64 => raw.as_i64().map(|_| ()).ok_or_else(mismatch),
            AttrType::Float64 => raw.is_number().then_some(()).ok_or_else(mismatch),
            AttrType::List(element) => {
                let items = raw.as_array().ok_or_else(mismatch)?;
                for (i, item) in items.iter().enumerate() {
                    element.check(item, &path.at_index(i))?;
                }
                Ok(())
            }
            AttrType::Object(fields) => {
                let object = raw.as_object().ok_or_else(mismatch)?;
                for key in object.keys() {
                    if !fields.contains_key(key) {
                        return Err(FrameworkError::conversion(
                            path.at_name(key.clone()),
                            format!("unexpected attribute {:?}", key),
                        ));
                    }
                }
                for (name, ty) in fields {
                    let child = path.at_name(name.clone());
                    match object.get(name) {
                        Some(v) => ty.check(v, &child)?,
                        None => {
                            return Err(FrameworkError::conversion(
                                child,
                                format!("missing attribute {:?}", name),
                            ));
                        }
                    }
                }
                Ok(())
            }
        }
    }

    /// Object value with every attribute set to null.
    pub fn null_object(&self) -> serde_json::Value {
        match self {
            AttrType::Object(fields) => serde_json::Value::Object(
                fields
                    .keys()
                    .map(|k| (k.clone(), serde_json::Value::Null))
                    .collect(),
            ),
            _ => serde_json::Value::Null,
        }
    }
}

/// Shape of an attribute
#[derive(Clone)]
pub enum AttributeKind {
    Primitive(AttrType),
    SingleNested(Attributes),
    ListNested(Attributes),
}

/// Attributes of an object, by name
pub type Attributes = BTreeMap<String, Attribute>;

/// Build an attribute map from `(name, attribute)` pairs.
pub fn attributes<const N: usize>(entries: [(&str, Attribute); N]) -> Attributes {
    entries
        .into_iter()
        .map(|(name, attribute)| (name.to_string(), attribute))
        .collect()
}

fn object_type(attributes: &Attributes) -> AttrType {
    AttrType::Object(
        attributes
            .iter()
            .map(|(name, attribute)| (name.clone(), attribute.attr_type()))
            .collect(),
    )
}

/// A single schema attribute
#[derive(Clone)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub description: String,
    pub validators: Vec<Arc<dyn Validator>>,
    pub plan_modifiers: Vec<Arc<dyn PlanModifier>>,
}

impl Attribute {
    fn of(kind: AttributeKind) -> Self {
        Self {
            kind,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            description: String::new(),
            validators: Vec::new(),
            plan_modifiers: Vec::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(AttributeKind::Primitive(AttrType::String))
    }

    pub fn bool() -> Self {
        Self::of(AttributeKind::Primitive(AttrType::Bool))
    }

    pub fn int32() -> Self {
        Self::of(AttributeKind::Primitive(AttrType::Int32))
    }

    pub fn int64() -> Self {
        Self::of(AttributeKind::Primitive(AttrType::Int64))
    }

    pub fn float64() -> Self {
        Self::of(AttributeKind::Primitive(AttrType::Float64))
    }

    pub fn list(element: AttrType) -> Self {
        Self::of(AttributeKind::Primitive(AttrType::list(element)))
    }

    pub fn single_nested(attributes: Attributes) -> Self {
        Self::of(AttributeKind::SingleNested(attributes))
    }

    pub fn list_nested(attributes: Attributes) -> Self {
        Self::of(AttributeKind::ListNested(attributes))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn plan_modifier(mut self, modifier: Arc<dyn PlanModifier>) -> Self {
        self.plan_modifiers.push(modifier);
        self
    }

    pub fn attr_type(&self) -> AttrType {
        match &self.kind {
            AttributeKind::Primitive(ty) => ty.clone(),
            AttributeKind::SingleNested(attributes) => object_type(attributes),
            AttributeKind::ListNested(attributes) => AttrType::list(object_type(attributes)),
        }
    }

    /// Nested attributes of single- and list-nested attributes.
    pub fn nested(&self) -> Option<&Attributes> {
        match &self.kind {
            AttributeKind::Primitive(_) => None,
            AttributeKind::SingleNested(attributes) | AttributeKind::ListNested(attributes) => {
                Some(attributes)
            }
        }
    }

    /// Computed attributes the user may not set.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    fn describe(&self) -> serde_json::Value {
        let mut out = json!({
            "type": self.attr_type().name(),
            "required": self.required,
            "optional": self.optional,
            "computed": self.computed,
            "sensitive": self.sensitive,
        });
        if !self.description.is_empty() {
            out["description"] = json!(self.description);
        }
        let validators: Vec<String> = self.validators.iter().map(|v| v.description()).collect();
        if !validators.is_empty() {
            out["validators"] = json!(validators);
        }
        let modifiers: Vec<String> = self
            .plan_modifiers
            .iter()
            .map(|m| m.description())
            .collect();
        if !modifiers.is_empty() {
            out["plan_modifiers"] = json!(modifiers);
        }
        if let Some(nested) = self.nested() {
            out["attributes"] = describe_attributes(nested);
        }
        out
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("type", &self.attr_type().name())
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("validators", &self.validators.len())
            .field("plan_modifiers", &self.plan_modifiers.len())
            .finish()
    }
}

fn describe_attributes(attributes: &Attributes) -> serde_json::Value {
    serde_json::Value::Object(
        attributes
            .iter()
            .map(|(name, attribute)| (name.clone(), attribute.describe()))
            .collect(),
    )
}

/// Schema of a resource, data source, or the provider itself
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub description: String,
    pub version: i64,
    pub attributes: Attributes,
}

impl Schema {
    pub fn new(attributes: Attributes) -> Self {
        Self {
            description: String::new(),
            version: 0,
            attributes,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn attr_type(&self) -> AttrType {
        object_type(&self.attributes)
    }

    /// Object with every top-level attribute set to null.
    pub fn null_object(&self) -> serde_json::Value {
        self.attr_type().null_object()
    }

    /// Find the attribute a path points at. Index steps are skipped so a
    /// path into a list-nested element resolves to the nested attribute.
    pub fn attribute_at(&self, path: &AttributePath) -> Option<&Attribute> {
        let mut current: Option<&Attribute> = None;
        for step in path.steps() {
            let PathStep::Attribute(name) = step else {
                continue;
            };
            let attributes = match current {
                None => &self.attributes,
                Some(attribute) => attribute.nested()?,
            };
            current = Some(attributes.get(name)?);
        }
        current
    }

    /// Check a raw object against the schema type.
    pub fn check(&self, raw: &serde_json::Value) -> Result<()> {
        self.attr_type().check(raw, &AttributePath::empty())
    }

    pub fn describe(&self) -> serde_json::Value {
        json!({
            "version": self.version,
            "description": self.description,
            "attributes": describe_attributes(&self.attributes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instance_schema() -> Schema {
        Schema::new(attributes([
            ("id", Attribute::string().computed()),
            ("root_disk_size", Attribute::int32().optional().computed()),
            (
                "contract",
                Attribute::single_nested(attributes([
                    ("term", Attribute::int32().required()),
                    ("type", Attribute::string().required()),
                ]))
                .required(),
            ),
            (
                "ips",
                Attribute::list_nested(attributes([("ip", Attribute::string().computed())]))
                    .computed(),
            ),
        ]))
    }

    #[test]
    fn test_check_accepts_conforming_object() {
        let schema = instance_schema();
        let raw = json!({
            "id": "abc",
            "root_disk_size": 50,
            "contract": {"term": 0, "type": "HOURLY"},
            "ips": [{"ip": "10.0.0.1"}],
        });
        assert!(schema.check(&raw).is_ok());
    }

    #[test]
    fn test_check_rejects_wrong_types_and_keys() {
        let schema = instance_schema();

        let wrong = json!({"id": 1, "root_disk_size": null, "contract": null, "ips": null});
        assert!(schema.check(&wrong).is_err());

        let extra = json!({
            "id": null, "root_disk_size": null, "contract": null, "ips": null, "bogus": 1
        });
        assert!(schema.check(&extra).is_err());

        let missing = json!({"id": null, "contract": null, "ips": null});
        assert!(schema.check(&missing).is_err());

        let too_big = json!({
            "id": null, "root_disk_size": 5_000_000_000i64, "contract": null, "ips": null
        });
        assert!(schema.check(&too_big).is_err());
    }

    #[test]
    fn test_unknown_conforms() {
        let schema = instance_schema();
        let raw = json!({
            "id": value::UNKNOWN_VALUE,
            "root_disk_size": value::UNKNOWN_VALUE,
            "contract": {"term": value::UNKNOWN_VALUE, "type": "MONTHLY"},
            "ips": value::UNKNOWN_VALUE,
        });
        assert!(schema.check(&raw).is_ok());
    }

    #[test]
    fn test_attribute_at() {
        let schema = instance_schema();
        let term = AttributePath::root("contract").at_name("term");
        assert!(schema.attribute_at(&term).unwrap().required);

        let ip = AttributePath::root("ips").at_index(0).at_name("ip");
        assert!(schema.attribute_at(&ip).unwrap().computed);

        assert!(schema.attribute_at(&AttributePath::root("nope")).is_none());
    }

    #[test]
    fn test_null_object() {
        let schema = instance_schema();
        assert_eq!(
            schema.null_object(),
            json!({"id": null, "root_disk_size": null, "contract": null, "ips": null})
        );
    }
}
