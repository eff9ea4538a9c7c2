//! Managed resource trait and request/response types

use crate::context::Context;
use crate::diag::Diagnostics;
use crate::path::AttributePath;
use crate::provider::ProviderData;
use crate::schema::Schema;
use crate::value::Value;
use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Plan, prior state, or config of one resource as a raw object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceData {
    raw: serde_json::Value,
}

impl ResourceData {
    pub fn null() -> Self {
        Self::default()
    }

    pub fn from_raw(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    pub fn into_raw(self) -> serde_json::Value {
        self.raw
    }

    pub fn is_null(&self) -> bool {
        self.raw.is_null()
    }

    /// Decode into a typed model. Failures become a fatal diagnostic.
    pub fn get<T: DeserializeOwned>(&self, diags: &mut Diagnostics) -> Option<T> {
        match serde_json::from_value(self.raw.clone()) {
            Ok(model) => Some(model),
            Err(e) => {
                diags.add_error(
                    "Value Conversion Error",
                    format!(
                        "An unexpected error was encountered trying to convert the value into its model. {}",
                        e
                    ),
                );
                None
            }
        }
    }

    /// Replace the whole object with an encoded model.
    pub fn set<T: Serialize>(&mut self, model: &T, diags: &mut Diagnostics) {
        match serde_json::to_value(model) {
            Ok(raw) => self.raw = raw,
            Err(e) => diags.add_error(
                "Value Conversion Error",
                format!(
                    "An unexpected error was encountered trying to convert the model into a value. {}",
                    e
                ),
            ),
        }
    }

    /// Decode a single attribute. Missing attributes decode as null.
    pub fn get_attribute<T: DeserializeOwned>(
        &self,
        path: &AttributePath,
        diags: &mut Diagnostics,
    ) -> Value<T> {
        let raw = path.lookup_or_null(&self.raw);
        match serde_json::from_value(raw) {
            Ok(value) => value,
            Err(e) => {
                diags.add_attribute_error(path.clone(), "Value Conversion Error", e.to_string());
                Value::Null
            }
        }
    }

    pub fn set_attribute<T: Serialize>(
        &mut self,
        path: &AttributePath,
        value: &T,
        diags: &mut Diagnostics,
    ) {
        let raw = match serde_json::to_value(value) {
            Ok(raw) => raw,
            Err(e) => {
                diags.add_attribute_error(path.clone(), "Value Conversion Error", e.to_string());
                return;
            }
        };
        if !path.set(&mut self.raw, raw) {
            diags.add_attribute_error(
                path.clone(),
                "Value Conversion Error",
                format!("Cannot set attribute {} on this object.", path),
            );
        }
    }

    /// Remove the resource, e.g. after delete.
    pub fn remove(&mut self) {
        self.raw = serde_json::Value::Null;
    }
}

/// Input to `metadata`
#[derive(Debug, Clone)]
pub struct MetadataRequest {
    pub provider_type_name: String,
}

impl MetadataRequest {
    /// `<provider_type_name>_<name>`
    pub fn type_name(&self, name: &str) -> String {
        format!("{}_{}", self.provider_type_name, name)
    }
}

/// Input to `configure`
#[derive(Clone, Default)]
pub struct ConfigureRequest {
    pub provider_data: Option<ProviderData>,
}

#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub config: ResourceData,
    pub plan: ResourceData,
}

#[derive(Debug, Clone, Default)]
pub struct CreateResponse {
    pub state: ResourceData,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct ReadRequest {
    pub state: ResourceData,
}

#[derive(Debug, Clone, Default)]
pub struct ReadResponse {
    pub state: ResourceData,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub config: ResourceData,
    pub plan: ResourceData,
    pub state: ResourceData,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateResponse {
    pub state: ResourceData,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteRequest {
    pub state: ResourceData,
}

#[derive(Debug, Clone, Default)]
pub struct DeleteResponse {
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct ImportStateRequest {
    pub id: String,
}

/// `state` starts as an object with every attribute null.
#[derive(Debug, Clone, Default)]
pub struct ImportStateResponse {
    pub state: ResourceData,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct ModifyPlanRequest {
    pub config: ResourceData,
    /// Null when the resource is planned for destruction.
    pub plan: ResourceData,
    /// Null when the resource is planned for creation.
    pub state: ResourceData,
}

#[derive(Debug, Clone, Default)]
pub struct ModifyPlanResponse {
    pub plan: ResourceData,
    pub requires_replace: Vec<AttributePath>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct ValidateConfigRequest {
    pub config: ResourceData,
}

/// Managed resource with a create/read/update/delete lifecycle
#[async_trait]
pub trait Resource: Send + Sync {
    /// Full type name, usually `req.type_name("...")`.
    fn metadata(&self, req: &MetadataRequest) -> String;

    fn schema(&self) -> Schema;

    /// Receive the provider data produced by provider configuration.
    fn configure(&mut self, _req: &ConfigureRequest, _diags: &mut Diagnostics) {}

    async fn create(&self, ctx: &Context, req: CreateRequest, resp: &mut CreateResponse);

    async fn read(&self, ctx: &Context, req: ReadRequest, resp: &mut ReadResponse);

    async fn update(&self, ctx: &Context, req: UpdateRequest, resp: &mut UpdateResponse);

    async fn delete(&self, ctx: &Context, req: DeleteRequest, resp: &mut DeleteResponse);

    async fn import_state(
        &self,
        _ctx: &Context,
        _req: ImportStateRequest,
        resp: &mut ImportStateResponse,
    ) {
        resp.diagnostics.add_error(
            "Resource Import Not Implemented",
            "This resource does not support import.",
        );
    }

    async fn modify_plan(
        &self,
        _ctx: &Context,
        _req: ModifyPlanRequest,
        _resp: &mut ModifyPlanResponse,
    ) {
    }

    fn validate_config(&self, _req: &ValidateConfigRequest, _diags: &mut Diagnostics) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Record {
        name: Value<String>,
        ttl: Value<i64>,
    }

    #[test]
    fn test_get_and_set_model() {
        let mut diags = Diagnostics::new();
        let mut data = ResourceData::from_raw(json!({"name": "www.", "ttl": 300}));

        let record: Record = data.get(&mut diags).unwrap();
        assert_eq!(record.ttl, Value::Known(300));

        data.set(
            &Record {
                name: Value::Null,
                ttl: Value::Unknown,
            },
            &mut diags,
        );
        assert_eq!(
            data.raw(),
            &json!({"name": null, "ttl": crate::value::UNKNOWN_VALUE})
        );
        assert!(!diags.has_error());
    }

    #[test]
    fn test_decode_failure_is_diagnostic() {
        let mut diags = Diagnostics::new();
        let data = ResourceData::from_raw(json!({"name": 1}));
        assert!(data.get::<Record>(&mut diags).is_none());
        assert!(diags.has_error());
    }

    #[test]
    fn test_attribute_access() {
        let mut diags = Diagnostics::new();
        let mut data = ResourceData::from_raw(json!({"name": null, "ttl": null}));
        data.set_attribute(&AttributePath::root("name"), &"www.", &mut diags);
        let name: Value<String> = data.get_attribute(&AttributePath::root("name"), &mut diags);
        assert_eq!(name, Value::string("www."));
        let missing: Value<String> =
            data.get_attribute(&AttributePath::root("missing"), &mut diags);
        assert!(missing.is_null());
    }

    #[test]
    fn test_type_name() {
        let req = MetadataRequest {
            provider_type_name: "leaseweb".to_string(),
        };
        assert_eq!(
            req.type_name("dns_resource_record_set"),
            "leaseweb_dns_resource_record_set"
        );
    }
}
