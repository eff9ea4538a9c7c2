//! Load balancer target groups

use crate::error::{ProviderError, Result};
use crate::provider::ProviderClient;
use crate::utils::adapt::{
    adapt_nullable_sdk_model_to_resource_object, adapt_nullable_string, object_type,
    optional_non_empty_string,
};
use crate::utils::errors::report_error;
use crate::utils::{call, configure_client, require_client};
use leaseweb_framework::planmodifier::{requires_replace, use_state_for_unknown};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::validator::{
    int_between, one_of_strings, string_length_between, string_matches,
};
use leaseweb_framework::{
    Attribute, Attributes, ConfigureRequest, Context, CreateRequest, CreateResponse,
    DeleteRequest, DeleteResponse, Diagnostics, ImportStateRequest, ImportStateResponse,
    MetadataRequest, ReadRequest, ReadResponse, Resource, Schema, UpdateRequest, UpdateResponse,
    Value, async_trait, import_state_passthrough_id,
};
use leaseweb_sdk::models::publiccloud::{
    CreateTargetGroupOpts, HealthCheck, HealthCheckOpts, HealthCheckProtocol, HttpMethod,
    Protocol, TargetGroup, UpdateTargetGroupOpts,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};
use tracing::{info, warn};

static ABSOLUTE_URI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/\S*$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct HealthCheckModel {
    pub protocol: Value<String>,
    pub method: Value<String>,
    pub uri: Value<String>,
    pub host: Value<String>,
    pub port: Value<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct TargetGroupModel {
    pub id: Value<String>,
    pub name: Value<String>,
    pub protocol: Value<String>,
    pub port: Value<i32>,
    pub region: Value<String>,
    pub health_check: Value<HealthCheckModel>,
}

fn health_check_attributes() -> Attributes {
    attributes([
        (
            "protocol",
            Attribute::string()
                .required()
                .validator(one_of_strings(&HealthCheckProtocol::values())),
        ),
        (
            "method",
            Attribute::string()
                .optional()
                .validator(one_of_strings(&HttpMethod::values())),
        ),
        (
            "uri",
            Attribute::string().required().validator(string_matches(
                ABSOLUTE_URI.clone(),
                "value must be an absolute path such as \"/health\"",
            )),
        ),
        ("host", Attribute::string().optional()),
        (
            "port",
            Attribute::int32()
                .required()
                .validator(int_between(1, 65535)),
        ),
    ])
}

pub(crate) fn target_group_attributes() -> Attributes {
    attributes([
        (
            "id",
            Attribute::string()
                .computed()
                .plan_modifier(use_state_for_unknown()),
        ),
        (
            "name",
            Attribute::string()
                .required()
                .validator(string_length_between(1, 255)),
        ),
        (
            "protocol",
            Attribute::string()
                .required()
                .validator(one_of_strings(&Protocol::values()))
                .plan_modifier(requires_replace()),
        ),
        (
            "port",
            Attribute::int32()
                .required()
                .validator(int_between(1, 65535)),
        ),
        (
            "region",
            Attribute::string()
                .required()
                .plan_modifier(requires_replace()),
        ),
        (
            "health_check",
            Attribute::single_nested(health_check_attributes()).optional(),
        ),
    ])
}

fn adapt_health_check(health_check: &HealthCheck) -> HealthCheckModel {
    HealthCheckModel {
        protocol: Value::string(health_check.protocol.as_str()),
        method: Value::from_option(health_check.method.map(|m| m.as_str().to_string())),
        uri: Value::string(&health_check.uri),
        host: adapt_nullable_string(health_check.host.as_deref()),
        port: Value::Known(health_check.port),
    }
}

pub(crate) fn adapt_target_group(
    target_group: &TargetGroup,
    diags: &mut Diagnostics,
) -> TargetGroupModel {
    TargetGroupModel {
        id: Value::string(&target_group.id),
        name: Value::string(&target_group.name),
        protocol: Value::string(target_group.protocol.as_str()),
        port: Value::Known(target_group.port),
        region: Value::string(&target_group.region),
        health_check: adapt_nullable_sdk_model_to_resource_object(
            target_group.get_health_check_ok(),
            &object_type(health_check_attributes()),
            adapt_health_check,
            diags,
        ),
    }
}

fn known<T: Clone>(value: &Value<T>, attribute: &str) -> Result<T> {
    value
        .as_known()
        .cloned()
        .ok_or_else(|| ProviderError::invalid_value(attribute, "value must be known"))
}

impl HealthCheckModel {
    fn opts(&self) -> Result<HealthCheckOpts> {
        let protocol = known(&self.protocol, "health_check.protocol")?
            .parse()
            .map_err(|e: String| ProviderError::invalid_value("health_check.protocol", e))?;
        let method = match self.method.as_known() {
            Some(method) => Some(
                method
                    .parse()
                    .map_err(|e: String| ProviderError::invalid_value("health_check.method", e))?,
            ),
            None => None,
        };
        Ok(HealthCheckOpts {
            protocol,
            uri: known(&self.uri, "health_check.uri")?,
            port: known(&self.port, "health_check.port")?,
            method,
            host: optional_non_empty_string(&self.host),
        })
    }
}

impl TargetGroupModel {
    fn health_check_opts(&self) -> Result<Option<HealthCheckOpts>> {
        self.health_check
            .as_known()
            .map(HealthCheckModel::opts)
            .transpose()
    }

    fn create_opts(&self) -> Result<CreateTargetGroupOpts> {
        Ok(CreateTargetGroupOpts {
            name: known(&self.name, "name")?,
            protocol: known(&self.protocol, "protocol")?
                .parse()
                .map_err(|e: String| ProviderError::invalid_value("protocol", e))?,
            port: known(&self.port, "port")?,
            region: known(&self.region, "region")?,
            health_check: self.health_check_opts()?,
        })
    }

    fn update_opts(&self) -> Result<UpdateTargetGroupOpts> {
        Ok(UpdateTargetGroupOpts {
            name: optional_non_empty_string(&self.name),
            port: self.port.as_known().copied(),
            health_check: self.health_check_opts()?,
        })
    }
}

/// `leaseweb_publiccloud_target_group`
#[derive(Default)]
pub struct TargetGroupResource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl Resource for TargetGroupResource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_target_group")
    }

    fn schema(&self) -> Schema {
        Schema::new(target_group_attributes())
            .with_description("Manages a load balancer target group")
    }

    fn configure(&mut self, req: &ConfigureRequest, diags: &mut Diagnostics) {
        if let Some(client) = configure_client(req, diags) {
            self.client = Some(client);
        }
    }

    async fn create(&self, ctx: &Context, req: CreateRequest, resp: &mut CreateResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(plan) = req.plan.get::<TargetGroupModel>(&mut resp.diagnostics) else {
            return;
        };
        let opts = match plan.create_opts() {
            Ok(opts) => opts,
            Err(e) => {
                resp.diagnostics
                    .add_error("Error creating target group", e.to_string());
                return;
            }
        };

        info!(name = %opts.name, region = %opts.region, "Creating target group");
        let api = client.client.public_cloud();
        match call(ctx, api.create_target_group(opts).execute()).await {
            Ok((target_group, _)) => {
                let state = adapt_target_group(&target_group, &mut resp.diagnostics);
                resp.state.set(&state, &mut resp.diagnostics);
            }
            Err(e) => report_error("Error creating target group", &e, &mut resp.diagnostics),
        }
    }

    async fn read(&self, ctx: &Context, req: ReadRequest, resp: &mut ReadResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(prior) = req.state.get::<TargetGroupModel>(&mut resp.diagnostics) else {
            return;
        };
        let id = prior.id.as_str();

        match call(
            ctx,
            client.client.public_cloud().get_target_group(id).execute(),
        )
        .await
        {
            Ok((target_group, _)) => {
                let state = adapt_target_group(&target_group, &mut resp.diagnostics);
                resp.state.set(&state, &mut resp.diagnostics);
            }
            Err(e) if e.is_not_found() => {
                warn!(id, "Target group no longer exists, removing from state");
                resp.state.remove();
            }
            Err(e) => report_error(
                &format!("Unable to read target group {}", id),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn update(&self, ctx: &Context, req: UpdateRequest, resp: &mut UpdateResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let (Some(plan), Some(state)) = (
            req.plan.get::<TargetGroupModel>(&mut resp.diagnostics),
            req.state.get::<TargetGroupModel>(&mut resp.diagnostics),
        ) else {
            return;
        };
        let opts = match plan.update_opts() {
            Ok(opts) => opts,
            Err(e) => {
                resp.diagnostics
                    .add_error("Error updating target group", e.to_string());
                return;
            }
        };
        let id = state.id.as_str();

        info!(id, "Updating target group");
        let api = client.client.public_cloud();
        match call(ctx, api.update_target_group(id, opts).execute()).await {
            Ok((target_group, _)) => {
                let new_state = adapt_target_group(&target_group, &mut resp.diagnostics);
                resp.state.set(&new_state, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                &format!("Unable to update target group {}", id),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn delete(&self, ctx: &Context, req: DeleteRequest, resp: &mut DeleteResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(state) = req.state.get::<TargetGroupModel>(&mut resp.diagnostics) else {
            return;
        };
        let id = state.id.as_str();

        info!(id, "Deleting target group");
        let api = client.client.public_cloud();
        match call(ctx, api.delete_target_group(id).execute()).await {
            Ok(_) => {}
            Err(e) if e.is_not_found() => warn!(id, "Target group already gone"),
            Err(e) => report_error(
                &format!("Unable to delete target group {}", id),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn import_state(
        &self,
        _ctx: &Context,
        req: ImportStateRequest,
        resp: &mut ImportStateResponse,
    ) {
        import_state_passthrough_id("id", &req.id, resp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adapt_target_group() {
        let target_group: TargetGroup = serde_json::from_value(json!({
            "id": "tg-1",
            "name": "web",
            "protocol": "HTTP",
            "port": 80,
            "region": "eu-west-3",
            "healthCheck": {"protocol": "HTTP", "method": null, "uri": "/health", "host": null, "port": 80}
        }))
        .unwrap();
        let mut diags = Diagnostics::new();
        let model = adapt_target_group(&target_group, &mut diags);

        let health_check = model.health_check.as_known().unwrap();
        assert_eq!(health_check.method, Value::Null);
        assert_eq!(health_check.uri, Value::string("/health"));

        let raw = serde_json::to_value(&model).unwrap();
        TargetGroupResource::default().schema().check(&raw).unwrap();
    }

    #[test]
    fn test_create_opts_parse_enums() {
        let model = TargetGroupModel {
            name: Value::string("web"),
            protocol: Value::string("HTTPS"),
            port: Value::Known(443),
            region: Value::string("eu-west-3"),
            health_check: Value::Known(HealthCheckModel {
                protocol: Value::string("HTTPS"),
                method: Value::string("HEAD"),
                uri: Value::string("/"),
                host: Value::string(""),
                port: Value::Known(443),
            }),
            ..Default::default()
        };
        let opts = model.create_opts().unwrap();
        assert_eq!(opts.protocol, Protocol::Https);
        let health_check = opts.health_check.unwrap();
        assert_eq!(health_check.method, Some(HttpMethod::Head));
        assert_eq!(health_check.host, None);
    }

    #[test]
    fn test_health_check_uri_must_be_absolute() {
        let schema = TargetGroupResource::default().schema();
        let mut config = json!({
            "name": "web",
            "protocol": "HTTP",
            "port": 80,
            "region": "eu-west-3",
            "health_check": {"protocol": "HTTP", "uri": "health", "port": 80}
        });

        let diags = leaseweb_framework::plan::validate_config(&schema, &config);
        let diag = diags.errors().next().unwrap();
        assert_eq!(
            diag.attribute.as_ref().unwrap().to_string(),
            "health_check.uri"
        );

        config["health_check"]["uri"] = json!("/health");
        assert!(!leaseweb_framework::plan::validate_config(&schema, &config).has_error());
    }

    #[test]
    fn test_unknown_health_check_port() {
        let model = TargetGroupModel {
            health_check: Value::Known(HealthCheckModel {
                protocol: Value::string("HTTP"),
                uri: Value::string("/"),
                port: Value::Unknown,
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = model.update_opts().unwrap_err();
        assert!(err.to_string().contains("health_check.port"));
    }
}
