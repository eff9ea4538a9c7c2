//! Null routes
//!
//! Nulling an IP creates a null route record; removing the null route
//! stamps `unnulled_at` on it. A record that has been unnulled is no longer
//! managed. `automatic_unnulling_at` is exchanged as RFC 3339.

use crate::error::{ProviderError, Result};
use crate::provider::ProviderClient;
use crate::utils::adapt::{
    adapt_nullable_string, adapt_nullable_time, adapt_time, optional_non_empty_string,
};
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use crate::utils::{call, configure_client, require_client};
use chrono::{DateTime, SecondsFormat, Utc};
use leaseweb_framework::planmodifier::{requires_replace, use_state_for_unknown};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    Attribute, AttributePath, Attributes, ConfigureRequest, Context, CreateRequest,
    CreateResponse, DeleteRequest, DeleteResponse, Diagnostics, ImportStateRequest,
    ImportStateResponse, MetadataRequest, ReadRequest, ReadResponse, Resource, Schema,
    UpdateRequest, UpdateResponse, ValidateConfigRequest, Value, async_trait,
    import_state_passthrough_id,
};
use leaseweb_sdk::models::ipmgmt::{NullRoute, NullRouteOpts};
use leaseweb_sdk::{IpMgmtApi, SdkError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct NullRouteModel {
    pub id: Value<String>,
    pub ip: Value<String>,
    pub automatic_unnulling_at: Value<String>,
    pub comment: Value<String>,
    pub ticket_id: Value<String>,
    pub nulled_at: Value<String>,
    pub nulled_by: Value<String>,
    pub unnulled_at: Value<String>,
    pub unnulled_by: Value<String>,
}

pub(crate) fn null_route_attributes() -> Attributes {
    attributes([
        (
            "id",
            Attribute::string()
                .computed()
                .plan_modifier(use_state_for_unknown()),
        ),
        (
            "ip",
            Attribute::string()
                .required()
                .plan_modifier(requires_replace()),
        ),
        (
            "automatic_unnulling_at",
            Attribute::string()
                .optional()
                .description("RFC 3339 time at which the null route is lifted"),
        ),
        ("comment", Attribute::string().optional()),
        ("ticket_id", Attribute::string().optional()),
        (
            "nulled_at",
            Attribute::string()
                .computed()
                .plan_modifier(use_state_for_unknown()),
        ),
        (
            "nulled_by",
            Attribute::string()
                .computed()
                .plan_modifier(use_state_for_unknown()),
        ),
        ("unnulled_at", Attribute::string().computed()),
        ("unnulled_by", Attribute::string().computed()),
    ])
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| ProviderError::invalid_value("automatic_unnulling_at", e.to_string()))
}

/// Keeps the prior spelling of `automatic_unnulling_at` when it denotes the
/// same instant.
fn adapt_unnulling_at(
    time: Option<&DateTime<Utc>>,
    prior: Option<&NullRouteModel>,
) -> Value<String> {
    let Some(time) = time else {
        return Value::Null;
    };
    let prior = prior
        .and_then(|p| p.automatic_unnulling_at.as_known())
        .filter(|p| parse_time(p).is_ok_and(|p| p == *time));
    match prior {
        Some(prior) => Value::Known(prior.clone()),
        None => Value::Known(time.to_rfc3339_opts(SecondsFormat::Secs, true)),
    }
}

/// A cleared comment or ticket comes back as an empty string.
fn adapt_clearable_string(value: Option<&str>) -> Value<String> {
    adapt_nullable_string(value.filter(|v| !v.is_empty()))
}

/// Null clears the field on update; the API keeps fields left out of the body.
fn clearable_string(value: &Value<String>) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Unknown => None,
        Value::Known(v) => Some(v.clone()),
    }
}

pub(crate) fn adapt_null_route(
    route: &NullRoute,
    prior: Option<&NullRouteModel>,
) -> NullRouteModel {
    NullRouteModel {
        id: Value::string(&route.id),
        ip: Value::string(&route.ip),
        automatic_unnulling_at: adapt_unnulling_at(route.get_automated_unnulling_at_ok(), prior),
        comment: adapt_clearable_string(route.comment.as_deref()),
        ticket_id: adapt_clearable_string(route.ticket_id.as_deref()),
        nulled_at: adapt_time(&route.nulled_at),
        nulled_by: Value::string(&route.nulled_by),
        unnulled_at: adapt_nullable_time(route.get_unnulled_at_ok()),
        unnulled_by: adapt_nullable_string(route.get_unnulled_by_ok()),
    }
}

impl NullRouteModel {
    fn opts(&self) -> Result<NullRouteOpts> {
        let automated_unnulling_at = match self.automatic_unnulling_at.as_known() {
            Some(value) => Some(parse_time(value)?),
            None => None,
        };
        Ok(NullRouteOpts {
            automated_unnulling_at,
            comment: optional_non_empty_string(&self.comment),
            ticket_id: optional_non_empty_string(&self.ticket_id),
        })
    }

    fn update_opts(&self) -> Result<NullRouteOpts> {
        Ok(NullRouteOpts {
            comment: clearable_string(&self.comment),
            ticket_id: clearable_string(&self.ticket_id),
            ..self.opts()?
        })
    }
}

/// The route to track for `prior`: by id when known, otherwise the active
/// route of its IP. `None` once the route has been lifted.
async fn find_route(
    ctx: &Context,
    api: &IpMgmtApi,
    prior: &NullRouteModel,
) -> std::result::Result<Option<NullRoute>, SdkError> {
    if let Some(id) = prior.id.as_known() {
        return match call(ctx, api.get_null_route(id).execute()).await {
            Ok((route, _)) => Ok(Some(route).filter(NullRoute::is_active)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        };
    }

    let history = api.get_null_route_history_list().with_ip(prior.ip.as_str());
    let routes = paginate(ctx, history).await?;
    debug!(
        ip = prior.ip.as_str(),
        count = routes.len(),
        "Fetched null route history"
    );
    Ok(routes.into_iter().find(NullRoute::is_active))
}

/// `leaseweb_ipmgmt_null_route`
#[derive(Default)]
pub struct NullRouteResource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl Resource for NullRouteResource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("ipmgmt_null_route")
    }

    fn schema(&self) -> Schema {
        Schema::new(null_route_attributes()).with_description("Null routes an IP")
    }

    fn configure(&mut self, req: &ConfigureRequest, diags: &mut Diagnostics) {
        if let Some(client) = configure_client(req, diags) {
            self.client = Some(client);
        }
    }

    fn validate_config(&self, req: &ValidateConfigRequest, diags: &mut Diagnostics) {
        let path = AttributePath::root("automatic_unnulling_at");
        if let Value::Known(value) = req.config.get_attribute::<String>(&path, diags) {
            if let Err(e) = parse_time(&value) {
                diags.add_attribute_error(path, "Invalid Attribute Value", e.to_string());
            }
        }
    }

    async fn create(&self, ctx: &Context, req: CreateRequest, resp: &mut CreateResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(plan) = req.plan.get::<NullRouteModel>(&mut resp.diagnostics) else {
            return;
        };
        let opts = match plan.opts() {
            Ok(opts) => opts,
            Err(e) => {
                resp.diagnostics
                    .add_error("Error null routing IP", e.to_string());
                return;
            }
        };
        let ip = plan.ip.as_str();

        info!(ip, "Null routing IP");
        match call(
            ctx,
            client.client.ip_mgmt().null_route_ip(ip, opts).execute(),
        )
        .await
        {
            Ok((route, _)) => {
                let state = adapt_null_route(&route, Some(&plan));
                resp.state.set(&state, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                &format!("Unable to null route IP {}", ip),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn read(&self, ctx: &Context, req: ReadRequest, resp: &mut ReadResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(prior) = req.state.get::<NullRouteModel>(&mut resp.diagnostics) else {
            return;
        };

        match find_route(ctx, &client.client.ip_mgmt(), &prior).await {
            Ok(Some(route)) => {
                let state = adapt_null_route(&route, Some(&prior));
                resp.state.set(&state, &mut resp.diagnostics);
            }
            Ok(None) => {
                warn!(
                    ip = prior.ip.as_str(),
                    "Null route has been lifted, removing from state"
                );
                resp.state.remove();
            }
            Err(e) => report_error(
                &format!("Unable to read null route of {}", prior.ip.as_str()),
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
            req.plan.get::<NullRouteModel>(&mut resp.diagnostics),
            req.state.get::<NullRouteModel>(&mut resp.diagnostics),
        ) else {
            return;
        };
        let opts = match plan.update_opts() {
            Ok(opts) => opts,
            Err(e) => {
                resp.diagnostics
                    .add_error("Error updating null route", e.to_string());
                return;
            }
        };
        let id = state.id.as_str();

        info!(id, ip = plan.ip.as_str(), "Updating null route");
        let api = client.client.ip_mgmt();
        match call(ctx, api.update_null_route(id, opts).execute()).await {
            Ok((route, _)) => {
                let new_state = adapt_null_route(&route, Some(&plan));
                resp.state.set(&new_state, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                &format!("Unable to update null route {}", id),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn delete(&self, ctx: &Context, req: DeleteRequest, resp: &mut DeleteResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(state) = req.state.get::<NullRouteModel>(&mut resp.diagnostics) else {
            return;
        };
        let ip = state.ip.as_str();

        info!(ip, "Removing null route");
        match call(
            ctx,
            client.client.ip_mgmt().remove_ip_null_route(ip).execute(),
        )
        .await
        {
            Ok(_) => {}
            Err(e) if e.is_not_found() => warn!(ip, "Null route already removed"),
            Err(e) => report_error(
                &format!("Unable to remove null route of {}", ip),
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
        import_state_passthrough_id("ip", &req.id, resp);
    }
}
