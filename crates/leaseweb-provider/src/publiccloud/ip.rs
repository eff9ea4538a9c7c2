//! Public IPs of a public cloud instance
//!
//! IPs come with the instance, so creating the resource only adopts the IP
//! and sets its reverse lookup. Deleting it leaves the IP in place.

use crate::provider::ProviderClient;
use crate::utils::adapt::adapt_nullable_string;
use crate::utils::errors::report_error;
use crate::utils::{call, configure_client, require_client};
use leaseweb_framework::planmodifier::requires_replace;
use leaseweb_framework::schema::attributes;
use leaseweb_framework::validator::string_length_between;
use leaseweb_framework::{
    Attribute, ConfigureRequest, Context, CreateRequest, CreateResponse, DeleteRequest,
    DeleteResponse, Diagnostics, ImportStateRequest, ImportStateResponse, MetadataRequest,
    ReadRequest, ReadResponse, Resource, Schema, UpdateRequest, UpdateResponse, Value,
    async_trait, parse_import_id,
};
use leaseweb_sdk::models::publiccloud::{Ip, UpdateIpOpts};
use leaseweb_sdk::{PublicCloudApi, SdkError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct IpModel {
    instance_id: Value<String>,
    ip: Value<String>,
    reverse_lookup: Value<String>,
    prefix_length: Value<i32>,
    version: Value<i32>,
    null_routed: Value<bool>,
    main_ip: Value<bool>,
    network_type: Value<String>,
}

fn adapt_ip(instance_id: &str, ip: &Ip) -> IpModel {
    IpModel {
        instance_id: Value::string(instance_id),
        ip: Value::string(&ip.ip),
        reverse_lookup: adapt_nullable_string(ip.get_reverse_lookup_ok()),
        prefix_length: Value::Known(ip.prefix_length),
        version: Value::Known(ip.version),
        null_routed: Value::Known(ip.null_routed),
        main_ip: Value::Known(ip.main_ip),
        network_type: Value::string(ip.network_type.as_str()),
    }
}

/// Set the reverse lookup when it is known and differs from `current`.
async fn apply_reverse_lookup(
    ctx: &Context,
    api: &PublicCloudApi,
    plan: &IpModel,
    current: Ip,
) -> Result<Ip, SdkError> {
    let Some(reverse_lookup) = plan.reverse_lookup.as_known() else {
        return Ok(current);
    };
    if current.get_reverse_lookup_ok() == Some(reverse_lookup.as_str()) {
        return Ok(current);
    }

    info!(ip = %current.ip, "Updating reverse lookup of public cloud IP");
    let opts = UpdateIpOpts {
        reverse_lookup: reverse_lookup.clone(),
    };
    let (ip, _) = call(
        ctx,
        api.update_instance_ip(plan.instance_id.as_str(), &current.ip, opts)
            .execute(),
    )
    .await?;
    Ok(ip)
}

async fn converge(
    ctx: &Context,
    client: &ProviderClient,
    plan: &IpModel,
    diags: &mut Diagnostics,
) -> Option<IpModel> {
    let (instance_id, ip) = (plan.instance_id.as_str(), plan.ip.as_str());
    let api = client.client.public_cloud();
    let result = match call(ctx, api.get_instance_ip(instance_id, ip).execute()).await {
        Ok((current, _)) => apply_reverse_lookup(ctx, &api, plan, current).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(updated) => Some(adapt_ip(instance_id, &updated)),
        Err(e) => {
            report_error(&format!("Error updating public cloud IP {}", ip), &e, diags);
            None
        }
    }
}

/// `leaseweb_publiccloud_ip`
#[derive(Default)]
pub struct IpResource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl Resource for IpResource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_ip")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            (
                "instance_id",
                Attribute::string()
                    .required()
                    .plan_modifier(requires_replace()),
            ),
            (
                "ip",
                Attribute::string()
                    .required()
                    .plan_modifier(requires_replace()),
            ),
            (
                "reverse_lookup",
                Attribute::string()
                    .optional()
                    .computed()
                    .description("An FQDN the IP resolves to")
                    .validator(string_length_between(1, 255)),
            ),
            ("prefix_length", Attribute::int32().computed()),
            ("version", Attribute::int32().computed()),
            ("null_routed", Attribute::bool().computed()),
            ("main_ip", Attribute::bool().computed()),
            ("network_type", Attribute::string().computed()),
        ]))
        .with_description("Manages the reverse lookup of a public cloud instance IP")
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
        let Some(plan) = req.plan.get::<IpModel>(&mut resp.diagnostics) else {
            return;
        };
        if let Some(state) = converge(ctx, client, &plan, &mut resp.diagnostics).await {
            resp.state.set(&state, &mut resp.diagnostics);
        }
    }

    async fn read(&self, ctx: &Context, req: ReadRequest, resp: &mut ReadResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(prior) = req.state.get::<IpModel>(&mut resp.diagnostics) else {
            return;
        };
        let (instance_id, ip) = (prior.instance_id.as_str(), prior.ip.as_str());

        let api = client.client.public_cloud();
        match call(ctx, api.get_instance_ip(instance_id, ip).execute()).await {
            Ok((found, _)) => {
                let state = adapt_ip(instance_id, &found);
                resp.state.set(&state, &mut resp.diagnostics);
            }
            Err(e) if e.is_not_found() => {
                warn!(
                    instance_id,
                    ip,
                    "Public cloud IP no longer exists, removing from state"
                );
                resp.state.remove();
            }
            Err(e) => report_error(
                &format!("Unable to read public cloud IP {}", ip),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn update(&self, ctx: &Context, req: UpdateRequest, resp: &mut UpdateResponse) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(plan) = req.plan.get::<IpModel>(&mut resp.diagnostics) else {
            return;
        };
        if let Some(state) = converge(ctx, client, &plan, &mut resp.diagnostics).await {
            resp.state.set(&state, &mut resp.diagnostics);
        }
    }

    async fn delete(&self, _ctx: &Context, req: DeleteRequest, _resp: &mut DeleteResponse) {
        warn!(
            ip = %req.state.raw()["ip"],
            "Public cloud IPs cannot be deleted, removing from state only"
        );
    }

    async fn import_state(
        &self,
        _ctx: &Context,
        req: ImportStateRequest,
        resp: &mut ImportStateResponse,
    ) {
        match parse_import_id(&req.id, ["instance_id", "ip"]) {
            Ok([instance_id, ip]) => {
                let seed = IpModel {
                    instance_id: Value::Known(instance_id),
                    ip: Value::Known(ip),
                    ..Default::default()
                };
                resp.state.set(&seed, &mut resp.diagnostics);
            }
            Err(diag) => resp.diagnostics.push(diag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaseweb_sdk::testing::MockTransport;
    use leaseweb_sdk::{Client, Method};
    use serde_json::json;

    const PATH: &str = "/publicCloud/v1/instances/i-1/ips/10.32.60.12";

    fn ip_body(reverse_lookup: Option<&str>) -> serde_json::Value {
        json!({
            "ip": "10.32.60.12",
            "prefixLength": 32,
            "version": 4,
            "nullRouted": false,
            "mainIp": true,
            "networkType": "PUBLIC",
            "reverseLookup": reverse_lookup,
            "ddos": null
        })
    }

    fn plan(reverse_lookup: Value<String>) -> IpModel {
        IpModel {
            instance_id: Value::string("i-1"),
            ip: Value::string("10.32.60.12"),
            reverse_lookup,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_reverse_lookup_updated_when_changed() {
        let mock = MockTransport::new();
        mock.on(Method::Put, PATH, 200, ip_body(Some("web.example.com")));
        let api = Client::with_transport(mock.clone()).public_cloud();
        let current: Ip = serde_json::from_value(ip_body(None)).unwrap();

        let ip = apply_reverse_lookup(
            &Context::new(),
            &api,
            &plan(Value::string("web.example.com")),
            current,
        )
        .await
        .unwrap();
        assert_eq!(ip.reverse_lookup.as_deref(), Some("web.example.com"));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_reverse_lookup_left_alone() {
        let mock = MockTransport::new();
        let api = Client::with_transport(mock.clone()).public_cloud();

        let current: Ip = serde_json::from_value(ip_body(Some("web.example.com"))).unwrap();
        apply_reverse_lookup(
            &Context::new(),
            &api,
            &plan(Value::string("web.example.com")),
            current,
        )
        .await
        .unwrap();

        let current: Ip = serde_json::from_value(ip_body(None)).unwrap();
        apply_reverse_lookup(&Context::new(), &api, &plan(Value::Unknown), current)
            .await
            .unwrap();

        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_adapt_ip_matches_schema() {
        let ip: Ip = serde_json::from_value(ip_body(None)).unwrap();
        let raw = serde_json::to_value(adapt_ip("i-1", &ip)).unwrap();
        IpResource::default().schema().check(&raw).unwrap();
        assert_eq!(raw["reverse_lookup"], json!(null));
    }
}
