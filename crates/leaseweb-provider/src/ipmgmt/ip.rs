//! IP management IPs
//!
//! IPs belong to the equipment they are assigned to and cannot be created
//! or released here. Creating the resource adopts an existing IP; only the
//! reverse lookup is writable.

use crate::provider::ProviderClient;
use crate::utils::adapt::adapt_nullable_string;
use crate::utils::errors::report_error;
use crate::utils::{call, configure_client, require_client};
use leaseweb_framework::planmodifier::{requires_replace, use_state_for_unknown};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    Attribute, Attributes, ConfigureRequest, Context, CreateRequest, CreateResponse,
    DeleteRequest, DeleteResponse, Diagnostics, ImportStateRequest, ImportStateResponse,
    MetadataRequest, ReadRequest, ReadResponse, Resource, Schema, UpdateRequest, UpdateResponse,
    Value, async_trait, import_state_passthrough_id,
};
use leaseweb_sdk::models::ipmgmt::{Ip, UpdateIpOpts};
use leaseweb_sdk::{IpMgmtApi, SdkError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct IpModel {
    pub ip: Value<String>,
    pub reverse_lookup: Value<String>,
    pub version: Value<i32>,
    #[serde(rename = "type")]
    pub ip_type: Value<String>,
    pub prefix_length: Value<i32>,
    pub primary: Value<bool>,
    pub null_routed: Value<bool>,
    pub unnulling_allowed: Value<bool>,
    pub network_type: Value<String>,
    pub equipment_id: Value<String>,
    pub assigned_contract_id: Value<String>,
}

pub(crate) fn ip_attributes() -> Attributes {
    attributes([
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
                .plan_modifier(use_state_for_unknown()),
        ),
        ("version", Attribute::int32().computed()),
        ("type", Attribute::string().computed()),
        ("prefix_length", Attribute::int32().computed()),
        ("primary", Attribute::bool().computed()),
        ("null_routed", Attribute::bool().computed()),
        ("unnulling_allowed", Attribute::bool().computed()),
        ("network_type", Attribute::string().computed()),
        ("equipment_id", Attribute::string().computed()),
        ("assigned_contract_id", Attribute::string().computed()),
    ])
}

pub(crate) fn adapt_ip(ip: &Ip) -> IpModel {
    IpModel {
        ip: Value::string(&ip.ip),
        reverse_lookup: adapt_nullable_string(ip.get_reverse_lookup_ok()),
        version: Value::Known(ip.version),
        ip_type: Value::string(ip.ip_type.as_str()),
        prefix_length: Value::Known(ip.prefix_length),
        primary: Value::Known(ip.primary),
        null_routed: Value::Known(ip.null_routed),
        unnulling_allowed: Value::Known(ip.unnulling_allowed),
        network_type: Value::string(ip.network_type.as_str()),
        equipment_id: adapt_nullable_string(ip.equipment_id.as_deref()),
        assigned_contract_id: adapt_nullable_string(
            ip.get_assigned_contract_ok().map(|c| c.id.as_str()),
        ),
    }
}

/// Fetch `ip` and, when the plan sets a different reverse lookup, write it.
async fn converge(ctx: &Context, api: &IpMgmtApi, plan: &IpModel) -> Result<Ip, SdkError> {
    let address = plan.ip.as_str();
    let (current, _) = call(ctx, api.get_ip(address).execute()).await?;

    match plan.reverse_lookup.as_known() {
        Some(reverse_lookup)
            if current.get_reverse_lookup_ok() != Some(reverse_lookup.as_str()) =>
        {
            info!(ip = address, reverse_lookup = %reverse_lookup, "Updating reverse lookup");
            let opts = UpdateIpOpts {
                reverse_lookup: reverse_lookup.clone(),
            };
            let (updated, _) = call(ctx, api.update_ip(address, opts).execute()).await?;
            Ok(updated)
        }
        _ => Ok(current),
    }
}

/// `leaseweb_ipmgmt_ip`
#[derive(Default)]
pub struct IpResource {
    client: Option<Arc<ProviderClient>>,
}

impl IpResource {
    async fn apply(
        &self,
        ctx: &Context,
        plan: &IpModel,
        diags: &mut Diagnostics,
    ) -> Option<IpModel> {
        let client = require_client(&self.client, diags)?;
        match converge(ctx, &client.client.ip_mgmt(), plan).await {
            Ok(ip) => Some(adapt_ip(&ip)),
            Err(e) => {
                report_error(
                    &format!("Unable to update IP {}", plan.ip.as_str()),
                    &e,
                    diags,
                );
                None
            }
        }
    }
}

#[async_trait]
impl Resource for IpResource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("ipmgmt_ip")
    }

    fn schema(&self) -> Schema {
        Schema::new(ip_attributes()).with_description("Manages the reverse lookup of an IP")
    }

    fn configure(&mut self, req: &ConfigureRequest, diags: &mut Diagnostics) {
        if let Some(client) = configure_client(req, diags) {
            self.client = Some(client);
        }
    }

    async fn create(&self, ctx: &Context, req: CreateRequest, resp: &mut CreateResponse) {
        let Some(plan) = req.plan.get::<IpModel>(&mut resp.diagnostics) else {
            return;
        };
        if let Some(state) = self.apply(ctx, &plan, &mut resp.diagnostics).await {
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
        let address = prior.ip.as_str();

        match call(ctx, client.client.ip_mgmt().get_ip(address).execute()).await {
            Ok((ip, _)) => resp.state.set(&adapt_ip(&ip), &mut resp.diagnostics),
            Err(e) if e.is_not_found() => {
                warn!(ip = address, "IP no longer exists, removing from state");
                resp.state.remove();
            }
            Err(e) => report_error(
                &format!("Unable to read IP {}", address),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }

    async fn update(&self, ctx: &Context, req: UpdateRequest, resp: &mut UpdateResponse) {
        let Some(plan) = req.plan.get::<IpModel>(&mut resp.diagnostics) else {
            return;
        };
        if let Some(state) = self.apply(ctx, &plan, &mut resp.diagnostics).await {
            resp.state.set(&state, &mut resp.diagnostics);
        }
    }

    async fn delete(&self, _ctx: &Context, req: DeleteRequest, _resp: &mut DeleteResponse) {
        let address = req.state.raw()["ip"].as_str().unwrap_or_default().to_string();
        warn!(ip = %address, "IPs cannot be released, removing from state only");
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

#[cfg(test)]
mod tests {
    use super::*;
    use leaseweb_framework::ResourceData;
    use leaseweb_sdk::testing::MockTransport;
    use leaseweb_sdk::{Client, Method};
    use serde_json::json;

    const PATH: &str = "/ipMgmt/v2/ips/85.17.0.1";

    fn ip(reverse_lookup: Option<&str>) -> serde_json::Value {
        json!({
            "ip": "85.17.0.1",
            "version": 4,
            "type": "NORMAL_IP",
            "prefixLength": 32,
            "primary": true,
            "reverseLookup": reverse_lookup,
            "nullRouted": false,
            "unnullingAllowed": false,
            "networkType": "PUBLIC",
            "equipmentId": "12345",
            "assignedContract": {"id": "5643634"},
            "subnet": null
        })
    }

    fn resource(mock: Arc<MockTransport>) -> IpResource {
        IpResource {
            client: Some(Arc::new(ProviderClient::new(Client::with_transport(mock)))),
        }
    }

    #[test]
    fn test_adapt_matches_schema() {
        let ip: Ip = serde_json::from_value(ip(None)).unwrap();
        let model = adapt_ip(&ip);
        assert_eq!(model.reverse_lookup, Value::Null);
        assert_eq!(model.assigned_contract_id, Value::string("5643634"));

        let raw = serde_json::to_value(&model).unwrap();
        IpResource::default().schema().check(&raw).unwrap();
    }

    #[tokio::test]
    async fn test_create_updates_differing_reverse_lookup() {
        let mock = MockTransport::new();
        mock.on(Method::Get, PATH, 200, ip(Some("old.example.com")))
            .on(Method::Put, PATH, 200, ip(Some("new.example.com")));

        let plan = ResourceData::from_raw(
            json!({"ip": "85.17.0.1", "reverse_lookup": "new.example.com"}),
        );
        let mut resp = CreateResponse::default();
        resource(mock.clone())
            .create(
                &Context::new(),
                CreateRequest {
                    config: plan.clone(),
                    plan,
                },
                &mut resp,
            )
            .await;

        assert!(resp.diagnostics.is_empty(), "{:?}", resp.diagnostics);
        assert_eq!(
            mock.call_log(),
            vec![format!("GET {}", PATH), format!("PUT {}", PATH)]
        );
        assert_eq!(resp.state.raw()["reverse_lookup"], json!("new.example.com"));
    }

    #[tokio::test]
    async fn test_matching_reverse_lookup_skips_update() {
        let mock = MockTransport::new();
        mock.on(Method::Get, PATH, 200, ip(Some("host.example.com")));

        let plan = ResourceData::from_raw(
            json!({"ip": "85.17.0.1", "reverse_lookup": "host.example.com"}),
        );
        let mut resp = UpdateResponse::default();
        resource(mock.clone())
            .update(
                &Context::new(),
                UpdateRequest {
                    config: plan.clone(),
                    plan: plan.clone(),
                    state: plan,
                },
                &mut resp,
            )
            .await;

        assert!(mock.calls_to(Method::Put, PATH).is_empty());
    }
}
