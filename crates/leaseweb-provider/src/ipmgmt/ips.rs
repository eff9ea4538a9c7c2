//! IP management IP listing

use super::ip::{IpModel, adapt_ip, ip_attributes};
use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use crate::utils::{configure_client, read_only, require_client};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::validator::{list_items_not_empty, one_of_ints, one_of_strings};
use leaseweb_framework::{
    AttrType, Attribute, ConfigureRequest, Context, DataSource, Diagnostics, MetadataRequest,
    ReadDataSourceRequest, ReadDataSourceResponse, Schema, Value, async_trait,
};
use leaseweb_sdk::models::ipmgmt::{IpType, NetworkType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct IpsModel {
    network_type: Value<String>,
    version: Value<i32>,
    #[serde(rename = "type")]
    ip_type: Value<String>,
    null_routed: Value<bool>,
    primary: Value<bool>,
    equipment_ids: Value<Vec<String>>,
    ips: Value<Vec<IpModel>>,
}

/// `leaseweb_ipmgmt_ips`
#[derive(Default)]
pub struct IpDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for IpDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("ipmgmt_ips")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            (
                "network_type",
                Attribute::string()
                    .optional()
                    .validator(one_of_strings(&NetworkType::values())),
            ),
            (
                "version",
                Attribute::int32()
                    .optional()
                    .validator(one_of_ints(&[4, 6])),
            ),
            (
                "type",
                Attribute::string()
                    .optional()
                    .validator(one_of_strings(&IpType::values())),
            ),
            ("null_routed", Attribute::bool().optional()),
            ("primary", Attribute::bool().optional()),
            (
                "equipment_ids",
                Attribute::list(AttrType::String)
                    .optional()
                    .validator(list_items_not_empty()),
            ),
            (
                "ips",
                Attribute::list_nested(read_only(ip_attributes())).computed(),
            ),
        ]))
        .with_description("Lists IPs")
    }

    fn configure(&mut self, req: &ConfigureRequest, diags: &mut Diagnostics) {
        if let Some(client) = configure_client(req, diags) {
            self.client = Some(client);
        }
    }

    async fn read(
        &self,
        ctx: &Context,
        req: ReadDataSourceRequest,
        resp: &mut ReadDataSourceResponse,
    ) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };
        let Some(mut model) = req.config.get::<IpsModel>(&mut resp.diagnostics) else {
            return;
        };

        let mut request = client.client.ip_mgmt().get_ip_list();
        if let Some(network_type) = model.network_type.as_known() {
            match network_type.parse::<NetworkType>() {
                Ok(network_type) => request = request.with_network_type(network_type),
                Err(e) => {
                    resp.diagnostics.add_error("Invalid Network Type", e);
                    return;
                }
            }
        }
        if let Some(ip_type) = model.ip_type.as_known() {
            match ip_type.parse::<IpType>() {
                Ok(ip_type) => request = request.with_type(ip_type),
                Err(e) => {
                    resp.diagnostics.add_error("Invalid IP Type", e);
                    return;
                }
            }
        }
        if let Some(version) = model.version.as_known() {
            request = request.with_version(*version);
        }
        if let Some(null_routed) = model.null_routed.as_known() {
            request = request.with_null_routed(*null_routed);
        }
        if let Some(primary) = model.primary.as_known() {
            request = request.with_primary(*primary);
        }
        if let Some(ids) = model.equipment_ids.as_known().filter(|ids| !ids.is_empty()) {
            request = request.with_equipment_ids(ids.join(","));
        }

        match paginate(ctx, request).await {
            Ok(ips) => {
                model.ips = Value::Known(ips.iter().map(adapt_ip).collect());
                resp.state.set(&model, &mut resp.diagnostics);
            }
            Err(e) => report_error("Unable to list IPs", &e, &mut resp.diagnostics),
        }
    }
}
