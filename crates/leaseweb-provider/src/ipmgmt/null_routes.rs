//! Null route history

use super::null_route::{NullRouteModel, adapt_null_route, null_route_attributes};
use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use crate::utils::{configure_client, read_only, require_client};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    Attribute, ConfigureRequest, Context, DataSource, Diagnostics, MetadataRequest,
    ReadDataSourceRequest, ReadDataSourceResponse, Schema, Value, async_trait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct NullRoutesModel {
    ip: Value<String>,
    equipment_id: Value<String>,
    null_routes: Value<Vec<NullRouteModel>>,
}

/// `leaseweb_ipmgmt_null_routes`
#[derive(Default)]
pub struct NullRoutesDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for NullRoutesDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("ipmgmt_null_routes")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            ("ip", Attribute::string().optional()),
            ("equipment_id", Attribute::string().optional()),
            (
                "null_routes",
                Attribute::list_nested(read_only(null_route_attributes())).computed(),
            ),
        ]))
        .with_description("Lists null routes, lifted ones included")
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
        let Some(mut model) = req.config.get::<NullRoutesModel>(&mut resp.diagnostics) else {
            return;
        };

        let mut request = client.client.ip_mgmt().get_null_route_history_list();
        if let Some(ip) = model.ip.as_known() {
            request = request.with_ip(ip);
        }
        if let Some(equipment_id) = model.equipment_id.as_known() {
            request = request.with_equipment_id(equipment_id);
        }

        match paginate(ctx, request).await {
            Ok(routes) => {
                model.null_routes = Value::Known(
                    routes
                        .iter()
                        .map(|route| adapt_null_route(route, None))
                        .collect(),
                );
                resp.state.set(&model, &mut resp.diagnostics);
            }
            Err(e) => report_error("Unable to list null routes", &e, &mut resp.diagnostics),
        }
    }
}
