//! Public cloud instances data source
//!
//! The list endpoint returns summaries; every matching instance is then
//! fetched in full. Results are ordered by instance id.

use super::instance::{InstanceModel, InstanceResource, adapt_instance};
use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::fanout::fan_out;
use crate::utils::paginate::paginate;
use crate::utils::{configure_client, read_only, require_client};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::validator::one_of_strings;
use leaseweb_framework::{
    Attribute, ConfigureRequest, Context, DataSource, Diagnostics, MetadataRequest,
    ReadDataSourceRequest, ReadDataSourceResponse, Resource, Schema, Value, async_trait,
};
use leaseweb_sdk::models::publiccloud::InstanceState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Upper bound on concurrent detail requests.
const DETAIL_CONCURRENCY: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct InstancesModel {
    reference: Value<String>,
    ip: Value<String>,
    state: Value<String>,
    #[serde(rename = "type")]
    instance_type: Value<String>,
    region: Value<String>,
    instances: Value<Vec<InstanceModel>>,
}

/// `leaseweb_publiccloud_instances`
#[derive(Default)]
pub struct InstancesDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for InstancesDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_instances")
    }

    fn schema(&self) -> Schema {
        let instance = read_only(InstanceResource::default().schema().attributes);
        Schema::new(attributes([
            (
                "reference",
                Attribute::string()
                    .optional()
                    .description("Only instances with this reference"),
            ),
            (
                "ip",
                Attribute::string()
                    .optional()
                    .description("Only the instance with this IP"),
            ),
            (
                "state",
                Attribute::string()
                    .optional()
                    .validator(one_of_strings(&InstanceState::values())),
            ),
            ("type", Attribute::string().optional()),
            ("region", Attribute::string().optional()),
            ("instances", Attribute::list_nested(instance).computed()),
        ]))
        .with_description("Lists public cloud instances")
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
        let Some(mut model) = req.config.get::<InstancesModel>(&mut resp.diagnostics) else {
            return;
        };

        let api = client.client.public_cloud();
        let mut request = api.get_instance_list();
        if let Some(reference) = model.reference.as_known() {
            request = request.with_reference(reference);
        }
        if let Some(ip) = model.ip.as_known() {
            request = request.with_ip(ip);
        }
        if let Some(state) = model.state.as_known() {
            match state.parse::<InstanceState>() {
                Ok(state) => request = request.with_state(state),
                Err(e) => {
                    resp.diagnostics.add_error("Invalid Instance State", e);
                    return;
                }
            }
        }
        if let Some(instance_type) = model.instance_type.as_known() {
            request = request.with_type(instance_type);
        }
        if let Some(region) = model.region.as_known() {
            request = request.with_region(region);
        }

        let summaries = match paginate(ctx, request).await {
            Ok(summaries) => summaries,
            Err(e) => {
                report_error(
                    "Unable to list public cloud instances",
                    &e,
                    &mut resp.diagnostics,
                );
                return;
            }
        };
        let ids: Vec<String> = summaries.into_iter().map(|i| i.id).collect();
        debug!(count = ids.len(), "Listed public cloud instances");

        let details = fan_out(ctx, ids, Some(DETAIL_CONCURRENCY), |id| {
            let api = api.clone();
            async move {
                api.get_instance(id)
                    .execute()
                    .await
                    .map(|(instance, _)| instance)
            }
        })
        .await;
        let instances = match details {
            Ok(instances) => instances,
            Err(e) => {
                report_error(
                    "Unable to read public cloud instance details",
                    &e,
                    &mut resp.diagnostics,
                );
                return;
            }
        };

        let models: Vec<InstanceModel> = instances
            .iter()
            .map(|instance| adapt_instance(instance, None, &mut resp.diagnostics))
            .collect();
        model.instances = Value::Known(models);
        resp.state.set(&model, &mut resp.diagnostics);
    }
}
