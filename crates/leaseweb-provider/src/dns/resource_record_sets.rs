//! Record sets of a DNS domain

use super::resource_record_set::{ResourceRecordSetModel, adapt_record_set, record_set_attributes};
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
struct ResourceRecordSetsModel {
    domain_name: Value<String>,
    resource_record_sets: Value<Vec<ResourceRecordSetModel>>,
}

/// `leaseweb_dns_resource_record_sets`
#[derive(Default)]
pub struct ResourceRecordSetsDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for ResourceRecordSetsDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("dns_resource_record_sets")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            ("domain_name", Attribute::string().required()),
            (
                "resource_record_sets",
                Attribute::list_nested(read_only(record_set_attributes())).computed(),
            ),
        ]))
        .with_description("Lists the resource record sets of a domain")
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
        let Some(mut model) = req
            .config
            .get::<ResourceRecordSetsModel>(&mut resp.diagnostics)
        else {
            return;
        };
        let domain_name = model.domain_name.as_str().to_string();

        let request = client
            .client
            .dns()
            .get_resource_record_set_list(&domain_name);
        match paginate(ctx, request).await {
            Ok(record_sets) => {
                model.resource_record_sets = Value::Known(
                    record_sets
                        .iter()
                        .map(|record_set| adapt_record_set(&domain_name, record_set))
                        .collect(),
                );
                resp.state.set(&model, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                &format!("Unable to list resource record sets of {}", domain_name),
                &e,
                &mut resp.diagnostics,
            ),
        }
    }
}
