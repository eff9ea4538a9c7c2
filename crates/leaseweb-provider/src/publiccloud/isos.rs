//! Public cloud ISOs data source

use super::instance::{IsoModel, adapt_iso, iso_attributes};
use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use crate::utils::{configure_client, require_client};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    Attribute, ConfigureRequest, Context, DataSource, Diagnostics, MetadataRequest,
    ReadDataSourceRequest, ReadDataSourceResponse, Schema, Value, async_trait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct IsosModel {
    isos: Value<Vec<IsoModel>>,
}

/// `leaseweb_publiccloud_isos`
#[derive(Default)]
pub struct IsosDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for IsosDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_isos")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([(
            "isos",
            Attribute::list_nested(iso_attributes()).computed(),
        )]))
        .with_description("Lists the ISOs that can be attached to instances")
    }

    fn configure(&mut self, req: &ConfigureRequest, diags: &mut Diagnostics) {
        if let Some(client) = configure_client(req, diags) {
            self.client = Some(client);
        }
    }

    async fn read(
        &self,
        ctx: &Context,
        _req: ReadDataSourceRequest,
        resp: &mut ReadDataSourceResponse,
    ) {
        let Some(client) = require_client(&self.client, &mut resp.diagnostics) else {
            return;
        };

        match paginate(ctx, client.client.public_cloud().get_iso_list()).await {
            Ok(isos) => {
                let model = IsosModel {
                    isos: Value::Known(isos.iter().map(adapt_iso).collect()),
                };
                resp.state.set(&model, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                "Unable to list public cloud ISOs",
                &e,
                &mut resp.diagnostics,
            ),
        }
    }
}
