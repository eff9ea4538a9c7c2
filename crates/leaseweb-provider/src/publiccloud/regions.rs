//! Public cloud regions data source

use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use crate::utils::{configure_client, require_client};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    Attribute, ConfigureRequest, Context, DataSource, Diagnostics, MetadataRequest,
    ReadDataSourceRequest, ReadDataSourceResponse, Schema, Value, async_trait,
};
use leaseweb_sdk::models::publiccloud::Region;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct RegionModel {
    name: Value<String>,
    location: Value<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct RegionsModel {
    regions: Value<Vec<RegionModel>>,
}

fn adapt_region(region: &Region) -> RegionModel {
    RegionModel {
        name: Value::string(&region.name),
        location: Value::string(&region.location),
    }
}

/// `leaseweb_publiccloud_regions`
#[derive(Default)]
pub struct RegionsDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for RegionsDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_regions")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([(
            "regions",
            Attribute::list_nested(attributes([
                ("name", Attribute::string().computed()),
                ("location", Attribute::string().computed()),
            ]))
            .computed(),
        )]))
        .with_description("Lists the public cloud regions")
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

        match paginate(ctx, client.client.public_cloud().get_region_list()).await {
            Ok(regions) => {
                let model = RegionsModel {
                    regions: Value::Known(regions.iter().map(adapt_region).collect()),
                };
                resp.state.set(&model, &mut resp.diagnostics);
            }
            Err(e) => report_error(
                "Unable to list public cloud regions",
                &e,
                &mut resp.diagnostics,
            ),
        }
    }
}
