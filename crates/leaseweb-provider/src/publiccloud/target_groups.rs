//! Target groups data source

use super::target_group::{TargetGroupModel, adapt_target_group, target_group_attributes};
use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::paginate::paginate;
use crate::utils::{configure_client, read_only, require_client};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::validator::{int_between, one_of_strings};
use leaseweb_framework::{
    Attribute, ConfigureRequest, Context, DataSource, Diagnostics, MetadataRequest,
    ReadDataSourceRequest, ReadDataSourceResponse, Schema, Value, async_trait,
};
use leaseweb_sdk::models::publiccloud::Protocol;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct TargetGroupsModel {
    protocol: Value<String>,
    port: Value<i32>,
    region: Value<String>,
    target_groups: Value<Vec<TargetGroupModel>>,
}

/// `leaseweb_publiccloud_target_groups`
#[derive(Default)]
pub struct TargetGroupsDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for TargetGroupsDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_target_groups")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            (
                "protocol",
                Attribute::string()
                    .optional()
                    .validator(one_of_strings(&Protocol::values())),
            ),
            (
                "port",
                Attribute::int32()
                    .optional()
                    .validator(int_between(1, 65535)),
            ),
            ("region", Attribute::string().optional()),
            (
                "target_groups",
                Attribute::list_nested(read_only(target_group_attributes())).computed(),
            ),
        ]))
        .with_description("Lists load balancer target groups")
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
        let Some(mut model) = req.config.get::<TargetGroupsModel>(&mut resp.diagnostics) else {
            return;
        };

        let mut request = client.client.public_cloud().get_target_group_list();
        if let Some(protocol) = model.protocol.as_known() {
            match protocol.parse::<Protocol>() {
                Ok(protocol) => request = request.with_protocol(protocol),
                Err(e) => {
                    resp.diagnostics.add_error("Invalid Protocol", e);
                    return;
                }
            }
        }
        if let Some(port) = model.port.as_known() {
            request = request.with_port(*port);
        }
        if let Some(region) = model.region.as_known() {
            request = request.with_region(region);
        }

        match paginate(ctx, request).await {
            Ok(target_groups) => {
                let models: Vec<TargetGroupModel> = target_groups
                    .iter()
                    .map(|tg| adapt_target_group(tg, &mut resp.diagnostics))
                    .collect();
                model.target_groups = Value::Known(models);
                resp.state.set(&model, &mut resp.diagnostics);
            }
            Err(e) => report_error("Unable to list target groups", &e, &mut resp.diagnostics),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaseweb_framework::ResourceData;
    use leaseweb_sdk::testing::MockTransport;
    use leaseweb_sdk::{Client, Method};
    use serde_json::json;

    #[tokio::test]
    async fn test_filters_are_sent() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "/publicCloud/v1/targetGroups",
            200,
            json!({
                "targetGroups": [{
                    "id": "tg-1",
                    "name": "web",
                    "protocol": "HTTP",
                    "port": 80,
                    "region": "eu-west-3",
                    "healthCheck": null
                }],
                "_metadata": {"limit": 50, "offset": 0, "totalCount": 1}
            }),
        );

        let data_source = TargetGroupsDataSource {
            client: Some(Arc::new(ProviderClient::new(Client::with_transport(mock.clone())))),
        };
        let config = ResourceData::from_raw(json!({"protocol": "HTTP", "port": 80}));
        let mut resp = ReadDataSourceResponse {
            state: config.clone(),
            diagnostics: Diagnostics::new(),
        };
        data_source
            .read(&Context::new(), ReadDataSourceRequest { config }, &mut resp)
            .await;

        assert!(resp.diagnostics.is_empty(), "{:?}", resp.diagnostics);
        assert_eq!(
            resp.state.raw()["target_groups"][0]["health_check"],
            json!(null)
        );
        let call = &mock.calls()[0];
        assert_eq!(call.query_value("protocol"), Some("HTTP"));
        assert_eq!(call.query_value("port"), Some("80"));
    }
}
