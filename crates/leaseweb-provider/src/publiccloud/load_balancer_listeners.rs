//! Listeners of a load balancer

use super::load_balancer_listener::{ListenerModel, adapt_listener, listener_attributes};
use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use crate::utils::fanout::fan_out;
use crate::utils::paginate::paginate;
use crate::utils::{configure_client, read_only, require_client};
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    Attribute, ConfigureRequest, Context, DataSource, Diagnostics, MetadataRequest,
    ReadDataSourceRequest, ReadDataSourceResponse, Schema, Value, async_trait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Listener details fetched at once.
const DETAIL_CONCURRENCY: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct ListenersModel {
    load_balancer_id: Value<String>,
    listeners: Value<Vec<ListenerModel>>,
}

/// `leaseweb_publiccloud_load_balancer_listeners`
#[derive(Default)]
pub struct LoadBalancerListenersDataSource {
    client: Option<Arc<ProviderClient>>,
}

#[async_trait]
impl DataSource for LoadBalancerListenersDataSource {
    fn metadata(&self, req: &MetadataRequest) -> String {
        req.type_name("publiccloud_load_balancer_listeners")
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            ("load_balancer_id", Attribute::string().required()),
            (
                "listeners",
                Attribute::list_nested(read_only(listener_attributes())).computed(),
            ),
        ]))
        .with_description("Lists the listeners of a load balancer")
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
        let Some(mut model) = req.config.get::<ListenersModel>(&mut resp.diagnostics) else {
            return;
        };
        let load_balancer_id = model.load_balancer_id.as_str().to_string();
        let api = client.client.public_cloud();

        let summaries = match paginate(ctx, api.get_load_balancer_listener_list(&load_balancer_id))
            .await
        {
            Ok(summaries) => summaries,
            Err(e) => {
                report_error(
                    &format!(
                        "Unable to list listeners of load balancer {}",
                        load_balancer_id
                    ),
                    &e,
                    &mut resp.diagnostics,
                );
                return;
            }
        };
        let ids: Vec<String> = summaries.into_iter().map(|l| l.id).collect();

        let details = fan_out(ctx, ids, Some(DETAIL_CONCURRENCY), |listener_id| {
            let api = api.clone();
            let load_balancer_id = load_balancer_id.clone();
            async move {
                api.get_load_balancer_listener(load_balancer_id, listener_id)
                    .execute()
                    .await
                    .map(|(listener, _)| listener)
            }
        })
        .await;
        let listeners = match details {
            Ok(listeners) => listeners,
            Err(e) => {
                report_error("Unable to read listener details", &e, &mut resp.diagnostics);
                return;
            }
        };

        let models: Vec<ListenerModel> = listeners
            .iter()
            .map(|listener| {
                adapt_listener(&load_balancer_id, listener, None, &mut resp.diagnostics)
            })
            .collect();
        model.listeners = Value::Known(models);
        resp.state.set(&model, &mut resp.diagnostics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaseweb_framework::ResourceData;
    use leaseweb_sdk::testing::MockTransport;
    use leaseweb_sdk::{Client, Method};
    use serde_json::json;

    fn listener(id: &str, port: i32) -> serde_json::Value {
        json!({
            "id": id,
            "protocol": "HTTP",
            "port": port,
            "rules": [{"id": "r-1", "targetGroupId": "tg-1", "isDefault": true}],
            "certificates": []
        })
    }

    #[tokio::test]
    async fn test_lists_listener_details() {
        let mock = MockTransport::new();
        let base = "/publicCloud/v1/loadBalancers/lb-1/listeners";
        mock.on(
            Method::Get,
            base,
            200,
            json!({
                "listeners": [listener("l-2", 8080), listener("l-1", 80)],
                "_metadata": {"limit": 50, "offset": 0, "totalCount": 2}
            }),
        )
        .on(
            Method::Get,
            &format!("{}/l-1", base),
            200,
            listener("l-1", 80),
        )
        .on(
            Method::Get,
            &format!("{}/l-2", base),
            200,
            listener("l-2", 8080),
        );

        let data_source = LoadBalancerListenersDataSource {
            client: Some(Arc::new(ProviderClient::new(Client::with_transport(mock)))),
        };
        let config = ResourceData::from_raw(json!({"load_balancer_id": "lb-1"}));
        let mut resp = ReadDataSourceResponse {
            state: config.clone(),
            diagnostics: Diagnostics::new(),
        };
        data_source
            .read(&Context::new(), ReadDataSourceRequest { config }, &mut resp)
            .await;

        assert!(resp.diagnostics.is_empty(), "{:?}", resp.diagnostics);
        let listeners = &resp.state.raw()["listeners"];
        assert_eq!(listeners[0]["listener_id"], json!("l-1"));
        assert_eq!(listeners[1]["port"], json!(8080));
        assert_eq!(
            listeners[0]["default_rule"]["target_group_id"],
            json!("tg-1")
        );
        assert_eq!(listeners[0]["certificate"], json!(null));
    }
}
