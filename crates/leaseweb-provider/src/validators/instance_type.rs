//! Instance type availability

use super::quoted_list;
use crate::provider::ProviderClient;
use crate::utils::errors::report_error;
use leaseweb_framework::{AttributePath, Context, Diagnostics, Value};

/// The planned instance type must be offered in `region`, or be the type the
/// instance already has there. Unknown types are not checked, nor are
/// unchanged types in an unchanged region.
pub async fn validate_instance_type(
    ctx: &Context,
    client: &ProviderClient,
    region: &Value<String>,
    planned: &Value<String>,
    current_region: &Value<String>,
    current: &Value<String>,
    diags: &mut Diagnostics,
) {
    let Some(planned_type) = planned.as_known() else {
        return;
    };
    let Some(region) = region.as_known() else {
        return;
    };
    let current = match current_region.as_known() {
        Some(current_region) if current_region == region => current.as_known(),
        _ => None,
    };
    if current == Some(planned_type) {
        return;
    }

    let mut allowed = match client.instance_types(ctx, region).await {
        Ok(types) => types,
        Err(e) => {
            report_error("Error fetching public cloud instance types", &e, diags);
            return;
        }
    };
    if let Some(current) = current {
        allowed.push(current.clone());
    }

    if !allowed.iter().any(|t| t == planned_type) {
        diags.add_attribute_error(
            AttributePath::root("type"),
            "Invalid Instance Type",
            format!(
                "Attribute type value must be one of: {}, got: {:?}",
                quoted_list(&allowed),
                planned_type
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leaseweb_sdk::testing::MockTransport;
    use leaseweb_sdk::{Client, Method};
    use serde_json::json;
    use std::sync::Arc;

    fn instance_type(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "resources": {
                "cpu": {"value": 2, "unit": "vCPU"},
                "memory": {"value": 4.0, "unit": "GiB"},
                "publicNetworkSpeed": {"value": 1, "unit": "Gbps"},
                "privateNetworkSpeed": {"value": 1, "unit": "Gbps"}
            }
        })
    }

    fn setup() -> (Arc<MockTransport>, ProviderClient) {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "/publicCloud/v1/instanceTypes",
            200,
            json!({
                "instanceTypes": [instance_type("lsw.m3.large"), instance_type("lsw.m3.xlarge")],
                "_metadata": {"limit": 50, "offset": 0, "totalCount": 2}
            }),
        );
        let client = ProviderClient::new(Client::with_transport(mock.clone()));
        (mock, client)
    }

    #[tokio::test]
    async fn test_available_type() {
        let (mock, client) = setup();
        let mut diags = Diagnostics::new();
        validate_instance_type(
            &Context::new(),
            &client,
            &Value::string("eu-west-3"),
            &Value::string("lsw.m3.xlarge"),
            &Value::Null,
            &Value::Null,
            &mut diags,
        )
        .await;
        assert!(diags.is_empty());
        assert_eq!(
            mock.calls()[0].query_value("region"),
            Some("eu-west-3")
        );
    }

    #[tokio::test]
    async fn test_unavailable_type() {
        let (_, client) = setup();
        let mut diags = Diagnostics::new();
        validate_instance_type(
            &Context::new(),
            &client,
            &Value::string("eu-west-3"),
            &Value::string("lsw.c3.4xlarge"),
            &Value::string("eu-west-3"),
            &Value::string("lsw.m3.large"),
            &mut diags,
        )
        .await;
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.attribute, Some(AttributePath::root("type")));
        assert!(diag.detail.contains("\"lsw.c3.4xlarge\""));
    }

    #[tokio::test]
    async fn test_unchanged_type_makes_no_calls() {
        let (mock, client) = setup();
        let mut diags = Diagnostics::new();
        validate_instance_type(
            &Context::new(),
            &client,
            &Value::string("eu-west-3"),
            &Value::string("lsw.legacy"),
            &Value::string("eu-west-3"),
            &Value::string("lsw.legacy"),
            &mut diags,
        )
        .await;
        assert!(diags.is_empty());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_current_type_not_allowed_in_new_region() {
        let (mock, client) = setup();
        let mut diags = Diagnostics::new();
        validate_instance_type(
            &Context::new(),
            &client,
            &Value::string("eu-west-3"),
            &Value::string("lsw.legacy"),
            &Value::string("us-east-1"),
            &Value::string("lsw.legacy"),
            &mut diags,
        )
        .await;
        let diag = diags.iter().next().unwrap();
        assert_eq!(diag.attribute, Some(AttributePath::root("type")));
        let expected = r#"must be one of: ["lsw.m3.large" "lsw.m3.xlarge"],"#;
        assert!(diag.detail.contains(expected), "{}", diag.detail);
        assert_eq!(mock.calls().len(), 1);
    }
}
