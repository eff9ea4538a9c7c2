mod common;

use leaseweb_framework::Context;
use leaseweb_sdk::Method;
use leaseweb_sdk::testing::MockTransport;
use serde_json::json;

const TYPE: &str = "leaseweb_dns_resource_record_set";
const RECORD: &str = "/hosting/v2/domains/example.com/resourceRecordSets/www./A";

fn record_set() -> serde_json::Value {
    json!({"name": "www.", "type": "A", "content": ["1.2.3.4"], "ttl": 300, "editable": true})
}

fn desired() -> serde_json::Value {
    json!({
        "domain_name": "example.com",
        "name": "www.",
        "type": "A",
        "ttl": 300,
        "content": ["1.2.3.4"]
    })
}

#[tokio::test]
async fn test_create_read_and_import() {
    let mock = MockTransport::new();
    mock.on(
        Method::Post,
        "/hosting/v2/domains/example.com/resourceRecordSets",
        201,
        record_set(),
    )
    .on(Method::Get, RECORD, 200, record_set());
    let server = common::configured_server(mock.clone()).await;
    let ctx = Context::new();

    let plan = server
        .plan_resource_change(&ctx, TYPE, json!(null), desired())
        .await;
    assert!(plan.diagnostics.is_empty(), "{:?}", plan.diagnostics);

    let applied = server
        .apply_resource_change(&ctx, TYPE, json!(null), plan.planned_state, desired())
        .await;
    assert!(applied.diagnostics.is_empty(), "{:?}", applied.diagnostics);
    assert_eq!(applied.state, desired());

    let read = server
        .read_resource(&ctx, TYPE, applied.state.clone())
        .await;
    assert_eq!(read.state, desired());

    let imported = server
        .import_resource_state(&ctx, TYPE, "example.com,www.,A")
        .await;
    assert!(
        imported.diagnostics.is_empty(),
        "{:?}",
        imported.diagnostics
    );
    assert_eq!(imported.state, desired());

    let body = &mock.calls()[0].body;
    assert_eq!(
        body,
        &Some(json!({"name": "www.", "type": "A", "content": ["1.2.3.4"], "ttl": 300}))
    );
}

#[tokio::test]
async fn test_import_identifier_needs_three_parts() {
    let mock = MockTransport::new();
    let server = common::configured_server(mock.clone()).await;

    let imported = server
        .import_resource_state(&Context::new(), TYPE, "a,b")
        .await;

    let diag = imported.diagnostics.iter().next().unwrap();
    assert_eq!(diag.summary, "Unexpected Import Identifier");
    assert!(
        diag.detail.contains("domain_name,name,type"),
        "{}",
        diag.detail
    );
    assert!(diag.detail.contains("a,b"), "{}", diag.detail);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_ttl_outside_accepted_values() {
    let server = common::configured_server(MockTransport::new()).await;
    let mut config = desired();
    config["ttl"] = json!(301);

    let plan = server
        .plan_resource_change(&Context::new(), TYPE, json!(null), config)
        .await;
    assert!(plan.diagnostics.has_error());
}

#[tokio::test]
async fn test_type_change_requires_replace() {
    let mock = MockTransport::new();
    let server = common::configured_server(mock).await;
    let mut config = desired();
    config["type"] = json!("AAAA");
    config["content"] = json!(["::1"]);

    let plan = server
        .plan_resource_change(&Context::new(), TYPE, desired(), config)
        .await;
    assert!(plan.diagnostics.is_empty(), "{:?}", plan.diagnostics);
    assert_eq!(plan.requires_replace.len(), 1);
    assert_eq!(plan.requires_replace[0].to_string(), "type");
}
