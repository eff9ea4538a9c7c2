mod common;

use leaseweb_framework::Context;
use leaseweb_sdk::Method;
use leaseweb_sdk::testing::MockTransport;
use serde_json::json;

const INSTANCE: &str = "/publicCloud/v1/instances/i-1";

fn instance_config(contract: serde_json::Value) -> serde_json::Value {
    json!({
        "region": "eu-west-3",
        "type": "lsw.m3.large",
        "image": {"id": "UBUNTU_24_04_64BIT"},
        "root_disk_storage_type": "CENTRAL",
        "contract": contract
    })
}

#[tokio::test]
async fn test_hourly_contract_with_term_is_rejected() {
    let mock = MockTransport::new();
    let server = common::configured_server(mock.clone()).await;

    let plan = server
        .plan_resource_change(
            &Context::new(),
            "leaseweb_publiccloud_instance",
            json!(null),
            instance_config(json!({"type": "HOURLY", "term": 3, "billing_frequency": 1})),
        )
        .await;

    let diag = plan
        .diagnostics
        .iter()
        .find(|d| {
            d.attribute
                .as_ref()
                .is_some_and(|p| p.to_string() == "contract.term")
        })
        .expect("contract.term diagnostic");
    assert!(diag.detail.contains("HOURLY"), "{}", diag.detail);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_regions_are_read_across_pages() {
    let mock = MockTransport::new();
    let region = |name: &str| json!({"name": name, "location": "Frankfurt"});
    let path = "/publicCloud/v1/regions";
    mock.on(
        Method::Get,
        path,
        200,
        common::page("regions", vec![region("a"), region("b")], 0, 2, 5),
    )
    .on(
        Method::Get,
        path,
        200,
        common::page("regions", vec![region("c"), region("d")], 2, 2, 5),
    )
    .on(
        Method::Get,
        path,
        200,
        common::page("regions", vec![region("e")], 4, 2, 5),
    );
    let server = common::configured_server(mock.clone()).await;

    let read = server
        .read_data_source(&Context::new(), "leaseweb_publiccloud_regions", json!({}))
        .await;
    assert!(read.diagnostics.is_empty(), "{:?}", read.diagnostics);

    let names: Vec<&str> = read.state["regions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a", "b", "c", "d", "e"]);

    let calls = mock.calls_to(Method::Get, path);
    let offsets: Vec<Option<&str>> = calls.iter().map(|c| c.query_value("offset")).collect();
    assert_eq!(offsets, vec![Some("0"), Some("2"), Some("4")]);
}

#[tokio::test]
async fn test_iso_swap_call_sequence() {
    let mock = MockTransport::new();
    mock.on(
        Method::Get,
        "/publicCloud/v1/isos",
        200,
        common::page(
            "isos",
            vec![
                json!({"id": "x", "name": "ISO X"}),
                json!({"id": "y", "name": "ISO Y"}),
            ],
            0,
            50,
            2,
        ),
    )
    .on(
        Method::Get,
        INSTANCE,
        200,
        common::instance_with_iso("i-1", "y", "ISO Y"),
    )
    .on(
        Method::Get,
        INSTANCE,
        200,
        common::instance_with_iso("i-1", "x", "ISO X"),
    )
    .on(
        Method::Post,
        "/publicCloud/v1/instances/i-1/detachIso",
        204,
        json!(null),
    )
    .on(
        Method::Post,
        "/publicCloud/v1/instances/i-1/attachIso",
        204,
        json!(null),
    );
    let server = common::configured_server(mock.clone()).await;
    let ctx = Context::new();
    let type_name = "leaseweb_publiccloud_instance_iso";

    let prior = json!({"instance_id": "i-1", "desired_id": "y", "id": "y", "name": "ISO Y"});
    let config = json!({"instance_id": "i-1", "desired_id": "x"});

    let plan = server
        .plan_resource_change(&ctx, type_name, prior.clone(), config.clone())
        .await;
    assert!(plan.diagnostics.is_empty(), "{:?}", plan.diagnostics);

    let applied = server
        .apply_resource_change(&ctx, type_name, prior, plan.planned_state, config)
        .await;
    assert!(applied.diagnostics.is_empty(), "{:?}", applied.diagnostics);
    assert_eq!(
        applied.state,
        json!({"instance_id": "i-1", "desired_id": "x", "id": "x", "name": "ISO X"})
    );
    assert_eq!(
        mock.call_log(),
        vec![
            "GET /publicCloud/v1/isos",
            "GET /publicCloud/v1/instances/i-1",
            "POST /publicCloud/v1/instances/i-1/detachIso",
            "POST /publicCloud/v1/instances/i-1/attachIso",
            "GET /publicCloud/v1/instances/i-1",
        ]
    );
    let attach = &mock.calls_to(Method::Post, "/publicCloud/v1/instances/i-1/attachIso")[0];
    assert_eq!(attach.body, Some(json!({"isoId": "x"})));
}

#[tokio::test]
async fn test_destroying_instance_is_not_terminated() {
    let mock = MockTransport::new();
    mock.on(
        Method::Get,
        INSTANCE,
        200,
        common::instance("i-1", "DESTROYING"),
    );
    let server = common::configured_server(mock.clone()).await;
    let ctx = Context::new();
    let type_name = "leaseweb_publiccloud_instance";

    let imported = server.import_resource_state(&ctx, type_name, "i-1").await;
    assert!(
        imported.diagnostics.is_empty(),
        "{:?}",
        imported.diagnostics
    );
    assert_eq!(imported.state["state"], json!("DESTROYING"));

    let plan = server
        .plan_resource_change(&ctx, type_name, imported.state.clone(), json!(null))
        .await;
    assert!(plan.diagnostics.has_error());
    let detail = &plan.diagnostics.iter().next().unwrap().detail;
    assert!(detail.contains("DESTROYING"), "{}", detail);

    let applied = server
        .apply_resource_change(
            &ctx,
            type_name,
            imported.state.clone(),
            json!(null),
            json!(null),
        )
        .await;
    assert!(applied.diagnostics.has_error());
    assert_eq!(applied.state, imported.state);
    assert!(mock.calls_to(Method::Delete, INSTANCE).is_empty());
}

fn instance_type_page() -> serde_json::Value {
    let resources = json!({
        "cpu": {"value": 2, "unit": "vCPU"},
        "memory": {"value": 8.0, "unit": "GiB"},
        "publicNetworkSpeed": {"value": 1, "unit": "Gbps"},
        "privateNetworkSpeed": {"value": 1, "unit": "Gbps"}
    });
    common::page(
        "instanceTypes",
        vec![json!({"name": "lsw.m3.large", "resources": resources})],
        0,
        50,
        1,
    )
}

#[tokio::test]
async fn test_instance_create_reads_back_and_replans_clean() {
    let mock = MockTransport::new();
    mock.on(
        Method::Get,
        "/publicCloud/v1/regions",
        200,
        common::page(
            "regions",
            vec![json!({"name": "eu-west-3", "location": "Paris"})],
            0,
            50,
            1,
        ),
    )
    .on(
        Method::Get,
        "/publicCloud/v1/instanceTypes",
        200,
        instance_type_page(),
    )
    .on(
        Method::Post,
        "/publicCloud/v1/instances",
        201,
        common::instance("i-1", "CREATING"),
    )
    .on(
        Method::Get,
        INSTANCE,
        200,
        common::instance("i-1", "RUNNING"),
    );
    let server = common::configured_server(mock.clone()).await;
    let ctx = Context::new();
    let type_name = "leaseweb_publiccloud_instance";
    let config = instance_config(json!({"type": "HOURLY", "term": 0, "billing_frequency": 1}));

    let plan = server
        .plan_resource_change(&ctx, type_name, json!(null), config.clone())
        .await;
    assert!(plan.diagnostics.is_empty(), "{:?}", plan.diagnostics);

    let applied = server
        .apply_resource_change(
            &ctx,
            type_name,
            json!(null),
            plan.planned_state,
            config.clone(),
        )
        .await;
    assert!(applied.diagnostics.is_empty(), "{:?}", applied.diagnostics);
    assert_eq!(applied.state["id"], json!("i-1"));
    assert_eq!(applied.state["state"], json!("RUNNING"));

    let launch = &mock.calls_to(Method::Post, "/publicCloud/v1/instances")[0];
    assert_eq!(
        launch.body,
        Some(json!({
            "region": "eu-west-3",
            "type": "lsw.m3.large",
            "imageId": "UBUNTU_24_04_64BIT",
            "contractType": "HOURLY",
            "contractTerm": 0,
            "billingFrequency": 1,
            "rootDiskStorageType": "CENTRAL"
        }))
    );

    let read = server
        .read_resource(&ctx, type_name, applied.state.clone())
        .await;
    assert!(read.diagnostics.is_empty(), "{:?}", read.diagnostics);
    assert_eq!(read.state, applied.state);

    let replan = server
        .plan_resource_change(&ctx, type_name, read.state.clone(), config)
        .await;
    assert!(replan.diagnostics.is_empty(), "{:?}", replan.diagnostics);
    assert_eq!(replan.planned_state, read.state);
    assert!(replan.requires_replace.is_empty());

    assert_eq!(
        mock.call_log(),
        vec![
            "GET /publicCloud/v1/regions",
            "GET /publicCloud/v1/instanceTypes",
            "POST /publicCloud/v1/instances",
            "GET /publicCloud/v1/instances/i-1",
            "GET /publicCloud/v1/instances/i-1",
        ]
    );
}

#[tokio::test]
async fn test_instance_update_sends_changed_fields_only() {
    let mock = MockTransport::new();
    let mut updated = common::instance("i-1", "RUNNING");
    updated["reference"] = json!("web-02");
    mock.on(
        Method::Get,
        INSTANCE,
        200,
        common::instance("i-1", "RUNNING"),
    )
        .on(Method::Put, INSTANCE, 200, updated);
    let server = common::configured_server(mock.clone()).await;
    let ctx = Context::new();
    let type_name = "leaseweb_publiccloud_instance";

    let imported = server.import_resource_state(&ctx, type_name, "i-1").await;
    assert!(
        imported.diagnostics.is_empty(),
        "{:?}",
        imported.diagnostics
    );

    let mut config = instance_config(json!({"type": "HOURLY", "term": 0, "billing_frequency": 0}));
    config["reference"] = json!("web-02");

    let plan = server
        .plan_resource_change(&ctx, type_name, imported.state.clone(), config.clone())
        .await;
    assert!(plan.diagnostics.is_empty(), "{:?}", plan.diagnostics);
    assert!(plan.requires_replace.is_empty());

    let applied = server
        .apply_resource_change(&ctx, type_name, imported.state, plan.planned_state, config)
        .await;
    assert!(applied.diagnostics.is_empty(), "{:?}", applied.diagnostics);
    assert_eq!(applied.state["reference"], json!("web-02"));

    let put = &mock.calls_to(Method::Put, INSTANCE)[0];
    assert_eq!(
        put.body,
        Some(json!({"reference": "web-02", "contractType": "HOURLY"}))
    );
    // Unchanged region and type need no lookups
    assert_eq!(
        mock.call_log(),
        vec![
            "GET /publicCloud/v1/instances/i-1",
            "PUT /publicCloud/v1/instances/i-1",
        ]
    );
}

#[tokio::test]
async fn test_ip_import_splits_instance_and_address() {
    let mock = MockTransport::new();
    mock.on(
        Method::Get,
        "/publicCloud/v1/instances/i-1/ips/10.0.0.1",
        200,
        json!({
            "ip": "10.0.0.1",
            "prefixLength": 32,
            "version": 4,
            "nullRouted": false,
            "mainIp": true,
            "networkType": "PUBLIC",
            "reverseLookup": "web.example.com",
            "ddos": null
        }),
    );
    let server = common::configured_server(mock.clone()).await;
    let ctx = Context::new();
    let type_name = "leaseweb_publiccloud_ip";

    let imported = server
        .import_resource_state(&ctx, type_name, "i-1,10.0.0.1")
        .await;
    assert!(
        imported.diagnostics.is_empty(),
        "{:?}",
        imported.diagnostics
    );
    assert_eq!(imported.state["instance_id"], json!("i-1"));
    assert_eq!(imported.state["ip"], json!("10.0.0.1"));
    assert_eq!(imported.state["reverse_lookup"], json!("web.example.com"));

    let rejected = server.import_resource_state(&ctx, type_name, "i-1").await;
    assert!(rejected.diagnostics.has_error());
    let diag = rejected.diagnostics.iter().next().unwrap();
    assert_eq!(diag.summary, "Unexpected Import Identifier");
    assert!(diag.detail.contains("instance_id,ip"), "{}", diag.detail);
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_listener_import_splits_load_balancer_and_listener() {
    let mock = MockTransport::new();
    mock.on(
        Method::Get,
        "/publicCloud/v1/loadBalancers/lb-1/listeners/l-1",
        200,
        json!({
            "id": "l-1",
            "protocol": "HTTP",
            "port": 80,
            "rules": [{"id": "r-1", "targetGroupId": "tg-1", "isDefault": true}],
            "certificates": []
        }),
    );
    let server = common::configured_server(mock.clone()).await;
    let ctx = Context::new();
    let type_name = "leaseweb_publiccloud_load_balancer_listener";

    let imported = server
        .import_resource_state(&ctx, type_name, "lb-1,l-1")
        .await;
    assert!(
        imported.diagnostics.is_empty(),
        "{:?}",
        imported.diagnostics
    );
    assert_eq!(imported.state["load_balancer_id"], json!("lb-1"));
    assert_eq!(imported.state["listener_id"], json!("l-1"));
    assert_eq!(
        imported.state["default_rule"],
        json!({"target_group_id": "tg-1"})
    );
    assert_eq!(imported.state["certificate"], json!(null));

    let rejected = server
        .import_resource_state(&ctx, type_name, "lb-1,l-1,extra")
        .await;
    let diag = rejected.diagnostics.iter().next().unwrap();
    assert_eq!(diag.summary, "Unexpected Import Identifier");
    assert!(
        diag.detail.contains("load_balancer_id,listener_id"),
        "{}",
        diag.detail
    );
    assert_eq!(mock.calls().len(), 1);
}
