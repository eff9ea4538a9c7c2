use leaseweb_framework::{Context, ProviderServer};
use leaseweb_provider::LeasewebProvider;
use leaseweb_sdk::testing::MockTransport;
use serde_json::{Value, json};
use std::sync::Arc;

/// A provider server configured against `mock`.
pub async fn configured_server(mock: Arc<MockTransport>) -> ProviderServer {
    let mut server =
        ProviderServer::new(LeasewebProvider::new("test").with_transport(mock)).unwrap();
    let diags = server
        .configure(
            &Context::new(),
            json!({"token": "test-token", "host": "localhost", "scheme": "http"}),
        )
        .await;
    assert!(!diags.has_error(), "{:?}", diags);
    server
}

/// One list page in the upstream `_metadata` envelope.
#[allow(dead_code)]
pub fn page(key: &str, items: Vec<Value>, offset: i64, limit: i64, total: i64) -> Value {
    json!({
        key: items,
        "_metadata": {"limit": limit, "offset": offset, "totalCount": total}
    })
}

#[allow(dead_code)]
pub fn instance(id: &str, state: &str) -> Value {
    json!({
        "id": id,
        "region": "eu-west-3",
        "reference": "web-01",
        "image": {
            "id": "UBUNTU_24_04_64BIT",
            "name": "Ubuntu 24.04 LTS (x86_64)",
            "custom": false,
            "state": "READY",
            "marketApps": [],
            "storageTypes": ["LOCAL", "CENTRAL"],
            "flavour": "ubuntu",
            "region": null
        },
        "state": state,
        "type": "lsw.m3.large",
        "rootDiskSize": 50,
        "rootDiskStorageType": "CENTRAL",
        "ips": [],
        "contract": {
            "billingFrequency": 1,
            "term": 0,
            "type": "HOURLY",
            "endsAt": null,
            "renewalsAt": "2024-06-01T00:00:00Z",
            "createdAt": "2024-05-01T00:00:00Z",
            "state": "ACTIVE"
        },
        "iso": null,
        "marketAppId": null,
        "startedAt": "2024-05-01T10:00:00Z",
        "hasPublicIpv4": true,
        "includesPrivateNetwork": false
    })
}

#[allow(dead_code)]
pub fn instance_with_iso(id: &str, iso_id: &str, iso_name: &str) -> Value {
    let mut body = instance(id, "RUNNING");
    body["iso"] = json!({"id": iso_id, "name": iso_name});
    body
}
