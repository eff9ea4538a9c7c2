//! JSON bodies of upstream objects for unit tests

use serde_json::{Value, json};

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
        "ips": [{
            "ip": "10.32.60.12",
            "prefixLength": 32,
            "version": 4,
            "nullRouted": false,
            "mainIp": true,
            "networkType": "PUBLIC",
            "reverseLookup": null,
            "ddos": null
        }],
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

pub fn isos(isos: &[(&str, &str)]) -> Value {
    let items: Vec<Value> = isos
        .iter()
        .map(|(id, name)| json!({"id": id, "name": name}))
        .collect();
    let total = items.len();
    json!({"isos": items, "_metadata": {"limit": 50, "offset": 0, "totalCount": total}})
}
