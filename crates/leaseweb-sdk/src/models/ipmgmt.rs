//! IP management DTOs

use super::publiccloud::string_enum;
use crate::pagination::{Metadata, list_response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

string_enum!(IpType {
    NormalIp => "NORMAL_IP",
    AdditionalIp => "ADDITIONAL_IP",
});

string_enum!(NetworkType {
    Public => "PUBLIC",
    RemoteManagement => "REMOTE_MANAGEMENT",
    Internal => "INTERNAL",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedContract {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: String,
    pub network_ip: String,
    pub prefix_length: i32,
    pub gateway: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ip {
    pub ip: String,
    pub version: i32,
    #[serde(rename = "type")]
    pub ip_type: IpType,
    pub prefix_length: i32,
    #[serde(default)]
    pub primary: bool,
    pub reverse_lookup: Option<String>,
    #[serde(default)]
    pub null_routed: bool,
    #[serde(default)]
    pub unnulling_allowed: bool,
    pub network_type: NetworkType,
    pub equipment_id: Option<String>,
    pub assigned_contract: Option<AssignedContract>,
    pub subnet: Option<Subnet>,
}

impl Ip {
    pub fn get_reverse_lookup_ok(&self) -> Option<&str> {
        self.reverse_lookup.as_deref()
    }

    pub fn get_assigned_contract_ok(&self) -> Option<&AssignedContract> {
        self.assigned_contract.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpList {
    #[serde(default)]
    pub ips: Vec<Ip>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(IpList, ips, Ip);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIpOpts {
    pub reverse_lookup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NullRoute {
    pub id: String,
    pub ip: String,
    pub nulled_at: DateTime<Utc>,
    pub nulled_by: String,
    pub unnulled_at: Option<DateTime<Utc>>,
    pub unnulled_by: Option<String>,
    pub ticket_id: Option<String>,
    pub comment: Option<String>,
    pub automated_unnulling_at: Option<DateTime<Utc>>,
    pub equipment_id: Option<String>,
    pub assigned_contract: Option<AssignedContract>,
}

impl NullRoute {
    pub fn get_unnulled_at_ok(&self) -> Option<&DateTime<Utc>> {
        self.unnulled_at.as_ref()
    }

    pub fn get_unnulled_by(&self) -> &str {
        self.unnulled_by.as_deref().unwrap_or_default()
    }

    pub fn get_unnulled_by_ok(&self) -> Option<&str> {
        self.unnulled_by.as_deref()
    }

    pub fn set_unnulled_by(&mut self, unnulled_by: Option<String>) {
        self.unnulled_by = unnulled_by;
    }

    pub fn get_automated_unnulling_at_ok(&self) -> Option<&DateTime<Utc>> {
        self.automated_unnulling_at.as_ref()
    }

    /// Still in effect: not lifted yet.
    pub fn is_active(&self) -> bool {
        self.unnulled_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NullRouteList {
    #[serde(default)]
    pub null_routes: Vec<NullRoute>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(NullRouteList, null_routes, NullRoute);

/// Body of both NullRouteIP and UpdateNullRoute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NullRouteOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automated_unnulling_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_route_decodes() {
        let route: NullRoute = serde_json::from_value(json!({
            "id": "123",
            "ip": "85.17.0.1",
            "nulledAt": "2024-03-01T12:00:00Z",
            "nulledBy": "john.doe@example.com",
            "unnulledAt": null,
            "unnulledBy": null,
            "ticketId": "TCK-1",
            "comment": "ddos",
            "automatedUnnullingAt": "2024-03-02T12:00:00Z"
        }))
        .unwrap();
        assert!(route.is_active());
        assert_eq!(route.get_unnulled_by(), "");
        assert!(route.get_automated_unnulling_at_ok().is_some());
    }

    #[test]
    fn test_null_route_opts_skip_unset() {
        let opts = NullRouteOpts {
            comment: Some("maintenance".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"comment": "maintenance"})
        );
    }
}
