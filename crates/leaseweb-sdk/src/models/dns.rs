//! DNS (hosting) DTOs

use super::publiccloud::string_enum;
use crate::pagination::{Metadata, list_response};
use serde::{Deserialize, Serialize};
use std::fmt;

string_enum!(
    /// Record type of a resource record set
    ResourceRecordSetType {
        A => "A",
        Aaaa => "AAAA",
        Caa => "CAA",
        Cname => "CNAME",
        Mx => "MX",
        Ns => "NS",
        Txt => "TXT",
        Ptr => "PTR",
        Srv => "SRV",
        Naptr => "NAPTR",
        Tlsa => "TLSA",
        Sshfp => "SSHFP",
        Alias => "ALIAS",
    }
);

/// Time-to-live values the API accepts, in seconds
pub const TTL_VALUES: [i64; 8] = [60, 300, 1800, 3600, 14400, 28800, 43200, 86400];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSet {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: ResourceRecordSetType,
    #[serde(default)]
    pub content: Vec<String>,
    pub ttl: i32,
    #[serde(default)]
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecordSetList {
    #[serde(default)]
    pub resource_record_sets: Vec<ResourceRecordSet>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(
    ResourceRecordSetList,
    resource_record_sets,
    ResourceRecordSet
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRecordSetOpts {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: ResourceRecordSetType,
    pub content: Vec<String>,
    pub ttl: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRecordSetOpts {
    pub content: Vec<String>,
    pub ttl: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_set_wire_names() {
        let opts = CreateResourceRecordSetOpts {
            name: "www.example.com.".to_string(),
            record_type: ResourceRecordSetType::Aaaa,
            content: vec!["::1".to_string()],
            ttl: 300,
        };
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"name": "www.example.com.", "type": "AAAA", "content": ["::1"], "ttl": 300})
        );
    }
}
