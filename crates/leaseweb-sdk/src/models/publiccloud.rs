//! Public cloud DTOs

use crate::pagination::{Metadata, list_response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $value)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }

            pub fn values() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(format!("invalid {} {:?}", stringify!($name), other)),
                }
            }
        }
    };
}

pub(crate) use string_enum;

string_enum!(
    /// Lifecycle state of an instance
    InstanceState {
        Running => "RUNNING",
        Stopped => "STOPPED",
        Creating => "CREATING",
        Destroying => "DESTROYING",
        Destroyed => "DESTROYED",
        Starting => "STARTING",
        Stopping => "STOPPING",
        Failed => "FAILED",
        Unknown => "UNKNOWN",
    }
);

string_enum!(StorageType {
    Local => "LOCAL",
    Central => "CENTRAL",
});

string_enum!(ContractType {
    Hourly => "HOURLY",
    Monthly => "MONTHLY",
});

string_enum!(ContractState {
    Active => "ACTIVE",
    DeleteScheduled => "DELETE_SCHEDULED",
});

string_enum!(NetworkType {
    Public => "PUBLIC",
    Internal => "INTERNAL",
});

string_enum!(ImageState {
    Ready => "READY",
    Creating => "CREATING",
    Destroying => "DESTROYING",
    Destroyed => "DESTROYED",
    Failed => "FAILED",
});

string_enum!(Protocol {
    Http => "HTTP",
    Https => "HTTPS",
    Tcp => "TCP",
});

string_enum!(HealthCheckProtocol {
    Http => "HTTP",
    Https => "HTTPS",
});

string_enum!(HttpMethod {
    Get => "GET",
    Head => "HEAD",
});

/// Allowed values of contract term and billing frequency, in months
pub const CONTRACT_TERMS: [i32; 5] = [0, 1, 3, 6, 12];
pub const BILLING_FREQUENCIES: [i32; 5] = [0, 1, 3, 6, 12];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub billing_frequency: i32,
    pub term: i32,
    #[serde(rename = "type")]
    pub contract_type: ContractType,
    pub ends_at: Option<DateTime<Utc>>,
    pub renewals_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub state: ContractState,
}

impl Contract {
    pub fn get_ends_at(&self) -> DateTime<Utc> {
        self.ends_at.unwrap_or_default()
    }

    pub fn get_ends_at_ok(&self) -> Option<&DateTime<Utc>> {
        self.ends_at.as_ref()
    }

    pub fn set_ends_at(&mut self, ends_at: Option<DateTime<Utc>>) {
        self.ends_at = ends_at;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSize {
    pub size: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub custom: bool,
    pub state: Option<ImageState>,
    #[serde(default)]
    pub market_apps: Vec<String>,
    #[serde(default)]
    pub storage_types: Vec<StorageType>,
    pub flavour: String,
    pub region: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub storage_size: Option<StorageSize>,
}

impl Image {
    pub fn get_region(&self) -> &str {
        self.region.as_deref().unwrap_or_default()
    }

    pub fn get_region_ok(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn set_region(&mut self, region: Option<String>) {
        self.region = region;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ddos {
    pub detection_profile: String,
    pub protection_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ip {
    pub ip: String,
    pub prefix_length: i32,
    pub version: i32,
    #[serde(default)]
    pub null_routed: bool,
    #[serde(default)]
    pub main_ip: bool,
    pub network_type: NetworkType,
    pub reverse_lookup: Option<String>,
    pub ddos: Option<Ddos>,
}

impl Ip {
    pub fn get_reverse_lookup(&self) -> &str {
        self.reverse_lookup.as_deref().unwrap_or_default()
    }

    pub fn get_reverse_lookup_ok(&self) -> Option<&str> {
        self.reverse_lookup.as_deref()
    }

    pub fn set_reverse_lookup(&mut self, reverse_lookup: Option<String>) {
        self.reverse_lookup = reverse_lookup;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Iso {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub id: String,
    pub region: String,
    pub reference: Option<String>,
    pub image: Image,
    pub state: InstanceState,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub root_disk_size: i32,
    pub root_disk_storage_type: StorageType,
    #[serde(default)]
    pub ips: Vec<Ip>,
    pub contract: Contract,
    pub iso: Option<Iso>,
    pub market_app_id: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub has_public_ipv4: bool,
    #[serde(default)]
    pub includes_private_network: bool,
}

impl Instance {
    pub fn get_reference(&self) -> &str {
        self.reference.as_deref().unwrap_or_default()
    }

    pub fn get_reference_ok(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn set_reference(&mut self, reference: Option<String>) {
        self.reference = reference;
    }

    pub fn get_iso_ok(&self) -> Option<&Iso> {
        self.iso.as_ref()
    }

    pub fn set_iso(&mut self, iso: Option<Iso>) {
        self.iso = iso;
    }

    pub fn get_market_app_id_ok(&self) -> Option<&str> {
        self.market_app_id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceList {
    #[serde(default)]
    pub instances: Vec<Instance>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(InstanceList, instances, Instance);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceOpts {
    pub region: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub image_id: String,
    pub contract_type: String,
    pub contract_term: i32,
    pub billing_frequency: i32,
    pub root_disk_storage_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_disk_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_app_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

/// Patch of an instance; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstanceOpts {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_term: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_frequency: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_disk_size: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsoList {
    #[serde(default)]
    pub isos: Vec<Iso>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(IsoList, isos, Iso);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachIsoOpts {
    pub iso_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIpOpts {
    pub reverse_lookup: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageList {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(ImageList, images, Image);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageOpts {
    pub name: String,
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateImageOpts {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionList {
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(RegionList, regions, Region);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cpu {
    pub value: i32,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memory {
    pub value: f64,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSpeed {
    pub value: i32,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    pub cpu: Cpu,
    pub memory: Memory,
    pub public_network_speed: NetworkSpeed,
    pub private_network_speed: NetworkSpeed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceType {
    pub name: String,
    pub resources: Resources,
    pub storage_types: Option<Vec<StorageType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceTypeList {
    #[serde(default)]
    pub instance_types: Vec<InstanceType>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(InstanceTypeList, instance_types, InstanceType);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerRule {
    pub id: String,
    pub target_group_id: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub certificate: String,
    pub chain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listener {
    pub id: String,
    pub protocol: Protocol,
    pub port: i32,
    #[serde(default)]
    pub rules: Vec<ListenerRule>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerList {
    #[serde(default)]
    pub listeners: Vec<Listener>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(ListenerList, listeners, Listener);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SslCertificate {
    pub private_key: String,
    pub certificate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerDefaultRule {
    pub target_group_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerCreateOpts {
    pub protocol: Protocol,
    pub port: i32,
    pub default_rule: ListenerDefaultRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<SslCertificate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerUpdateOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<SslCertificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_rule: Option<ListenerDefaultRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub protocol: HealthCheckProtocol,
    pub method: Option<HttpMethod>,
    pub uri: String,
    pub host: Option<String>,
    pub port: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroup {
    pub id: String,
    pub name: String,
    pub protocol: Protocol,
    pub port: i32,
    pub region: String,
    pub health_check: Option<HealthCheck>,
}

impl TargetGroup {
    pub fn get_health_check_ok(&self) -> Option<&HealthCheck> {
        self.health_check.as_ref()
    }

    pub fn set_health_check(&mut self, health_check: Option<HealthCheck>) {
        self.health_check = health_check;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroupList {
    #[serde(default)]
    pub target_groups: Vec<TargetGroup>,
    #[serde(rename = "_metadata", default)]
    pub metadata: Metadata,
}

list_response!(TargetGroupList, target_groups, TargetGroup);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckOpts {
    pub protocol: HealthCheckProtocol,
    pub uri: String,
    pub port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetGroupOpts {
    pub name: String,
    pub protocol: Protocol,
    pub port: i32,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheckOpts>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTargetGroupOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheckOpts>,
}
