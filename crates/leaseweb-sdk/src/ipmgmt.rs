//! IP management API (`/ipMgmt/v2`)

use crate::client::Client;
use crate::error::Result;
use crate::models::ipmgmt::{
    Ip, IpList, IpType, NetworkType, NullRoute, NullRouteList, NullRouteOpts, UpdateIpOpts,
};
use crate::pagination::paged_request;
use crate::transport::{ApiRequest, HttpResponse, Method};

const BASE: &str = "/ipMgmt/v2";

/// Entry point for IP management endpoints
#[derive(Clone)]
pub struct IpMgmtApi {
    client: Client,
}

impl IpMgmtApi {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn get_ip_list(&self) -> GetIpListRequest {
        GetIpListRequest {
            client: self.client.clone(),
            network_type: None,
            version: None,
            ip_type: None,
            null_routed: None,
            primary: None,
            equipment_ids: None,
            limit: None,
            offset: None,
        }
    }

    pub fn get_ip(&self, ip: impl Into<String>) -> GetIpRequest {
        GetIpRequest {
            client: self.client.clone(),
            ip: ip.into(),
        }
    }

    pub fn update_ip(&self, ip: impl Into<String>, opts: UpdateIpOpts) -> UpdateIpRequest {
        UpdateIpRequest {
            client: self.client.clone(),
            ip: ip.into(),
            opts,
        }
    }

    pub fn null_route_ip(&self, ip: impl Into<String>, opts: NullRouteOpts) -> NullRouteIpRequest {
        NullRouteIpRequest {
            client: self.client.clone(),
            ip: ip.into(),
            opts,
        }
    }

    pub fn remove_ip_null_route(&self, ip: impl Into<String>) -> RemoveIpNullRouteRequest {
        RemoveIpNullRouteRequest {
            client: self.client.clone(),
            ip: ip.into(),
        }
    }

    pub fn get_null_route_history_list(&self) -> GetNullRouteHistoryListRequest {
        GetNullRouteHistoryListRequest {
            client: self.client.clone(),
            ip: None,
            equipment_id: None,
            limit: None,
            offset: None,
        }
    }

    pub fn get_null_route(&self, null_route_id: impl Into<String>) -> GetNullRouteRequest {
        GetNullRouteRequest {
            client: self.client.clone(),
            null_route_id: null_route_id.into(),
        }
    }

    pub fn update_null_route(
        &self,
        null_route_id: impl Into<String>,
        opts: NullRouteOpts,
    ) -> UpdateNullRouteRequest {
        UpdateNullRouteRequest {
            client: self.client.clone(),
            null_route_id: null_route_id.into(),
            opts,
        }
    }
}

#[derive(Clone)]
pub struct GetIpListRequest {
    client: Client,
    network_type: Option<NetworkType>,
    version: Option<i32>,
    ip_type: Option<IpType>,
    null_routed: Option<bool>,
    primary: Option<bool>,
    equipment_ids: Option<String>,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetIpListRequest {
    pub fn with_network_type(mut self, network_type: NetworkType) -> Self {
        self.network_type = Some(network_type);
        self
    }

    pub fn with_version(mut self, version: i32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_type(mut self, ip_type: IpType) -> Self {
        self.ip_type = Some(ip_type);
        self
    }

    pub fn with_null_routed(mut self, null_routed: bool) -> Self {
        self.null_routed = Some(null_routed);
        self
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = Some(primary);
        self
    }

    /// Comma-separated equipment ids.
    pub fn with_equipment_ids(mut self, equipment_ids: impl Into<String>) -> Self {
        self.equipment_ids = Some(equipment_ids.into());
        self
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub async fn execute(&self) -> Result<(IpList, HttpResponse)> {
        let request = ApiRequest::new(Method::Get, format!("{}/ips", BASE))
            .query("networkType", self.network_type)
            .query("version", self.version)
            .query("type", self.ip_type)
            .query("nullRouted", self.null_routed)
            .query("primary", self.primary)
            .query("equipmentIds", self.equipment_ids.as_ref())
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetIpListRequest, IpList);

#[derive(Clone)]
pub struct GetIpRequest {
    client: Client,
    ip: String,
}

impl GetIpRequest {
    pub async fn execute(&self) -> Result<(Ip, HttpResponse)> {
        let path = format!("{}/ips/{}", BASE, self.ip);
        self.client
            .execute(ApiRequest::new(Method::Get, path))
            .await
    }
}

#[derive(Clone)]
pub struct UpdateIpRequest {
    client: Client,
    ip: String,
    opts: UpdateIpOpts,
}

impl UpdateIpRequest {
    pub async fn execute(&self) -> Result<(Ip, HttpResponse)> {
        let path = format!("{}/ips/{}", BASE, self.ip);
        let request = ApiRequest::new(Method::Put, path).body(serde_json::to_value(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct NullRouteIpRequest {
    client: Client,
    ip: String,
    opts: NullRouteOpts,
}

impl NullRouteIpRequest {
    pub async fn execute(&self) -> Result<(NullRoute, HttpResponse)> {
        let path = format!("{}/ips/{}/nullRoute", BASE, self.ip);
        let request = ApiRequest::new(Method::Post, path).body(serde_json::to_value(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct RemoveIpNullRouteRequest {
    client: Client,
    ip: String,
}

impl RemoveIpNullRouteRequest {
    pub async fn execute(&self) -> Result<HttpResponse> {
        let path = format!("{}/ips/{}/nullRoute", BASE, self.ip);
        self.client
            .execute_empty(ApiRequest::new(Method::Delete, path))
            .await
    }
}

#[derive(Clone)]
pub struct GetNullRouteHistoryListRequest {
    client: Client,
    ip: Option<String>,
    equipment_id: Option<String>,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetNullRouteHistoryListRequest {
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_equipment_id(mut self, equipment_id: impl Into<String>) -> Self {
        self.equipment_id = Some(equipment_id.into());
        self
    }

    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub async fn execute(&self) -> Result<(NullRouteList, HttpResponse)> {
        let request = ApiRequest::new(Method::Get, format!("{}/nullRoutes", BASE))
            .query("ip", self.ip.as_ref())
            .query("equipmentId", self.equipment_id.as_ref())
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetNullRouteHistoryListRequest, NullRouteList);

#[derive(Clone)]
pub struct GetNullRouteRequest {
    client: Client,
    null_route_id: String,
}

impl GetNullRouteRequest {
    pub async fn execute(&self) -> Result<(NullRoute, HttpResponse)> {
        let path = format!("{}/nullRoutes/{}", BASE, self.null_route_id);
        self.client
            .execute(ApiRequest::new(Method::Get, path))
            .await
    }
}

#[derive(Clone)]
pub struct UpdateNullRouteRequest {
    client: Client,
    null_route_id: String,
    opts: NullRouteOpts,
}

impl UpdateNullRouteRequest {
    pub async fn execute(&self) -> Result<(NullRoute, HttpResponse)> {
        let path = format!("{}/nullRoutes/{}", BASE, self.null_route_id);
        let request = ApiRequest::new(Method::Put, path).body(serde_json::to_value(&self.opts)?);
        self.client.execute(request).await
    }
}
