//! Public cloud API (`/publicCloud/v1`)

use crate::client::Client;
use crate::error::Result;
use crate::models::publiccloud::{
    AttachIsoOpts, CreateImageOpts, CreateTargetGroupOpts, Image, ImageList, Instance,
    InstanceList, InstanceState, InstanceTypeList, Ip, IsoList, LaunchInstanceOpts, Listener,
    ListenerCreateOpts, ListenerList, ListenerUpdateOpts, Protocol, RegionList, TargetGroup,
    TargetGroupList, UpdateImageOpts, UpdateInstanceOpts, UpdateIpOpts, UpdateTargetGroupOpts,
};
use crate::pagination::paged_request;
use crate::transport::{ApiRequest, HttpResponse, Method};
use serde::Serialize;

const BASE: &str = "/publicCloud/v1";

fn json_body<T: Serialize>(opts: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(opts)?)
}

/// Entry point for public cloud endpoints
#[derive(Clone)]
pub struct PublicCloudApi {
    client: Client,
}

impl PublicCloudApi {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn get_instance_list(&self) -> GetInstanceListRequest {
        GetInstanceListRequest {
            client: self.client.clone(),
            reference: None,
            ip: None,
            state: None,
            instance_type: None,
            region: None,
            limit: None,
            offset: None,
        }
    }

    pub fn get_instance(&self, instance_id: impl Into<String>) -> GetInstanceRequest {
        GetInstanceRequest {
            client: self.client.clone(),
            instance_id: instance_id.into(),
        }
    }

    pub fn launch_instance(&self, opts: LaunchInstanceOpts) -> LaunchInstanceRequest {
        LaunchInstanceRequest {
            client: self.client.clone(),
            opts,
        }
    }

    pub fn update_instance(
        &self,
        instance_id: impl Into<String>,
        opts: UpdateInstanceOpts,
    ) -> UpdateInstanceRequest {
        UpdateInstanceRequest {
            client: self.client.clone(),
            instance_id: instance_id.into(),
            opts,
        }
    }

    pub fn terminate_instance(&self, instance_id: impl Into<String>) -> TerminateInstanceRequest {
        TerminateInstanceRequest {
            client: self.client.clone(),
            instance_id: instance_id.into(),
        }
    }

    pub fn get_iso_list(&self) -> GetIsoListRequest {
        GetIsoListRequest {
            client: self.client.clone(),
            limit: None,
            offset: None,
        }
    }

    pub fn attach_instance_iso(
        &self,
        instance_id: impl Into<String>,
        opts: AttachIsoOpts,
    ) -> AttachInstanceIsoRequest {
        AttachInstanceIsoRequest {
            client: self.client.clone(),
            instance_id: instance_id.into(),
            opts,
        }
    }

    pub fn detach_instance_iso(&self, instance_id: impl Into<String>) -> DetachInstanceIsoRequest {
        DetachInstanceIsoRequest {
            client: self.client.clone(),
            instance_id: instance_id.into(),
        }
    }

    pub fn get_instance_ip(
        &self,
        instance_id: impl Into<String>,
        ip: impl Into<String>,
    ) -> GetInstanceIpRequest {
        GetInstanceIpRequest {
            client: self.client.clone(),
            instance_id: instance_id.into(),
            ip: ip.into(),
        }
    }

    pub fn update_instance_ip(
        &self,
        instance_id: impl Into<String>,
        ip: impl Into<String>,
        opts: UpdateIpOpts,
    ) -> UpdateInstanceIpRequest {
        UpdateInstanceIpRequest {
            client: self.client.clone(),
            instance_id: instance_id.into(),
            ip: ip.into(),
            opts,
        }
    }

    pub fn get_image_list(&self) -> GetImageListRequest {
        GetImageListRequest {
            client: self.client.clone(),
            standard: None,
            limit: None,
            offset: None,
        }
    }

    pub fn create_image(&self, opts: CreateImageOpts) -> CreateImageRequest {
        CreateImageRequest {
            client: self.client.clone(),
            opts,
        }
    }

    pub fn update_image(
        &self,
        image_id: impl Into<String>,
        opts: UpdateImageOpts,
    ) -> UpdateImageRequest {
        UpdateImageRequest {
            client: self.client.clone(),
            image_id: image_id.into(),
            opts,
        }
    }

    pub fn get_region_list(&self) -> GetRegionListRequest {
        GetRegionListRequest {
            client: self.client.clone(),
            limit: None,
            offset: None,
        }
    }

    pub fn get_instance_type_list(&self, region: impl Into<String>) -> GetInstanceTypeListRequest {
        GetInstanceTypeListRequest {
            client: self.client.clone(),
            region: region.into(),
            limit: None,
            offset: None,
        }
    }

    pub fn get_load_balancer_listener_list(
        &self,
        load_balancer_id: impl Into<String>,
    ) -> GetLoadBalancerListenerListRequest {
        GetLoadBalancerListenerListRequest {
            client: self.client.clone(),
            load_balancer_id: load_balancer_id.into(),
            limit: None,
            offset: None,
        }
    }

    pub fn get_load_balancer_listener(
        &self,
        load_balancer_id: impl Into<String>,
        listener_id: impl Into<String>,
    ) -> GetLoadBalancerListenerRequest {
        GetLoadBalancerListenerRequest {
            client: self.client.clone(),
            load_balancer_id: load_balancer_id.into(),
            listener_id: listener_id.into(),
        }
    }

    pub fn create_load_balancer_listener(
        &self,
        load_balancer_id: impl Into<String>,
        opts: ListenerCreateOpts,
    ) -> CreateLoadBalancerListenerRequest {
        CreateLoadBalancerListenerRequest {
            client: self.client.clone(),
            load_balancer_id: load_balancer_id.into(),
            opts,
        }
    }

    pub fn update_load_balancer_listener(
        &self,
        load_balancer_id: impl Into<String>,
        listener_id: impl Into<String>,
        opts: ListenerUpdateOpts,
    ) -> UpdateLoadBalancerListenerRequest {
        UpdateLoadBalancerListenerRequest {
            client: self.client.clone(),
            load_balancer_id: load_balancer_id.into(),
            listener_id: listener_id.into(),
            opts,
        }
    }

    pub fn delete_load_balancer_listener(
        &self,
        load_balancer_id: impl Into<String>,
        listener_id: impl Into<String>,
    ) -> DeleteLoadBalancerListenerRequest {
        DeleteLoadBalancerListenerRequest {
            client: self.client.clone(),
            load_balancer_id: load_balancer_id.into(),
            listener_id: listener_id.into(),
        }
    }

    pub fn get_target_group_list(&self) -> GetTargetGroupListRequest {
        GetTargetGroupListRequest {
            client: self.client.clone(),
            protocol: None,
            port: None,
            region: None,
            limit: None,
            offset: None,
        }
    }

    pub fn get_target_group(&self, target_group_id: impl Into<String>) -> GetTargetGroupRequest {
        GetTargetGroupRequest {
            client: self.client.clone(),
            target_group_id: target_group_id.into(),
        }
    }

    pub fn create_target_group(&self, opts: CreateTargetGroupOpts) -> CreateTargetGroupRequest {
        CreateTargetGroupRequest {
            client: self.client.clone(),
            opts,
        }
    }

    pub fn update_target_group(
        &self,
        target_group_id: impl Into<String>,
        opts: UpdateTargetGroupOpts,
    ) -> UpdateTargetGroupRequest {
        UpdateTargetGroupRequest {
            client: self.client.clone(),
            target_group_id: target_group_id.into(),
            opts,
        }
    }

    pub fn delete_target_group(
        &self,
        target_group_id: impl Into<String>,
    ) -> DeleteTargetGroupRequest {
        DeleteTargetGroupRequest {
            client: self.client.clone(),
            target_group_id: target_group_id.into(),
        }
    }
}

// Instances

#[derive(Clone)]
pub struct GetInstanceListRequest {
    client: Client,
    reference: Option<String>,
    ip: Option<String>,
    state: Option<InstanceState>,
    instance_type: Option<String>,
    region: Option<String>,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetInstanceListRequest {
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_state(mut self, state: InstanceState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_type(mut self, instance_type: impl Into<String>) -> Self {
        self.instance_type = Some(instance_type.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
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

    pub async fn execute(&self) -> Result<(InstanceList, HttpResponse)> {
        let request = ApiRequest::new(Method::Get, format!("{}/instances", BASE))
            .query("reference", self.reference.as_ref())
            .query("ip", self.ip.as_ref())
            .query("state", self.state)
            .query("type", self.instance_type.as_ref())
            .query("region", self.region.as_ref())
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetInstanceListRequest, InstanceList);

#[derive(Clone)]
pub struct GetInstanceRequest {
    client: Client,
    instance_id: String,
}

impl GetInstanceRequest {
    pub async fn execute(&self) -> Result<(Instance, HttpResponse)> {
        let path = format!("{}/instances/{}", BASE, self.instance_id);
        self.client
            .execute(ApiRequest::new(Method::Get, path))
            .await
    }
}

#[derive(Clone)]
pub struct LaunchInstanceRequest {
    client: Client,
    opts: LaunchInstanceOpts,
}

impl LaunchInstanceRequest {
    pub async fn execute(&self) -> Result<(Instance, HttpResponse)> {
        let request = ApiRequest::new(Method::Post, format!("{}/instances", BASE))
            .body(json_body(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct UpdateInstanceRequest {
    client: Client,
    instance_id: String,
    opts: UpdateInstanceOpts,
}

impl UpdateInstanceRequest {
    pub async fn execute(&self) -> Result<(Instance, HttpResponse)> {
        let path = format!("{}/instances/{}", BASE, self.instance_id);
        let request = ApiRequest::new(Method::Put, path).body(json_body(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct TerminateInstanceRequest {
    client: Client,
    instance_id: String,
}

impl TerminateInstanceRequest {
    pub async fn execute(&self) -> Result<HttpResponse> {
        let path = format!("{}/instances/{}", BASE, self.instance_id);
        self.client
            .execute_empty(ApiRequest::new(Method::Delete, path))
            .await
    }
}

// ISOs

#[derive(Clone)]
pub struct GetIsoListRequest {
    client: Client,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetIsoListRequest {
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub async fn execute(&self) -> Result<(IsoList, HttpResponse)> {
        let request = ApiRequest::new(Method::Get, format!("{}/isos", BASE))
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetIsoListRequest, IsoList);

#[derive(Clone)]
pub struct AttachInstanceIsoRequest {
    client: Client,
    instance_id: String,
    opts: AttachIsoOpts,
}

impl AttachInstanceIsoRequest {
    pub async fn execute(&self) -> Result<HttpResponse> {
        let path = format!("{}/instances/{}/attachIso", BASE, self.instance_id);
        let request = ApiRequest::new(Method::Post, path).body(json_body(&self.opts)?);
        self.client.execute_empty(request).await
    }
}

#[derive(Clone)]
pub struct DetachInstanceIsoRequest {
    client: Client,
    instance_id: String,
}

impl DetachInstanceIsoRequest {
    pub async fn execute(&self) -> Result<HttpResponse> {
        let path = format!("{}/instances/{}/detachIso", BASE, self.instance_id);
        self.client
            .execute_empty(ApiRequest::new(Method::Post, path))
            .await
    }
}

// Instance IPs

#[derive(Clone)]
pub struct GetInstanceIpRequest {
    client: Client,
    instance_id: String,
    ip: String,
}

impl GetInstanceIpRequest {
    pub async fn execute(&self) -> Result<(Ip, HttpResponse)> {
        let path = format!("{}/instances/{}/ips/{}", BASE, self.instance_id, self.ip);
        self.client
            .execute(ApiRequest::new(Method::Get, path))
            .await
    }
}

#[derive(Clone)]
pub struct UpdateInstanceIpRequest {
    client: Client,
    instance_id: String,
    ip: String,
    opts: UpdateIpOpts,
}

impl UpdateInstanceIpRequest {
    pub async fn execute(&self) -> Result<(Ip, HttpResponse)> {
        let path = format!("{}/instances/{}/ips/{}", BASE, self.instance_id, self.ip);
        let request = ApiRequest::new(Method::Put, path).body(json_body(&self.opts)?);
        self.client.execute(request).await
    }
}

// Images

#[derive(Clone)]
pub struct GetImageListRequest {
    client: Client,
    standard: Option<bool>,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetImageListRequest {
    /// Only standard images (`true`) or only custom images (`false`).
    pub fn with_standard(mut self, standard: bool) -> Self {
        self.standard = Some(standard);
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

    pub async fn execute(&self) -> Result<(ImageList, HttpResponse)> {
        let request = ApiRequest::new(Method::Get, format!("{}/images", BASE))
            .query("standard", self.standard)
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetImageListRequest, ImageList);

#[derive(Clone)]
pub struct CreateImageRequest {
    client: Client,
    opts: CreateImageOpts,
}

impl CreateImageRequest {
    pub async fn execute(&self) -> Result<(Image, HttpResponse)> {
        let request = ApiRequest::new(Method::Post, format!("{}/images", BASE))
            .body(json_body(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct UpdateImageRequest {
    client: Client,
    image_id: String,
    opts: UpdateImageOpts,
}

impl UpdateImageRequest {
    pub async fn execute(&self) -> Result<(Image, HttpResponse)> {
        let path = format!("{}/images/{}", BASE, self.image_id);
        let request = ApiRequest::new(Method::Put, path).body(json_body(&self.opts)?);
        self.client.execute(request).await
    }
}

// Regions and instance types

#[derive(Clone)]
pub struct GetRegionListRequest {
    client: Client,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetRegionListRequest {
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub async fn execute(&self) -> Result<(RegionList, HttpResponse)> {
        let request = ApiRequest::new(Method::Get, format!("{}/regions", BASE))
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetRegionListRequest, RegionList);

#[derive(Clone)]
pub struct GetInstanceTypeListRequest {
    client: Client,
    region: String,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetInstanceTypeListRequest {
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub async fn execute(&self) -> Result<(InstanceTypeList, HttpResponse)> {
        let request = ApiRequest::new(Method::Get, format!("{}/instanceTypes", BASE))
            .query("region", Some(&self.region))
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetInstanceTypeListRequest, InstanceTypeList);

// Load balancer listeners

#[derive(Clone)]
pub struct GetLoadBalancerListenerListRequest {
    client: Client,
    load_balancer_id: String,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetLoadBalancerListenerListRequest {
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub async fn execute(&self) -> Result<(ListenerList, HttpResponse)> {
        let path = format!("{}/loadBalancers/{}/listeners", BASE, self.load_balancer_id);
        let request = ApiRequest::new(Method::Get, path)
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetLoadBalancerListenerListRequest, ListenerList);

#[derive(Clone)]
pub struct GetLoadBalancerListenerRequest {
    client: Client,
    load_balancer_id: String,
    listener_id: String,
}

impl GetLoadBalancerListenerRequest {
    pub async fn execute(&self) -> Result<(Listener, HttpResponse)> {
        let path = format!(
            "{}/loadBalancers/{}/listeners/{}",
            BASE, self.load_balancer_id, self.listener_id
        );
        self.client
            .execute(ApiRequest::new(Method::Get, path))
            .await
    }
}

#[derive(Clone)]
pub struct CreateLoadBalancerListenerRequest {
    client: Client,
    load_balancer_id: String,
    opts: ListenerCreateOpts,
}

impl CreateLoadBalancerListenerRequest {
    pub async fn execute(&self) -> Result<(Listener, HttpResponse)> {
        let path = format!("{}/loadBalancers/{}/listeners", BASE, self.load_balancer_id);
        let request = ApiRequest::new(Method::Post, path).body(json_body(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct UpdateLoadBalancerListenerRequest {
    client: Client,
    load_balancer_id: String,
    listener_id: String,
    opts: ListenerUpdateOpts,
}

impl UpdateLoadBalancerListenerRequest {
    pub async fn execute(&self) -> Result<(Listener, HttpResponse)> {
        let path = format!(
            "{}/loadBalancers/{}/listeners/{}",
            BASE, self.load_balancer_id, self.listener_id
        );
        let request = ApiRequest::new(Method::Put, path).body(json_body(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct DeleteLoadBalancerListenerRequest {
    client: Client,
    load_balancer_id: String,
    listener_id: String,
}

impl DeleteLoadBalancerListenerRequest {
    pub async fn execute(&self) -> Result<HttpResponse> {
        let path = format!(
            "{}/loadBalancers/{}/listeners/{}",
            BASE, self.load_balancer_id, self.listener_id
        );
        self.client
            .execute_empty(ApiRequest::new(Method::Delete, path))
            .await
    }
}

// Target groups

#[derive(Clone)]
pub struct GetTargetGroupListRequest {
    client: Client,
    protocol: Option<Protocol>,
    port: Option<i32>,
    region: Option<String>,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetTargetGroupListRequest {
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    pub fn with_port(mut self, port: i32) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
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

    pub async fn execute(&self) -> Result<(TargetGroupList, HttpResponse)> {
        let request = ApiRequest::new(Method::Get, format!("{}/targetGroups", BASE))
            .query("protocol", self.protocol)
            .query("port", self.port)
            .query("region", self.region.as_ref())
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetTargetGroupListRequest, TargetGroupList);

#[derive(Clone)]
pub struct GetTargetGroupRequest {
    client: Client,
    target_group_id: String,
}

impl GetTargetGroupRequest {
    pub async fn execute(&self) -> Result<(TargetGroup, HttpResponse)> {
        let path = format!("{}/targetGroups/{}", BASE, self.target_group_id);
        self.client
            .execute(ApiRequest::new(Method::Get, path))
            .await
    }
}

#[derive(Clone)]
pub struct CreateTargetGroupRequest {
    client: Client,
    opts: CreateTargetGroupOpts,
}

impl CreateTargetGroupRequest {
    pub async fn execute(&self) -> Result<(TargetGroup, HttpResponse)> {
        let request = ApiRequest::new(Method::Post, format!("{}/targetGroups", BASE))
            .body(json_body(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct UpdateTargetGroupRequest {
    client: Client,
    target_group_id: String,
    opts: UpdateTargetGroupOpts,
}

impl UpdateTargetGroupRequest {
    pub async fn execute(&self) -> Result<(TargetGroup, HttpResponse)> {
        let path = format!("{}/targetGroups/{}", BASE, self.target_group_id);
        let request = ApiRequest::new(Method::Put, path).body(json_body(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct DeleteTargetGroupRequest {
    client: Client,
    target_group_id: String,
}

impl DeleteTargetGroupRequest {
    pub async fn execute(&self) -> Result<HttpResponse> {
        let path = format!("{}/targetGroups/{}", BASE, self.target_group_id);
        self.client
            .execute_empty(ApiRequest::new(Method::Delete, path))
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::Client;
    use crate::models::publiccloud::{AttachIsoOpts, InstanceState};
    use crate::testing::MockTransport;
    use crate::transport::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_instance_list_query() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "/publicCloud/v1/instances",
            200,
            json!({"instances": [], "_metadata": {"limit": 5, "offset": 10, "totalCount": 0}}),
        );
        let client = Client::with_transport(mock.clone());

        let (list, _) = client
            .public_cloud()
            .get_instance_list()
            .with_state(InstanceState::Running)
            .with_region("eu-west-3")
            .with_limit(5)
            .with_offset(10)
            .execute()
            .await
            .unwrap();
        assert!(list.instances.is_empty());

        let call = &mock.calls()[0];
        assert_eq!(call.query_value("state"), Some("RUNNING"));
        assert_eq!(call.query_value("region"), Some("eu-west-3"));
        assert_eq!(call.query_value("offset"), Some("10"));
        assert_eq!(call.query_value("reference"), None);
    }

    #[tokio::test]
    async fn test_attach_iso_body() {
        let mock = MockTransport::new();
        mock.on(
            Method::Post,
            "/publicCloud/v1/instances/i-1/attachIso",
            204,
            json!(null),
        );
        let client = Client::with_transport(mock.clone());

        client
            .public_cloud()
            .attach_instance_iso(
                "i-1",
                AttachIsoOpts {
                    iso_id: "GRML".to_string(),
                },
            )
            .execute()
            .await
            .unwrap();
        assert_eq!(mock.calls()[0].body, Some(json!({"isoId": "GRML"})));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "/publicCloud/v1/instances/missing",
            404,
            json!({"correlationId": "c-9", "errorCode": "404", "errorMessage": "Resource not found"}),
        );
        let client = Client::with_transport(mock);

        let err = client
            .public_cloud()
            .get_instance("missing")
            .execute()
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            err.error_response().unwrap().error_message.as_deref(),
            Some("Resource not found")
        );
    }
}
