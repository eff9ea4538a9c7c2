//! DNS API (`/hosting/v2`)

use crate::client::Client;
use crate::error::Result;
use crate::models::dns::{
    CreateResourceRecordSetOpts, ResourceRecordSet, ResourceRecordSetList, ResourceRecordSetType,
    UpdateResourceRecordSetOpts,
};
use crate::pagination::paged_request;
use crate::transport::{ApiRequest, HttpResponse, Method};

const BASE: &str = "/hosting/v2";

/// Entry point for DNS endpoints
#[derive(Clone)]
pub struct DnsApi {
    client: Client,
}

impl DnsApi {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn get_resource_record_set_list(
        &self,
        domain_name: impl Into<String>,
    ) -> GetResourceRecordSetListRequest {
        GetResourceRecordSetListRequest {
            client: self.client.clone(),
            domain_name: domain_name.into(),
            limit: None,
            offset: None,
        }
    }

    pub fn get_resource_record_set(
        &self,
        domain_name: impl Into<String>,
        name: impl Into<String>,
        record_type: ResourceRecordSetType,
    ) -> GetResourceRecordSetRequest {
        GetResourceRecordSetRequest {
            client: self.client.clone(),
            domain_name: domain_name.into(),
            name: name.into(),
            record_type,
        }
    }

    pub fn create_resource_record_set(
        &self,
        domain_name: impl Into<String>,
        opts: CreateResourceRecordSetOpts,
    ) -> CreateResourceRecordSetRequest {
        CreateResourceRecordSetRequest {
            client: self.client.clone(),
            domain_name: domain_name.into(),
            opts,
        }
    }

    pub fn update_resource_record_set(
        &self,
        domain_name: impl Into<String>,
        name: impl Into<String>,
        record_type: ResourceRecordSetType,
        opts: UpdateResourceRecordSetOpts,
    ) -> UpdateResourceRecordSetRequest {
        UpdateResourceRecordSetRequest {
            client: self.client.clone(),
            domain_name: domain_name.into(),
            name: name.into(),
            record_type,
            opts,
        }
    }

    pub fn delete_resource_record_set(
        &self,
        domain_name: impl Into<String>,
        name: impl Into<String>,
        record_type: ResourceRecordSetType,
    ) -> DeleteResourceRecordSetRequest {
        DeleteResourceRecordSetRequest {
            client: self.client.clone(),
            domain_name: domain_name.into(),
            name: name.into(),
            record_type,
        }
    }
}

fn record_set_path(domain_name: &str, name: &str, record_type: ResourceRecordSetType) -> String {
    format!(
        "{}/domains/{}/resourceRecordSets/{}/{}",
        BASE, domain_name, name, record_type
    )
}

#[derive(Clone)]
pub struct GetResourceRecordSetListRequest {
    client: Client,
    domain_name: String,
    limit: Option<i32>,
    offset: Option<i32>,
}

impl GetResourceRecordSetListRequest {
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub async fn execute(&self) -> Result<(ResourceRecordSetList, HttpResponse)> {
        let path = format!("{}/domains/{}/resourceRecordSets", BASE, self.domain_name);
        let request = ApiRequest::new(Method::Get, path)
            .query("limit", self.limit)
            .query("offset", self.offset);
        self.client.execute(request).await
    }
}

paged_request!(GetResourceRecordSetListRequest, ResourceRecordSetList);

#[derive(Clone)]
pub struct GetResourceRecordSetRequest {
    client: Client,
    domain_name: String,
    name: String,
    record_type: ResourceRecordSetType,
}

impl GetResourceRecordSetRequest {
    pub async fn execute(&self) -> Result<(ResourceRecordSet, HttpResponse)> {
        let path = record_set_path(&self.domain_name, &self.name, self.record_type);
        self.client
            .execute(ApiRequest::new(Method::Get, path))
            .await
    }
}

#[derive(Clone)]
pub struct CreateResourceRecordSetRequest {
    client: Client,
    domain_name: String,
    opts: CreateResourceRecordSetOpts,
}

impl CreateResourceRecordSetRequest {
    pub async fn execute(&self) -> Result<(ResourceRecordSet, HttpResponse)> {
        let path = format!("{}/domains/{}/resourceRecordSets", BASE, self.domain_name);
        let request = ApiRequest::new(Method::Post, path).body(serde_json::to_value(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct UpdateResourceRecordSetRequest {
    client: Client,
    domain_name: String,
    name: String,
    record_type: ResourceRecordSetType,
    opts: UpdateResourceRecordSetOpts,
}

impl UpdateResourceRecordSetRequest {
    pub async fn execute(&self) -> Result<(ResourceRecordSet, HttpResponse)> {
        let path = record_set_path(&self.domain_name, &self.name, self.record_type);
        let request = ApiRequest::new(Method::Put, path).body(serde_json::to_value(&self.opts)?);
        self.client.execute(request).await
    }
}

#[derive(Clone)]
pub struct DeleteResourceRecordSetRequest {
    client: Client,
    domain_name: String,
    name: String,
    record_type: ResourceRecordSetType,
}

impl DeleteResourceRecordSetRequest {
    pub async fn execute(&self) -> Result<HttpResponse> {
        let path = record_set_path(&self.domain_name, &self.name, self.record_type);
        self.client
            .execute_empty(ApiRequest::new(Method::Delete, path))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_record_set_path() {
        let mock = MockTransport::new();
        mock.on(
            Method::Get,
            "/hosting/v2/domains/example.com/resourceRecordSets/www.example.com./TXT",
            200,
            json!({"name": "www.example.com.", "type": "TXT", "content": ["v=spf1"], "ttl": 3600, "editable": true}),
        );
        let client = Client::with_transport(mock.clone());
        let (rrset, _) = client
            .dns()
            .get_resource_record_set(
                "example.com",
                "www.example.com.",
                ResourceRecordSetType::Txt,
            )
            .execute()
            .await
            .unwrap();
        assert_eq!(rrset.content, vec!["v=spf1".to_string()]);
        assert_eq!(rrset.ttl, 3600);
    }
}
