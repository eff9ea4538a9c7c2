//! API client

use crate::dns::DnsApi;
use crate::error::{Result, SdkError};
use crate::ipmgmt::IpMgmtApi;
use crate::publiccloud::PublicCloudApi;
use crate::transport::{
    ApiRequest, DEFAULT_HOST, DEFAULT_SCHEME, HttpResponse, ReqwestTransport, Transport,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Client configuration
#[derive(Debug, Clone)]
pub struct Configuration {
    pub token: String,
    pub host: Option<String>,
    pub scheme: Option<String>,
    pub user_agent: String,
}

impl Configuration {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            host: None,
            scheme: None,
            user_agent: format!("leaseweb-sdk-rs/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> String {
        format!(
            "{}://{}",
            self.scheme.as_deref().unwrap_or(DEFAULT_SCHEME),
            self.host.as_deref().unwrap_or(DEFAULT_HOST)
        )
    }
}

/// Shared handle for every API domain
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
}

impl Client {
    pub fn new(config: Configuration) -> Result<Self> {
        if config.token.is_empty() {
            return Err(SdkError::InvalidConfig("token must not be empty".to_string()));
        }
        let transport = ReqwestTransport::new(config.base_url(), config.token, &config.user_agent)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn public_cloud(&self) -> PublicCloudApi {
        PublicCloudApi::new(self.clone())
    }

    pub fn dns(&self) -> DnsApi {
        DnsApi::new(self.clone())
    }

    pub fn ip_mgmt(&self) -> IpMgmtApi {
        IpMgmtApi::new(self.clone())
    }

    async fn send(&self, request: ApiRequest) -> Result<HttpResponse> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            debug!(%method, path = %path, status = response.status, "API request failed");
            return Err(SdkError::Api {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<(T, HttpResponse)> {
        let response = self.send(request).await?;
        let body = serde_json::from_str(&response.body)?;
        Ok((body, response))
    }

    /// Send a request whose response carries no body.
    pub(crate) async fn execute_empty(&self, request: ApiRequest) -> Result<HttpResponse> {
        self.send(request).await
    }
}
