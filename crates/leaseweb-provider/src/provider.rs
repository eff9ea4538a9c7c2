//! The `leaseweb` provider and the client shared with its resources

use crate::dns::{ResourceRecordSetResource, ResourceRecordSetsDataSource};
use crate::error::Result;
use crate::ipmgmt::{IpDataSource, IpResource, NullRouteResource, NullRoutesDataSource};
use crate::publiccloud::{
    ImageResource, ImagesDataSource, InstanceIsoResource, InstanceResource,
    InstanceTypesDataSource, InstancesDataSource, IpResource as PublicCloudIpResource,
    IsosDataSource, LoadBalancerListenerResource, LoadBalancerListenersDataSource,
    RegionsDataSource, TargetGroupResource, TargetGroupsDataSource,
};
use crate::utils::memo::Memo;
use crate::utils::paginate::paginate;
use leaseweb_config::Settings;
use leaseweb_framework::schema::attributes;
use leaseweb_framework::{
    AttributePath, Attribute, Context, DataSource, Provider, ProviderConfigureRequest,
    ProviderConfigureResponse, ProviderMetadata, Resource, Schema, Value, async_trait,
};
use leaseweb_sdk::{Client, Configuration, SdkError, Transport};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const PROVIDER_TYPE_NAME: &str = "leaseweb";

/// Client and enumeration caches handed to every resource and data source
pub struct ProviderClient {
    pub client: Client,
    regions: Memo<(), Vec<String>>,
    instance_types: Memo<String, Vec<String>>,
}

impl ProviderClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            regions: Memo::new(),
            instance_types: Memo::new(),
        }
    }

    /// Resolve settings and build a client talking to the real API.
    pub fn from_settings(settings: Settings, user_agent: &str) -> Result<Self> {
        let resolved = leaseweb_config::resolve(settings)?;
        let mut configuration = Configuration::new(resolved.token)
            .with_scheme(resolved.scheme)
            .with_user_agent(user_agent);
        if let Some(host) = resolved.host {
            configuration = configuration.with_host(host);
        }
        debug!(base_url = %configuration.base_url(), "Building API client");
        Ok(Self::new(Client::new(configuration)?))
    }

    /// Names of every public cloud region. Fetched once per process.
    pub async fn regions(&self, ctx: &Context) -> std::result::Result<Vec<String>, SdkError> {
        self.regions
            .get_or_try_init((), || async {
                let regions = paginate(ctx, self.client.public_cloud().get_region_list()).await?;
                Ok(regions.into_iter().map(|r| r.name).collect())
            })
            .await
    }

    /// Instance type names available in a region. Fetched once per region.
    pub async fn instance_types(
        &self,
        ctx: &Context,
        region: &str,
    ) -> std::result::Result<Vec<String>, SdkError> {
        self.instance_types
            .get_or_try_init(region.to_string(), || async {
                let request = self.client.public_cloud().get_instance_type_list(region);
                let types = paginate(ctx, request).await?;
                Ok(types.into_iter().map(|t| t.name).collect())
            })
            .await
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProviderModel {
    token: Value<String>,
    host: Value<String>,
    scheme: Value<String>,
}

/// Provider for the Leaseweb public cloud, DNS and IP management APIs
pub struct LeasewebProvider {
    version: String,
    transport: Option<Arc<dyn Transport>>,
}

impl LeasewebProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            transport: None,
        }
    }

    /// Route every API request through `transport` instead of the network.
    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    fn user_agent(&self) -> String {
        format!("leaseweb-provider/{}", self.version)
    }
}

impl Default for LeasewebProvider {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }
}

#[async_trait]
impl Provider for LeasewebProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            version: self.version.clone(),
        }
    }

    fn schema(&self) -> Schema {
        Schema::new(attributes([
            (
                "token",
                Attribute::string()
                    .optional()
                    .sensitive()
                    .description(
                        "API token. Falls back to LEASEWEB_TOKEN and the credentials file.",
                    ),
            ),
            (
                "host",
                Attribute::string()
                    .optional()
                    .description("API host, e.g. api.leaseweb.com. Falls back to LEASEWEB_HOST."),
            ),
            (
                "scheme",
                Attribute::string()
                    .optional()
                    .description("http or https. Defaults to https.")
                    .validator(leaseweb_framework::validator::one_of_strings(&["http", "https"])),
            ),
        ]))
        .with_description("Manage Leaseweb public cloud, DNS and IP management resources.")
    }

    async fn configure(
        &self,
        _ctx: &Context,
        req: ProviderConfigureRequest,
        resp: &mut ProviderConfigureResponse,
    ) {
        let Some(model) = req.config.get::<ProviderModel>(&mut resp.diagnostics) else {
            return;
        };

        for (name, value) in [
            ("token", &model.token),
            ("host", &model.host),
            ("scheme", &model.scheme),
        ] {
            if value.is_unknown() {
                resp.diagnostics.add_attribute_error(
                    AttributePath::root(name),
                    format!("Unknown Leaseweb API {}", name),
                    format!(
                        "The provider cannot create the Leaseweb API client as there is an unknown configuration value for the API {}. Set the value statically in the configuration, or use the LEASEWEB_{} environment variable.",
                        name,
                        name.to_uppercase()
                    ),
                );
            }
        }
        if resp.diagnostics.has_error() {
            return;
        }

        let settings = Settings {
            token: model.token.into_known(),
            host: model.host.into_known(),
            scheme: model.scheme.into_known(),
        };

        let client = match &self.transport {
            Some(transport) => match leaseweb_config::resolve(settings) {
                Ok(_) => Ok(ProviderClient::new(Client::with_transport(transport.clone()))),
                Err(e) => Err(e.into()),
            },
            None => ProviderClient::from_settings(settings, &self.user_agent()),
        };

        match client {
            Ok(client) => {
                info!(version = %self.version, "Configured Leaseweb client");
                resp.provider_data = Some(Arc::new(client));
            }
            Err(e) => resp.diagnostics.add_error(
                "Unable to Create Leaseweb API Client",
                format!(
                    "An unexpected error occurred when creating the Leaseweb API client. {}",
                    e
                ),
            ),
        }
    }

    fn resources(&self) -> Vec<Box<dyn Resource>> {
        vec![
            Box::new(InstanceResource::default()),
            Box::new(InstanceIsoResource::default()),
            Box::new(PublicCloudIpResource::default()),
            Box::new(ImageResource::default()),
            Box::new(LoadBalancerListenerResource::default()),
            Box::new(TargetGroupResource::default()),
            Box::new(ResourceRecordSetResource::default()),
            Box::new(IpResource::default()),
            Box::new(NullRouteResource::default()),
        ]
    }

    fn data_sources(&self) -> Vec<Box<dyn DataSource>> {
        vec![
            Box::new(InstancesDataSource::default()),
            Box::new(ImagesDataSource::default()),
            Box::new(IsosDataSource::default()),
            Box::new(RegionsDataSource::default()),
            Box::new(InstanceTypesDataSource::default()),
            Box::new(LoadBalancerListenersDataSource::default()),
            Box::new(TargetGroupsDataSource::default()),
            Box::new(ResourceRecordSetsDataSource::default()),
            Box::new(IpDataSource::default()),
            Box::new(NullRoutesDataSource::default()),
        ]
    }
}
