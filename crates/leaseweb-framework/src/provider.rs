//! Top-level provider trait

use crate::context::Context;
use crate::datasource::DataSource;
use crate::diag::Diagnostics;
use crate::resource::{Resource, ResourceData};
use crate::schema::Schema;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// Opaque data handed from provider configuration to every resource and
/// data source. Implementations downcast it to their client type.
pub type ProviderData = Arc<dyn Any + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Prefix of every resource and data source type name.
    pub type_name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProviderConfigureRequest {
    pub config: ResourceData,
}

#[derive(Clone, Default)]
pub struct ProviderConfigureResponse {
    pub provider_data: Option<ProviderData>,
    pub diagnostics: Diagnostics,
}

/// Registers resources and data sources and builds the shared client
#[async_trait]
pub trait Provider: Send + Sync {
    fn metadata(&self) -> ProviderMetadata;

    fn schema(&self) -> Schema;

    async fn configure(
        &self,
        ctx: &Context,
        req: ProviderConfigureRequest,
        resp: &mut ProviderConfigureResponse,
    );

    fn resources(&self) -> Vec<Box<dyn Resource>>;

    fn data_sources(&self) -> Vec<Box<dyn DataSource>>;
}
