//! Read-only data sources

use crate::context::Context;
use crate::diag::Diagnostics;
use crate::resource::{ConfigureRequest, MetadataRequest, ResourceData};
use crate::schema::Schema;
use async_trait::async_trait;

#[derive(Debug, Clone, Default)]
pub struct ReadDataSourceRequest {
    pub config: ResourceData,
}

#[derive(Debug, Clone, Default)]
pub struct ReadDataSourceResponse {
    pub state: ResourceData,
    pub diagnostics: Diagnostics,
}

/// Query over existing upstream objects
#[async_trait]
pub trait DataSource: Send + Sync {
    fn metadata(&self, req: &MetadataRequest) -> String;

    fn schema(&self) -> Schema;

    fn configure(&mut self, _req: &ConfigureRequest, _diags: &mut Diagnostics) {}

    async fn read(
        &self,
        ctx: &Context,
        req: ReadDataSourceRequest,
        resp: &mut ReadDataSourceResponse,
    );
}
