use crate::{input, output};
use leaseweb_framework::{Context, ProviderServer};
use std::path::Path;
use tracing::info;

pub async fn read(
    server: &ProviderServer,
    ctx: &Context,
    type_name: &str,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let config = input::read_optional_json(config)?;
    info!(type_name, "Reading data source");

    let resp = server.read_data_source(ctx, type_name, config).await;
    output::report(&resp.diagnostics)?;
    output::emit(&resp.state, None)
}
