use crate::output;
use leaseweb_framework::ProviderServer;

pub fn handle(server: &ProviderServer, type_name: Option<&str>) -> anyhow::Result<()> {
    let schema = match type_name {
        None => server.schemas(),
        Some(name) if server.resource_types().any(|t| t == name) => {
            server.resource_schema(name)?.describe()
        }
        Some(name) => server.data_source_schema(name)?.describe(),
    };
    output::emit(&schema, None)
}
