mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand};
use leaseweb_framework::{Context, ProviderServer};
use leaseweb_provider::LeasewebProvider;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lswp")]
#[command(version, about = "Drive the Leaseweb provider from JSON files", long_about = None)]
struct Cli {
    /// Provider configuration (JSON). Unset fields fall back to the environment
    /// and the credentials file
    #[arg(short = 'p', long, env = "LSWP_PROVIDER_CONFIG", global = true)]
    provider_config: Option<PathBuf>,

    /// Give up after this many seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the provider, resource and data source schemas
    Schema {
        /// Only this resource or data source type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,
    },
    /// Validate a resource config
    Validate {
        #[arg(short = 't', long = "type")]
        type_name: String,
        /// Resource config (JSON, `-` for stdin)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Plan a resource change. A `null` config plans destruction
    Plan {
        #[arg(short = 't', long = "type")]
        type_name: String,
        #[arg(short, long)]
        config: PathBuf,
        /// Prior state (JSON). Omit for a create
        #[arg(short, long)]
        state: Option<PathBuf>,
    },
    /// Plan and apply a resource change, printing the new state
    Apply {
        #[arg(short = 't', long = "type")]
        type_name: String,
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        state: Option<PathBuf>,
        /// Write the new state here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Refresh a resource state
    Read {
        #[arg(short = 't', long = "type")]
        type_name: String,
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Import an existing object by its import identifier
    Import {
        #[arg(short = 't', long = "type")]
        type_name: String,
        /// e.g. `example.com,www.example.com.,A`
        id: String,
    },
    /// Read a data source
    ReadDataSource {
        #[arg(short = 't', long = "type")]
        type_name: String,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LSWP_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut server = ProviderServer::new(LeasewebProvider::new(env!("CARGO_PKG_VERSION")))?;

    // Schema and validation need no credentials
    match &cli.command {
        Commands::Schema { type_name } => {
            return commands::schema::handle(&server, type_name.as_deref());
        }
        Commands::Validate { type_name, config } => {
            return commands::resource::validate(&server, type_name, config);
        }
        _ => {}
    }

    let ctx = match cli.timeout {
        Some(secs) => Context::with_timeout(Duration::from_secs(secs)),
        None => Context::new(),
    };
    let token = ctx.token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let provider_config = input::read_optional_json(cli.provider_config.as_deref())?;
    let diags = server.configure(&ctx, provider_config).await;
    output::report(&diags)?;

    match cli.command {
        Commands::Schema { .. } | Commands::Validate { .. } => {}
        Commands::Plan {
            type_name,
            config,
            state,
        } => {
            commands::resource::plan(&server, &ctx, &type_name, &config, state.as_deref()).await?;
        }
        Commands::Apply {
            type_name,
            config,
            state,
            out,
        } => {
            commands::resource::apply(
                &server,
                &ctx,
                &type_name,
                &config,
                state.as_deref(),
                out.as_deref(),
            )
            .await?;
        }
        Commands::Read { type_name, state } => {
            commands::resource::read(&server, &ctx, &type_name, &state).await?;
        }
        Commands::Import { type_name, id } => {
            commands::resource::import(&server, &ctx, &type_name, &id).await?;
        }
        Commands::ReadDataSource { type_name, config } => {
            commands::data_source::read(&server, &ctx, &type_name, config.as_deref()).await?;
        }
    }

    Ok(())
}
