//! Caseflow CLI
//!
//! Operator console for the CRM pipeline-configuration API: inspect
//! pipelines, edit stage lists (reorder, relabel, recolor, add, archive),
//! browse version history, and roll back to a historical configuration.

mod commands;
mod config;
mod id_resolver;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use caseflow_core::domain::auth::Role;

#[derive(Parser)]
#[command(name = "caseflow")]
#[command(about = "Caseflow pipeline configuration console", long_about = None)]
struct Cli {
    /// CRM API URL
    #[arg(long, env = "CASEFLOW_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Bearer token sent with every API request
    #[arg(long, env = "CASEFLOW_API_TOKEN")]
    api_token: Option<String>,

    /// Role the caller acts as (viewer, operator, developer, admin)
    #[arg(long, env = "CASEFLOW_ROLE", default_value = "operator")]
    role: Role,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caseflow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        api_url: cli.api_url,
        api_token: cli.api_token,
        role: cli.role,
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
