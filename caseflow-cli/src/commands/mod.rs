//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod pipeline;
mod stage;
mod version;

pub use pipeline::PipelineCommands;
pub use stage::StageCommands;
pub use version::VersionCommands;

use anyhow::Result;
use clap::Subcommand;

use caseflow_client::ClientError;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Pipeline inspection
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Stage configuration editing
    Stage {
        #[command(subcommand)]
        command: StageCommands,
    },
    /// Version history and rollback
    Version {
        #[command(subcommand)]
        command: VersionCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Pipeline { command } => pipeline::handle_pipeline_command(command, config).await,
        Commands::Stage { command } => stage::handle_stage_command(command, config).await,
        Commands::Version { command } => version::handle_version_command(command, config).await,
    }
}

/// Turns a client error into the message shown to the operator, carrying
/// the remedy that actually fixes each case.
pub(crate) fn remedy(err: ClientError) -> anyhow::Error {
    match err {
        ClientError::VersionConflict { message } => anyhow::anyhow!(
            "someone else saved this pipeline while you were editing ({}); \
             re-run the command to pick up the latest version and reapply \
             your change, retrying as-is will keep failing",
            message
        ),
        ClientError::Validation { message } => anyhow::anyhow!(
            "the CRM rejected the stage list: {}; correct the list and try again",
            message
        ),
        ClientError::Forbidden { message } => {
            anyhow::anyhow!("permission denied: {}", message)
        }
        ClientError::NotFound { message } => anyhow::anyhow!("{}", message),
        other => anyhow::anyhow!(other),
    }
}
