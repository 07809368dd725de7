//! Pipeline inspection commands

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use caseflow_client::CrmClient;
use caseflow_core::domain::pipeline::{Pipeline, PipelineSummary};
use caseflow_core::domain::stage::StageType;

use crate::commands::remedy;
use crate::config::Config;
use crate::id_resolver::resolve_pipeline;
use crate::types::PipelineRef;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// List all pipelines
    List,
    /// Show a pipeline's stage configuration
    Get {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
    },
}

/// Handle pipeline commands
pub async fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        PipelineCommands::List => list_pipelines(&client).await,
        PipelineCommands::Get { pipeline } => get_pipeline(&client, &pipeline).await,
    }
}

/// List all pipelines
async fn list_pipelines(client: &CrmClient) -> Result<()> {
    let pipelines = client.list_pipelines().await.map_err(remedy)?;

    if pipelines.is_empty() {
        println!("{}", "No pipelines found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} pipeline(s):", pipelines.len()).bold()
        );
        println!();
        for pipeline in pipelines {
            print_pipeline_summary(&pipeline);
        }
    }

    Ok(())
}

/// Get and display a single pipeline
async fn get_pipeline(client: &CrmClient, reference: &str) -> Result<()> {
    let reference = PipelineRef::parse(reference);
    let uuid = resolve_pipeline(client, &reference).await?;

    let pipeline = client.get_pipeline(uuid).await.map_err(remedy)?;

    print_pipeline_details(&pipeline);

    Ok(())
}

/// Print a pipeline summary
fn print_pipeline_summary(pipeline: &PipelineSummary) {
    let default_marker = if pipeline.is_default {
        " (default)".dimmed().to_string()
    } else {
        String::new()
    };
    println!("  {} {}{}", "▸".cyan(), pipeline.name.bold(), default_marker);
    println!("    ID:      {}", pipeline.id.to_string().dimmed());
    println!(
        "    Stages:  {}   Version: {}",
        pipeline.stage_count.to_string().dimmed(),
        pipeline.current_version.to_string().dimmed()
    );
    println!();
}

/// Print detailed pipeline information
fn print_pipeline_details(pipeline: &Pipeline) {
    println!("{}", "Pipeline Details:".bold());
    println!("  ID:      {}", pipeline.id.to_string().cyan());
    println!("  Name:    {}", pipeline.name.bold());
    println!("  Default: {}", pipeline.is_default);
    println!("  Version: {}", pipeline.current_version.to_string().yellow());
    println!(
        "  Created: {}",
        pipeline.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!(
        "  Updated: {}",
        pipeline.updated_at.format("%Y-%m-%d %H:%M:%S")
    );

    println!("\n{}", "Stages:".bold());
    for stage in pipeline.ordered_stages() {
        let kind = match stage.stage_type {
            StageType::Standard => "",
            StageType::Terminal => " [terminal]",
        };
        let archived = if stage.is_active { "" } else { " (archived)" };
        println!(
            "  {}. {} {} {}{}{}",
            stage.order,
            stage.label.bold(),
            format!("({})", stage.slug).dimmed(),
            stage.color.dimmed(),
            kind.yellow(),
            archived.dimmed()
        );
    }
}
