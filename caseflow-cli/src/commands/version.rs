//! Version history and rollback commands
//!
//! History access is gated to the developer role. The console checks the
//! configured role before calling, and maps a server-side Forbidden to the
//! same permission message, so a viewer never sees a misleading empty
//! history.

use anyhow::{Result, bail};
use clap::Subcommand;
use colored::*;

use caseflow_client::CrmClient;
use caseflow_core::domain::auth::Role;
use caseflow_core::dto::version::VersionEntry;

use crate::commands::remedy;
use crate::config::Config;
use crate::id_resolver::resolve_pipeline;
use crate::types::PipelineRef;

/// Version subcommands
#[derive(Subcommand)]
pub enum VersionCommands {
    /// List a pipeline's version history (most recent first)
    List {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
    },
    /// Restore a historical version's payload as a brand-new version
    Rollback {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
        /// Historical version number to restore
        version: i64,
    },
}

/// Handle version commands
pub async fn handle_version_command(command: VersionCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        VersionCommands::List { pipeline } => list_versions(&client, config.role, &pipeline).await,
        VersionCommands::Rollback { pipeline, version } => {
            rollback(&client, config.role, &pipeline, version).await
        }
    }
}

/// List version history, degrading to a permission message for
/// under-privileged roles
async fn list_versions(client: &CrmClient, role: Role, reference: &str) -> Result<()> {
    if !role.can_view_versions() {
        print_permission_note(role);
        return Ok(());
    }

    let reference = PipelineRef::parse(reference);
    let uuid = resolve_pipeline(client, &reference).await?;

    let entries = match client.list_versions(uuid).await {
        Ok(entries) => entries,
        // The server applies its own gate; its verdict wins over the
        // locally configured role.
        Err(e) if e.is_forbidden() => {
            print_permission_note(role);
            return Ok(());
        }
        Err(e) => return Err(remedy(e)),
    };

    if entries.is_empty() {
        println!("{}", "No version history yet.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} version(s):", entries.len()).bold()
    );
    println!();
    for entry in entries {
        print_version_entry(&entry);
    }

    Ok(())
}

/// Roll back to a historical version
async fn rollback(client: &CrmClient, role: Role, reference: &str, version: i64) -> Result<()> {
    if !role.can_rollback() {
        bail!(
            "rollback requires the developer role (you are acting as {})",
            role
        );
    }

    let reference = PipelineRef::parse(reference);
    let uuid = resolve_pipeline(client, &reference).await?;

    let pipeline = client.get_pipeline(uuid).await.map_err(remedy)?;
    if version == pipeline.current_version {
        println!(
            "{}",
            format!("Version {} is already current; nothing to roll back.", version).yellow()
        );
        return Ok(());
    }

    let rolled = client.rollback(uuid, version).await.map_err(remedy)?;

    println!(
        "{}",
        format!(
            "✓ Restored version {} as new version {}",
            version, rolled.current_version
        )
        .green()
        .bold()
    );
    println!(
        "  Stages: {}",
        rolled
            .ordered_stages()
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
            .dimmed()
    );

    Ok(())
}

fn print_permission_note(role: Role) {
    println!(
        "{}",
        format!(
            "Version history requires the developer role (you are acting as {}).",
            role
        )
        .yellow()
    );
}

/// Print one history entry
fn print_version_entry(entry: &VersionEntry) {
    let marker = if entry.is_current {
        "● current".green().to_string()
    } else {
        "○".dimmed().to_string()
    };
    println!("  {} {} {}", "▸".cyan(), format!("v{}", entry.version).bold(), marker);
    println!(
        "    Created: {}",
        entry
            .created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    if let Some(comment) = &entry.comment {
        println!("    Comment: {}", comment);
    }
    println!(
        "    Stages:  {}",
        entry.payload_preview.join(", ").dimmed()
    );
    println!();
}
