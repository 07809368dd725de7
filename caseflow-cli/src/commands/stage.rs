//! Stage editing commands
//!
//! Every command opens an editing session against the pipeline's current
//! state, applies the edit in memory, validates the full list, and saves it
//! as a new configuration version. The session's baseline version rides
//! along in the save request, so a concurrent save from another operator is
//! reported as a conflict instead of being overwritten.

use anyhow::{Context, Result, bail};
use clap::Subcommand;
use colored::*;

use caseflow_client::CrmClient;
use caseflow_core::domain::stage::StageType;
use caseflow_core::editor::EditSession;
use caseflow_core::validate::validate_stages;

use crate::commands::remedy;
use crate::config::Config;
use crate::id_resolver::resolve_pipeline;
use crate::types::PipelineRef;

/// Stage subcommands
#[derive(Subcommand)]
pub enum StageCommands {
    /// Move a stage to a new position
    Move {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
        /// Current position (1-based)
        from: usize,
        /// Target position (1-based)
        to: usize,
        /// Comment recorded on the new version
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Rename a stage's display label
    Relabel {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
        /// Slug of the stage to rename
        slug: String,
        /// New display label
        label: String,
        /// Comment recorded on the new version
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Change a stage's display color
    Recolor {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
        /// Slug of the stage to recolor
        slug: String,
        /// New color as #RRGGBB
        color: String,
        /// Comment recorded on the new version
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Append a new stage
    Add {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
        /// Display label; the slug is derived from it
        label: String,
        /// Display color as #RRGGBB
        #[arg(long, default_value = "#9B9B9B")]
        color: String,
        /// Mark the stage as terminal (ends a case's progression)
        #[arg(long)]
        terminal: bool,
        /// Comment recorded on the new version
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Archive a stage (hidden from new cases; the slug stays reserved)
    Archive {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
        /// Slug of the stage to archive
        slug: String,
        /// Comment recorded on the new version
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Restore an archived stage
    Restore {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
        /// Slug of the stage to restore
        slug: String,
        /// Comment recorded on the new version
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Apply several edits in one new version
    Apply {
        /// Pipeline ID, ID prefix, or name prefix
        pipeline: String,
        /// Moves as FROM:TO position pairs (1-based), applied in order
        #[arg(long = "move", value_parser = parse_move)]
        moves: Vec<(usize, usize)>,
        /// Label edits as slug=new label
        #[arg(long = "label", value_parser = parse_assign)]
        labels: Vec<(String, String)>,
        /// Color edits as slug=#RRGGBB
        #[arg(long = "color", value_parser = parse_assign)]
        colors: Vec<(String, String)>,
        /// Comment recorded on the new version
        #[arg(short, long)]
        comment: Option<String>,
    },
}

/// Parse a single FROM:TO position pair
fn parse_move(s: &str) -> Result<(usize, usize)> {
    let (from, to) = s
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("invalid FROM:TO pair: no `:` found in `{}`", s))?;
    let from = from
        .trim()
        .parse()
        .with_context(|| format!("invalid position '{}'", from))?;
    let to = to
        .trim()
        .parse()
        .with_context(|| format!("invalid position '{}'", to))?;
    Ok((from, to))
}

/// Parse a single slug=value pair
fn parse_assign(s: &str) -> Result<(String, String)> {
    let pos = s
        .find('=')
        .ok_or_else(|| anyhow::anyhow!("invalid SLUG=value: no `=` found in `{}`", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

/// Handle stage commands
pub async fn handle_stage_command(command: StageCommands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        StageCommands::Move {
            pipeline,
            from,
            to,
            comment,
        } => {
            let mut session = open_session(&client, &pipeline).await?;
            apply_move(&mut session, from, to)?;
            save_session(&client, &mut session, comment).await
        }
        StageCommands::Relabel {
            pipeline,
            slug,
            label,
            comment,
        } => {
            let mut session = open_session(&client, &pipeline).await?;
            let index = session.index_of(&slug)?;
            session.update_label(index, label)?;
            save_session(&client, &mut session, comment).await
        }
        StageCommands::Recolor {
            pipeline,
            slug,
            color,
            comment,
        } => {
            let mut session = open_session(&client, &pipeline).await?;
            let index = session.index_of(&slug)?;
            session.update_color(index, color)?;
            save_session(&client, &mut session, comment).await
        }
        StageCommands::Add {
            pipeline,
            label,
            color,
            terminal,
            comment,
        } => {
            let mut session = open_session(&client, &pipeline).await?;
            let stage_type = if terminal {
                StageType::Terminal
            } else {
                StageType::Standard
            };
            let slug = session.add_stage(label, color, stage_type);
            println!("  New stage slug: {}", slug.cyan());
            save_session(&client, &mut session, comment).await
        }
        StageCommands::Archive {
            pipeline,
            slug,
            comment,
        } => {
            let mut session = open_session(&client, &pipeline).await?;
            let index = session.index_of(&slug)?;
            session.set_active(index, false)?;
            save_session(&client, &mut session, comment).await
        }
        StageCommands::Restore {
            pipeline,
            slug,
            comment,
        } => {
            let mut session = open_session(&client, &pipeline).await?;
            let index = session.index_of(&slug)?;
            session.set_active(index, true)?;
            save_session(&client, &mut session, comment).await
        }
        StageCommands::Apply {
            pipeline,
            moves,
            labels,
            colors,
            comment,
        } => {
            let mut session = open_session(&client, &pipeline).await?;
            for (from, to) in moves {
                apply_move(&mut session, from, to)?;
            }
            for (slug, label) in labels {
                let index = session.index_of(&slug)?;
                session.update_label(index, label)?;
            }
            for (slug, color) in colors {
                let index = session.index_of(&slug)?;
                session.update_color(index, color)?;
            }
            save_session(&client, &mut session, comment).await
        }
    }
}

/// Fetch the pipeline and open an editing session on its current state
async fn open_session(client: &CrmClient, reference: &str) -> Result<EditSession> {
    let reference = PipelineRef::parse(reference);
    let uuid = resolve_pipeline(client, &reference).await?;
    let pipeline = client.get_pipeline(uuid).await.map_err(remedy)?;
    Ok(EditSession::new(&pipeline))
}

/// Translate a 1-based position move into an editor reorder
fn apply_move(session: &mut EditSession, from: usize, to: usize) -> Result<()> {
    if from == 0 || to == 0 {
        bail!("stage positions are 1-based");
    }
    session.reorder(from - 1, to - 1)?;
    Ok(())
}

/// Validate the working list and save it as a new version
async fn save_session(
    client: &CrmClient,
    session: &mut EditSession,
    comment: Option<String>,
) -> Result<()> {
    if !session.is_dirty() {
        println!("{}", "No changes to save.".yellow());
        return Ok(());
    }

    let request = session.save_request(comment);
    validate_stages(&request.stages)
        .context("the edited stage list failed validation; nothing was saved")?;

    let pipeline = client
        .save_stages(session.pipeline_id(), request)
        .await
        .map_err(remedy)?;

    println!(
        "{}",
        format!("✓ Saved version {}", pipeline.current_version)
            .green()
            .bold()
    );
    println!(
        "  Stages: {}",
        pipeline
            .ordered_stages()
            .iter()
            .map(|s| s.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
            .dimmed()
    );

    session.absorb(&pipeline);
    Ok(())
}
