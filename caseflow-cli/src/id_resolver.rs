//! Pipeline resolver
//!
//! Resolves a pipeline argument to a full UUID by querying the listing
//! endpoint. This allows operators to pass a short UUID prefix or a name
//! prefix instead of a full UUID.

use anyhow::{Context, Result, anyhow};
use uuid::Uuid;

use caseflow_client::CrmClient;

use crate::types::PipelineRef;

/// Resolve a pipeline selector to a full UUID
///
/// If the input is already a full UUID, returns it immediately. Otherwise,
/// fetches the pipeline listing and finds the one whose ID or name starts
/// with the needle (case-insensitive).
///
/// # Errors
/// Returns an error if:
/// - No pipeline matches the needle
/// - Multiple pipelines match the needle (ambiguous)
/// - The listing call fails
pub async fn resolve_pipeline(client: &CrmClient, reference: &PipelineRef) -> Result<Uuid> {
    // If it's already a full UUID, return it
    if let Some(uuid) = reference.as_uuid() {
        return Ok(uuid);
    }

    let needle = reference.as_str().to_lowercase();

    let pipelines = client
        .list_pipelines()
        .await
        .context("Failed to fetch pipelines for resolution")?;

    let matches: Vec<_> = pipelines
        .iter()
        .filter(|p| {
            p.id.to_string().to_lowercase().starts_with(&needle)
                || p.name.to_lowercase().starts_with(&needle)
        })
        .collect();

    match matches.len() {
        0 => Err(anyhow!("No pipeline matches '{}'", needle)),
        1 => Ok(matches[0].id),
        _ => {
            let names: Vec<String> = matches
                .iter()
                .map(|p| format!("{} ({})", p.name, p.id))
                .collect();
            Err(anyhow!(
                "Ambiguous selector '{}' matches multiple pipelines: {}",
                needle,
                names.join(", ")
            ))
        }
    }
}
