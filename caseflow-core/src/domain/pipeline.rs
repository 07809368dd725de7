//! Pipeline domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stage::PipelineStage;

/// A named, ordered stage sequence describing one kind of case progression.
///
/// Structure shared between the API client (fetches, saves) and the CLI
/// console (displays, edits).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: Uuid,
    pub name: String,
    /// Whether new cases land in this pipeline when none is chosen.
    pub is_default: bool,
    pub stages: Vec<PipelineStage>,
    /// Monotonic configuration version. The server bumps it by exactly one
    /// on every successful save or rollback; it is never reused.
    pub current_version: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Pipeline {
    /// Stages in display order.
    pub fn ordered_stages(&self) -> Vec<PipelineStage> {
        let mut stages = self.stages.clone();
        stages.sort_by_key(|s| s.order);
        stages
    }
}

/// Listing shape returned by the pipeline index endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub stage_count: u32,
    pub current_version: i64,
}
