//! Pipeline version domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stage::PipelineStage;

/// An immutable snapshot of a pipeline's full stage configuration.
///
/// Version records form an append-only log: saving writes a new record at
/// `current_version + 1`, and rollback copies a historical payload into a
/// new record the same way. Existing records are never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineVersion {
    pub id: Uuid,
    /// Matches the pipeline's `current_version` at the moment this snapshot
    /// was taken.
    pub version: i64,
    pub payload: Vec<PipelineStage>,
    pub comment: Option<String>,
    pub created_by_user_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
