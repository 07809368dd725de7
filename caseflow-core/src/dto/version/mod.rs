//! Version history DTOs

use serde::{Deserialize, Serialize};

/// Request to restore a historical configuration.
///
/// The server copies the target version's payload into a brand-new version
/// at `current_version + 1`; no existing version record is touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackRequest {
    pub version: i64,
}

/// One entry of the version history listing, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: i64,
    /// Ordered stage labels of the snapshot.
    pub payload_preview: Vec<String>,
    pub comment: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Set on exactly the entry whose `version` matches the pipeline's
    /// `current_version`.
    pub is_current: bool,
}
