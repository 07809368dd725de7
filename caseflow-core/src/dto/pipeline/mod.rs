//! Pipeline configuration requests

use serde::{Deserialize, Serialize};

use crate::domain::stage::PipelineStage;

/// Full-replacement stage save.
///
/// Carries the complete edited stage list (never a partial diff) together
/// with the version the editing session started from. The server rejects
/// the write when the pipeline has moved past `expected_version`, which is
/// what catches concurrent edits from another session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStagesRequest {
    pub stages: Vec<PipelineStage>,
    pub expected_version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
