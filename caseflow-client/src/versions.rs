//! Stage save, version history, and rollback endpoints

use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use caseflow_core::domain::pipeline::Pipeline;
use caseflow_core::dto::pipeline::SaveStagesRequest;
use caseflow_core::dto::version::{RollbackRequest, VersionEntry};

use crate::CrmClient;
use crate::error::Result;

impl CrmClient {
    /// Save a full-replacement stage list as a new configuration version
    ///
    /// The request carries the session's baseline version; the server
    /// refuses the write with a conflict when the pipeline has since moved.
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline UUID
    /// * `req` - Complete stage list, expected version, optional comment
    ///
    /// # Returns
    /// The updated pipeline, with `current_version` bumped by one
    ///
    /// # Errors
    /// [`ClientError::VersionConflict`](crate::ClientError::VersionConflict)
    /// when the baseline is stale,
    /// [`ClientError::Validation`](crate::ClientError::Validation) when the
    /// server rejects the list.
    pub async fn save_stages(&self, pipeline_id: Uuid, req: SaveStagesRequest) -> Result<Pipeline> {
        let url = format!("{}/api/pipelines/{}/stages", self.base_url(), pipeline_id);
        debug!(
            url = %url,
            expected_version = req.expected_version,
            stages = req.stages.len(),
            "saving stage configuration"
        );
        let response = self.request(Method::PUT, &url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// List a pipeline's version history, most recent first
    ///
    /// # Errors
    /// [`ClientError::Forbidden`](crate::ClientError::Forbidden) when the
    /// caller lacks the developer role, which is distinct from an empty
    /// history (`Ok(vec![])`).
    pub async fn list_versions(&self, pipeline_id: Uuid) -> Result<Vec<VersionEntry>> {
        let url = format!("{}/api/pipelines/{}/versions", self.base_url(), pipeline_id);
        debug!(url = %url, "fetching version history");
        let response = self.request(Method::GET, &url).send().await?;

        self.handle_response(response).await
    }

    /// Restore a historical version's payload as a brand-new version
    ///
    /// The server copies the target payload into a record at
    /// `current_version + 1`; no historical record is modified, so rolling
    /// forward again is always possible.
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline UUID
    /// * `version` - The historical version number to restore
    ///
    /// # Errors
    /// [`ClientError::NotFound`](crate::ClientError::NotFound) when the
    /// version does not exist, plus the same conflict and permission
    /// failures as a save.
    pub async fn rollback(&self, pipeline_id: Uuid, version: i64) -> Result<Pipeline> {
        let url = format!("{}/api/pipelines/{}/rollback", self.base_url(), pipeline_id);
        debug!(url = %url, version, "rolling back pipeline configuration");
        let response = self
            .request(Method::POST, &url)
            .json(&RollbackRequest { version })
            .send()
            .await?;

        self.handle_response(response).await
    }
}
