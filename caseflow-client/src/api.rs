//! Data-access seam for pipeline configuration
//!
//! Consumers depend on this trait rather than on the HTTP client directly.
//! The trait is what makes the editing workflow testable against an
//! in-memory implementation that models the server's compare-and-swap on
//! `current_version`; [`CrmClient`] is the production implementation.

use async_trait::async_trait;
use uuid::Uuid;

use caseflow_core::domain::pipeline::{Pipeline, PipelineSummary};
use caseflow_core::dto::pipeline::SaveStagesRequest;
use caseflow_core::dto::version::VersionEntry;

use crate::CrmClient;
use crate::error::Result;

/// Pipeline configuration data access
#[async_trait]
pub trait PipelineApi: Send + Sync {
    /// Fetch summaries of all pipelines visible to the caller
    async fn fetch_pipelines(&self) -> Result<Vec<PipelineSummary>>;

    /// Fetch one pipeline with its stage list and `current_version`
    async fn fetch_pipeline(&self, pipeline_id: Uuid) -> Result<Pipeline>;

    /// Fetch version history, most recent first
    ///
    /// Fails with a forbidden error when the caller lacks the developer
    /// role; an empty history is a successful empty list.
    async fn fetch_versions(&self, pipeline_id: Uuid) -> Result<Vec<VersionEntry>>;

    /// Save a complete stage list under optimistic concurrency
    async fn save_stages(&self, pipeline_id: Uuid, req: SaveStagesRequest) -> Result<Pipeline>;

    /// Create a new version whose payload copies a historical version
    async fn rollback(&self, pipeline_id: Uuid, version: i64) -> Result<Pipeline>;
}

#[async_trait]
impl PipelineApi for CrmClient {
    async fn fetch_pipelines(&self) -> Result<Vec<PipelineSummary>> {
        self.list_pipelines().await
    }

    async fn fetch_pipeline(&self, pipeline_id: Uuid) -> Result<Pipeline> {
        self.get_pipeline(pipeline_id).await
    }

    async fn fetch_versions(&self, pipeline_id: Uuid) -> Result<Vec<VersionEntry>> {
        self.list_versions(pipeline_id).await
    }

    async fn save_stages(&self, pipeline_id: Uuid, req: SaveStagesRequest) -> Result<Pipeline> {
        CrmClient::save_stages(self, pipeline_id, req).await
    }

    async fn rollback(&self, pipeline_id: Uuid, version: i64) -> Result<Pipeline> {
        CrmClient::rollback(self, pipeline_id, version).await
    }
}
