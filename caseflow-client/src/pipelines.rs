//! Pipeline read endpoints

use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use caseflow_core::domain::pipeline::{Pipeline, PipelineSummary};

use crate::CrmClient;
use crate::error::Result;

impl CrmClient {
    /// List all pipelines visible to the caller
    ///
    /// # Returns
    /// Pipeline summaries (name, stage count, current version)
    pub async fn list_pipelines(&self) -> Result<Vec<PipelineSummary>> {
        let url = format!("{}/api/pipelines", self.base_url());
        debug!(url = %url, "listing pipelines");
        let response = self.request(Method::GET, &url).send().await?;

        self.handle_response(response).await
    }

    /// Get a pipeline by ID, including its full stage list and
    /// `current_version`
    ///
    /// # Arguments
    /// * `pipeline_id` - The pipeline UUID
    pub async fn get_pipeline(&self, pipeline_id: Uuid) -> Result<Pipeline> {
        let url = format!("{}/api/pipelines/{}", self.base_url(), pipeline_id);
        debug!(url = %url, "fetching pipeline");
        let response = self.request(Method::GET, &url).send().await?;

        self.handle_response(response).await
    }
}
