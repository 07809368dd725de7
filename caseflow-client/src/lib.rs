//! Caseflow HTTP Client
//!
//! A type-safe HTTP client for the CRM pipeline-configuration API.
//!
//! This crate provides a unified interface for the CLI console and any
//! other consumer to read pipelines, save stage edits under optimistic
//! concurrency, browse version history, and roll back. API failures are
//! mapped to a typed error taxonomy instead of raw status codes.
//!
//! # Example
//!
//! ```no_run
//! use caseflow_client::CrmClient;
//! use caseflow_core::editor::EditSession;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = CrmClient::new("http://localhost:8080");
//!
//!     let pipelines = client.list_pipelines().await?;
//!     let pipeline = client.get_pipeline(pipelines[0].id).await?;
//!
//!     let mut session = EditSession::new(&pipeline);
//!     session.reorder(1, 0)?;
//!
//!     let saved = client
//!         .save_stages(pipeline.id, session.save_request(Some("swap".into())))
//!         .await?;
//!     session.absorb(&saved);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;
mod pipelines;
mod versions;

// Re-export commonly used types
pub use api::PipelineApi;
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::{classify_status, error_message};

/// HTTP client for the CRM pipeline-configuration API
///
/// This client provides methods for the pipeline endpoints, organized into
/// logical groups:
/// - Pipeline reads (list, get)
/// - Stage saves under optimistic concurrency
/// - Version history and rollback
#[derive(Debug, Clone)]
pub struct CrmClient {
    /// Base URL of the CRM API (e.g., "http://localhost:8080")
    base_url: String,
    /// Bearer token attached to every request when present
    api_token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl CrmClient {
    /// Create a new CRM client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the CRM API (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use caseflow_client::CrmClient;
    ///
    /// let client = CrmClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: None,
            client: Client::new(),
        }
    }

    /// Create a new CRM client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use caseflow_client::CrmClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = CrmClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: None,
            client,
        }
    }

    /// Attach a bearer token sent with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Get the base URL of the CRM API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Request Plumbing
    // =============================================================================

    /// Build a request with the bearer token applied when configured
    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success statuses are mapped to the typed error taxonomy
    /// (conflict, forbidden, not-found, validation) so callers can branch
    /// on the remedy instead of parsing status codes.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(classify_status(status.as_u16(), error_message(error_text)));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse JSON response: {}", e)))
    }
}
