//! Configuration module
//!
//! Handles CLI configuration: API endpoint, credentials, and the role the
//! caller acts as. The role only decides what the console offers; the
//! server enforces the same gates independently.

use caseflow_client::CrmClient;
use caseflow_core::domain::auth::Role;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the CRM API
    pub api_url: String,
    /// Bearer token attached to every request when present
    pub api_token: Option<String>,
    /// Role the caller acts as
    pub role: Role,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        Ok(())
    }

    /// Builds a client for the configured endpoint
    pub fn client(&self) -> CrmClient {
        let client = CrmClient::new(&self.api_url);
        match &self.api_token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }
}
