//! Error types for the Caseflow client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the CRM API
///
/// The conflict / forbidden / not-found distinctions matter to callers:
/// each demands a different remedy (refetch and reapply, show a permission
/// message, give up), so they must never collapse into one generic failure.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The pipeline moved past the session's baseline version; another
    /// session saved first. Refetch and reapply; never retry as-is.
    #[error("version conflict: {message}")]
    VersionConflict {
        /// Detail from the API
        message: String,
    },

    /// The submission was rejected as malformed
    #[error("rejected by validation: {message}")]
    Validation {
        /// Detail from the API
        message: String,
    },

    /// The caller's role does not permit the operation
    #[error("forbidden: {message}")]
    Forbidden {
        /// Detail from the API
        message: String,
    },

    /// The target resource (pipeline or historical version) does not exist
    #[error("not found: {message}")]
    NotFound {
        /// Detail from the API
        message: String,
    },

    /// Any other non-success API response
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse a response body
    #[error("failed to parse response: {0}")]
    Parse(String),
}

impl ClientError {
    /// Check if this error is a stale-version conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Check if this error is a permission failure
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }

    /// Check if this error is a missing-resource failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a rejected submission
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Pulls the `error` field out of a JSON error body, falling back to the
/// raw text for non-JSON responses.
pub(crate) fn error_message(body: String) -> String {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => value
            .get("error")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or(body),
        Err(_) => body,
    }
}

/// Maps a non-success HTTP status and body to the error taxonomy.
pub(crate) fn classify_status(status: u16, message: String) -> ClientError {
    match status {
        400 | 422 => ClientError::Validation { message },
        401 | 403 => ClientError::Forbidden { message },
        404 => ClientError::NotFound { message },
        409 => ClientError::VersionConflict { message },
        _ => ClientError::Api { status, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(classify_status(409, "stale".into()).is_conflict());
        assert!(classify_status(403, "role".into()).is_forbidden());
        assert!(classify_status(401, "token".into()).is_forbidden());
        assert!(classify_status(404, "gone".into()).is_not_found());
        assert!(classify_status(422, "bad list".into()).is_validation());
        assert!(classify_status(400, "bad list".into()).is_validation());
    }

    #[test]
    fn test_other_statuses_stay_generic() {
        let err = classify_status(500, "boom".into());
        assert!(matches!(err, ClientError::Api { status: 500, .. }));
        assert!(!err.is_conflict() && !err.is_forbidden() && !err.is_not_found());
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"error": "expected version 3"}"#.to_string()),
            "expected version 3"
        );
        assert_eq!(error_message("plain text".to_string()), "plain text");
        assert_eq!(
            error_message(r#"{"detail": "other shape"}"#.to_string()),
            r#"{"detail": "other shape"}"#
        );
    }

    #[test]
    fn test_conflict_message_renders_detail() {
        let err = classify_status(409, "expected version 3, current is 4".into());
        assert_eq!(
            err.to_string(),
            "version conflict: expected version 3, current is 4"
        );
    }
}
