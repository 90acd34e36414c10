//! Error types for OpenSearch operations.

use opensearch::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// OpenSearch error type.
#[derive(Error, Debug)]
pub enum OpenSearchError {
    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Authentication error (HTTP 401/403, usually a bad or mis-scoped signature).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Index not found.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Document not found.
    #[error("Document not found: {index}/{id}")]
    DocumentNotFound {
        /// Index name.
        index: String,
        /// Document ID.
        id: String,
    },

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Index already exists.
    #[error("Index already exists: {0}")]
    IndexExists(String),

    /// Timeout error.
    #[error("Operation timed out")]
    Timeout,

    /// Error reported by the cluster.
    #[error("OpenSearch error ({status}): {reason}")]
    Internal {
        /// HTTP status code.
        status: u16,
        /// Reason extracted from the response body.
        reason: String,
    },

    /// Client error from opensearch crate.
    #[error("Client error: {0}")]
    Client(#[from] opensearch::Error),

    /// AWS configuration or credentials error.
    #[cfg(feature = "aws-auth")]
    #[error(transparent)]
    Aws(#[from] sigsearch_aws::AwsError),
}

impl OpenSearchError {
    /// Map a non-success response to an error.
    pub(crate) fn from_response(status: StatusCode, body: &Value) -> Self {
        let reason = error_reason(body);

        match status.as_u16() {
            401 | 403 => OpenSearchError::Authentication(reason),
            408 | 504 => OpenSearchError::Timeout,
            code => OpenSearchError::Internal {
                status: code,
                reason,
            },
        }
    }

    /// Whether the failure may succeed if the same request is sent again.
    ///
    /// Nothing in this crate retries; callers decide.
    pub fn is_transient(&self) -> bool {
        match self {
            OpenSearchError::Connection(_) | OpenSearchError::Timeout => true,
            OpenSearchError::Internal { status, .. } => *status == 429 || *status >= 500,
            OpenSearchError::Client(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Extract a human readable reason from an error body.
///
/// OpenSearch reports `{"error": {"reason": ..}}`, while the AWS front door
/// answers signature failures with `{"message": ..}`.
pub(crate) fn error_reason(body: &Value) -> String {
    body.get("error")
        .and_then(|e| e.get("reason").or(Some(e)))
        .and_then(|r| r.as_str())
        .or_else(|| body.get("message").and_then(|m| m.as_str()))
        .or_else(|| body.get("Message").and_then(|m| m.as_str()))
        .or_else(|| body.as_str().filter(|s| !s.is_empty()))
        .unwrap_or("Unknown error")
        .to_string()
}

/// Result type alias for OpenSearch operations.
pub type Result<T> = std::result::Result<T, OpenSearchError>;
