//! AWS error types.

use thiserror::Error;

/// Result type for AWS operations.
pub type Result<T> = std::result::Result<T, AwsError>;

/// Errors raised while resolving AWS configuration and credentials.
#[derive(Debug, Error)]
pub enum AwsError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials could not be resolved or were rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Region not specified.
    #[error("AWS region not specified")]
    RegionNotSpecified,

    /// Unknown signing service identifier.
    #[error("Unknown signing service '{0}', expected 'es' or 'aoss'")]
    UnknownService(String),

    /// Service error.
    #[error("AWS service error: {0}")]
    Service(String),
}

impl AwsError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }
}
