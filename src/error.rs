//! Error types for the sample programs.

use crate::walkthrough::Step;
use sigsearch_aws::AwsError;
use sigsearch_opensearch::OpenSearchError;
use thiserror::Error;

/// Result type alias for sample operations.
pub type Result<T> = std::result::Result<T, SampleError>;

/// Anything that can stop a sample program.
#[derive(Debug, Error)]
pub enum SampleError {
    /// Invalid or missing settings.
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// A walkthrough step failed.
    #[error("{step} failed: {source}")]
    Step {
        /// The step that failed.
        step: Step,
        /// Underlying client error.
        #[source]
        source: OpenSearchError,
    },

    /// OpenSearch client error outside the walkthrough.
    #[error(transparent)]
    OpenSearch(#[from] OpenSearchError),

    /// AWS configuration or credentials error.
    #[error(transparent)]
    Aws(#[from] AwsError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A response could not be rendered.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SampleError {
    /// Create a settings error.
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings(message.into())
    }

    /// The walkthrough step that failed, if any.
    pub fn step(&self) -> Option<Step> {
        match self {
            SampleError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}
