//! # sigsearch AWS
//!
//! AWS configuration for signing OpenSearch requests.
//!
//! A [`CredentialsSource`] picks one of the resolution strategies (named
//! profile, environment variables, explicit keys, or the SDK default chain),
//! [`AwsConfig::load`] turns it into an [`SdkConfig`](aws_config::SdkConfig),
//! and [`SigningService`] selects `es` or `aoss` as the SigV4 service name.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sigsearch_aws::{AwsConfig, verify_credentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AwsConfig::builder()
//!         .region("us-east-1")
//!         .profile("default")
//!         .build();
//!
//!     let sdk_config = config.load().await?;
//!     verify_credentials(&sdk_config).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod config;
mod credentials;
mod error;
mod service;

#[cfg(test)]
mod test_env;

pub use config::{AwsConfig, AwsConfigBuilder, CredentialsSource};
pub use credentials::verify_credentials;
pub use error::{AwsError, Result};
pub use service::SigningService;

#[cfg(feature = "sts")]
pub use credentials::{CallerIdentity, caller_identity};

// Re-export AWS types for convenience
pub use aws_config;
pub use aws_credential_types;
pub use aws_types;
