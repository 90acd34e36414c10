//! Eager credential checks.

use crate::error::{AwsError, Result};
use aws_config::SdkConfig;
use aws_credential_types::Credentials;
use aws_credential_types::provider::ProvideCredentials;
use tracing::debug;

/// Resolve credentials once so a misconfigured source fails before the
/// first signed request.
pub async fn verify_credentials(sdk_config: &SdkConfig) -> Result<Credentials> {
    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| AwsError::auth("no credentials provider configured"))?;

    let credentials = provider
        .provide_credentials()
        .await
        .map_err(|e| AwsError::auth(e.to_string()))?;

    debug!(
        access_key_id = credentials.access_key_id(),
        temporary = credentials.session_token().is_some(),
        "Resolved AWS credentials"
    );

    Ok(credentials)
}

/// The principal the resolved credentials belong to.
#[cfg(feature = "sts")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// AWS account ID.
    pub account: Option<String>,
    /// ARN of the calling principal.
    pub arn: Option<String>,
    /// Unique identifier of the calling principal.
    pub user_id: Option<String>,
}

/// Ask STS who the resolved credentials belong to.
#[cfg(feature = "sts")]
pub async fn caller_identity(sdk_config: &SdkConfig) -> Result<CallerIdentity> {
    let client = aws_sdk_sts::Client::new(sdk_config);

    let output = client
        .get_caller_identity()
        .send()
        .await
        .map_err(|e| AwsError::Service(aws_sdk_sts::error::DisplayErrorContext(&e).to_string()))?;

    Ok(CallerIdentity {
        account: output.account().map(str::to_string),
        arn: output.arn().map(str::to_string),
        user_id: output.user_id().map(str::to_string),
    })
}
