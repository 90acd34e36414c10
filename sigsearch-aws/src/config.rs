//! AWS configuration.

use crate::error::{AwsError, Result};
use crate::service::SigningService;
use aws_config::environment::EnvironmentVariableCredentialsProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Provider name attached to credentials built from explicit keys.
const EXPLICIT_PROVIDER: &str = "SigsearchExplicit";

/// Credentials source for AWS authentication.
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CredentialsSource {
    /// Use environment variables (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY).
    Environment,
    /// Use a named profile from the shared config files.
    Profile(String),
    /// Use explicit credentials.
    Explicit {
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Session token for temporary credentials.
        session_token: Option<String>,
    },
    /// Auto-detect credentials (default AWS SDK behavior).
    #[default]
    Auto,
}

impl CredentialsSource {
    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CredentialsSource::Environment => "environment",
            CredentialsSource::Profile(_) => "profile",
            CredentialsSource::Explicit { .. } => "explicit",
            CredentialsSource::Auto => "auto",
        }
    }
}

impl fmt::Debug for CredentialsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsSource::Environment => f.write_str("Environment"),
            CredentialsSource::Profile(name) => f.debug_tuple("Profile").field(name).finish(),
            CredentialsSource::Explicit {
                access_key_id,
                session_token,
                ..
            } => f
                .debug_struct("Explicit")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"** redacted **")
                .field("session_token", &session_token.as_ref().map(|_| "** redacted **"))
                .finish(),
            CredentialsSource::Auto => f.write_str("Auto"),
        }
    }
}

/// AWS configuration used to sign OpenSearch requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsConfig {
    /// AWS region.
    pub region: Option<String>,
    /// Credentials source.
    #[serde(default)]
    pub credentials: CredentialsSource,
    /// Custom endpoint URL for AWS service calls (LocalStack etc.).
    pub endpoint_url: Option<String>,
    /// Service name requests are signed for.
    #[serde(default)]
    pub signing_service: SigningService,
}

impl AwsConfig {
    /// Create a new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder.
    pub fn builder() -> AwsConfigBuilder {
        AwsConfigBuilder::new()
    }

    /// Start a builder seeded from the standard AWS environment variables.
    pub fn from_env() -> AwsConfigBuilder {
        let mut builder = AwsConfigBuilder::new();

        if let Ok(region) = std::env::var("AWS_REGION") {
            builder = builder.region(region);
        } else if let Ok(region) = std::env::var("AWS_DEFAULT_REGION") {
            builder = builder.region(region);
        }

        if let Ok(endpoint) = std::env::var("AWS_ENDPOINT_URL") {
            builder = builder.endpoint_url(endpoint);
        }

        builder
    }

    /// Check the configuration before touching the SDK.
    pub fn validate(&self) -> Result<()> {
        if let Some(region) = &self.region {
            if region.trim().is_empty() {
                return Err(AwsError::config("region must not be empty"));
            }
        }

        match &self.credentials {
            CredentialsSource::Profile(name) if name.trim().is_empty() => {
                Err(AwsError::config("profile name must not be empty"))
            }
            CredentialsSource::Explicit {
                access_key_id,
                secret_access_key,
                ..
            } if access_key_id.is_empty() || secret_access_key.is_empty() => Err(
                AwsError::config("explicit credentials need an access key id and a secret"),
            ),
            _ => Ok(()),
        }
    }

    /// Resolve the SDK configuration for the selected credentials source.
    ///
    /// Credentials themselves are resolved lazily by the SDK on first use;
    /// call [`verify_credentials`](crate::verify_credentials) to fail early.
    pub async fn load(&self) -> Result<SdkConfig> {
        self.validate()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        loader = match &self.credentials {
            CredentialsSource::Auto => loader,
            CredentialsSource::Profile(name) => loader.profile_name(name),
            CredentialsSource::Environment => {
                loader.credentials_provider(EnvironmentVariableCredentialsProvider::new())
            }
            CredentialsSource::Explicit {
                access_key_id,
                secret_access_key,
                session_token,
            } => loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                session_token.clone(),
                None,
                EXPLICIT_PROVIDER,
            )),
        };

        let sdk_config = loader.load().await;

        let region = sdk_config
            .region()
            .ok_or(AwsError::RegionNotSpecified)?;

        info!(
            region = %region,
            credentials = self.credentials.kind(),
            service = %self.signing_service,
            "Loaded AWS configuration"
        );
        debug!(credentials = ?self.credentials, "Credentials source");

        Ok(sdk_config)
    }
}

/// Builder for AWS configuration.
#[derive(Default)]
pub struct AwsConfigBuilder {
    config: AwsConfig,
}

impl AwsConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.region = Some(region.into());
        self
    }

    /// Set the credentials source.
    pub fn credentials(mut self, credentials: CredentialsSource) -> Self {
        self.config.credentials = credentials;
        self
    }

    /// Use explicit credentials.
    pub fn explicit_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: Option<String>,
    ) -> Self {
        self.config.credentials = CredentialsSource::Explicit {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token,
        };
        self
    }

    /// Use a named profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config.credentials = CredentialsSource::Profile(profile.into());
        self
    }

    /// Read keys from the environment only.
    pub fn environment(mut self) -> Self {
        self.config.credentials = CredentialsSource::Environment;
        self
    }

    /// Set a custom endpoint URL for AWS service calls.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint_url = Some(url.into());
        self
    }

    /// Set the signing service.
    pub fn signing_service(mut self, service: SigningService) -> Self {
        self.config.signing_service = service;
        self
    }

    /// Sign for OpenSearch Serverless (`aoss`).
    pub fn serverless(self) -> Self {
        self.signing_service(SigningService::Serverless)
    }

    /// Build the configuration.
    pub fn build(self) -> AwsConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env::EnvGuard;

    #[test]
    fn test_builder() {
        let config = AwsConfig::builder()
            .region("eu-west-1")
            .profile("staging")
            .serverless()
            .build();

        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.credentials, CredentialsSource::Profile("staging".into()));
        assert_eq!(config.signing_service, SigningService::Serverless);
    }

    #[test]
    fn test_default_is_auto() {
        let config = AwsConfig::new();
        assert_eq!(config.credentials, CredentialsSource::Auto);
        assert_eq!(config.signing_service, SigningService::OpenSearch);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_explicit_keys() {
        let config = AwsConfig::builder()
            .region("us-east-1")
            .explicit_credentials("", "secret", None)
            .build();

        assert!(matches!(config.validate(), Err(AwsError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_blank_profile() {
        let config = AwsConfig::builder().profile("  ").build();
        assert!(matches!(config.validate(), Err(AwsError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let source = CredentialsSource::Explicit {
            access_key_id: "AKIDEXAMPLE".into(),
            secret_access_key: "wJalrXUtnFEMI".into(),
            session_token: Some("token-value".into()),
        };

        let rendered = format!("{:?}", source);
        assert!(rendered.contains("AKIDEXAMPLE"));
        assert!(!rendered.contains("wJalrXUtnFEMI"));
        assert!(!rendered.contains("token-value"));
    }

    #[test]
    fn test_serde_round_trip_of_profile_source() {
        let config = AwsConfig::builder().region("us-east-1").profile("default").build();
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["credentials"]["profile"], "default");
        assert_eq!(json["signing_service"], "es");
    }

    #[tokio::test]
    async fn test_load_explicit_credentials() {
        let config = AwsConfig::builder()
            .region("us-east-1")
            .explicit_credentials("AKIDEXAMPLE", "secret", Some("session".into()))
            .build();

        let sdk_config = config.load().await.unwrap();
        assert_eq!(sdk_config.region().unwrap().as_ref(), "us-east-1");
        assert!(sdk_config.credentials_provider().is_some());
    }

    #[test]
    fn test_from_env_prefers_aws_region() {
        let _env = EnvGuard::new(&[
            ("AWS_REGION", Some("us-west-2")),
            ("AWS_DEFAULT_REGION", Some("eu-central-1")),
            ("AWS_ENDPOINT_URL", Some("http://localhost:4566")),
        ]);

        let config = AwsConfig::from_env().build();
        assert_eq!(config.region.as_deref(), Some("us-west-2"));
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(config.credentials, CredentialsSource::Auto);
    }

    #[test]
    fn test_from_env_falls_back_to_default_region() {
        let _env = EnvGuard::new(&[
            ("AWS_REGION", None),
            ("AWS_DEFAULT_REGION", Some("eu-central-1")),
            ("AWS_ENDPOINT_URL", None),
        ]);

        let config = AwsConfig::from_env().profile("staging").build();
        assert_eq!(config.region.as_deref(), Some("eu-central-1"));
        assert_eq!(config.endpoint_url, None);
        assert_eq!(config.credentials, CredentialsSource::Profile("staging".into()));
    }

    #[test]
    fn test_from_env_without_region() {
        let _env = EnvGuard::new(&[("AWS_REGION", None), ("AWS_DEFAULT_REGION", None)]);
        assert_eq!(AwsConfig::from_env().build().region, None);
    }
}
