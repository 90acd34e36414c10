//! OpenSearch client configuration.

use std::time::Duration;

#[cfg(feature = "aws-auth")]
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
#[cfg(feature = "aws-auth")]
use aws_types::{SdkConfig, region::Region};
#[cfg(feature = "aws-auth")]
use sigsearch_aws::{AwsError, SigningService};

/// OpenSearch client configuration.
#[derive(Debug, Clone)]
pub struct OpenSearchConfig {
    /// Endpoint URL, e.g. `https://search-domain.us-east-1.es.amazonaws.com`.
    pub url: String,
    /// Basic auth username.
    pub username: Option<String>,
    /// Basic auth password.
    pub password: Option<String>,
    /// Request timeout.
    pub request_timeout: Duration,
    /// SigV4 signing material (for AWS OpenSearch Service and Serverless).
    #[cfg(feature = "aws-auth")]
    pub aws: Option<AwsSigning>,
}

impl OpenSearchConfig {
    /// Create a new configuration for a single endpoint.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            request_timeout: Duration::from_secs(30),
            #[cfg(feature = "aws-auth")]
            aws: None,
        }
    }

    /// Set basic authentication credentials.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sign every request with SigV4.
    #[cfg(feature = "aws-auth")]
    pub fn with_aws_signing(mut self, signing: AwsSigning) -> Self {
        self.aws = Some(signing);
        self
    }

    /// Whether requests will carry a SigV4 signature.
    pub fn is_signed(&self) -> bool {
        #[cfg(feature = "aws-auth")]
        {
            self.aws.is_some()
        }
        #[cfg(not(feature = "aws-auth"))]
        {
            false
        }
    }
}

/// Credentials, region and service name used to sign requests.
#[cfg(feature = "aws-auth")]
#[derive(Clone)]
pub struct AwsSigning {
    /// Credentials provider consulted for every request.
    pub credentials: SharedCredentialsProvider,
    /// Region the signature is scoped to.
    pub region: Region,
    /// Service the signature is scoped to.
    pub service: SigningService,
}

#[cfg(feature = "aws-auth")]
impl AwsSigning {
    /// Create signing material from any credentials provider.
    pub fn new(
        credentials: impl ProvideCredentials + 'static,
        region: impl Into<String>,
        service: SigningService,
    ) -> Self {
        Self {
            credentials: SharedCredentialsProvider::new(credentials),
            region: Region::new(region.into()),
            service,
        }
    }

    /// Take the credentials provider and region from a loaded SDK config.
    pub fn from_sdk_config(
        sdk_config: &SdkConfig,
        service: SigningService,
    ) -> Result<Self, AwsError> {
        let credentials = sdk_config
            .credentials_provider()
            .ok_or_else(|| AwsError::auth("no credentials provider configured"))?;
        let region = sdk_config
            .region()
            .cloned()
            .ok_or(AwsError::RegionNotSpecified)?;

        Ok(Self {
            credentials,
            region,
            service,
        })
    }
}

#[cfg(feature = "aws-auth")]
impl std::fmt::Debug for AwsSigning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSigning")
            .field("region", &self.region)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OpenSearchConfig::new("http://localhost:9200");
        assert_eq!(config.url, "http://localhost:9200");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.username.is_none());
        assert!(!config.is_signed());
    }

    #[test]
    fn test_basic_auth() {
        let config = OpenSearchConfig::new("https://localhost:9200")
            .with_basic_auth("admin", "admin")
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.password.as_deref(), Some("admin"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[cfg(feature = "aws-auth")]
    #[test]
    fn test_aws_signing() {
        let credentials =
            aws_credential_types::Credentials::new("AKID", "secret", None, None, "test");
        let config = OpenSearchConfig::new("https://example.us-east-1.aoss.amazonaws.com")
            .with_aws_signing(AwsSigning::new(
                credentials,
                "us-east-1",
                SigningService::Serverless,
            ));

        assert!(config.is_signed());
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("us-east-1"));
        assert!(!rendered.contains("secret"));
    }

    #[cfg(feature = "aws-auth")]
    #[test]
    fn test_signing_from_sdk_config_requires_region() {
        let credentials =
            aws_credential_types::Credentials::new("AKID", "secret", None, None, "test");
        let sdk_config = SdkConfig::builder()
            .credentials_provider(SharedCredentialsProvider::new(credentials))
            .build();

        let result = AwsSigning::from_sdk_config(&sdk_config, SigningService::OpenSearch);
        assert!(matches!(result, Err(AwsError::RegionNotSpecified)));
    }
}
