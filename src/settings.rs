//! Command line and environment settings shared by the sample programs.

use crate::error::{Result, SampleError};
use crate::walkthrough::{DEFAULT_DOCUMENT_ID, DEFAULT_INDEX, Walkthrough};
use clap::Parser;
use clap::error::ErrorKind;
use sigsearch_aws::{AwsConfig, CredentialsSource, SigningService};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Settings for connecting to a cluster and running the walkthrough.
///
/// Every flag falls back to a `SIGSEARCH_*` environment variable, and a
/// `.env` file in the working directory is loaded first.
#[derive(Debug, Clone, Parser)]
#[command(version, about = "Sign OpenSearch requests with AWS SigV4")]
pub struct SampleArgs {
    /// Cluster endpoint, e.g. https://search-domain.us-east-1.es.amazonaws.com
    #[arg(long, env = "SIGSEARCH_ENDPOINT")]
    pub endpoint: String,

    /// AWS region; falls back to the profile or AWS_REGION
    #[arg(long, env = "SIGSEARCH_REGION")]
    pub region: Option<String>,

    /// Shared config profile
    #[arg(long, env = "SIGSEARCH_PROFILE", default_value = "default")]
    pub profile: String,

    /// Signing service: es for managed domains, aoss for serverless
    #[arg(long, env = "SIGSEARCH_SERVICE", default_value = "es")]
    pub service: SigningService,

    /// Index used by the walkthrough
    #[arg(long, env = "SIGSEARCH_INDEX", default_value = DEFAULT_INDEX)]
    pub index: String,

    /// Document ID used by the walkthrough
    #[arg(long, env = "SIGSEARCH_DOCUMENT_ID", default_value = DEFAULT_DOCUMENT_ID)]
    pub document_id: String,

    #[command(flatten)]
    pub keys: ExplicitKeys,
}

/// Literal access keys, used only by the explicit-credentials sample.
#[derive(Clone, Default, clap::Args)]
pub struct ExplicitKeys {
    /// AWS access key ID
    #[arg(long, env = "SIGSEARCH_ACCESS_KEY_ID")]
    pub access_key_id: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "SIGSEARCH_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_access_key: Option<String>,

    /// AWS session token for temporary credentials
    #[arg(long, env = "SIGSEARCH_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,
}

impl fmt::Debug for ExplicitKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplicitKeys")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "** redacted **"))
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}

impl SampleArgs {
    /// Load `.env`, parse the process arguments and validate them.
    ///
    /// `--help` and `--version` print and exit as usual.
    pub fn load() -> Result<Self> {
        if let Some(path) = load_dotenv() {
            debug!(path = %path.display(), "Loaded .env file");
        }

        Self::try_load_from(std::env::args_os())
    }

    /// Parse and validate the given arguments.
    pub fn try_load_from<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let args = match Self::try_parse_from(args) {
            Ok(args) => args,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => return Err(SampleError::settings(e.to_string().trim_end())),
        };

        args.validate()?;
        Ok(args)
    }

    /// Check the endpoint and index name.
    pub fn validate(&self) -> Result<()> {
        validate_endpoint(&self.endpoint)?;
        validate_index_name(&self.index)?;

        if self.document_id.trim().is_empty() {
            return Err(SampleError::settings("document id must not be empty"));
        }

        Ok(())
    }

    /// AWS configuration for the given credentials source.
    pub fn aws_config(&self, credentials: CredentialsSource) -> AwsConfig {
        let mut builder = AwsConfig::builder()
            .credentials(credentials)
            .signing_service(self.service);

        if let Some(region) = &self.region {
            builder = builder.region(region.clone());
        }

        builder.build()
    }

    /// Credentials from the configured shared-config profile.
    pub fn profile_source(&self) -> CredentialsSource {
        CredentialsSource::Profile(self.profile.clone())
    }

    /// Credentials from the literal keys; both key parts are required.
    pub fn explicit_source(&self) -> Result<CredentialsSource> {
        let (Some(access_key_id), Some(secret_access_key)) =
            (&self.keys.access_key_id, &self.keys.secret_access_key)
        else {
            return Err(SampleError::settings(
                "--access-key-id and --secret-access-key are required",
            ));
        };

        Ok(CredentialsSource::Explicit {
            access_key_id: access_key_id.clone(),
            secret_access_key: secret_access_key.clone(),
            session_token: self.keys.session_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Walkthrough targeting the configured index and document.
    ///
    /// Serverless collections have no refresh API, so refreshing is
    /// disabled for `aoss`.
    pub fn walkthrough(&self) -> Walkthrough {
        Walkthrough::new(&self.index)
            .document_id(&self.document_id)
            .refresh(!self.service.is_serverless())
    }
}

/// Endpoints must be absolute `http` or `https` URLs with a host.
pub fn validate_endpoint(endpoint: &str) -> Result<Url> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(SampleError::settings("endpoint must not be empty"));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| SampleError::settings(format!("invalid endpoint '{}': {}", trimmed, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(SampleError::settings(format!(
            "endpoint scheme must be http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(SampleError::settings("endpoint has no host"));
    }

    Ok(url)
}

/// Load `.env` from the working directory or a parent.
///
/// Variables already set in the process keep their values, so loading twice
/// is harmless.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Longest index name the cluster accepts, in bytes.
pub const MAX_INDEX_NAME_BYTES: usize = 255;

/// Index names must be lowercase and must not start with `_`, `-` or `+`.
pub fn validate_index_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SampleError::settings("index name must not be empty"));
    }

    if name == "." || name == ".." {
        return Err(SampleError::settings(format!("index name '{}' is reserved", name)));
    }

    if name.len() > MAX_INDEX_NAME_BYTES {
        return Err(SampleError::settings(format!(
            "index name is {} bytes, the limit is {}",
            name.len(),
            MAX_INDEX_NAME_BYTES
        )));
    }

    if name.starts_with(['_', '-', '+']) {
        return Err(SampleError::settings(format!(
            "index name '{}' must not start with '_', '-' or '+'",
            name
        )));
    }

    if name.chars().any(|c| c.is_uppercase()) {
        return Err(SampleError::settings(format!("index name '{}' must be lowercase", name)));
    }

    if name.contains(['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':']) {
        return Err(SampleError::settings(format!(
            "index name '{}' contains a forbidden character",
            name
        )));
    }

    Ok(())
}
