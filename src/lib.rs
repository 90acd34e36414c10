//! # sigsearch
//!
//! Sample programs that connect to an OpenSearch cluster with AWS
//! SigV4-signed requests and walk through the basic index and document
//! operations.
//!
//! The samples live in `demos/`:
//!
//! - `ping_profile` signs with a shared-config profile and pings the cluster
//! - `crud_environment` signs with environment credentials and runs the full
//!   ping, create, index, search, delete scenario
//! - `create_index_explicit` signs with literal keys and creates then deletes
//!   a four-shard index
//!
//! ```bash
//! SIGSEARCH_ENDPOINT=https://search-movies.us-east-1.es.amazonaws.com \
//!     cargo run --example crud_environment -- --region us-east-1
//! ```
//!
//! Each prints the responses it receives to stdout and, on the first
//! failure, prints `Error: <message>` and exits with status 1.

pub mod error;
pub mod logging;
pub mod settings;
pub mod walkthrough;

pub use error::{Result, SampleError};
pub use settings::{ExplicitKeys, SampleArgs};
pub use walkthrough::{Movie, Step, Walkthrough, create_and_delete_index};

pub use sigsearch_aws as aws;
pub use sigsearch_opensearch as opensearch;

/// Load `.env`, then install logging.
///
/// `.env` is read first so the `SIGSEARCH_LOG_*` variables it sets take
/// effect.
pub fn init() {
    let dotenv = settings::load_dotenv();
    logging::init();

    if let Some(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }
}

/// Connect to the configured endpoint with credentials from `source`.
///
/// Credentials are resolved once up front so a bad source fails here rather
/// than on the first signed request.
pub async fn connect(
    args: &SampleArgs,
    source: aws::CredentialsSource,
) -> Result<(opensearch::OpenSearchClient, aws::aws_config::SdkConfig)> {
    let aws_config = args.aws_config(source);
    let sdk_config = aws_config.load().await?;
    aws::verify_credentials(&sdk_config).await?;

    let signing = opensearch::AwsSigning::from_sdk_config(&sdk_config, args.service)?;
    let client = opensearch::OpenSearchClient::new(
        opensearch::OpenSearchConfig::new(args.endpoint.trim()).with_aws_signing(signing),
    )?;

    Ok((client, sdk_config))
}

/// Print `Error: <message>` and exit with status 1 when the sample failed.
pub fn exit_on_error(result: Result<()>) {
    if let Err(e) = result {
        tracing::error!(error = %e, "Sample failed");
        println!("Error: {}", e);
        std::process::exit(1);
    }
}
