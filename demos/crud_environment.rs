//! Full walkthrough signed with credentials from the environment.
//!
//! Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and, for temporary
//! credentials, `AWS_SESSION_TOKEN`.
//!
//! ```bash
//! export AWS_ACCESS_KEY_ID=... AWS_SECRET_ACCESS_KEY=...
//! cargo run --example crud_environment -- \
//!     --endpoint https://search-movies.us-east-1.es.amazonaws.com \
//!     --region us-east-1
//! ```

use sigsearch::aws::{CredentialsSource, caller_identity};
use sigsearch::{SampleArgs, connect, exit_on_error};
use std::io::Write;

#[tokio::main]
async fn main() {
    sigsearch::init();
    exit_on_error(run().await);
}

async fn run() -> sigsearch::Result<()> {
    let args = SampleArgs::load()?;
    let (client, sdk_config) = connect(&args, CredentialsSource::Environment).await?;

    let mut out = std::io::stdout().lock();

    let identity = caller_identity(&sdk_config).await?;
    writeln!(
        out,
        "Signing as {} (account {})",
        identity.arn.as_deref().unwrap_or("unknown"),
        identity.account.as_deref().unwrap_or("unknown"),
    )?;

    args.walkthrough().run(&client, &mut out).await
}
