//! Ping a cluster with credentials from a shared-config profile.
//!
//! ```bash
//! cargo run --example ping_profile -- \
//!     --endpoint https://search-movies.us-east-1.es.amazonaws.com \
//!     --profile default
//! ```

use sigsearch::{SampleArgs, Step, connect, exit_on_error};

#[tokio::main]
async fn main() {
    sigsearch::init();
    exit_on_error(run().await);
}

async fn run() -> sigsearch::Result<()> {
    let args = SampleArgs::load()?;
    let (client, _) = connect(&args, args.profile_source()).await?;

    let mut out = std::io::stdout().lock();
    args.walkthrough()
        .run_step(Step::Ping, &client, &mut out)
        .await
}
