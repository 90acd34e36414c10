//! Create and delete a four-shard index, signed with literal keys.
//!
//! Use `--service aoss` against an OpenSearch Serverless collection.
//!
//! ```bash
//! cargo run --example create_index_explicit -- \
//!     --endpoint https://search-movies.us-east-1.es.amazonaws.com \
//!     --region us-east-1 \
//!     --access-key-id AKID... --secret-access-key ... --session-token ...
//! ```

use sigsearch::{SampleArgs, connect, create_and_delete_index, exit_on_error};

#[tokio::main]
async fn main() {
    sigsearch::init();
    exit_on_error(run().await);
}

async fn run() -> sigsearch::Result<()> {
    let args = SampleArgs::load()?;
    let (client, _) = connect(&args, args.explicit_source()?).await?;

    let mut out = std::io::stdout().lock();
    create_and_delete_index(&client, &args.index, 4, &mut out).await
}
