//! OpenSearch client with AWS SigV4 request signing.
//!
//! This crate wraps the `opensearch` client with:
//! - A single-node transport that signs every request for `es` or `aoss`
//! - Document indexing, retrieval, update and deletion
//! - Index lifecycle management
//! - A small query DSL, including boosted `multi_match` fields
//!
//! # Example
//!
//! ```rust,no_run
//! use sigsearch_aws::AwsConfig;
//! use sigsearch_opensearch::{MultiMatchQuery, OpenSearchClient};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Movie {
//!     title: String,
//!     director: String,
//!     year: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let aws = AwsConfig::builder()
//!         .region("us-east-1")
//!         .profile("default")
//!         .build();
//!
//!     let client = OpenSearchClient::connect_aws(
//!         "https://search-movies.us-east-1.es.amazonaws.com",
//!         &aws,
//!     )
//!     .await?;
//!
//!     client.ping().await?;
//!
//!     let movie = Movie {
//!         title: "Moneyball".to_string(),
//!         director: "Bennett Miller".to_string(),
//!         year: "2011".to_string(),
//!     };
//!     client.index("movies", "1", &movie).await?;
//!
//!     let results: Vec<Movie> = client
//!         .search()
//!         .index("movies")
//!         .size(5)
//!         .query(MultiMatchQuery::new("miller").boosted_field("title", 2.0).field("director"))
//!         .execute()
//!         .await?;
//!
//!     println!("{} hits", results.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod client;
mod config;
mod document;
mod error;
mod index;
mod query;
mod response;
mod search;

pub use client::OpenSearchClient;
pub use config::OpenSearchConfig;
pub use document::{Document, DocumentMeta, DocumentWithMeta};
pub use error::{OpenSearchError, Result};
pub use index::{AppliedSettings, FieldType, IndexInfo, IndexManager, IndexSettings, Mapping};
pub use query::{BoolQuery, BoostedField, MatchQuery, MultiMatchQuery, Query, TermQuery};
pub use response::{AcknowledgedResponse, ClusterInfo, VersionInfo, WriteResponse};
pub use search::{Hit, SearchBuilder, SearchResult, SortOrder};

#[cfg(feature = "aws-auth")]
pub use config::AwsSigning;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Document, IndexSettings, MultiMatchQuery, OpenSearchClient, OpenSearchConfig,
        OpenSearchError, Query, Result, SearchResult,
    };

    #[cfg(feature = "aws-auth")]
    pub use crate::AwsSigning;
}

pub use opensearch::http::StatusCode;
