//! Document trait and helpers.

use serde::{Serialize, de::DeserializeOwned};

/// Anything that can be stored as a document `_source`.
///
/// Implemented for every serde round-trippable type, so a plain
/// `#[derive(Serialize, Deserialize)]` struct is enough:
///
/// ```rust
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// struct Movie {
///     title: String,
///     director: String,
///     year: String,
/// }
///
/// fn assert_document<T: sigsearch_opensearch::Document>() {}
/// assert_document::<Movie>();
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Send + Sync {}

/// Document metadata returned from search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMeta {
    /// Document ID.
    pub id: String,
    /// Index name.
    pub index: String,
    /// Document score (relevance).
    pub score: Option<f64>,
    /// Document version, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

/// A document with its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithMeta<T> {
    /// The document data.
    pub doc: T,
    /// Document metadata.
    pub meta: DocumentMeta,
}
