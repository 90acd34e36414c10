//! Search builder and results.

use crate::{
    document::{Document, DocumentMeta, DocumentWithMeta},
    error::{OpenSearchError, Result, error_reason},
    query::Query,
    response::read_body,
};
use opensearch::OpenSearch;
use opensearch::http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

/// Search builder for constructing and executing searches.
#[derive(Clone)]
pub struct SearchBuilder {
    client: Arc<OpenSearch>,
    indices: Vec<String>,
    query: Option<Value>,
    from: Option<u64>,
    size: Option<u64>,
    sort: Vec<Value>,
    source_includes: Option<Vec<String>>,
    track_total_hits: Option<bool>,
}

impl SearchBuilder {
    /// Create a new search builder.
    pub(crate) fn new(client: Arc<OpenSearch>) -> Self {
        Self {
            client,
            indices: Vec::new(),
            query: None,
            from: None,
            size: None,
            sort: Vec::new(),
            source_includes: None,
            track_total_hits: None,
        }
    }

    /// Add an index to search.
    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.indices.push(index.into());
        self
    }

    /// Set the indices to search.
    pub fn indices(mut self, indices: Vec<String>) -> Self {
        self.indices = indices;
        self
    }

    /// Set the query.
    pub fn query(mut self, query: impl Into<Query>) -> Self {
        self.query = Some(query.into().to_json());
        self
    }

    /// Set a raw JSON query.
    pub fn query_json(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Set pagination offset.
    pub fn from(mut self, from: u64) -> Self {
        self.from = Some(from);
        self
    }

    /// Set result size limit.
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Add sort field.
    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        let field: String = field.into();
        self.sort.push(json!({ field: { "order": order.as_str() } }));
        self
    }

    /// Include only specific fields in the response.
    pub fn source_includes(mut self, fields: Vec<String>) -> Self {
        self.source_includes = Some(fields);
        self
    }

    /// Track total hits accurately (for counts > 10000).
    pub fn track_total_hits(mut self, track: bool) -> Self {
        self.track_total_hits = Some(track);
        self
    }

    /// Build the search body.
    pub fn build_body(&self) -> Value {
        let mut body = serde_json::Map::new();

        if let Some(size) = self.size {
            body.insert("size".to_string(), json!(size));
        }

        if let Some(from) = self.from {
            body.insert("from".to_string(), json!(from));
        }

        if let Some(query) = &self.query {
            body.insert("query".to_string(), query.clone());
        }

        if !self.sort.is_empty() {
            body.insert("sort".to_string(), Value::Array(self.sort.clone()));
        }

        if let Some(includes) = &self.source_includes {
            body.insert("_source".to_string(), json!({ "includes": includes }));
        }

        if let Some(track) = self.track_total_hits {
            body.insert("track_total_hits".to_string(), json!(track));
        }

        Value::Object(body)
    }

    fn index_refs(&self) -> Result<Vec<&str>> {
        if self.indices.is_empty() {
            return Err(OpenSearchError::Validation(
                "search needs at least one index".to_string(),
            ));
        }
        Ok(self.indices.iter().map(String::as_str).collect())
    }

    /// Execute the search and return documents.
    pub async fn execute<T: Document>(self) -> Result<Vec<T>> {
        let results = self.execute_with_meta::<T>().await?;
        Ok(results.hits.into_iter().map(|h| h.doc).collect())
    }

    /// Execute the search and return documents with metadata.
    pub async fn execute_with_meta<T: Document>(self) -> Result<SearchResult<T>> {
        let index_refs = self.index_refs()?;
        let body = self.build_body();

        debug!(indices = ?index_refs, "Searching");

        let response = self
            .client
            .search(opensearch::SearchParts::Index(&index_refs))
            .body(body)
            .send()
            .await?;

        let (status, result) = read_body(response).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(OpenSearchError::IndexNotFound(index_refs.join(",")));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(OpenSearchError::from_response(status, &result));
        }

        if !status.is_success() {
            return Err(OpenSearchError::Query(error_reason(&result)));
        }

        SearchResult::from_body(&result)
    }

    /// Count matching documents.
    pub async fn count(self) -> Result<u64> {
        let index_refs = self.index_refs()?;

        let body = match &self.query {
            Some(query) => json!({ "query": query }),
            None => json!({}),
        };

        let response = self
            .client
            .count(opensearch::CountParts::Index(&index_refs))
            .body(body)
            .send()
            .await?;

        let (status, result) = read_body(response).await?;

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &result));
        }

        Ok(result["count"].as_u64().unwrap_or(0))
    }
}

/// Sort order.
#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl SortOrder {
    fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Search result.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<T> {
    /// Total matching documents.
    pub total: u64,
    /// Total relation ("eq" or "gte").
    pub total_relation: String,
    /// Maximum score.
    pub max_score: Option<f64>,
    /// Matching documents with metadata, in rank order.
    pub hits: Vec<Hit<T>>,
    /// Time taken in milliseconds.
    pub took_ms: u64,
}

impl<T: Document> SearchResult<T> {
    fn from_body(result: &Value) -> Result<Self> {
        let mut hits = Vec::new();

        if let Some(hits_arr) = result["hits"]["hits"].as_array() {
            for hit in hits_arr {
                let source = hit
                    .get("_source")
                    .ok_or_else(|| OpenSearchError::Query("hit without _source".to_string()))?;

                hits.push(Hit {
                    doc: serde_json::from_value(source.clone())?,
                    meta: DocumentMeta {
                        id: hit["_id"].as_str().unwrap_or("").to_string(),
                        index: hit["_index"].as_str().unwrap_or("").to_string(),
                        score: hit["_score"].as_f64(),
                        version: hit["_version"].as_i64(),
                    },
                });
            }
        }

        // Older clusters report a bare number instead of {value, relation}.
        let total = &result["hits"]["total"];
        let (total, total_relation) = match total.as_u64() {
            Some(n) => (n, "eq".to_string()),
            None => (
                total["value"].as_u64().unwrap_or(0),
                total["relation"].as_str().unwrap_or("eq").to_string(),
            ),
        };

        Ok(SearchResult {
            total,
            total_relation,
            max_score: result["hits"]["max_score"].as_f64(),
            hits,
            took_ms: result["took"].as_u64().unwrap_or(0),
        })
    }
}

/// A search hit.
pub type Hit<T> = DocumentWithMeta<T>;
