//! The canned ping, create, index, search, delete scenario.

use crate::error::{Result, SampleError};
use serde::{Deserialize, Serialize};
use sigsearch_opensearch::{IndexSettings, MultiMatchQuery, OpenSearchClient, OpenSearchError};
use std::fmt;
use std::io::Write;
use tracing::{debug, info};

/// Index the samples create and remove.
pub const DEFAULT_INDEX: &str = "rust-test-index1";

/// ID of the sample document.
pub const DEFAULT_DOCUMENT_ID: &str = "1";

/// The sample document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Title.
    pub title: String,
    /// Director.
    pub director: String,
    /// Release year, kept as a string.
    pub year: String,
}

impl Movie {
    /// The document every sample indexes.
    pub fn moneyball() -> Self {
        Self {
            title: "Moneyball".to_string(),
            director: "Bennett Miller".to_string(),
            year: "2011".to_string(),
        }
    }
}

/// One step of the scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Check the endpoint answers a signed request.
    Ping,
    /// Create the index with the configured shard layout.
    CreateIndex,
    /// Index the sample document.
    IndexDocument,
    /// Run the multi_match search.
    Search,
    /// Delete the sample document.
    DeleteDocument,
    /// Delete the index.
    DeleteIndex,
}

impl Step {
    /// All steps, in order.
    pub const ALL: [Step; 6] = [
        Step::Ping,
        Step::CreateIndex,
        Step::IndexDocument,
        Step::Search,
        Step::DeleteDocument,
        Step::DeleteIndex,
    ];

    /// Heading printed before the step's response.
    pub fn heading(&self) -> &'static str {
        match self {
            Step::Ping => "Pinging the cluster",
            Step::CreateIndex => "Creating index",
            Step::IndexDocument => "Inserting a document",
            Step::Search => "Searching for a document",
            Step::DeleteDocument => "Deleting a document",
            Step::DeleteIndex => "Deleting the index",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Scenario parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Walkthrough {
    /// Target index.
    pub index: String,
    /// ID the document is stored under.
    pub document_id: String,
    /// Primary shards for the new index.
    pub shards: u32,
    /// Replicas for the new index; `None` keeps the cluster default.
    pub replicas: Option<u32>,
    /// Document to index.
    pub document: Movie,
    /// Text searched for.
    pub search_text: String,
    /// Maximum hits returned.
    pub search_size: u64,
    /// Refresh the index after writing so the search sees the document.
    pub refresh: bool,
}

impl Default for Walkthrough {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_string(),
            document_id: DEFAULT_DOCUMENT_ID.to_string(),
            shards: 1,
            replicas: Some(2),
            document: Movie::moneyball(),
            search_text: "miller".to_string(),
            search_size: 5,
            refresh: true,
        }
    }
}

impl Walkthrough {
    /// Scenario against the given index with default parameters.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            ..Self::default()
        }
    }

    /// Set the document ID.
    pub fn document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = id.into();
        self
    }

    /// Set the primary shard count.
    pub fn shards(mut self, shards: u32) -> Self {
        self.shards = shards;
        self
    }

    /// Set the replica count.
    pub fn replicas(mut self, replicas: Option<u32>) -> Self {
        self.replicas = replicas;
        self
    }

    /// Enable or disable the refresh after indexing.
    pub fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Settings for the create-index request.
    pub fn index_settings(&self) -> IndexSettings {
        let settings = IndexSettings::new().shards(self.shards);
        match self.replicas {
            Some(replicas) => settings.replicas(replicas),
            None => settings,
        }
    }

    /// `{"multi_match": {"query": "miller", "fields": ["title^2", "director"]}}`
    pub fn search_query(&self) -> MultiMatchQuery {
        MultiMatchQuery::new(&self.search_text)
            .boosted_field("title", 2.0)
            .field("director")
    }

    /// Run every step in order, stopping at the first failure.
    pub async fn run<W: Write>(&self, client: &OpenSearchClient, out: &mut W) -> Result<()> {
        self.run_steps(&Step::ALL, client, out).await
    }

    /// Run the given steps in order, stopping at the first failure.
    pub async fn run_steps<W: Write>(
        &self,
        steps: &[Step],
        client: &OpenSearchClient,
        out: &mut W,
    ) -> Result<()> {
        info!(index = %self.index, steps = steps.len(), "Starting walkthrough");

        for &step in steps {
            self.run_step(step, client, out).await?;
        }

        Ok(())
    }

    /// Run a single step, printing its heading and response.
    pub async fn run_step<W: Write>(
        &self,
        step: Step,
        client: &OpenSearchClient,
        out: &mut W,
    ) -> Result<()> {
        debug!(%step, "Running step");

        let response = self
            .execute(step, client)
            .await
            .map_err(|source| SampleError::Step { step, source })?;

        writeln!(out, "{}", step.heading())?;
        writeln!(out, "{}", response)?;

        Ok(())
    }

    async fn execute(
        &self,
        step: Step,
        client: &OpenSearchClient,
    ) -> std::result::Result<String, OpenSearchError> {
        let rendered = match step {
            Step::Ping => client.ping().await?.to_string(),
            Step::CreateIndex => {
                let created = client.indices().create(&self.index, &self.index_settings()).await?;
                serde_json::to_string_pretty(&created)?
            }
            Step::IndexDocument => {
                let written = client.index(&self.index, &self.document_id, &self.document).await?;
                if self.refresh {
                    client.refresh(&self.index).await?;
                }
                serde_json::to_string_pretty(&written)?
            }
            Step::Search => {
                let results = client
                    .search()
                    .index(&self.index)
                    .size(self.search_size)
                    .query(self.search_query())
                    .execute_with_meta::<Movie>()
                    .await?;
                serde_json::to_string_pretty(&results)?
            }
            Step::DeleteDocument => {
                let deleted = client
                    .delete(&self.index, &self.document_id)
                    .await?
                    .ok_or_else(|| OpenSearchError::DocumentNotFound {
                        index: self.index.clone(),
                        id: self.document_id.clone(),
                    })?;
                serde_json::to_string_pretty(&deleted)?
            }
            Step::DeleteIndex => {
                let deleted = client.indices().delete(&self.index).await?;
                serde_json::to_string_pretty(&deleted)?
            }
        };

        Ok(rendered)
    }
}

/// Create `index` with `shards` primary shards, then delete it.
///
/// Prints `created index: <name>` and `deleted index: <acknowledged>`.
pub async fn create_and_delete_index<W: Write>(
    client: &OpenSearchClient,
    index: &str,
    shards: u32,
    out: &mut W,
) -> Result<()> {
    info!(index, shards, "Creating and deleting index");

    let indices = client.indices();

    let created = indices
        .create(index, &IndexSettings::new().shards(shards))
        .await
        .map_err(|source| SampleError::Step {
            step: Step::CreateIndex,
            source,
        })?;
    writeln!(out, "created index: {}", created.index.as_deref().unwrap_or(index))?;

    let deleted = indices
        .delete(index)
        .await
        .map_err(|source| SampleError::Step {
            step: Step::DeleteIndex,
            source,
        })?;
    writeln!(out, "deleted index: {}", deleted.acknowledged)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let walkthrough = Walkthrough::default();

        assert_eq!(walkthrough.index, "rust-test-index1");
        assert_eq!(walkthrough.document_id, "1");
        assert_eq!(walkthrough.shards, 1);
        assert_eq!(walkthrough.replicas, Some(2));
        assert!(walkthrough.refresh);
    }

    #[test]
    fn test_moneyball_document() {
        assert_eq!(
            serde_json::to_value(Movie::moneyball()).unwrap(),
            json!({ "title": "Moneyball", "director": "Bennett Miller", "year": "2011" })
        );
    }

    #[test]
    fn test_index_settings() {
        let body = Walkthrough::default().index_settings().to_json();
        assert_eq!(
            body,
            json!({ "settings": { "index": { "number_of_shards": 1, "number_of_replicas": 2 } } })
        );

        let body = Walkthrough::new("movies").shards(4).replicas(None).index_settings().to_json();
        assert_eq!(body, json!({ "settings": { "index": { "number_of_shards": 4 } } }));
    }

    #[test]
    fn test_search_query() {
        let query = sigsearch_opensearch::Query::from(Walkthrough::default().search_query());
        assert_eq!(
            query.to_json(),
            json!({ "multi_match": { "query": "miller", "fields": ["title^2", "director"] } })
        );
    }

    #[test]
    fn test_step_order_and_headings() {
        assert_eq!(Step::ALL.first(), Some(&Step::Ping));
        assert_eq!(Step::ALL.last(), Some(&Step::DeleteIndex));
        assert_eq!(Step::Search.to_string(), "Searching for a document");
    }
}
