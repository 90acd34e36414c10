//! Index management for OpenSearch.

use crate::error::{OpenSearchError, Result};
use crate::response::{AcknowledgedResponse, read_body};
use opensearch::OpenSearch;
use opensearch::http::StatusCode;
use opensearch::indices::{
    IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesGetParts,
    IndicesGetSettingsParts,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Index manager for creating and managing indices.
#[derive(Clone)]
pub struct IndexManager {
    client: Arc<OpenSearch>,
}

impl IndexManager {
    /// Create a new index manager.
    pub(crate) fn new(client: Arc<OpenSearch>) -> Self {
        Self { client }
    }

    /// Create a new index.
    pub async fn create(
        &self,
        name: &str,
        settings: &IndexSettings,
    ) -> Result<AcknowledgedResponse> {
        info!(index = name, "Creating index");

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(name))
            .body(settings.to_json())
            .send()
            .await?;

        let (status, body) = read_body(response).await?;

        if status == StatusCode::BAD_REQUEST
            && body["error"]["type"].as_str() == Some("resource_already_exists_exception")
        {
            return Err(OpenSearchError::IndexExists(name.to_string()));
        }

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        Ok(serde_json::from_value(body)?)
    }

    /// Delete an index.
    pub async fn delete(&self, name: &str) -> Result<AcknowledgedResponse> {
        info!(index = name, "Deleting index");

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[name]))
            .send()
            .await?;

        let (status, body) = read_body(response).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(OpenSearchError::IndexNotFound(name.to_string()));
        }

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        Ok(serde_json::from_value(body)?)
    }

    /// Check if an index exists.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        debug!(index = name, "Checking if index exists");

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await?;

        let status = response.status_code();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(OpenSearchError::from_response(status, &Value::Null))
        }
    }

    /// Get index settings and mappings.
    pub async fn get(&self, name: &str) -> Result<Value> {
        debug!(index = name, "Getting index");

        let response = self
            .client
            .indices()
            .get(IndicesGetParts::Index(&[name]))
            .send()
            .await?;

        let (status, body) = read_body(response).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(OpenSearchError::IndexNotFound(name.to_string()));
        }

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        Ok(body)
    }

    /// Read back the shard and replica counts the cluster applied.
    pub async fn settings(&self, name: &str) -> Result<AppliedSettings> {
        debug!(index = name, "Getting index settings");

        let response = self
            .client
            .indices()
            .get_settings(IndicesGetSettingsParts::Index(&[name]))
            .send()
            .await?;

        let (status, body) = read_body(response).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(OpenSearchError::IndexNotFound(name.to_string()));
        }

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        AppliedSettings::from_body(name, &body)
    }

    /// List all indices.
    pub async fn list(&self) -> Result<Vec<IndexInfo>> {
        let response = self
            .client
            .cat()
            .indices(opensearch::cat::CatIndicesParts::None)
            .format("json")
            .send()
            .await?;

        let (status, body) = read_body(response).await?;

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        let rows = body.as_array().cloned().unwrap_or_default();

        Ok(rows.iter().map(IndexInfo::from_cat_row).collect())
    }
}

/// Index settings for creating indices.
#[derive(Debug, Clone, Default)]
pub struct IndexSettings {
    /// Number of shards.
    pub number_of_shards: Option<u32>,
    /// Number of replicas.
    pub number_of_replicas: Option<u32>,
    /// Refresh interval.
    pub refresh_interval: Option<String>,
    /// Field mappings.
    pub mappings: Option<Mapping>,
}

impl IndexSettings {
    /// Create new index settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set number of shards.
    pub fn shards(mut self, shards: u32) -> Self {
        self.number_of_shards = Some(shards);
        self
    }

    /// Set number of replicas.
    pub fn replicas(mut self, replicas: u32) -> Self {
        self.number_of_replicas = Some(replicas);
        self
    }

    /// Set refresh interval.
    pub fn refresh_interval(mut self, interval: impl Into<String>) -> Self {
        self.refresh_interval = Some(interval.into());
        self
    }

    /// Set mappings.
    pub fn mappings(mut self, mappings: Mapping) -> Self {
        self.mappings = Some(mappings);
        self
    }

    /// Render the create-index request body.
    pub fn to_json(&self) -> Value {
        let mut body = serde_json::Map::new();
        let mut index = serde_json::Map::new();

        if let Some(shards) = self.number_of_shards {
            index.insert("number_of_shards".to_string(), json!(shards));
        }
        if let Some(replicas) = self.number_of_replicas {
            index.insert("number_of_replicas".to_string(), json!(replicas));
        }
        if let Some(interval) = &self.refresh_interval {
            index.insert("refresh_interval".to_string(), json!(interval));
        }

        if !index.is_empty() {
            body.insert("settings".to_string(), json!({ "index": index }));
        }

        if let Some(mappings) = &self.mappings {
            body.insert("mappings".to_string(), mappings.to_json());
        }

        Value::Object(body)
    }
}

/// Shard layout reported by `GET /<index>/_settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppliedSettings {
    /// Primary shard count.
    pub number_of_shards: u32,
    /// Replica count.
    pub number_of_replicas: u32,
}

impl AppliedSettings {
    fn from_body(name: &str, body: &Value) -> Result<Self> {
        let index = &body[name]["settings"]["index"];

        // Settings come back as strings ("1"), but accept numbers too.
        let read = |key: &str| -> Result<u32> {
            let value = &index[key];
            value
                .as_str()
                .and_then(|s| s.parse().ok())
                .or_else(|| value.as_u64().and_then(|n| u32::try_from(n).ok()))
                .ok_or_else(|| {
                    OpenSearchError::Query(format!("missing {} for index {}", key, name))
                })
        };

        Ok(Self {
            number_of_shards: read("number_of_shards")?,
            number_of_replicas: read("number_of_replicas")?,
        })
    }
}

/// Field mapping configuration.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    /// Field definitions.
    pub properties: BTreeMap<String, FieldType>,
    /// Dynamic mapping setting.
    pub dynamic: Option<String>,
}

impl Mapping {
    /// Create a new mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.properties.insert(name.into(), field_type);
        self
    }

    /// Set dynamic mapping.
    pub fn dynamic(mut self, dynamic: impl Into<String>) -> Self {
        self.dynamic = Some(dynamic.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut mapping = serde_json::Map::new();

        if let Some(dynamic) = &self.dynamic {
            mapping.insert("dynamic".to_string(), json!(dynamic));
        }

        let properties: serde_json::Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, field_type)| (name.clone(), json!({ "type": field_type.as_str() })))
            .collect();
        mapping.insert("properties".to_string(), Value::Object(properties));

        Value::Object(mapping)
    }
}

/// Field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Full-text searchable field.
    Text,
    /// Exact match keyword field.
    Keyword,
    /// 64-bit integer.
    Long,
    /// 32-bit integer.
    Integer,
    /// Double precision float.
    Double,
    /// Boolean.
    Boolean,
    /// Date.
    Date,
}

impl FieldType {
    fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Long => "long",
            FieldType::Integer => "integer",
            FieldType::Double => "double",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        }
    }
}

/// Index information.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexInfo {
    /// Index name.
    pub name: String,
    /// Health status.
    pub health: String,
    /// Open/closed status.
    pub status: String,
    /// Document count.
    pub docs_count: u64,
}

impl IndexInfo {
    fn from_cat_row(row: &Value) -> Self {
        Self {
            name: row["index"].as_str().unwrap_or("").to_string(),
            health: row["health"].as_str().unwrap_or("").to_string(),
            status: row["status"].as_str().unwrap_or("").to_string(),
            docs_count: row["docs.count"]
                .as_str()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
        }
    }
}
