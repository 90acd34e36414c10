//! OpenSearch client implementation.

use crate::{
    config::OpenSearchConfig,
    document::Document,
    error::{OpenSearchError, Result},
    index::IndexManager,
    response::{ClusterInfo, WriteResponse, read_body},
    search::SearchBuilder,
};
use opensearch::{
    OpenSearch,
    http::{
        StatusCode, Url,
        transport::{SingleNodeConnectionPool, TransportBuilder},
    },
};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// OpenSearch client for document operations.
#[derive(Clone)]
pub struct OpenSearchClient {
    client: Arc<OpenSearch>,
    config: Arc<OpenSearchConfig>,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client.
    ///
    /// When the config carries [`AwsSigning`](crate::AwsSigning) material, the
    /// transport signs each request with SigV4 before it leaves the process.
    pub fn new(config: OpenSearchConfig) -> Result<Self> {
        info!(url = %config.url, signed = config.is_signed(), "Initializing OpenSearch client");

        if config.url.trim().is_empty() {
            return Err(OpenSearchError::Validation("No URL provided".to_string()));
        }

        let url = Url::parse(&config.url)
            .map_err(|e| OpenSearchError::Validation(format!("Invalid URL: {}", e)))?;

        let conn_pool = SingleNodeConnectionPool::new(url);
        let mut builder = TransportBuilder::new(conn_pool)
            .timeout(config.request_timeout)
            .disable_proxy();

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.auth(opensearch::auth::Credentials::Basic(
                user.clone(),
                pass.clone(),
            ));
        }

        builder = apply_signing(builder, &config)?;

        let transport = builder
            .build()
            .map_err(|e| OpenSearchError::Connection(e.to_string()))?;

        debug!("OpenSearch client initialized");

        Ok(Self {
            client: Arc::new(OpenSearch::new(transport)),
            config: Arc::new(config),
        })
    }

    /// Load AWS configuration and connect with a SigV4-signing transport.
    #[cfg(feature = "aws-auth")]
    pub async fn connect_aws(
        url: impl Into<String>,
        aws_config: &sigsearch_aws::AwsConfig,
    ) -> Result<Self> {
        let sdk_config = aws_config.load().await?;
        let signing =
            crate::AwsSigning::from_sdk_config(&sdk_config, aws_config.signing_service)?;

        Self::new(OpenSearchConfig::new(url).with_aws_signing(signing))
    }

    /// Get the underlying OpenSearch client.
    pub fn inner(&self) -> &OpenSearch {
        &self.client
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenSearchConfig {
        &self.config
    }

    /// Get an index manager for index operations.
    pub fn indices(&self) -> IndexManager {
        IndexManager::new(self.client.clone())
    }

    /// Create a search builder.
    pub fn search(&self) -> SearchBuilder {
        SearchBuilder::new(self.client.clone())
    }

    // =========================================================================
    // Cluster Operations
    // =========================================================================

    /// Ping the cluster.
    ///
    /// Fails when the endpoint is unreachable or rejects the request; a
    /// rejected signature surfaces as [`OpenSearchError::Authentication`].
    pub async fn ping(&self) -> Result<StatusCode> {
        let response = self.client.ping().send().await?;
        let status = response.status_code();

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &Value::Null));
        }

        Ok(status)
    }

    /// Get cluster name and version.
    pub async fn info(&self) -> Result<ClusterInfo> {
        let response = self.client.info().send().await?;
        let (status, body) = read_body(response).await?;

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        Ok(serde_json::from_value(body)?)
    }

    /// Get cluster health.
    pub async fn health(&self) -> Result<Value> {
        let response = self
            .client
            .cluster()
            .health(opensearch::cluster::ClusterHealthParts::None)
            .send()
            .await?;

        let (status, body) = read_body(response).await?;

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        Ok(body)
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Index a document with an explicit ID.
    pub async fn index<T: Document>(
        &self,
        index: &str,
        id: &str,
        doc: &T,
    ) -> Result<WriteResponse> {
        debug!(index, id, "Indexing document");

        let response = self
            .client
            .index(opensearch::IndexParts::IndexId(index, id))
            .body(doc)
            .send()
            .await?;

        write_result(response).await
    }

    /// Index a document with auto-generated ID.
    pub async fn index_auto_id<T: Document>(
        &self,
        index: &str,
        doc: &T,
    ) -> Result<WriteResponse> {
        debug!(index, "Indexing document with auto-generated ID");

        let response = self
            .client
            .index(opensearch::IndexParts::Index(index))
            .body(doc)
            .send()
            .await?;

        write_result(response).await
    }

    /// Get a document by ID.
    pub async fn get<T: Document>(&self, index: &str, id: &str) -> Result<Option<T>> {
        debug!(index, id, "Getting document");

        let response = self
            .client
            .get(opensearch::GetParts::IndexId(index, id))
            .send()
            .await?;

        let (status, body) = read_body(response).await?;

        if status == StatusCode::NOT_FOUND {
            if is_missing_index(&body) {
                return Err(OpenSearchError::IndexNotFound(index.to_string()));
            }
            return Ok(None);
        }

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        if !body["found"].as_bool().unwrap_or(false) {
            return Ok(None);
        }

        let source = body
            .get("_source")
            .ok_or_else(|| OpenSearchError::Query("No _source in response".to_string()))?;

        Ok(Some(serde_json::from_value(source.clone())?))
    }

    /// Check if a document exists.
    pub async fn exists(&self, index: &str, id: &str) -> Result<bool> {
        debug!(index, id, "Checking if document exists");

        let response = self
            .client
            .exists(opensearch::ExistsParts::IndexId(index, id))
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

    /// Partially update a document by ID.
    pub async fn update(
        &self,
        index: &str,
        id: &str,
        partial: impl Serialize,
    ) -> Result<WriteResponse> {
        debug!(index, id, "Updating document");

        let partial = serde_json::to_value(partial)?;
        let response = self
            .client
            .update(opensearch::UpdateParts::IndexId(index, id))
            .body(json!({ "doc": partial }))
            .send()
            .await?;

        if response.status_code() == StatusCode::NOT_FOUND {
            return Err(OpenSearchError::DocumentNotFound {
                index: index.to_string(),
                id: id.to_string(),
            });
        }

        write_result(response).await
    }

    /// Delete a document by ID.
    ///
    /// Returns `None` when there was nothing to delete.
    pub async fn delete(&self, index: &str, id: &str) -> Result<Option<WriteResponse>> {
        debug!(index, id, "Deleting document");

        let response = self
            .client
            .delete(opensearch::DeleteParts::IndexId(index, id))
            .send()
            .await?;

        let (status, body) = read_body(response).await?;

        if status == StatusCode::NOT_FOUND {
            if is_missing_index(&body) {
                return Err(OpenSearchError::IndexNotFound(index.to_string()));
            }
            return Ok(None);
        }

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        Ok(Some(serde_json::from_value(body)?))
    }

    /// Refresh an index to make recent changes searchable.
    pub async fn refresh(&self, index: &str) -> Result<()> {
        debug!(index, "Refreshing index");

        let response = self
            .client
            .indices()
            .refresh(opensearch::indices::IndicesRefreshParts::Index(&[index]))
            .send()
            .await?;

        let (status, body) = read_body(response).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(OpenSearchError::IndexNotFound(index.to_string()));
        }

        if !status.is_success() {
            return Err(OpenSearchError::from_response(status, &body));
        }

        Ok(())
    }
}

/// A missing index also answers 404, but with an error body.
fn is_missing_index(body: &Value) -> bool {
    body["error"]["type"].as_str() == Some("index_not_found_exception")
}

async fn write_result(response: opensearch::http::response::Response) -> Result<WriteResponse> {
    let (status, body) = read_body(response).await?;

    if !status.is_success() {
        return Err(OpenSearchError::from_response(status, &body));
    }

    Ok(serde_json::from_value(body)?)
}

#[cfg(feature = "aws-auth")]
fn apply_signing(
    builder: TransportBuilder,
    config: &OpenSearchConfig,
) -> Result<TransportBuilder> {
    let Some(aws) = &config.aws else {
        return Ok(builder);
    };

    if config.username.is_some() {
        return Err(OpenSearchError::Validation(
            "basic auth and AWS signing cannot be combined".to_string(),
        ));
    }

    debug!(region = %aws.region, service = %aws.service, "Signing requests with SigV4");

    Ok(builder
        .auth(opensearch::auth::Credentials::AwsSigV4(
            aws.credentials.clone(),
            aws.region.clone(),
        ))
        .service_name(aws.service.as_str()))
}

#[cfg(not(feature = "aws-auth"))]
fn apply_signing(
    builder: TransportBuilder,
    _config: &OpenSearchConfig,
) -> Result<TransportBuilder> {
    Ok(builder)
}

impl std::fmt::Debug for OpenSearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSearchClient")
            .field("url", &self.config.url)
            .field("signed", &self.config.is_signed())
            .finish()
    }
}
