//! Typed views over OpenSearch responses.

use crate::error::Result;
use opensearch::http::{StatusCode, response::Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Read status and body, tolerating empty or non-JSON bodies.
pub(crate) async fn read_body(response: Response) -> Result<(StatusCode, Value)> {
    let status = response.status_code();
    let text = response.text().await?;

    if text.trim().is_empty() {
        return Ok((status, Value::Null));
    }

    let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
    Ok((status, body))
}

/// Result of a document write (index, update or delete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    /// Index the document lives in.
    #[serde(rename = "_index")]
    pub index: String,
    /// Document ID.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document version after the write.
    #[serde(rename = "_version", default)]
    pub version: Option<i64>,
    /// `created`, `updated`, `deleted`, `noop` or `not_found`.
    #[serde(default)]
    pub result: Option<String>,
}

/// Acknowledgement returned by index-level operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcknowledgedResponse {
    /// Whether the cluster accepted the change.
    pub acknowledged: bool,
    /// Whether the required shard copies started before the timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shards_acknowledged: Option<bool>,
    /// Index the operation targeted (create only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

/// Cluster information served at `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// Node name.
    #[serde(default)]
    pub name: Option<String>,
    /// Cluster name.
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// Version details.
    #[serde(default)]
    pub version: Option<VersionInfo>,
}

/// Version block of [`ClusterInfo`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version number, e.g. `2.11.0`.
    pub number: String,
    /// Distribution (`opensearch`); absent on older Elasticsearch-compatible domains.
    #[serde(default)]
    pub distribution: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_response_from_index_body() {
        let body = json!({
            "_index": "movies",
            "_id": "1",
            "_version": 1,
            "result": "created",
            "_shards": { "total": 3, "successful": 1, "failed": 0 },
            "_seq_no": 0,
            "_primary_term": 1
        });

        let response: WriteResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.index, "movies");
        assert_eq!(response.id, "1");
        assert_eq!(response.version, Some(1));
        assert_eq!(response.result.as_deref(), Some("created"));
    }

    #[test]
    fn test_acknowledged_serialization_skips_missing_fields() {
        let response = AcknowledgedResponse {
            acknowledged: true,
            shards_acknowledged: None,
            index: None,
        };

        assert_eq!(serde_json::to_value(&response).unwrap(), json!({ "acknowledged": true }));
    }

    #[test]
    fn test_cluster_info() {
        let body = json!({
            "name": "node-1",
            "cluster_name": "123456789012:my-domain",
            "version": { "distribution": "opensearch", "number": "2.11.0" },
            "tagline": "The OpenSearch Project: https://opensearch.org/"
        });

        let info: ClusterInfo = serde_json::from_value(body).unwrap();
        assert_eq!(info.cluster_name.as_deref(), Some("123456789012:my-domain"));
        assert_eq!(info.version.unwrap().number, "2.11.0");
    }
}
