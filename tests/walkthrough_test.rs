//! Walkthrough tests against a mocked, signature-checking endpoint.

use serde_json::json;
use sigsearch::aws::SigningService;
use sigsearch::aws::aws_credential_types::Credentials;
use sigsearch::opensearch::{AwsSigning, OpenSearchClient, OpenSearchConfig, OpenSearchError};
use sigsearch::{Movie, SampleError, Step, Walkthrough, create_and_delete_index};
use wiremock::matchers::{body_json, body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX: &str = "rust-test-index1";

fn client(server: &MockServer) -> OpenSearchClient {
    let credentials = Credentials::new("AKIDEXAMPLE", "secret", None, None, "test");
    let config = OpenSearchConfig::new(server.uri()).with_aws_signing(AwsSigning::new(
        credentials,
        "us-east-1",
        SigningService::OpenSearch,
    ));

    OpenSearchClient::new(config).unwrap()
}

async fn mount_ping(server: &MockServer) {
    Mock::given(method("HEAD"))
        .and(path("/"))
        .and(header_exists("x-amz-date"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;
}

fn write_body(result: &str, version: i64) -> serde_json::Value {
    json!({
        "_index": INDEX,
        "_id": "1",
        "_version": version,
        "result": result,
        "_shards": { "total": 3, "successful": 1, "failed": 0 }
    })
}

#[tokio::test]
async fn test_full_walkthrough() {
    let server = MockServer::start().await;
    mount_ping(&server).await;

    Mock::given(method("PUT"))
        .and(path(format!("/{INDEX}")))
        .and(body_json(json!({
            "settings": { "index": { "number_of_shards": 1, "number_of_replicas": 2 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "acknowledged": true,
            "shards_acknowledged": true,
            "index": INDEX
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/{INDEX}/_doc/1")))
        .and(body_json(json!(Movie::moneyball())))
        .respond_with(ResponseTemplate::new(201).set_body_json(write_body("created", 1)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path(format!("/{INDEX}/_refresh")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_shards": { "total": 3, "successful": 1, "failed": 0 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/{INDEX}/_search")))
        .and(body_partial_json(json!({
            "size": 5,
            "query": { "multi_match": { "query": "miller", "fields": ["title^2", "director"] } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 2,
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "max_score": 0.2876821,
                "hits": [{
                    "_index": INDEX,
                    "_id": "1",
                    "_score": 0.2876821,
                    "_source": Movie::moneyball()
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/{INDEX}/_doc/1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(write_body("deleted", 2)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/{INDEX}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    Walkthrough::default()
        .run(&client(&server), &mut out)
        .await
        .unwrap();

    let output = String::from_utf8(out).unwrap();

    let positions: Vec<usize> = Step::ALL
        .iter()
        .map(|step| output.find(step.heading()).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(output.contains("200 OK"));
    assert!(output.contains("\"director\": \"Bennett Miller\""));
    assert!(output.contains("\"result\": \"deleted\""));
}

#[tokio::test]
async fn test_walkthrough_stops_at_first_failure() {
    let server = MockServer::start().await;
    mount_ping(&server).await;

    Mock::given(method("PUT"))
        .and(path(format!("/{INDEX}")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "resource_already_exists_exception",
                "reason": "index [rust-test-index1/abc] already exists"
            },
            "status": 400
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(format!("/{INDEX}/_doc/1")))
        .respond_with(ResponseTemplate::new(201).set_body_json(write_body("created", 1)))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(0)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    let err = Walkthrough::default()
        .run(&client(&server), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(Step::CreateIndex));
    assert!(matches!(
        err,
        SampleError::Step {
            source: OpenSearchError::IndexExists(_),
            ..
        }
    ));
    assert!(err.to_string().starts_with("Creating index failed"));

    let output = String::from_utf8(out).unwrap();
    assert!(output.contains(Step::Ping.heading()));
    assert!(!output.contains(Step::CreateIndex.heading()));
}

#[tokio::test]
async fn test_rejected_signature_stops_before_any_write() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(403))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    let err = Walkthrough::default()
        .run(&client(&server), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SampleError::Step {
            step: Step::Ping,
            source: OpenSearchError::Authentication(_),
        }
    ));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_serverless_skips_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/{INDEX}/_doc/1")))
        .respond_with(ResponseTemplate::new(201).set_body_json(write_body("created", 1)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path(format!("/{INDEX}/_refresh")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    Walkthrough::default()
        .refresh(false)
        .run_step(Step::IndexDocument, &client(&server), &mut out)
        .await
        .unwrap();

    assert!(String::from_utf8(out).unwrap().starts_with("Inserting a document"));
}

#[tokio::test]
async fn test_create_and_delete_four_shard_index() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/movies"))
        .and(header_exists("authorization"))
        .and(body_json(json!({ "settings": { "index": { "number_of_shards": 4 } } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "acknowledged": true,
            "shards_acknowledged": true,
            "index": "movies"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    create_and_delete_index(&client(&server), "movies", 4, &mut out)
        .await
        .unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "created index: movies\ndeleted index: true\n"
    );
}

#[tokio::test]
async fn test_create_and_delete_stops_when_create_fails() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/movies"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "type": "resource_already_exists_exception",
                "reason": "index [movies/abc] already exists"
            },
            "status": 400
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    let err = create_and_delete_index(&client(&server), "movies", 4, &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.step(), Some(Step::CreateIndex));
    assert!(out.is_empty());
}
