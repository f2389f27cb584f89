//! REST surface integration tests.
//!
//! Starts a real server over the in-memory bridge and drives it with an
//! HTTP client.

mod common;

use std::sync::Arc;

use formdb_gateway::{Gateway, GatewayConfig};
use formdb_server::auth::BearerTokenValidator;
use formdb_server::bridge::MemoryBridge;
use formdb_server::metrics::PrometheusMetrics;
use serde_json::{json, Value};

fn default_gateway() -> Gateway {
    Gateway::new(GatewayConfig::default(), Arc::new(MemoryBridge::new()))
        .with_metrics(Arc::new(PrometheusMetrics::new()))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_collection_rest_flow() {
    let (server, base) = common::start_gateway(default_gateway()).await;
    let client = reqwest::Client::new();

    // Health first.
    let resp = client.get(format!("{base}/v1/health")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    // Create a collection.
    let resp = client
        .post(format!("{base}/v1/collections"))
        .json(&json!({"name": "articles", "fields": ["title", "author"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    // Trailing slash lists; it is never an empty collection name.
    let resp = client
        .get(format!("{base}/v1/collections/"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["collections"], json!(["articles"]));

    // Fetch by name.
    let resp = client
        .get(format!("{base}/v1/collections/articles"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "articles");

    // Drop: 204, no body.
    let resp = client
        .delete(format!("{base}/v1/collections/articles"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NO_CONTENT);
    assert!(resp.text().await.unwrap().is_empty());

    // Gone now.
    let resp = client
        .get(format!("{base}/v1/collections/articles"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
    assert!(body["message"].is_string());

    server.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_query_and_journal() {
    let (server, base) = common::start_gateway(default_gateway()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/v1/query"))
        .json(&json!({
            "query": "from articles select title",
            "provenance": {"actor": "ana", "rationale": "integration test"},
            "explain": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert!(body.get("plan").is_some());

    // Malformed JSON is InvalidArgument, not a transport error.
    let resp = client
        .post(format!("{base}/v1/query"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_argument");

    // A query without the required field is rejected the same way.
    let resp = client
        .post(format!("{base}/v1/query"))
        .json(&json!({"explain": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    // The journal saw exactly the one valid query.
    let resp = client.get(format!("{base}/v1/journal")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["provenance"]["actor"], "ana");

    server.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_routing_errors() {
    let (server, base) = common::start_gateway(default_gateway()).await;
    let client = reqwest::Client::new();

    // Known path, wrong verb.
    let resp = client
        .patch(format!("{base}/v1/collections"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "method_not_supported");

    let resp = client.put(format!("{base}/v1/query")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);

    // Unknown path.
    let resp = client.get(format!("{base}/v1/unknown")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    // Missing version prefix.
    let resp = client.get(format!("{base}/health")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

    server.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_normalize_and_migrate_endpoints() {
    let (server, base) = common::start_gateway(default_gateway()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/v1/normalize/discover"))
        .json(&json!({"collection": "articles"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let resp = client
        .post(format!("{base}/v1/normalize/analyze"))
        .json(&json!({"collection": "articles"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["normal_form"], "BCNF");

    for (phase, expected) in [("start", "announce"), ("shadow", "shadow"), ("commit", "commit")] {
        let resp = client
            .post(format!("{base}/v1/migrate/{phase}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK, "phase {phase}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["phase"], expected);
    }

    // Commit with no migration in progress.
    let resp = client
        .post(format!("{base}/v1/migrate/commit"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    server.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_body_cap_enforced() {
    let config = GatewayConfig {
        max_body_bytes: 64,
        ..GatewayConfig::default()
    };
    let gateway = Gateway::new(config, Arc::new(MemoryBridge::new()))
        .with_metrics(Arc::new(PrometheusMetrics::new()));
    let (server, base) = common::start_gateway(gateway).await;
    let client = reqwest::Client::new();

    // Over the cap: rejected as a bad request, not a transport error.
    let resp = client
        .post(format!("{base}/v1/query"))
        .json(&json!({"query": "x".repeat(256)}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid_argument");

    // Under the cap: handled normally.
    let resp = client
        .post(format!("{base}/v1/query"))
        .json(&json!({"query": "from a"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    server.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_metrics_endpoint() {
    let (server, base) = common::start_gateway(default_gateway()).await;
    let client = reqwest::Client::new();

    // Generate a little traffic first.
    client.get(format!("{base}/v1/health")).send().await.unwrap();

    let resp = client.get(format!("{base}/v1/metrics")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "text/plain; version=0.0.4"
    );
    let text = resp.text().await.unwrap();
    assert!(text.contains("formdb_gateway_requests"));

    server.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_auth_gate() {
    let config = GatewayConfig {
        auth_required: true,
        ..GatewayConfig::default()
    };
    let gateway = Gateway::new(config, Arc::new(MemoryBridge::new()))
        .with_auth(Arc::new(BearerTokenValidator::new("t0ken")));
    let (server, base) = common::start_gateway(gateway).await;
    let client = reqwest::Client::new();

    // No credentials.
    let resp = client.get(format!("{base}/v1/health")).send().await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "unauthenticated");

    // Wrong token.
    let resp = client
        .get(format!("{base}/v1/health"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);

    // Valid token.
    let resp = client
        .get(format!("{base}/v1/health"))
        .bearer_auth("t0ken")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    server.shutdown().await.unwrap();
}
