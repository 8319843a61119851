//! Request dispatch through the built router.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;
use tower::BoxError;

use mediator_gateway::endpoints::HandlerCatalog;
use mediator_gateway::http::{HttpServer, APPLICATION_JSON, X_REQUEST_ID};
use mediator_gateway::mediator::{HandlerMediator, RequestHandler};

mod common;

use common::{body_string, send, server};

#[tokio::test]
async fn test_valid_request_returns_handler_reply() {
    let (server, mediator) = server();

    let response = send(&server, "POST", "/api/CreateOrder", r#"{"sku":"SKU-9","quantity":3}"#).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], APPLICATION_JSON);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, json!({"order_id": 1001, "sku": "SKU-9", "quantity": 3}));
    assert_eq!(mediator.calls(), 1);
}

#[tokio::test]
async fn test_empty_body_sends_default_request() {
    let (server, mediator) = server();

    let response = send(&server, "POST", "/api/CreateOrder", "").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, json!({"order_id": 1001, "sku": "", "quantity": 0}));
    assert_eq!(mediator.calls(), 1);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (server, mediator) = server();

    let response = send(&server, "POST", "/api/CreateOrder", r#"{"sku": "A", "quantity": "#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "");
    assert_eq!(mediator.calls(), 0);
}

#[tokio::test]
async fn test_out_of_range_number_is_bad_request() {
    let (server, mediator) = server();

    let response = send(&server, "POST", "/api/CreateOrder", r#"{"sku":"A","quantity":300}"#).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_string(response).await, "");
    assert_eq!(mediator.calls(), 0);
}

#[tokio::test]
async fn test_wrong_field_type_is_bad_request() {
    let (server, _) = server();
    let response = send(&server, "POST", "/api/CreateOrder", r#"{"sku":42,"quantity":1}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_annotated_routes_dispatch() {
    let (server, _) = server();

    let response = send(&server, "GET", "/api/orders/1001", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"order_id":1001,"lines":null}"#);

    let response = send(&server, "PATCH", "/api/GetOrder", r#"{"include_lines":true}"#).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, r#"{"order_id":1001,"lines":["A-1"]}"#);
}

#[tokio::test]
async fn test_unbound_method_not_allowed() {
    let (server, mediator) = server();
    let response = send(&server, "GET", "/api/CreateOrder", "").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(mediator.calls(), 0);
}

#[tokio::test]
async fn test_reply_encoded_with_runtime_type() {
    let (server, _) = server();

    let response = send(&server, "POST", "/api/DescribeShape", r#"{"kind":"square"}"#).await;
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, json!({"side": 2.0, "corners": 4}));

    let response = send(&server, "POST", "/api/DescribeShape", r#"{"kind":"circle"}"#).await;
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body, json!({"radius": 1.5}));
}

#[tokio::test]
async fn test_http_aware_request_sees_exchange() {
    let (server, _) = server();

    let response = send(&server, "POST", "/api/WhoAmI", "").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-handled-by"], "whoami");
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(
        body,
        json!({"user_agent": "gateway-tests", "method": "POST", "client": null})
    );
}

#[tokio::test]
async fn test_handler_failure_is_internal_error() {
    let (server, mediator) = server();
    let response = send(&server, "POST", "/api/Explode", "").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(mediator.calls(), 1);
}

#[tokio::test]
async fn test_request_id_assigned() {
    let (server, _) = server();
    let response = send(&server, "POST", "/api/CreateOrder", "").await;
    assert!(response.headers().contains_key(X_REQUEST_ID));
}

#[tokio::test]
async fn test_health_endpoint() {
    let (server, mediator) = server();
    let response = send(&server, "GET", "/health", "").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["routes"], 6);
    assert_eq!(mediator.calls(), 0);
}

#[tokio::test]
async fn test_unknown_path_not_found() {
    let (server, _) = server();
    let response = send(&server, "POST", "/api/Nope", "{}").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let (server, mediator) = server();

    // Default limit is 1 MiB.
    let padding = "x".repeat(2 * 1024 * 1024);
    let body = format!(r#"{{"sku":"{}","quantity":1}}"#, padding);
    let response = send(&server, "POST", "/api/CreateOrder", &body).await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(mediator.calls(), 0);
}

#[derive(Debug, Default, Deserialize)]
struct Reindex;

#[derive(Debug, Serialize)]
struct Reindexed;

/// Never finishes; signals `cancelled` once its token fires.
struct ReindexHandler {
    cancelled: Arc<Notify>,
}

#[async_trait]
impl RequestHandler for ReindexHandler {
    type Request = Reindex;
    type Response = Reindexed;

    async fn handle(&self, _r: Reindex, cancel: CancellationToken) -> Result<Reindexed, BoxError> {
        let cancelled = Arc::clone(&self.cancelled);
        tokio::spawn(async move {
            cancel.cancelled().await;
            cancelled.notify_one();
        });
        std::future::pending().await
    }
}

fn reindex_server(request_secs: u64) -> (HttpServer, Arc<Notify>) {
    let cancelled = Arc::new(Notify::new());

    let mut catalog = HandlerCatalog::new();
    catalog.register::<ReindexHandler>();

    let mut mediator = HandlerMediator::new();
    mediator.register(Arc::new(ReindexHandler {
        cancelled: Arc::clone(&cancelled),
    }));

    let mut config = common::config(None, &["ReindexHandler"]);
    config.timeouts.request_secs = request_secs;

    let server = HttpServer::new(config, &catalog, Arc::new(mediator)).unwrap();
    (server, cancelled)
}

#[tokio::test]
async fn test_dropped_exchange_cancels_handler() {
    let (server, cancelled) = reindex_server(30);

    let result = tokio::time::timeout(
        Duration::from_millis(50),
        send(&server, "POST", "/Reindex", ""),
    )
    .await;
    assert!(result.is_err(), "handler should still be running");

    tokio::time::timeout(Duration::from_secs(1), cancelled.notified())
        .await
        .expect("handler token was not cancelled");
}

#[tokio::test]
async fn test_request_timeout() {
    let (server, cancelled) = reindex_server(1);

    let response = send(&server, "POST", "/Reindex", "").await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

    tokio::time::timeout(Duration::from_secs(1), cancelled.notified())
        .await
        .expect("handler token was not cancelled");
}
