#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::sync::Arc;
use techsolutions_gateway::{app, AppState, MemoryStore, TableStore};
use tower::ServiceExt;

pub const BODY_LIMIT: usize = 64 * 1024;

/// Router over a fresh in-memory store; the store is returned for direct seeding.
pub fn memory_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let router = app(AppState::new(store.clone() as Arc<dyn TableStore>), BODY_LIMIT);
    (router, store)
}

pub fn app_with(store: Arc<dyn TableStore>) -> Router {
    app(AppState::new(store), BODY_LIMIT)
}

pub async fn send_raw(app: &Router, method: Method, uri: &str, content_type: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("infallible router");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let bytes = body.map(|b| serde_json::to_vec(&b).expect("json")).unwrap_or_default();
    send_raw(app, method, uri, "application/json", bytes).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

/// Create a client and return its id.
pub async fn create_cliente(app: &Router, body: Value) -> i64 {
    let (status, json) = send(app, Method::POST, "/api/clientes", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json[0]["id"].as_i64().expect("id")
}

pub fn assert_error_body(json: &Value) {
    let msg = json.get("error").and_then(Value::as_str).unwrap_or("");
    assert!(!msg.is_empty(), "expected non-empty error string, got {}", json);
}
