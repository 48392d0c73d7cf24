//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use yugen_store::PgStore;
use yugen_test_support::FixedClock;

use yugen_api::routes;
use yugen_api::state::AppState;

/// Build the full app router over a real `PgStore` and a fixed clock. Uses the
/// same route structure as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = AppState::from_store(
        Arc::new(PgStore::new(pool)),
        Arc::new(FixedClock::standard()),
    );
    routes::router().with_state(state)
}

/// Send a request with an optional JSON body. An empty response body reads as
/// `Value::Null`.
pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<&Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

/// Send a PATCH request with a JSON body and return the response.
pub async fn patch_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    send(app, "PATCH", uri, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

/// Send a DELETE request and return the status.
pub async fn delete(app: Router, uri: &str) -> StatusCode {
    send(app, "DELETE", uri, None).await.0
}

/// Create a character in `novel_id` and return its id.
pub async fn create_character(pool: &PgPool, novel_id: i64, name: &str) -> i64 {
    let (status, json) = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/novels/{novel_id}/characters"),
        &serde_json::json!({ "name": name }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"]["id"].as_i64().unwrap()
}

/// Create a relationship in `novel_id` and return its id.
pub async fn create_relationship(
    pool: &PgPool,
    novel_id: i64,
    from: i64,
    to: i64,
    kind: &str,
) -> i64 {
    let (status, json) = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/novels/{novel_id}/character_relationships"),
        &serde_json::json!({
            "character_id": from,
            "related_character_id": to,
            "relationship_type": kind,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{json}");
    json["data"]["id"].as_i64().unwrap()
}
