//! Integration test for the health endpoint.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_health_is_served_outside_the_envelope(pool: PgPool) {
    let (status, json) = common::get_json(common::build_test_app(pool), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json.get("success").is_none());
}
