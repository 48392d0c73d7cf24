//! Integration tests for foreshadowing entries.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_resolve_then_abandon_keeps_resolved_episode(pool: PgPool) {
    // POST /foreshadowings
    let (status, json) = common::post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/novels/1/foreshadowings",
        &json!({ "title": "The locked door", "status": "planted", "importance": "major" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["data"]["id"].as_i64().unwrap();

    // PATCH /resolve
    let (status, json) = common::patch_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/novels/1/foreshadowings/{id}/resolve"),
        &json!({ "resolved_episode_id": 10 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "resolved");
    assert_eq!(json["data"]["resolved_episode_id"], 10);

    // PATCH /abandon
    let (status, _) = common::send(
        common::build_test_app(pool.clone()),
        "PATCH",
        &format!("/api/v1/novels/1/foreshadowings/{id}/abandon"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // GET to verify persisted state
    let (_, json) = common::get_json(
        common::build_test_app(pool),
        &format!("/api/v1/novels/1/foreshadowings/{id}"),
    )
    .await;
    assert_eq!(json["data"]["status"], "abandoned");
    assert_eq!(json["data"]["resolved_episode_id"], 10);
    assert_eq!(json["data"]["importance"], "major");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_filters_and_paginates(pool: PgPool) {
    for n in 0..3 {
        common::post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/novels/1/foreshadowings",
            &json!({ "title": format!("Hint {n}"), "status": "hinted" }),
        )
        .await;
    }
    common::post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/novels/1/foreshadowings",
        &json!({ "title": "Planted" }),
    )
    .await;

    let (status, json) = common::get_json(
        common::build_test_app(pool),
        "/api/v1/novels/1/foreshadowings?status=hinted&per_page=2&page=2",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["meta"], json!({ "total": 3, "page": 2, "per_page": 2 }));
    assert_eq!(json["data"][0]["title"], "Hint 2");
}
