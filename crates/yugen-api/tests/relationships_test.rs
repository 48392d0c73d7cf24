//! Integration tests for the relationship graph and its change log.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_relationship_change_round_trip(pool: PgPool) {
    // Arrange
    let a = common::create_character(&pool, 1, "Aoi").await;
    let b = common::create_character(&pool, 1, "Ren").await;
    let ab = common::create_relationship(&pool, 1, a, b, "friend").await;

    // POST /character_relationships/{id}/changes
    let (status, json) = common::post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/novels/1/character_relationships/{ab}/changes"),
        &json!({
            "episode_id": 9,
            "new_type": "enemy",
            "new_intensity": 10,
            "change_description": "the bridge burns",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let log_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["previous_type"], "friend");
    assert!(json["data"]["previous_intensity"].is_null());

    // GET the relationship and the log to verify persisted state
    let (_, edge) = common::get_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/novels/1/character_relationships/{ab}"),
    )
    .await;
    assert_eq!(edge["data"]["relationship_type"], "enemy");
    assert_eq!(edge["data"]["intensity"], 10);

    let (status, log) = common::get_json(
        common::build_test_app(pool),
        &format!("/api/v1/novels/1/relationship_logs/{log_id}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log["data"]["change_description"], "the bridge burns");
    assert_eq!(log["data"]["character_relationship"]["character"]["name"], "Aoi");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_duplicate_edge_rejected_but_reverse_allowed(pool: PgPool) {
    let a = common::create_character(&pool, 1, "Aoi").await;
    let b = common::create_character(&pool, 1, "Ren").await;
    common::create_relationship(&pool, 1, a, b, "friend").await;

    let (duplicate, json) = common::post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/novels/1/character_relationships",
        &json!({ "character_id": a, "related_character_id": b, "relationship_type": "ally" }),
    )
    .await;
    let (reverse, _) = common::post_json(
        common::build_test_app(pool),
        "/api/v1/novels/1/character_relationships",
        &json!({ "character_id": b, "related_character_id": a, "relationship_type": "ally" }),
    )
    .await;

    assert_eq!(duplicate, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(reverse, StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_cross_novel_relationship_is_rejected(pool: PgPool) {
    let a = common::create_character(&pool, 1, "Aoi").await;
    let foreign = common::create_character(&pool, 999, "Outsider").await;

    let (status, _) = common::post_json(
        common::build_test_app(pool),
        "/api/v1/novels/1/character_relationships",
        &json!({
            "character_id": a,
            "related_character_id": foreign,
            "relationship_type": "pen pal",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_character_relationships_by_direction(pool: PgPool) {
    let a = common::create_character(&pool, 1, "Aoi").await;
    let b = common::create_character(&pool, 1, "Ren").await;
    let c = common::create_character(&pool, 1, "Mio").await;
    common::create_relationship(&pool, 1, a, b, "friend").await;
    common::create_relationship(&pool, 1, a, c, "rival").await;
    common::create_relationship(&pool, 1, b, a, "debtor").await;

    let (status, json) = common::get_json(
        common::build_test_app(pool),
        &format!("/api/v1/novels/1/characters/{a}/relationships"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["outgoing"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["incoming"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"]["incoming"][0]["relationship_type"], "debtor");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_delete_relationship_removes_logs(pool: PgPool) {
    let a = common::create_character(&pool, 1, "Aoi").await;
    let b = common::create_character(&pool, 1, "Ren").await;
    let ab = common::create_relationship(&pool, 1, a, b, "friend").await;
    common::post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/novels/1/character_relationships/{ab}/changes"),
        &json!({ "episode_id": 1, "new_type": "rival" }),
    )
    .await;

    let status = common::delete(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/novels/1/character_relationships/{ab}"),
    )
    .await;
    let (_, logs) = common::get_json(
        common::build_test_app(pool),
        "/api/v1/novels/1/relationship_logs",
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(logs["meta"]["total"], 0);
}
