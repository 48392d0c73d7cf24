//! Routes for the directed relationship graph.

use axum::extract::State;
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use yugen_core::ids::{CharacterId, EpisodeId, RelationshipId};
use yugen_relationships::application::{command_handlers, query_handlers};
use yugen_relationships::domain::commands;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, double_option};
use crate::response;
use crate::routes::{MemberPath, NovelPath, PageQuery};
use crate::state::AppState;

/// Request body for POST /character_relationships.
#[derive(Debug, Default, Deserialize)]
pub struct CreateRelationshipRequest {
    /// The character the edge starts from.
    pub character_id: Option<CharacterId>,
    /// The character on the receiving end of the edge.
    pub related_character_id: Option<CharacterId>,
    /// Free-form label, e.g. `rival`.
    pub relationship_type: Option<String>,
    /// How the characters relate.
    pub description: Option<String>,
    /// Integer strength from 1 to 10; `null` clears it.
    pub intensity: Option<Value>,
}

/// Request body for PUT/PATCH /character_relationships/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRelationshipRequest {
    /// The character the edge starts from.
    pub character_id: Option<CharacterId>,
    /// The character on the receiving end of the edge.
    pub related_character_id: Option<CharacterId>,
    /// Free-form label, e.g. `rival`.
    pub relationship_type: Option<String>,
    /// How the characters relate.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Integer strength from 1 to 10; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub intensity: Option<Option<Value>>,
}

/// Request body for POST /character_relationships/{id}/changes.
#[derive(Debug, Default, Deserialize)]
pub struct RecordChangeRequest {
    /// Episode the record refers to.
    pub episode_id: Option<EpisodeId>,
    /// Relationship type after the change.
    pub new_type: Option<String>,
    /// Intensity after the change; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub new_intensity: Option<Option<Value>>,
    /// What happened in the episode.
    pub change_description: Option<String>,
}

/// GET /character_relationships
#[instrument(skip(state, path, paging), fields(novel_id = %path.novel_id))]
async fn list_relationships(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiQuery(paging): ApiQuery<PageQuery>,
) -> Result<Response, ApiError> {
    let page = query_handlers::list_relationships(
        path.novel_id,
        paging.request(),
        &*state.relationships,
    )
    .await?;
    Ok(response::paginated(page))
}

/// POST /character_relationships
#[instrument(skip(state, path, request), fields(novel_id = %path.novel_id))]
async fn create_relationship(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiJson(request): ApiJson<CreateRelationshipRequest>,
) -> Result<Response, ApiError> {
    let command = commands::CreateRelationship {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        character_id: request.character_id,
        related_character_id: request.related_character_id,
        relationship_type: request.relationship_type,
        description: request.description,
        intensity: request.intensity,
    };

    info!(correlation_id = %command.correlation_id, "handling create_relationship command");

    let relationship = command_handlers::handle_create_relationship(
        &command,
        state.clock.as_ref(),
        &*state.characters,
        &*state.relationships,
    )
    .await?;
    Ok(response::created(relationship))
}

/// GET /character_relationships/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, relationship_id = path.id))]
async fn show_relationship(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let entry = query_handlers::get_relationship(
        path.novel_id,
        RelationshipId(path.id),
        &*state.relationships,
    )
    .await?;
    Ok(response::ok(entry))
}

/// PUT/PATCH /character_relationships/{id}
#[instrument(
    skip(state, path, request),
    fields(novel_id = %path.novel_id, relationship_id = path.id)
)]
async fn update_relationship(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
    ApiJson(request): ApiJson<UpdateRelationshipRequest>,
) -> Result<Response, ApiError> {
    let command = commands::UpdateRelationship {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        relationship_id: RelationshipId(path.id),
        changes: commands::RelationshipChanges {
            character_id: request.character_id,
            related_character_id: request.related_character_id,
            relationship_type: request.relationship_type,
            description: request.description,
            intensity: request.intensity.map(|raw| raw.unwrap_or(Value::Null)),
        },
    };

    info!(correlation_id = %command.correlation_id, "handling update_relationship command");

    let relationship = command_handlers::handle_update_relationship(
        command,
        state.clock.as_ref(),
        &*state.characters,
        &*state.relationships,
    )
    .await?;
    Ok(response::ok(relationship))
}

/// DELETE /character_relationships/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, relationship_id = path.id))]
async fn delete_relationship(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let command = commands::DeleteRelationship {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        relationship_id: RelationshipId(path.id),
    };

    info!(correlation_id = %command.correlation_id, "handling delete_relationship command");

    command_handlers::handle_delete_relationship(&command, &*state.relationships).await?;
    Ok(response::no_content())
}

/// POST /character_relationships/{id}/changes
#[instrument(
    skip(state, path, request),
    fields(novel_id = %path.novel_id, relationship_id = path.id)
)]
async fn record_change(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
    ApiJson(request): ApiJson<RecordChangeRequest>,
) -> Result<Response, ApiError> {
    let command = commands::RecordRelationshipChange {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        relationship_id: RelationshipId(path.id),
        episode_id: request.episode_id,
        new_type: request.new_type,
        new_intensity: request.new_intensity.map(|raw| raw.unwrap_or(Value::Null)),
        change_description: request.change_description,
    };

    info!(correlation_id = %command.correlation_id, "handling record_relationship_change command");

    let log = command_handlers::handle_record_change(
        &command,
        state.clock.as_ref(),
        &*state.relationships,
    )
    .await?;
    Ok(response::created(log))
}

/// GET /characters/{id}/relationships
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, character_id = path.id))]
async fn relationships_of_character(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let edges = query_handlers::character_relationships(
        path.novel_id,
        CharacterId(path.id),
        &*state.characters,
        &*state.relationships,
    )
    .await?;
    Ok(response::ok(edges))
}

/// Returns the router for character relationships.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/character_relationships",
            get(list_relationships).post(create_relationship),
        )
        .route(
            "/character_relationships/{id}",
            get(show_relationship)
                .put(update_relationship)
                .patch(update_relationship)
                .delete(delete_relationship),
        )
        .route("/character_relationships/{id}/changes", post(record_change))
        .route(
            "/characters/{id}/relationships",
            get(relationships_of_character),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use yugen_core::ids::{CharacterId, NovelId, RelationshipId};
    use yugen_core::repository::{CharacterRepository, RelationshipRepository};
    use yugen_test_support::{FixedClock, InMemoryStore, fixtures};

    use crate::routes::test_support::{app, send, state_with};

    const BASE: &str = "/api/v1/novels/1";

    async fn seed_character(store: &InMemoryStore, novel: i64, name: &str) -> CharacterId {
        store
            .insert_character(
                NovelId(novel),
                &fixtures::profile(name),
                FixedClock::standard().0,
            )
            .await
            .unwrap()
            .id
    }

    async fn seed_edge(
        store: &InMemoryStore,
        from: CharacterId,
        to: CharacterId,
        kind: &str,
    ) -> RelationshipId {
        store
            .insert_relationship(
                NovelId(1),
                &fixtures::relationship(from, to, kind),
                FixedClock::standard().0,
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_relationship_returns_201() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let b = seed_character(&store, 1, "Ren").await;
        let body = json!({
            "character_id": a,
            "related_character_id": b,
            "relationship_type": "rival",
            "intensity": 7,
        });

        // Act
        let (status, json) = send(
            app(state_with(store)),
            "POST",
            &format!("{BASE}/character_relationships"),
            Some(body),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["relationship_type"], "rival");
        assert_eq!(json["data"]["intensity"], 7);
    }

    #[tokio::test]
    async fn test_fractional_intensity_returns_422() {
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let b = seed_character(&store, 1, "Ren").await;

        let (status, json) = send(
            app(state_with(store)),
            "POST",
            &format!("{BASE}/character_relationships"),
            Some(json!({
                "character_id": a,
                "related_character_id": b,
                "relationship_type": "rival",
                "intensity": 5.5,
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["field"], "intensity");
    }

    #[tokio::test]
    async fn test_self_relationship_returns_422() {
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;

        let (status, json) = send(
            app(state_with(store)),
            "POST",
            &format!("{BASE}/character_relationships"),
            Some(json!({
                "character_id": a,
                "related_character_id": a,
                "relationship_type": "self",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["field"], "related_character_id");
    }

    #[tokio::test]
    async fn test_relationship_to_foreign_character_returns_404() {
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let foreign = seed_character(&store, 2, "Elsewhere").await;

        let (status, _) = send(
            app(state_with(store)),
            "POST",
            &format!("{BASE}/character_relationships"),
            Some(json!({
                "character_id": a,
                "related_character_id": foreign,
                "relationship_type": "friend",
            })),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_direction_is_rejected_but_reverse_is_allowed() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let b = seed_character(&store, 1, "Ren").await;
        seed_edge(&store, a, b, "friend").await;
        let uri = format!("{BASE}/character_relationships");

        // Act
        let (duplicate, json) = send(
            app(state_with(store.clone())),
            "POST",
            &uri,
            Some(json!({
                "character_id": a,
                "related_character_id": b,
                "relationship_type": "ally",
            })),
        )
        .await;
        let (reverse, _) = send(
            app(state_with(store)),
            "POST",
            &uri,
            Some(json!({
                "character_id": b,
                "related_character_id": a,
                "relationship_type": "ally",
            })),
        )
        .await;

        // Assert
        assert_eq!(duplicate, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["message"], "has already been taken");
        assert_eq!(reverse, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_show_relationship_names_both_endpoints() {
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let b = seed_character(&store, 1, "Ren").await;
        let id = seed_edge(&store, a, b, "mentor").await;

        let (status, json) = send(
            app(state_with(store)),
            "GET",
            &format!("{BASE}/character_relationships/{id}"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["character"]["name"], "Aoi");
        assert_eq!(json["data"]["related_character"]["name"], "Ren");
    }

    #[tokio::test]
    async fn test_update_relationship_clears_intensity_with_null() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let b = seed_character(&store, 1, "Ren").await;
        let mut attributes = fixtures::relationship(a, b, "friend");
        attributes.intensity = Some(4);
        let id = store
            .insert_relationship(NovelId(1), &attributes, FixedClock::standard().0)
            .await
            .unwrap()
            .id;

        // Act
        let (status, json) = send(
            app(state_with(store)),
            "PATCH",
            &format!("{BASE}/character_relationships/{id}"),
            Some(json!({ "intensity": null, "description": "old friends" })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["intensity"], Value::Null);
        assert_eq!(json["data"]["description"], "old friends");
        assert_eq!(json["data"]["relationship_type"], "friend");
    }

    #[tokio::test]
    async fn test_record_change_updates_edge_and_logs_previous_values() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let b = seed_character(&store, 1, "Ren").await;
        let mut attributes = fixtures::relationship(a, b, "friend");
        attributes.intensity = Some(5);
        let id = store
            .insert_relationship(NovelId(1), &attributes, FixedClock::standard().0)
            .await
            .unwrap()
            .id;

        // Act
        let (status, json) = send(
            app(state_with(store.clone())),
            "POST",
            &format!("{BASE}/character_relationships/{id}/changes"),
            Some(json!({
                "episode_id": 12,
                "new_type": "enemy",
                "new_intensity": 9,
                "change_description": "betrayal at the gate",
            })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["previous_type"], "friend");
        assert_eq!(json["data"]["new_type"], "enemy");
        assert_eq!(json["data"]["previous_intensity"], 5);
        assert_eq!(json["data"]["new_intensity"], 9);
        assert_eq!(store.log_count(), 1);
        let edge = store.find_relationship(NovelId(1), id).await.unwrap().unwrap();
        assert_eq!(edge.relationship.attributes.relationship_type, "enemy");
    }

    #[tokio::test]
    async fn test_record_change_without_episode_writes_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let b = seed_character(&store, 1, "Ren").await;
        let id = seed_edge(&store, a, b, "friend").await;

        let (status, json) = send(
            app(state_with(store.clone())),
            "POST",
            &format!("{BASE}/character_relationships/{id}/changes"),
            Some(json!({ "new_type": "enemy" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["field"], "episode_id");
        assert_eq!(store.log_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_relationship_removes_its_logs() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let b = seed_character(&store, 1, "Ren").await;
        let id = seed_edge(&store, a, b, "friend").await;
        send(
            app(state_with(store.clone())),
            "POST",
            &format!("{BASE}/character_relationships/{id}/changes"),
            Some(json!({ "episode_id": 1, "new_type": "rival" })),
        )
        .await;

        // Act
        let (status, _) = send(
            app(state_with(store.clone())),
            "DELETE",
            &format!("{BASE}/character_relationships/{id}"),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(store.relationship_count(), 0);
        assert_eq!(store.log_count(), 0);
    }

    #[tokio::test]
    async fn test_character_relationships_split_by_direction() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let a = seed_character(&store, 1, "Aoi").await;
        let b = seed_character(&store, 1, "Ren").await;
        let c = seed_character(&store, 1, "Mio").await;
        seed_edge(&store, a, b, "friend").await;
        seed_edge(&store, c, a, "admirer").await;

        // Act
        let (status, json) = send(
            app(state_with(store)),
            "GET",
            &format!("{BASE}/characters/{a}/relationships"),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["outgoing"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"]["outgoing"][0]["related_character"]["name"], "Ren");
        assert_eq!(json["data"]["incoming"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"]["incoming"][0]["character"]["name"], "Mio");
    }
}
