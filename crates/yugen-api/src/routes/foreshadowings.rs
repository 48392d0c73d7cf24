//! Routes for foreshadowing entries and their lifecycle.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use axum::{
    Router,
    routing::{get, patch},
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use yugen_core::ids::{EpisodeId, ForeshadowingId};
use yugen_core::model::ForeshadowingFilter;
use yugen_foreshadowing::application::{command_handlers, query_handlers};
use yugen_foreshadowing::domain::commands;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, blank_as_none, double_option, optional_json};
use crate::response;
use crate::routes::{MemberPath, NovelPath, PageQuery, parse_token};
use crate::state::AppState;

/// Request body for POST /foreshadowings.
#[derive(Debug, Default, Deserialize)]
pub struct CreateForeshadowingRequest {
    /// Short title; required.
    pub title: Option<String>,
    /// What was planted.
    pub description: Option<String>,
    /// Episode the thread was planted in.
    pub planted_episode_id: Option<EpisodeId>,
    /// Episode the thread was resolved in.
    pub resolved_episode_id: Option<EpisodeId>,
    /// Episode number the author plans to pay it off in.
    pub planned_resolution_episode: Option<i32>,
    /// Status token, e.g. `planted`.
    pub status: Option<String>,
    /// Importance token, e.g. `major`.
    pub importance: Option<String>,
}

/// Request body for PUT/PATCH /foreshadowings/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateForeshadowingRequest {
    /// Short title; required.
    pub title: Option<String>,
    /// What was planted.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Episode the thread was planted in.
    #[serde(default, deserialize_with = "double_option")]
    pub planted_episode_id: Option<Option<EpisodeId>>,
    /// Episode the thread was resolved in.
    #[serde(default, deserialize_with = "double_option")]
    pub resolved_episode_id: Option<Option<EpisodeId>>,
    /// Episode number the author plans to pay it off in.
    #[serde(default, deserialize_with = "double_option")]
    pub planned_resolution_episode: Option<Option<i32>>,
    /// Status token, e.g. `planted`.
    pub status: Option<String>,
    /// Importance token, e.g. `major`.
    pub importance: Option<String>,
}

/// Body of PATCH /foreshadowings/{id}/resolve.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveRequest {
    /// Episode in which the thread pays off.
    pub resolved_episode_id: Option<EpisodeId>,
}

/// Query of PATCH /foreshadowings/{id}/resolve, used when the body omits the
/// episode.
#[derive(Debug, Default, Deserialize)]
pub struct ResolveQuery {
    /// Episode in which the thread pays off.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub resolved_episode_id: Option<EpisodeId>,
}

/// List filters for GET /foreshadowings.
#[derive(Debug, Default, Deserialize)]
pub struct ForeshadowingQuery {
    /// Status token, e.g. `planted`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<String>,
    /// Importance token, e.g. `major`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub importance: Option<String>,
}

/// GET /foreshadowings
#[instrument(skip(state, path, paging, query), fields(novel_id = %path.novel_id))]
async fn list_foreshadowings(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiQuery(paging): ApiQuery<PageQuery>,
    ApiQuery(query): ApiQuery<ForeshadowingQuery>,
) -> Result<Response, ApiError> {
    let filter = ForeshadowingFilter {
        status: parse_token(query.status.as_deref())?,
        importance: parse_token(query.importance.as_deref())?,
    };
    let page = query_handlers::list_foreshadowings(
        path.novel_id,
        filter,
        paging.request(),
        &*state.foreshadowings,
    )
    .await?;
    Ok(response::paginated(page))
}

/// POST /foreshadowings
#[instrument(skip(state, path, request), fields(novel_id = %path.novel_id))]
async fn create_foreshadowing(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiJson(request): ApiJson<CreateForeshadowingRequest>,
) -> Result<Response, ApiError> {
    let command = commands::CreateForeshadowing {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        title: request.title,
        description: request.description,
        planted_episode_id: request.planted_episode_id,
        resolved_episode_id: request.resolved_episode_id,
        planned_resolution_episode: request.planned_resolution_episode,
        status: parse_token(request.status.as_deref())?,
        importance: parse_token(request.importance.as_deref())?,
    };

    info!(correlation_id = %command.correlation_id, "handling create_foreshadowing command");

    let foreshadowing = command_handlers::handle_create_foreshadowing(
        &command,
        state.clock.as_ref(),
        &*state.foreshadowings,
    )
    .await?;
    Ok(response::created(foreshadowing))
}

/// GET /foreshadowings/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, foreshadowing_id = path.id))]
async fn show_foreshadowing(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let foreshadowing = query_handlers::get_foreshadowing(
        path.novel_id,
        ForeshadowingId(path.id),
        &*state.foreshadowings,
    )
    .await?;
    Ok(response::ok(foreshadowing))
}

/// PUT/PATCH /foreshadowings/{id}
#[instrument(
    skip(state, path, request),
    fields(novel_id = %path.novel_id, foreshadowing_id = path.id)
)]
async fn update_foreshadowing(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
    ApiJson(request): ApiJson<UpdateForeshadowingRequest>,
) -> Result<Response, ApiError> {
    let command = commands::UpdateForeshadowing {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        foreshadowing_id: ForeshadowingId(path.id),
        changes: commands::ForeshadowingChanges {
            title: request.title,
            description: request.description,
            planted_episode_id: request.planted_episode_id,
            resolved_episode_id: request.resolved_episode_id,
            planned_resolution_episode: request.planned_resolution_episode,
            status: parse_token(request.status.as_deref())?,
            importance: parse_token(request.importance.as_deref())?,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling update_foreshadowing command");

    let foreshadowing = command_handlers::handle_update_foreshadowing(
        command,
        state.clock.as_ref(),
        &*state.foreshadowings,
    )
    .await?;
    Ok(response::ok(foreshadowing))
}

/// DELETE /foreshadowings/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, foreshadowing_id = path.id))]
async fn delete_foreshadowing(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let command = commands::DeleteForeshadowing {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        foreshadowing_id: ForeshadowingId(path.id),
    };

    info!(correlation_id = %command.correlation_id, "handling delete_foreshadowing command");

    command_handlers::handle_delete_foreshadowing(&command, &*state.foreshadowings).await?;
    Ok(response::no_content())
}

/// PATCH /foreshadowings/{id}/resolve
///
/// `resolved_episode_id` is read from the JSON body, falling back to the
/// query string. The body may be empty.
#[instrument(
    skip(state, path, query, body),
    fields(novel_id = %path.novel_id, foreshadowing_id = path.id)
)]
async fn resolve_foreshadowing(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
    ApiQuery(query): ApiQuery<ResolveQuery>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: ResolveRequest = optional_json(&body)?;
    let command = commands::ResolveForeshadowing {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        foreshadowing_id: ForeshadowingId(path.id),
        resolved_episode_id: request.resolved_episode_id.or(query.resolved_episode_id),
    };

    info!(correlation_id = %command.correlation_id, "handling resolve_foreshadowing command");

    let foreshadowing = command_handlers::handle_resolve_foreshadowing(
        &command,
        state.clock.as_ref(),
        &*state.foreshadowings,
    )
    .await?;
    Ok(response::ok(foreshadowing))
}

/// PATCH /foreshadowings/{id}/abandon
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, foreshadowing_id = path.id))]
async fn abandon_foreshadowing(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let command = commands::AbandonForeshadowing {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        foreshadowing_id: ForeshadowingId(path.id),
    };

    info!(correlation_id = %command.correlation_id, "handling abandon_foreshadowing command");

    let foreshadowing = command_handlers::handle_abandon_foreshadowing(
        &command,
        state.clock.as_ref(),
        &*state.foreshadowings,
    )
    .await?;
    Ok(response::ok(foreshadowing))
}

/// Returns the router for foreshadowing entries.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/foreshadowings",
            get(list_foreshadowings).post(create_foreshadowing),
        )
        .route(
            "/foreshadowings/{id}",
            get(show_foreshadowing)
                .put(update_foreshadowing)
                .patch(update_foreshadowing)
                .delete(delete_foreshadowing),
        )
        .route("/foreshadowings/{id}/resolve", patch(resolve_foreshadowing))
        .route("/foreshadowings/{id}/abandon", patch(abandon_foreshadowing))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use yugen_core::ids::{EpisodeId, ForeshadowingId, NovelId};
    use yugen_core::model::{ForeshadowingStatus, Importance};
    use yugen_core::repository::ForeshadowingRepository;
    use yugen_test_support::{FixedClock, InMemoryStore, fixtures};

    use crate::routes::test_support::{app, send, state_with};

    const BASE: &str = "/api/v1/novels/1";

    async fn seed(store: &InMemoryStore, novel: i64, title: &str) -> ForeshadowingId {
        store
            .insert_foreshadowing(
                NovelId(novel),
                &fixtures::foreshadowing(title),
                FixedClock::standard().0,
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_fills_status_and_importance_defaults() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));

        let (status, json) = send(
            app,
            "POST",
            &format!("{BASE}/foreshadowings"),
            Some(json!({ "title": "The locked door", "planted_episode_id": 2 })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["status"], "planted");
        assert_eq!(json["data"]["importance"], "normal");
        assert_eq!(json["data"]["planted_episode_id"], 2);
    }

    #[tokio::test]
    async fn test_create_with_unknown_status_returns_422() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));

        let (status, json) = send(
            app,
            "POST",
            &format!("{BASE}/foreshadowings"),
            Some(json!({ "title": "Ghost", "status": "forgotten" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["field"], "status");
    }

    #[tokio::test]
    async fn test_list_filters_by_status_and_importance() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let at = FixedClock::standard().0;
        let mut critical = fixtures::foreshadowing("Prophecy");
        critical.importance = Importance::Critical;
        store
            .insert_foreshadowing(NovelId(1), &critical, at)
            .await
            .unwrap();
        let mut resolved = fixtures::foreshadowing("Letter");
        resolved.status = ForeshadowingStatus::Resolved;
        resolved.importance = Importance::Critical;
        store
            .insert_foreshadowing(NovelId(1), &resolved, at)
            .await
            .unwrap();
        seed(&store, 1, "Scar").await;

        // Act
        let (status, json) = send(
            app(state_with(store)),
            "GET",
            &format!("{BASE}/foreshadowings?status=planted&importance=critical"),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["meta"]["total"], 1);
        assert_eq!(json["data"][0]["title"], "Prophecy");
    }

    #[tokio::test]
    async fn test_list_ignores_blank_filters() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, 1, "Scar").await;
        seed(&store, 1, "Letter").await;

        let (status, json) = send(
            app(state_with(store)),
            "GET",
            &format!("{BASE}/foreshadowings?status=&importance=&page=&per_page="),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["meta"]["page"], 1);
        assert_eq!(json["meta"]["per_page"], 20);
    }

    #[tokio::test]
    async fn test_list_with_unknown_importance_returns_422() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));

        let (status, json) = send(
            app,
            "GET",
            &format!("{BASE}/foreshadowings?importance=huge"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["field"], "importance");
    }

    #[tokio::test]
    async fn test_resolve_sets_status_and_episode() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed(&store, 1, "The locked door").await;

        let (status, json) = send(
            app(state_with(store)),
            "PATCH",
            &format!("{BASE}/foreshadowings/{id}/resolve"),
            Some(json!({ "resolved_episode_id": 9 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "resolved");
        assert_eq!(json["data"]["resolved_episode_id"], 9);
    }

    #[tokio::test]
    async fn test_resolve_reads_episode_from_query_string() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed(&store, 1, "The locked door").await;

        let (status, json) = send(
            app(state_with(store)),
            "PATCH",
            &format!("{BASE}/foreshadowings/{id}/resolve?resolved_episode_id=4"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["resolved_episode_id"], 4);
    }

    #[tokio::test]
    async fn test_resolve_without_episode_returns_400_and_leaves_entry() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let id = seed(&store, 1, "The locked door").await;

        // Act
        let (status, json) = send(
            app(state_with(store.clone())),
            "PATCH",
            &format!("{BASE}/foreshadowings/{id}/resolve"),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        let stored = store
            .find_foreshadowing(NovelId(1), id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.attributes.status, ForeshadowingStatus::Planted);
    }

    #[tokio::test]
    async fn test_resolve_unknown_entry_returns_404_before_parameter_check() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));

        let (status, _) = send(
            app,
            "PATCH",
            &format!("{BASE}/foreshadowings/404/resolve"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_abandon_keeps_resolved_episode() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let mut attributes = fixtures::foreshadowing("Letter");
        attributes.status = ForeshadowingStatus::Resolved;
        attributes.resolved_episode_id = Some(EpisodeId(6));
        let id = store
            .insert_foreshadowing(NovelId(1), &attributes, FixedClock::standard().0)
            .await
            .unwrap()
            .id;

        // Act
        let (status, json) = send(
            app(state_with(store)),
            "PATCH",
            &format!("{BASE}/foreshadowings/{id}/abandon"),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "abandoned");
        assert_eq!(json["data"]["resolved_episode_id"], 6);
    }

    #[tokio::test]
    async fn test_update_changes_status_and_clears_description() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let mut attributes = fixtures::foreshadowing("Scar");
        attributes.description = Some("on the left hand".to_owned());
        let id = store
            .insert_foreshadowing(NovelId(1), &attributes, FixedClock::standard().0)
            .await
            .unwrap()
            .id;

        // Act
        let (status, json) = send(
            app(state_with(store)),
            "PUT",
            &format!("{BASE}/foreshadowings/{id}"),
            Some(json!({ "status": "hinted", "description": null })),
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "hinted");
        assert_eq!(json["data"]["description"], Value::Null);
        assert_eq!(json["data"]["title"], "Scar");
    }

    #[tokio::test]
    async fn test_entry_of_other_novel_is_not_deleted() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed(&store, 2, "Elsewhere").await;

        let (status, _) = send(
            app(state_with(store.clone())),
            "DELETE",
            &format!("{BASE}/foreshadowings/{id}"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(
            store
                .find_foreshadowing(NovelId(2), id)
                .await
                .unwrap()
                .is_some()
        );
    }
}
