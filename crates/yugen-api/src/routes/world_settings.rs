//! Routes for world settings.

use axum::extract::State;
use axum::response::Response;
use axum::{Router, routing::get};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use yugen_core::ids::WorldSettingId;
use yugen_world::application::{command_handlers, query_handlers};
use yugen_world::domain::commands;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, blank_as_none, double_option};
use crate::response;
use crate::routes::{MemberPath, NovelPath, PageQuery, parse_token};
use crate::state::AppState;

/// Request body for POST /world_settings.
#[derive(Debug, Default, Deserialize)]
pub struct CreateWorldSettingRequest {
    /// Category token, e.g. `magic`.
    pub category: Option<String>,
    /// Short title; required.
    pub title: Option<String>,
    /// Prose description.
    pub description: Option<String>,
    /// Arbitrary JSON object of structured details.
    pub details: Option<Value>,
}

/// Request body for PUT/PATCH /world_settings/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWorldSettingRequest {
    /// Category token, e.g. `magic`.
    pub category: Option<String>,
    /// Short title; required.
    pub title: Option<String>,
    /// Prose description.
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    /// Arbitrary JSON object of structured details.
    #[serde(default, deserialize_with = "double_option")]
    pub details: Option<Option<Value>>,
}

/// List filter for GET /world_settings.
#[derive(Debug, Default, Deserialize)]
pub struct WorldSettingQuery {
    /// Category token, e.g. `magic`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<String>,
}

/// GET /world_settings
#[instrument(skip(state, path, paging, query), fields(novel_id = %path.novel_id))]
async fn list_world_settings(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiQuery(paging): ApiQuery<PageQuery>,
    ApiQuery(query): ApiQuery<WorldSettingQuery>,
) -> Result<Response, ApiError> {
    let category = parse_token(query.category.as_deref())?;
    let page = query_handlers::list_world_settings(
        path.novel_id,
        category,
        paging.request(),
        &*state.world_settings,
    )
    .await?;
    Ok(response::paginated(page))
}

/// POST /world_settings
#[instrument(skip(state, path, request), fields(novel_id = %path.novel_id))]
async fn create_world_setting(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiJson(request): ApiJson<CreateWorldSettingRequest>,
) -> Result<Response, ApiError> {
    let command = commands::CreateWorldSetting {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        category: request.category,
        title: request.title,
        description: request.description,
        details: request.details,
    };

    info!(correlation_id = %command.correlation_id, "handling create_world_setting command");

    let setting = command_handlers::handle_create_world_setting(
        &command,
        state.clock.as_ref(),
        &*state.world_settings,
    )
    .await?;
    Ok(response::created(setting))
}

/// GET /world_settings/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, world_setting_id = path.id))]
async fn show_world_setting(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let setting = query_handlers::get_world_setting(
        path.novel_id,
        WorldSettingId(path.id),
        &*state.world_settings,
    )
    .await?;
    Ok(response::ok(setting))
}

/// PUT/PATCH /world_settings/{id}
#[instrument(
    skip(state, path, request),
    fields(novel_id = %path.novel_id, world_setting_id = path.id)
)]
async fn update_world_setting(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
    ApiJson(request): ApiJson<UpdateWorldSettingRequest>,
) -> Result<Response, ApiError> {
    let command = commands::UpdateWorldSetting {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        world_setting_id: WorldSettingId(path.id),
        changes: commands::WorldSettingChanges {
            category: request.category,
            title: request.title,
            description: request.description,
            details: request.details.map(|raw| raw.unwrap_or(Value::Null)),
        },
    };

    info!(correlation_id = %command.correlation_id, "handling update_world_setting command");

    let setting = command_handlers::handle_update_world_setting(
        command,
        state.clock.as_ref(),
        &*state.world_settings,
    )
    .await?;
    Ok(response::ok(setting))
}

/// DELETE /world_settings/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, world_setting_id = path.id))]
async fn delete_world_setting(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let command = commands::DeleteWorldSetting {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        world_setting_id: WorldSettingId(path.id),
    };

    info!(correlation_id = %command.correlation_id, "handling delete_world_setting command");

    command_handlers::handle_delete_world_setting(&command, &*state.world_settings).await?;
    Ok(response::no_content())
}

/// Returns the router for world settings.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/world_settings",
            get(list_world_settings).post(create_world_setting),
        )
        .route(
            "/world_settings/{id}",
            get(show_world_setting)
                .put(update_world_setting)
                .patch(update_world_setting)
                .delete(delete_world_setting),
        )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;
    use yugen_core::ids::{NovelId, WorldSettingId};
    use yugen_core::model::WorldSettingCategory;
    use yugen_core::repository::WorldSettingRepository;
    use yugen_test_support::{FixedClock, InMemoryStore, fixtures};

    use crate::routes::test_support::{app, send, state_with};

    const BASE: &str = "/api/v1/novels/1";

    async fn seed(
        store: &InMemoryStore,
        category: WorldSettingCategory,
        title: &str,
    ) -> WorldSettingId {
        store
            .insert_world_setting(
                NovelId(1),
                &fixtures::world_setting(category, title),
                FixedClock::standard().0,
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_defaults_details_to_empty_object() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));

        let (status, json) = send(
            app,
            "POST",
            &format!("{BASE}/world_settings"),
            Some(json!({ "category": "magic", "title": "Tide runes" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["category"], "magic");
        assert_eq!(json["data"]["details"], json!({}));
    }

    #[tokio::test]
    async fn test_create_keeps_nested_details() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));
        let details = json!({ "cost": { "stamina": 3 }, "schools": ["tide", "ember"] });

        let (_, json) = send(
            app,
            "POST",
            &format!("{BASE}/world_settings"),
            Some(json!({ "category": "magic", "title": "Tide runes", "details": details })),
        )
        .await;

        assert_eq!(json["data"]["details"], details);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_returns_422() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));

        let (status, json) = send(
            app,
            "POST",
            &format!("{BASE}/world_settings"),
            Some(json!({ "category": "cuisine", "title": "Street food" })),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["error"]["details"][0]["field"], "category");
    }

    #[tokio::test]
    async fn test_list_filters_by_category() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        seed(&store, WorldSettingCategory::Geography, "Northern reach").await;
        seed(&store, WorldSettingCategory::History, "The long winter").await;
        seed(&store, WorldSettingCategory::Geography, "Salt flats").await;

        // Act
        let (status, json) = send(
            app(state_with(store)),
            "GET",
            &format!("{BASE}/world_settings?category=geography"),
            None,
        )
        .await;

        // Assert
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["data"][1]["title"], "Salt flats");
    }

    #[tokio::test]
    async fn test_list_ignores_blank_category() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, WorldSettingCategory::Geography, "Northern reach").await;
        seed(&store, WorldSettingCategory::History, "The long winter").await;

        let (status, json) = send(
            app(state_with(store)),
            "GET",
            &format!("{BASE}/world_settings?category="),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["meta"]["total"], 2);
    }

    #[tokio::test]
    async fn test_list_with_unknown_category_returns_422() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));

        let (status, _) = send(
            app,
            "GET",
            &format!("{BASE}/world_settings?category=cuisine"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_update_replaces_details_and_rejects_arrays() {
        // Arrange
        let store = Arc::new(InMemoryStore::new());
        let id = seed(&store, WorldSettingCategory::Politics, "Council").await;
        let uri = format!("{BASE}/world_settings/{id}");

        // Act
        let (ok, json) = send(
            app(state_with(store.clone())),
            "PATCH",
            &uri,
            Some(json!({ "details": { "seats": 7 } })),
        )
        .await;
        let (rejected, _) = send(
            app(state_with(store)),
            "PATCH",
            &uri,
            Some(json!({ "details": [1, 2] })),
        )
        .await;

        // Assert
        assert_eq!(ok, StatusCode::OK);
        assert_eq!(json["data"]["details"], json!({ "seats": 7 }));
        assert_eq!(rejected, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_delete_world_setting_returns_204() {
        let store = Arc::new(InMemoryStore::new());
        let id = seed(&store, WorldSettingCategory::Culture, "Festivals").await;

        let (status, _) = send(
            app(state_with(store.clone())),
            "DELETE",
            &format!("{BASE}/world_settings/{id}"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(
            store
                .find_world_setting(NovelId(1), id)
                .await
                .unwrap()
                .is_none()
        );
    }
}
