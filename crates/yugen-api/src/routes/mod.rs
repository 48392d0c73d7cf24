//! Route modules organized by resource.

pub mod character_relationships;
pub mod character_states;
pub mod characters;
pub mod context_summary;
pub mod foreshadowings;
pub mod health;
pub mod relationship_logs;
pub mod world_settings;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Deserialize;
use yugen_core::ids::NovelId;
use yugen_core::pagination::PageRequest;

use crate::error::{ApiError, ErrorCode};
use crate::extract::blank_as_none;
use crate::state::AppState;

/// Path of a novel-scoped collection.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NovelPath {
    /// The novel every read and write is scoped to.
    pub novel_id: NovelId,
}

/// Path of one member of a novel-scoped collection.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MemberPath {
    /// The novel every read and write is scoped to.
    pub novel_id: NovelId,
    /// The member's id.
    pub id: i64,
}

/// `page` / `per_page` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<i64>,
    /// Page size, capped at 100.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub per_page: Option<i64>,
}

impl PageQuery {
    /// The clamped page request.
    #[must_use]
    pub fn request(self) -> PageRequest {
        PageRequest::new(self.page, self.per_page)
    }
}

/// Parses an optional closed-set token from the query string.
fn parse_token<T>(raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr<Err = yugen_core::error::DomainError>,
{
    raw.map(str::parse).transpose().map_err(ApiError::from)
}

async fn route_not_found() -> Response {
    let body = serde_json::json!({
        "success": false,
        "error": { "code": ErrorCode::NotFound, "message": "route not found" },
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Resources of one novel, relative to `/api/v1/novels/{novel_id}`.
fn novel_router() -> Router<AppState> {
    Router::new()
        .merge(characters::router())
        .merge(character_states::router())
        .merge(character_relationships::router())
        .merge(relationship_logs::router())
        .merge(foreshadowings::router())
        .merge(world_settings::router())
        .merge(context_summary::router())
}

/// The full application router without middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/novels/{novel_id}", novel_router())
        .fallback(route_not_found)
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use yugen_test_support::InMemoryStore;

    use super::test_support::{app, send, state_with};

    #[tokio::test]
    async fn test_unknown_route_returns_enveloped_404() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));

        let (status, json) = send(app, "GET", "/api/v1/novels/1/chapters", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_non_numeric_novel_id_is_bad_request() {
        let app = app(state_with(Arc::new(InMemoryStore::new())));

        let (status, json) = send(app, "GET", "/api/v1/novels/abc/characters", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }
}
