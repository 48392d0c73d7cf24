//! Read-only routes for relationship change logs.

use axum::extract::State;
use axum::response::Response;
use axum::{Router, routing::get};
use serde::Deserialize;
use tracing::instrument;

use yugen_core::ids::{EpisodeId, RelationshipLogId};
use yugen_relationships::application::query_handlers;

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, blank_as_none};
use crate::response;
use crate::routes::{MemberPath, NovelPath, PageQuery};
use crate::state::AppState;

/// List filter for GET /relationship_logs.
#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    /// Episode to filter or snapshot on.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub episode_id: Option<EpisodeId>,
}

/// GET /relationship_logs
#[instrument(skip(state, path, paging, query), fields(novel_id = %path.novel_id))]
async fn list_logs(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiQuery(paging): ApiQuery<PageQuery>,
    ApiQuery(query): ApiQuery<LogQuery>,
) -> Result<Response, ApiError> {
    let page = query_handlers::list_logs(
        path.novel_id,
        query.episode_id,
        paging.request(),
        &*state.relationship_logs,
    )
    .await?;
    Ok(response::paginated(page))
}

/// GET /relationship_logs/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, log_id = path.id))]
async fn show_log(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let entry = query_handlers::get_log(
        path.novel_id,
        RelationshipLogId(path.id),
        &*state.relationship_logs,
    )
    .await?;
    Ok(response::ok(entry))
}

/// Returns the router for relationship logs.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/relationship_logs", get(list_logs))
        .route("/relationship_logs/{id}", get(show_log))
}
