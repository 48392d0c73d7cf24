//! Route for the per-episode context summary.

use axum::extract::State;
use axum::response::Response;
use axum::{Router, routing::get};
use serde::Deserialize;
use tracing::instrument;

use yugen_context::application::query_handlers;
use yugen_core::ids::EpisodeId;

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery, blank_as_none};
use crate::response;
use crate::routes::NovelPath;
use crate::state::AppState;

/// Query for GET /context_summary.
#[derive(Debug, Default, Deserialize)]
pub struct ContextQuery {
    /// Episode to filter or snapshot on.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub episode_id: Option<EpisodeId>,
}

/// GET /context_summary
#[instrument(skip(state, path, query), fields(novel_id = %path.novel_id))]
async fn context_summary(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiQuery(query): ApiQuery<ContextQuery>,
) -> Result<Response, ApiError> {
    let summary =
        query_handlers::get_context_summary(path.novel_id, query.episode_id, &*state.context)
            .await?;
    Ok(response::ok(summary))
}

/// Returns the router for the context summary.
pub fn router() -> Router<AppState> {
    Router::new().route("/context_summary", get(context_summary))
}
