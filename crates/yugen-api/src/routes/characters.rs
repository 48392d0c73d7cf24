//! Routes for characters and their timelines.

use axum::extract::State;
use axum::response::Response;
use axum::{Router, routing::get};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use yugen_characters::application::{command_handlers, query_handlers};
use yugen_characters::domain::commands;
use yugen_core::ids::{CharacterId, EpisodeId};
use yugen_core::model::{CharacterProfile, EpisodeRange};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, blank_as_none, double_option};
use crate::response;
use crate::routes::{MemberPath, NovelPath, PageQuery};
use crate::state::AppState;

/// Request body for POST /characters.
#[derive(Debug, Default, Deserialize)]
pub struct CreateCharacterRequest {
    /// Display name; required.
    pub name: Option<String>,
    /// Age in years.
    pub age: Option<i32>,
    /// Physical description.
    pub appearance: Option<String>,
    /// Skills and powers.
    pub abilities: Option<String>,
    /// Temperament and traits.
    pub personality: Option<String>,
    /// How the character talks.
    pub speech_style: Option<String>,
    /// Backstory.
    pub background: Option<String>,
    /// Story role, e.g. `protagonist`.
    pub role: Option<String>,
}

/// Request body for PUT/PATCH /characters/{id}. Absent fields are kept;
/// `null` clears a nullable field.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCharacterRequest {
    /// Display name; required.
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    /// Age in years.
    #[serde(default, deserialize_with = "double_option")]
    pub age: Option<Option<i32>>,
    /// Physical description.
    #[serde(default, deserialize_with = "double_option")]
    pub appearance: Option<Option<String>>,
    /// Skills and powers.
    #[serde(default, deserialize_with = "double_option")]
    pub abilities: Option<Option<String>>,
    /// Temperament and traits.
    #[serde(default, deserialize_with = "double_option")]
    pub personality: Option<Option<String>>,
    /// How the character talks.
    #[serde(default, deserialize_with = "double_option")]
    pub speech_style: Option<Option<String>>,
    /// Backstory.
    #[serde(default, deserialize_with = "double_option")]
    pub background: Option<Option<String>>,
    /// Story role, e.g. `protagonist`.
    #[serde(default, deserialize_with = "double_option")]
    pub role: Option<Option<String>>,
}

/// Query for GET /characters/{id}/timeline.
#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    /// Lowest episode to include.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub from_episode: Option<EpisodeId>,
    /// Highest episode to include.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub to_episode: Option<EpisodeId>,
}

/// GET /characters
#[instrument(skip(state, path, paging), fields(novel_id = %path.novel_id))]
async fn list_characters(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiQuery(paging): ApiQuery<PageQuery>,
) -> Result<Response, ApiError> {
    let page =
        query_handlers::list_characters(path.novel_id, paging.request(), &*state.characters)
            .await?;
    Ok(response::paginated(page))
}

/// POST /characters
#[instrument(skip(state, path, request), fields(novel_id = %path.novel_id))]
async fn create_character(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiJson(request): ApiJson<CreateCharacterRequest>,
) -> Result<Response, ApiError> {
    let command = commands::CreateCharacter {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        profile: CharacterProfile {
            name: request.name.unwrap_or_default(),
            age: request.age,
            appearance: request.appearance,
            abilities: request.abilities,
            personality: request.personality,
            speech_style: request.speech_style,
            background: request.background,
            role: request.role,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling create_character command");

    let character = command_handlers::handle_create_character(
        &command,
        state.clock.as_ref(),
        &*state.characters,
    )
    .await?;
    Ok(response::created(character))
}

/// GET /characters/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, character_id = path.id))]
async fn show_character(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let character =
        query_handlers::get_character(path.novel_id, CharacterId(path.id), &*state.characters)
            .await?;
    Ok(response::ok(character))
}

/// PUT/PATCH /characters/{id}
#[instrument(skip(state, path, request), fields(novel_id = %path.novel_id, character_id = path.id))]
async fn update_character(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
    ApiJson(request): ApiJson<UpdateCharacterRequest>,
) -> Result<Response, ApiError> {
    let command = commands::UpdateCharacter {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        character_id: CharacterId(path.id),
        changes: commands::CharacterChanges {
            // An explicit null name is stored as blank so validation rejects it.
            name: request.name.map(Option::unwrap_or_default),
            age: request.age,
            appearance: request.appearance,
            abilities: request.abilities,
            personality: request.personality,
            speech_style: request.speech_style,
            background: request.background,
            role: request.role,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling update_character command");

    let character =
        command_handlers::handle_update_character(command, state.clock.as_ref(), &*state.characters)
            .await?;
    Ok(response::ok(character))
}

/// DELETE /characters/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, character_id = path.id))]
async fn delete_character(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let command = commands::DeleteCharacter {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        character_id: CharacterId(path.id),
    };

    info!(correlation_id = %command.correlation_id, "handling delete_character command");

    command_handlers::handle_delete_character(&command, &*state.characters).await?;
    Ok(response::no_content())
}

/// GET /characters/{id}/timeline
#[instrument(skip(state, path, query), fields(novel_id = %path.novel_id, character_id = path.id))]
async fn character_timeline(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
    ApiQuery(query): ApiQuery<TimelineQuery>,
) -> Result<Response, ApiError> {
    let range = EpisodeRange {
        from: query.from_episode,
        to: query.to_episode,
    };
    let timeline = query_handlers::character_timeline(
        path.novel_id,
        CharacterId(path.id),
        range,
        &*state.characters,
        &*state.states,
    )
    .await?;
    Ok(response::ok(timeline))
}

/// Returns the router for characters.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/characters", get(list_characters).post(create_character))
        .route(
            "/characters/{id}",
            get(show_character)
                .put(update_character)
                .patch(update_character)
                .delete(delete_character),
        )
        .route("/characters/{id}/timeline", get(character_timeline))
}
