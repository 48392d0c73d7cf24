//! Routes for per-episode character states.

use axum::extract::State;
use axum::response::Response;
use axum::{Router, routing::get};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use yugen_characters::application::{command_handlers, query_handlers};
use yugen_characters::domain::commands;
use yugen_core::ids::{CharacterId, CharacterStateId, EpisodeId};
use yugen_core::model::{EpisodeRange, StateFilter};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, blank_as_none, double_option};
use crate::response;
use crate::routes::{MemberPath, NovelPath, PageQuery};
use crate::state::AppState;

/// Request body for POST /character_states.
#[derive(Debug, Default, Deserialize)]
pub struct CreateStateRequest {
    /// The character the record belongs to.
    pub character_id: Option<CharacterId>,
    /// Episode the record refers to.
    pub episode_id: Option<EpisodeId>,
    /// Where the character is.
    pub location: Option<String>,
    /// How the character feels.
    pub emotional_state: Option<String>,
    /// Injuries, fatigue and the like.
    pub physical_state: Option<String>,
    /// What the character knows by this episode.
    pub knowledge: Option<String>,
    /// Items carried, in order.
    pub inventory: Option<Vec<String>>,
    /// Free-form author notes.
    pub notes: Option<String>,
}

/// Request body for PUT/PATCH /character_states/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateStateRequest {
    /// The character the record belongs to.
    pub character_id: Option<CharacterId>,
    /// Episode the record refers to.
    pub episode_id: Option<EpisodeId>,
    /// Where the character is.
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    /// How the character feels.
    #[serde(default, deserialize_with = "double_option")]
    pub emotional_state: Option<Option<String>>,
    /// Injuries, fatigue and the like.
    #[serde(default, deserialize_with = "double_option")]
    pub physical_state: Option<Option<String>>,
    /// What the character knows by this episode.
    #[serde(default, deserialize_with = "double_option")]
    pub knowledge: Option<Option<String>>,
    /// Items carried, in order.
    #[serde(default, deserialize_with = "double_option")]
    pub inventory: Option<Option<Vec<String>>>,
    /// Free-form author notes.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// List filters for GET /character_states.
#[derive(Debug, Default, Deserialize)]
pub struct StateQuery {
    /// Episode to filter or snapshot on.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub episode_id: Option<EpisodeId>,
    /// Only states of this character.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub character_id: Option<CharacterId>,
    /// Lowest episode to include.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub from_episode: Option<EpisodeId>,
    /// Highest episode to include.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub to_episode: Option<EpisodeId>,
}

impl StateQuery {
    fn filter(self) -> StateFilter {
        StateFilter {
            episode_id: self.episode_id,
            character_id: self.character_id,
            range: EpisodeRange {
                from: self.from_episode,
                to: self.to_episode,
            },
        }
    }
}

/// GET /character_states
#[instrument(skip(state, path, paging, query), fields(novel_id = %path.novel_id))]
async fn list_states(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiQuery(paging): ApiQuery<PageQuery>,
    ApiQuery(query): ApiQuery<StateQuery>,
) -> Result<Response, ApiError> {
    let page = query_handlers::list_states(
        path.novel_id,
        query.filter(),
        paging.request(),
        &*state.states,
    )
    .await?;
    Ok(response::paginated(page))
}

/// POST /character_states
#[instrument(skip(state, path, request), fields(novel_id = %path.novel_id))]
async fn create_state(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<NovelPath>,
    ApiJson(request): ApiJson<CreateStateRequest>,
) -> Result<Response, ApiError> {
    let command = commands::CreateCharacterState {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        character_id: request.character_id,
        episode_id: request.episode_id,
        location: request.location,
        emotional_state: request.emotional_state,
        physical_state: request.physical_state,
        knowledge: request.knowledge,
        inventory: request.inventory.unwrap_or_default(),
        notes: request.notes,
    };

    info!(correlation_id = %command.correlation_id, "handling create_character_state command");

    let created = command_handlers::handle_create_state(
        &command,
        state.clock.as_ref(),
        &*state.characters,
        &*state.states,
    )
    .await?;
    Ok(response::created(created))
}

/// GET /character_states/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, state_id = path.id))]
async fn show_state(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let entry =
        query_handlers::get_state(path.novel_id, CharacterStateId(path.id), &*state.states).await?;
    Ok(response::ok(entry))
}

/// PUT/PATCH /character_states/{id}
#[instrument(skip(state, path, request), fields(novel_id = %path.novel_id, state_id = path.id))]
async fn update_state(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
    ApiJson(request): ApiJson<UpdateStateRequest>,
) -> Result<Response, ApiError> {
    let command = commands::UpdateCharacterState {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        state_id: CharacterStateId(path.id),
        changes: commands::StateChanges {
            character_id: request.character_id,
            episode_id: request.episode_id,
            location: request.location,
            emotional_state: request.emotional_state,
            physical_state: request.physical_state,
            knowledge: request.knowledge,
            inventory: request.inventory.map(Option::unwrap_or_default),
            notes: request.notes,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling update_character_state command");

    let updated = command_handlers::handle_update_state(
        command,
        state.clock.as_ref(),
        &*state.characters,
        &*state.states,
    )
    .await?;
    Ok(response::ok(updated))
}

/// DELETE /character_states/{id}
#[instrument(skip(state, path), fields(novel_id = %path.novel_id, state_id = path.id))]
async fn delete_state(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<MemberPath>,
) -> Result<Response, ApiError> {
    let command = commands::DeleteCharacterState {
        correlation_id: Uuid::new_v4(),
        novel_id: path.novel_id,
        state_id: CharacterStateId(path.id),
    };

    info!(correlation_id = %command.correlation_id, "handling delete_character_state command");

    command_handlers::handle_delete_state(&command, &*state.states).await?;
    Ok(response::no_content())
}

/// Returns the router for character states.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/character_states", get(list_states).post(create_state))
        .route(
            "/character_states/{id}",
            get(show_state)
                .put(update_state)
                .patch(update_state)
                .delete(delete_state),
        )
}
