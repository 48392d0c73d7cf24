//! Command handlers for the characters context.
//!
//! Each handler validates the command, checks that every referenced record
//! belongs to the caller's novel, and only then writes to the store.

use tracing::{info, warn};
use yugen_core::clock::Clock;
use yugen_core::error::DomainError;
use yugen_core::model::{Character, CharacterState};
use yugen_core::repository::{CharacterRepository, CharacterStateRepository};

use crate::application::query_handlers::{get_character, get_state};
use crate::domain::commands::{
    CreateCharacter, CreateCharacterState, DeleteCharacter, DeleteCharacterState, UpdateCharacter,
    UpdateCharacterState,
};
use crate::domain::validation::{duplicate_state, state_attributes, validate_profile};

/// Handles `CreateCharacter`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the profile is invalid, or the store
/// error if the insert fails.
pub async fn handle_create_character(
    command: &CreateCharacter,
    clock: &dyn Clock,
    repo: &dyn CharacterRepository,
) -> Result<Character, DomainError> {
    validate_profile(&command.profile)?;

    let character = repo
        .insert_character(command.novel_id, &command.profile, clock.now())
        .await?;

    info!(character_id = %character.id, novel_id = %character.novel_id, "character created");
    Ok(character)
}

/// Handles `UpdateCharacter`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the character is not in the novel,
/// `DomainError::Validation` if the result is invalid.
pub async fn handle_update_character(
    command: UpdateCharacter,
    clock: &dyn Clock,
    repo: &dyn CharacterRepository,
) -> Result<Character, DomainError> {
    let mut character = get_character(command.novel_id, command.character_id, repo).await?;

    command.changes.apply_to(&mut character.profile);
    validate_profile(&character.profile)?;
    character.updated_at = clock.now();

    repo.update_character(&character).await?;
    Ok(character)
}

/// Handles `DeleteCharacter`: removes the character, every relationship it
/// takes part in (either direction), their logs and its states.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the character is not in the novel.
pub async fn handle_delete_character(
    command: &DeleteCharacter,
    repo: &dyn CharacterRepository,
) -> Result<(), DomainError> {
    let character = get_character(command.novel_id, command.character_id, repo).await?;
    repo.delete_character(character.id).await?;

    info!(character_id = %character.id, "character deleted with dependents");
    Ok(())
}

/// Handles `CreateCharacterState`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for missing ids or a duplicate
/// (character, episode) pair, `DomainError::NotFound` if the character is not
/// in the novel.
pub async fn handle_create_state(
    command: &CreateCharacterState,
    clock: &dyn Clock,
    characters: &dyn CharacterRepository,
    states: &dyn CharacterStateRepository,
) -> Result<CharacterState, DomainError> {
    let attributes = state_attributes(command)?;
    get_character(command.novel_id, attributes.character_id, characters).await?;

    if states
        .state_exists(attributes.character_id, attributes.episode_id, None)
        .await?
    {
        warn!(
            character_id = %attributes.character_id,
            episode_id = %attributes.episode_id,
            "duplicate character state rejected"
        );
        return Err(duplicate_state());
    }

    states.insert_state(&attributes, clock.now()).await
}

/// Handles `UpdateCharacterState`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the state, or a newly referenced
/// character, is not in the novel; `DomainError::Validation` if the update
/// would collide with another state of the same (character, episode).
pub async fn handle_update_state(
    command: UpdateCharacterState,
    clock: &dyn Clock,
    characters: &dyn CharacterRepository,
    states: &dyn CharacterStateRepository,
) -> Result<CharacterState, DomainError> {
    let mut state = get_state(command.novel_id, command.state_id, states)
        .await?
        .state;
    let previous_character = state.attributes.character_id;

    command.changes.apply_to(&mut state.attributes);

    if state.attributes.character_id != previous_character {
        get_character(command.novel_id, state.attributes.character_id, characters).await?;
    }
    if states
        .state_exists(
            state.attributes.character_id,
            state.attributes.episode_id,
            Some(state.id),
        )
        .await?
    {
        return Err(duplicate_state());
    }

    state.updated_at = clock.now();
    states.update_state(&state).await?;
    Ok(state)
}

/// Handles `DeleteCharacterState`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the state is not in the novel.
pub async fn handle_delete_state(
    command: &DeleteCharacterState,
    states: &dyn CharacterStateRepository,
) -> Result<(), DomainError> {
    let entry = get_state(command.novel_id, command.state_id, states).await?;
    states.delete_state(entry.state.id).await
}
