//! Write-time checks for characters and states.

use yugen_core::error::DomainError;
use yugen_core::model::{CharacterProfile, StateAttributes};
use yugen_core::validation::{TAKEN, Validator};

use super::commands::CreateCharacterState;

/// Checks the required fields of a character profile.
///
/// # Errors
///
/// Returns `DomainError::Validation` when `name` is blank.
pub fn validate_profile(profile: &CharacterProfile) -> Result<(), DomainError> {
    let mut v = Validator::new();
    v.require_text("name", &profile.name);
    v.finish()
}

/// Turns a create command into state attributes, checking required ids.
///
/// # Errors
///
/// Returns `DomainError::Validation` listing `character_id` and/or
/// `episode_id` when absent.
pub fn state_attributes(command: &CreateCharacterState) -> Result<StateAttributes, DomainError> {
    let (Some(character_id), Some(episode_id)) = (command.character_id, command.episode_id) else {
        let mut v = Validator::new();
        v.require("character_id", command.character_id.as_ref());
        v.require("episode_id", command.episode_id.as_ref());
        return Err(v.into_error());
    };

    Ok(StateAttributes {
        character_id,
        episode_id,
        location: command.location.clone(),
        emotional_state: command.emotional_state.clone(),
        physical_state: command.physical_state.clone(),
        knowledge: command.knowledge.clone(),
        inventory: command.inventory.clone(),
        notes: command.notes.clone(),
    })
}

/// The error reported when a (character, episode) pair already has a state.
#[must_use]
pub fn duplicate_state() -> DomainError {
    DomainError::invalid_field("character_id", TAKEN)
}
