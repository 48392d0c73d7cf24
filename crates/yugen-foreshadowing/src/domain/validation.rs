//! Write-time checks for foreshadowing entries.

use yugen_core::error::DomainError;
use yugen_core::model::ForeshadowingAttributes;
use yugen_core::validation::Validator;

use super::commands::CreateForeshadowing;

/// Checks the required fields of an entry.
///
/// # Errors
///
/// Returns `DomainError::Validation` when `title` is blank.
pub fn validate_attributes(attributes: &ForeshadowingAttributes) -> Result<(), DomainError> {
    let mut v = Validator::new();
    v.require_text("title", &attributes.title);
    v.finish()
}

/// Turns a create command into attributes, filling enum defaults.
///
/// # Errors
///
/// Returns `DomainError::Validation` when `title` is missing or blank.
pub fn foreshadowing_attributes(
    command: &CreateForeshadowing,
) -> Result<ForeshadowingAttributes, DomainError> {
    let attributes = ForeshadowingAttributes {
        title: command.title.clone().unwrap_or_default(),
        description: command.description.clone(),
        planted_episode_id: command.planted_episode_id,
        resolved_episode_id: command.resolved_episode_id,
        planned_resolution_episode: command.planned_resolution_episode,
        status: command.status.unwrap_or_default(),
        importance: command.importance.unwrap_or_default(),
    };
    validate_attributes(&attributes)?;
    Ok(attributes)
}
