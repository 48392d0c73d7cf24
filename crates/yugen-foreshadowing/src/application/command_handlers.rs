//! Command handlers for the foreshadowing context.

use tracing::info;
use yugen_core::clock::Clock;
use yugen_core::error::DomainError;
use yugen_core::model::Foreshadowing;
use yugen_core::repository::ForeshadowingRepository;

use crate::application::query_handlers::get_foreshadowing;
use crate::domain::commands::{
    AbandonForeshadowing, CreateForeshadowing, DeleteForeshadowing, ResolveForeshadowing,
    UpdateForeshadowing,
};
use crate::domain::lifecycle::{abandon, resolve, transition};
use crate::domain::validation::{foreshadowing_attributes, validate_attributes};

/// Handles `CreateForeshadowing`.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the title is blank.
pub async fn handle_create_foreshadowing(
    command: &CreateForeshadowing,
    clock: &dyn Clock,
    repo: &dyn ForeshadowingRepository,
) -> Result<Foreshadowing, DomainError> {
    let attributes = foreshadowing_attributes(command)?;
    let foreshadowing = repo
        .insert_foreshadowing(command.novel_id, &attributes, clock.now())
        .await?;

    info!(foreshadowing_id = %foreshadowing.id, "foreshadowing planted");
    Ok(foreshadowing)
}

/// Handles `UpdateForeshadowing`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the entry is not in the novel,
/// `DomainError::Validation` if the result is invalid.
pub async fn handle_update_foreshadowing(
    command: UpdateForeshadowing,
    clock: &dyn Clock,
    repo: &dyn ForeshadowingRepository,
) -> Result<Foreshadowing, DomainError> {
    let mut foreshadowing =
        get_foreshadowing(command.novel_id, command.foreshadowing_id, repo).await?;

    if let Some(status) = command.changes.apply_to(&mut foreshadowing.attributes) {
        transition(&mut foreshadowing.attributes, status);
    }
    validate_attributes(&foreshadowing.attributes)?;

    foreshadowing.updated_at = clock.now();
    repo.update_foreshadowing(&foreshadowing).await?;
    Ok(foreshadowing)
}

/// Handles `DeleteForeshadowing`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the entry is not in the novel.
pub async fn handle_delete_foreshadowing(
    command: &DeleteForeshadowing,
    repo: &dyn ForeshadowingRepository,
) -> Result<(), DomainError> {
    let foreshadowing =
        get_foreshadowing(command.novel_id, command.foreshadowing_id, repo).await?;
    repo.delete_foreshadowing(foreshadowing.id).await
}

/// Handles `ResolveForeshadowing`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the entry is not in the novel,
/// `DomainError::MissingParameter` without `resolved_episode_id`.
pub async fn handle_resolve_foreshadowing(
    command: &ResolveForeshadowing,
    clock: &dyn Clock,
    repo: &dyn ForeshadowingRepository,
) -> Result<Foreshadowing, DomainError> {
    let mut foreshadowing =
        get_foreshadowing(command.novel_id, command.foreshadowing_id, repo).await?;

    resolve(&mut foreshadowing.attributes, command.resolved_episode_id)?;
    foreshadowing.updated_at = clock.now();
    repo.update_foreshadowing(&foreshadowing).await?;

    info!(foreshadowing_id = %foreshadowing.id, "foreshadowing resolved");
    Ok(foreshadowing)
}

/// Handles `AbandonForeshadowing`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the entry is not in the novel.
pub async fn handle_abandon_foreshadowing(
    command: &AbandonForeshadowing,
    clock: &dyn Clock,
    repo: &dyn ForeshadowingRepository,
) -> Result<Foreshadowing, DomainError> {
    let mut foreshadowing =
        get_foreshadowing(command.novel_id, command.foreshadowing_id, repo).await?;

    abandon(&mut foreshadowing.attributes);
    foreshadowing.updated_at = clock.now();
    repo.update_foreshadowing(&foreshadowing).await?;

    info!(foreshadowing_id = %foreshadowing.id, "foreshadowing abandoned");
    Ok(foreshadowing)
}
