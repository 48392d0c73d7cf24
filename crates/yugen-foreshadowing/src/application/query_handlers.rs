//! Query handlers for the foreshadowing context.

use yugen_core::error::DomainError;
use yugen_core::ids::{ForeshadowingId, NovelId};
use yugen_core::model::{Foreshadowing, ForeshadowingFilter};
use yugen_core::pagination::{Page, PageRequest};
use yugen_core::repository::ForeshadowingRepository;

/// Lists the novel's entries, ordered by id.
///
/// # Errors
///
/// Returns the store error if the read fails.
pub async fn list_foreshadowings(
    novel_id: NovelId,
    filter: ForeshadowingFilter,
    page: PageRequest,
    repo: &dyn ForeshadowingRepository,
) -> Result<Page<Foreshadowing>, DomainError> {
    repo.list_foreshadowings(novel_id, filter, page).await
}

/// Retrieves one entry of the novel.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the id is unknown or out of scope.
pub async fn get_foreshadowing(
    novel_id: NovelId,
    foreshadowing_id: ForeshadowingId,
    repo: &dyn ForeshadowingRepository,
) -> Result<Foreshadowing, DomainError> {
    repo.find_foreshadowing(novel_id, foreshadowing_id)
        .await?
        .ok_or(DomainError::NotFound {
            resource: "foreshadowing",
            id: foreshadowing_id.get(),
        })
}
