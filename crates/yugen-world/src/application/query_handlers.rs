//! Query handlers for the world settings context.

use yugen_core::error::DomainError;
use yugen_core::ids::{NovelId, WorldSettingId};
use yugen_core::model::{WorldSetting, WorldSettingCategory};
use yugen_core::pagination::{Page, PageRequest};
use yugen_core::repository::WorldSettingRepository;

/// Lists the novel's world settings, optionally of one category.
///
/// # Errors
///
/// Returns the store error if the read fails.
pub async fn list_world_settings(
    novel_id: NovelId,
    category: Option<WorldSettingCategory>,
    page: PageRequest,
    repo: &dyn WorldSettingRepository,
) -> Result<Page<WorldSetting>, DomainError> {
    repo.list_world_settings(novel_id, category, page).await
}

/// Retrieves one world setting of the novel.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the id is unknown or out of scope.
pub async fn get_world_setting(
    novel_id: NovelId,
    world_setting_id: WorldSettingId,
    repo: &dyn WorldSettingRepository,
) -> Result<WorldSetting, DomainError> {
    repo.find_world_setting(novel_id, world_setting_id)
        .await?
        .ok_or(DomainError::NotFound {
            resource: "world_setting",
            id: world_setting_id.get(),
        })
}
