//! Command handlers for the world settings context.

use tracing::info;
use yugen_core::clock::Clock;
use yugen_core::error::DomainError;
use yugen_core::model::WorldSetting;
use yugen_core::repository::WorldSettingRepository;

use crate::application::query_handlers::get_world_setting;
use crate::domain::commands::{CreateWorldSetting, DeleteWorldSetting, UpdateWorldSetting};
use crate::domain::validation::{apply_changes, world_setting_attributes};

/// Handles `CreateWorldSetting`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a bad category, title or details.
pub async fn handle_create_world_setting(
    command: &CreateWorldSetting,
    clock: &dyn Clock,
    repo: &dyn WorldSettingRepository,
) -> Result<WorldSetting, DomainError> {
    let attributes = world_setting_attributes(command)?;
    let setting = repo
        .insert_world_setting(command.novel_id, &attributes, clock.now())
        .await?;

    info!(
        world_setting_id = %setting.id,
        category = %setting.attributes.category,
        "world setting created"
    );
    Ok(setting)
}

/// Handles `UpdateWorldSetting`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the setting is not in the novel,
/// `DomainError::Validation` if the change set is invalid.
pub async fn handle_update_world_setting(
    command: UpdateWorldSetting,
    clock: &dyn Clock,
    repo: &dyn WorldSettingRepository,
) -> Result<WorldSetting, DomainError> {
    let mut setting = get_world_setting(command.novel_id, command.world_setting_id, repo).await?;

    apply_changes(command.changes, &mut setting.attributes)?;
    setting.updated_at = clock.now();

    repo.update_world_setting(&setting).await?;
    Ok(setting)
}

/// Handles `DeleteWorldSetting`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the setting is not in the novel.
pub async fn handle_delete_world_setting(
    command: &DeleteWorldSetting,
    repo: &dyn WorldSettingRepository,
) -> Result<(), DomainError> {
    let setting = get_world_setting(command.novel_id, command.world_setting_id, repo).await?;
    repo.delete_world_setting(setting.id).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;
    use yugen_core::ids::NovelId;
    use yugen_core::model::WorldSettingCategory;
    use yugen_test_support::{FixedClock, InMemoryStore};

    use super::*;
    use crate::domain::commands::WorldSettingChanges;

    const NOVEL: NovelId = NovelId(1);

    fn create_command(category: &str, title: &str) -> CreateWorldSetting {
        CreateWorldSetting {
            correlation_id: Uuid::new_v4(),
            novel_id: NOVEL,
            category: Some(category.into()),
            title: Some(title.into()),
            ..CreateWorldSetting::default()
        }
    }

    #[tokio::test]
    async fn test_create_stores_setting_with_empty_details() {
        // Arrange
        let clock = FixedClock::standard();
        let store = InMemoryStore::new();

        // Act
        let setting = handle_create_world_setting(
            &create_command("geography", "The Salt Sea"),
            &clock,
            &store,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(setting.attributes.category, WorldSettingCategory::Geography);
        assert_eq!(setting.attributes.details, json!({}));
        assert_eq!(setting.created_at, clock.0);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_is_rejected() {
        let clock = FixedClock::standard();
        let store = InMemoryStore::new();

        let result =
            handle_create_world_setting(&create_command("economy", "Trade"), &clock, &store).await;

        match result {
            Err(DomainError::Validation(errors)) => {
                assert_eq!(errors[0].field, "category");
                assert_eq!(errors[0].message, "is not included in the list");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_changes_category() {
        // Arrange
        let clock = FixedClock::standard();
        let store = InMemoryStore::new();
        let setting =
            handle_create_world_setting(&create_command("culture", "Tea rites"), &clock, &store)
                .await
                .unwrap();

        // Act
        let updated = handle_update_world_setting(
            UpdateWorldSetting {
                correlation_id: Uuid::new_v4(),
                novel_id: NOVEL,
                world_setting_id: setting.id,
                changes: WorldSettingChanges {
                    category: Some("history".into()),
                    description: Some(Some("Older than the empire".into())),
                    ..WorldSettingChanges::default()
                },
            },
            &clock,
            &store,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(updated.attributes.category, WorldSettingCategory::History);
        assert_eq!(
            updated.attributes.description.as_deref(),
            Some("Older than the empire")
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_in_other_novel_are_not_found() {
        let clock = FixedClock::standard();
        let store = InMemoryStore::new();
        let mut command = create_command("magic", "Runes");
        command.novel_id = NovelId(2);
        let foreign = handle_create_world_setting(&command, &clock, &store)
            .await
            .unwrap();

        let updated = handle_update_world_setting(
            UpdateWorldSetting {
                correlation_id: Uuid::new_v4(),
                novel_id: NOVEL,
                world_setting_id: foreign.id,
                changes: WorldSettingChanges::default(),
            },
            &clock,
            &store,
        )
        .await;
        let deleted = handle_delete_world_setting(
            &DeleteWorldSetting {
                correlation_id: Uuid::new_v4(),
                novel_id: NOVEL,
                world_setting_id: foreign.id,
            },
            &store,
        )
        .await;

        assert!(matches!(updated, Err(DomainError::NotFound { .. })));
        assert!(matches!(deleted, Err(DomainError::NotFound { .. })));
    }
}
