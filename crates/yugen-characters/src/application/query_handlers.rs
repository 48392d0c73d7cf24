//! Query handlers for the characters context.

use yugen_core::error::DomainError;
use yugen_core::ids::{CharacterId, CharacterStateId, NovelId};
use yugen_core::model::{Character, CharacterState, CharacterStateEntry, EpisodeRange, StateFilter};
use yugen_core::pagination::{Page, PageRequest};
use yugen_core::repository::{CharacterRepository, CharacterStateRepository};

/// Lists the novel's characters, ordered by id.
///
/// # Errors
///
/// Returns the store error if the read fails.
pub async fn list_characters(
    novel_id: NovelId,
    page: PageRequest,
    repo: &dyn CharacterRepository,
) -> Result<Page<Character>, DomainError> {
    repo.list_characters(novel_id, page).await
}

/// Retrieves one character of the novel.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the id is unknown or belongs to another
/// novel.
pub async fn get_character(
    novel_id: NovelId,
    character_id: CharacterId,
    repo: &dyn CharacterRepository,
) -> Result<Character, DomainError> {
    repo.find_character(novel_id, character_id)
        .await?
        .ok_or(DomainError::NotFound {
            resource: "character",
            id: character_id.get(),
        })
}

/// Lists states of the novel's characters.
///
/// # Errors
///
/// Returns the store error if the read fails.
pub async fn list_states(
    novel_id: NovelId,
    filter: StateFilter,
    page: PageRequest,
    repo: &dyn CharacterStateRepository,
) -> Result<Page<CharacterStateEntry>, DomainError> {
    repo.list_states(novel_id, filter, page).await
}

/// Retrieves one state whose character belongs to the novel.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the id is unknown or out of scope.
pub async fn get_state(
    novel_id: NovelId,
    state_id: CharacterStateId,
    repo: &dyn CharacterStateRepository,
) -> Result<CharacterStateEntry, DomainError> {
    repo.find_state(novel_id, state_id)
        .await?
        .ok_or(DomainError::NotFound {
            resource: "character_state",
            id: state_id.get(),
        })
}

/// Returns every state of one character in ascending episode order.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the character is not in the novel.
pub async fn character_timeline(
    novel_id: NovelId,
    character_id: CharacterId,
    range: EpisodeRange,
    characters: &dyn CharacterRepository,
    states: &dyn CharacterStateRepository,
) -> Result<Vec<CharacterState>, DomainError> {
    let character = get_character(novel_id, character_id, characters).await?;
    states.character_timeline(character.id, range).await
}

#[cfg(test)]
mod tests {
    use yugen_core::ids::EpisodeId;
    use yugen_test_support::{FixedClock, InMemoryStore, fixtures};

    use super::*;

    const NOVEL: NovelId = NovelId(1);

    async fn seed(store: &InMemoryStore, novel_id: NovelId, name: &str) -> Character {
        store
            .insert_character(novel_id, &fixtures::profile(name), FixedClock::standard().0)
            .await
            .unwrap()
    }

    async fn seed_states(store: &InMemoryStore, character: &Character, episodes: &[i64]) {
        for &episode in episodes {
            store
                .insert_state(
                    &fixtures::state(character.id, episode),
                    FixedClock::standard().0,
                )
                .await
                .unwrap();
        }
    }

    fn episodes(states: &[CharacterState]) -> Vec<i64> {
        states.iter().map(|s| s.attributes.episode_id.get()).collect()
    }

    #[tokio::test]
    async fn test_list_characters_is_scoped_and_paginated() {
        // Arrange
        let store = InMemoryStore::new();
        for i in 0..25 {
            seed(&store, NOVEL, &format!("c{i}")).await;
        }
        seed(&store, NovelId(2), "other").await;

        // Act
        let first = list_characters(NOVEL, PageRequest::default(), &store)
            .await
            .unwrap();
        let second = list_characters(NOVEL, PageRequest::new(Some(2), None), &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(first.total, 25);
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.items[0].profile.name, "c0");
        assert_eq!(second.items.len(), 5);
        assert!(second.items.iter().all(|c| c.novel_id == NOVEL));
    }

    #[tokio::test]
    async fn test_get_character_from_other_novel_is_not_found() {
        let store = InMemoryStore::new();
        let foreign = seed(&store, NovelId(2), "other").await;

        let result = get_character(NOVEL, foreign.id, &store).await;

        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                resource: "character",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_list_states_filters_by_range_and_excludes_other_novels() {
        // Arrange
        let store = InMemoryStore::new();
        let aoi = seed(&store, NOVEL, "Aoi").await;
        let foreign = seed(&store, NovelId(999), "Stranger").await;
        seed_states(&store, &aoi, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).await;
        seed_states(&store, &foreign, &[5]).await;

        let filter = StateFilter {
            range: EpisodeRange {
                from: Some(EpisodeId(3)),
                to: Some(EpisodeId(7)),
            },
            ..StateFilter::default()
        };

        // Act
        let page = list_states(NOVEL, filter, PageRequest::default(), &store)
            .await
            .unwrap();

        // Assert
        let found: Vec<i64> = page
            .items
            .iter()
            .map(|e| e.state.attributes.episode_id.get())
            .collect();
        assert_eq!(found, vec![3, 4, 5, 6, 7]);
        assert!(page.items.iter().all(|e| e.character.id == aoi.id));
    }

    #[tokio::test]
    async fn test_list_states_orders_by_character_then_episode() {
        // Arrange
        let store = InMemoryStore::new();
        let first = seed(&store, NOVEL, "First").await;
        let second = seed(&store, NOVEL, "Second").await;
        seed_states(&store, &second, &[2, 1]).await;
        seed_states(&store, &first, &[3, 1]).await;

        // Act
        let page = list_states(NOVEL, StateFilter::default(), PageRequest::default(), &store)
            .await
            .unwrap();

        // Assert
        let order: Vec<(CharacterId, i64)> = page
            .items
            .iter()
            .map(|e| (e.character.id, e.state.attributes.episode_id.get()))
            .collect();
        assert_eq!(
            order,
            vec![(first.id, 1), (first.id, 3), (second.id, 1), (second.id, 2)]
        );
    }

    #[tokio::test]
    async fn test_character_timeline_orders_by_episode_and_honors_range() {
        // Arrange
        let store = InMemoryStore::new();
        let aoi = seed(&store, NOVEL, "Aoi").await;
        seed_states(&store, &aoi, &[10, 1, 7, 3, 5]).await;

        // Act
        let all = character_timeline(NOVEL, aoi.id, EpisodeRange::default(), &store, &store)
            .await
            .unwrap();
        let bounded = character_timeline(
            NOVEL,
            aoi.id,
            EpisodeRange {
                from: Some(EpisodeId(3)),
                to: Some(EpisodeId(7)),
            },
            &store,
            &store,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(episodes(&all), vec![1, 3, 5, 7, 10]);
        assert_eq!(episodes(&bounded), vec![3, 5, 7]);
    }

    #[tokio::test]
    async fn test_character_timeline_for_unknown_or_foreign_character_is_not_found() {
        let store = InMemoryStore::new();
        let foreign = seed(&store, NovelId(999), "Stranger").await;

        let unknown =
            character_timeline(NOVEL, CharacterId(9999), EpisodeRange::default(), &store, &store)
                .await;
        let out_of_scope =
            character_timeline(NOVEL, foreign.id, EpisodeRange::default(), &store, &store).await;

        assert!(matches!(unknown, Err(DomainError::NotFound { .. })));
        assert!(matches!(out_of_scope, Err(DomainError::NotFound { .. })));
    }
}
