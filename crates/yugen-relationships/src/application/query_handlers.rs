//! Query handlers for the relationships context.

use serde::Serialize;
use yugen_core::error::DomainError;
use yugen_core::ids::{CharacterId, EpisodeId, NovelId, RelationshipId, RelationshipLogId};
use yugen_core::model::{RelationshipEntry, RelationshipLogEntry};
use yugen_core::pagination::{Page, PageRequest};
use yugen_core::repository::{
    CharacterRepository, RelationshipLogRepository, RelationshipRepository,
};

/// The edges touching one character, split by direction.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterRelationships {
    /// Edges where the character is the source.
    pub outgoing: Vec<RelationshipEntry>,
    /// Edges where the character is the target.
    pub incoming: Vec<RelationshipEntry>,
}

/// Lists the novel's relationships with both endpoints named.
///
/// # Errors
///
/// Returns the store error if the read fails.
pub async fn list_relationships(
    novel_id: NovelId,
    page: PageRequest,
    repo: &dyn RelationshipRepository,
) -> Result<Page<RelationshipEntry>, DomainError> {
    repo.list_relationships(novel_id, page).await
}

/// Retrieves one relationship of the novel.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the id is unknown or out of scope.
pub async fn get_relationship(
    novel_id: NovelId,
    relationship_id: RelationshipId,
    repo: &dyn RelationshipRepository,
) -> Result<RelationshipEntry, DomainError> {
    repo.find_relationship(novel_id, relationship_id)
        .await?
        .ok_or(DomainError::NotFound {
            resource: "character_relationship",
            id: relationship_id.get(),
        })
}

/// Returns the outgoing and incoming edges of one character.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the character is not in the novel.
pub async fn character_relationships(
    novel_id: NovelId,
    character_id: CharacterId,
    characters: &dyn CharacterRepository,
    relationships: &dyn RelationshipRepository,
) -> Result<CharacterRelationships, DomainError> {
    if characters
        .find_character(novel_id, character_id)
        .await?
        .is_none()
    {
        return Err(DomainError::NotFound {
            resource: "character",
            id: character_id.get(),
        });
    }

    Ok(CharacterRelationships {
        outgoing: relationships.outgoing_relationships(character_id).await?,
        incoming: relationships.incoming_relationships(character_id).await?,
    })
}

/// Lists relationship log rows of the novel, newest first.
///
/// # Errors
///
/// Returns the store error if the read fails.
pub async fn list_logs(
    novel_id: NovelId,
    episode_id: Option<EpisodeId>,
    page: PageRequest,
    repo: &dyn RelationshipLogRepository,
) -> Result<Page<RelationshipLogEntry>, DomainError> {
    repo.list_logs(novel_id, episode_id, page).await
}

/// Retrieves one relationship log row of the novel.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the id is unknown or out of scope.
pub async fn get_log(
    novel_id: NovelId,
    log_id: RelationshipLogId,
    repo: &dyn RelationshipLogRepository,
) -> Result<RelationshipLogEntry, DomainError> {
    repo.find_log(novel_id, log_id)
        .await?
        .ok_or(DomainError::NotFound {
            resource: "relationship_log",
            id: log_id.get(),
        })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use yugen_core::model::{Character, NewRelationshipLog};
    use yugen_test_support::{FixedClock, InMemoryStore, fixtures};

    use super::*;

    const NOVEL: NovelId = NovelId(1);

    async fn seed(store: &InMemoryStore, novel_id: NovelId, name: &str) -> Character {
        store
            .insert_character(novel_id, &fixtures::profile(name), FixedClock::standard().0)
            .await
            .unwrap()
    }

    async fn link(
        store: &InMemoryStore,
        novel_id: NovelId,
        a: &Character,
        b: &Character,
        kind: &str,
    ) -> RelationshipEntry {
        let relationship = store
            .insert_relationship(
                novel_id,
                &fixtures::relationship(a.id, b.id, kind),
                FixedClock::standard().0,
            )
            .await
            .unwrap();
        get_relationship(novel_id, relationship.id, store)
            .await
            .unwrap()
    }

    fn log_at(entry: &RelationshipEntry, episode: i64) -> NewRelationshipLog {
        NewRelationshipLog {
            character_relationship_id: entry.relationship.id,
            episode_id: EpisodeId(episode),
            change_description: None,
            previous_type: None,
            new_type: Some(entry.relationship.attributes.relationship_type.clone()),
            previous_intensity: None,
            new_intensity: None,
        }
    }

    #[tokio::test]
    async fn test_list_relationships_names_both_endpoints() {
        // Arrange
        let store = InMemoryStore::new();
        let aoi = seed(&store, NOVEL, "Aoi").await;
        let ren = seed(&store, NOVEL, "Ren").await;
        link(&store, NOVEL, &aoi, &ren, "sibling").await;

        // Act
        let page = list_relationships(NOVEL, PageRequest::default(), &store)
            .await
            .unwrap();

        // Assert
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].character.name, "Aoi");
        assert_eq!(page.items[0].related_character.name, "Ren");
    }

    #[tokio::test]
    async fn test_character_relationships_splits_by_direction() {
        // Arrange
        let store = InMemoryStore::new();
        let a = seed(&store, NOVEL, "A").await;
        let b = seed(&store, NOVEL, "B").await;
        let c = seed(&store, NOVEL, "C").await;
        link(&store, NOVEL, &a, &b, "friend").await;
        link(&store, NOVEL, &a, &c, "mentor").await;
        link(&store, NOVEL, &c, &a, "student").await;

        // Act
        let edges = character_relationships(NOVEL, a.id, &store, &store)
            .await
            .unwrap();

        // Assert
        let outgoing: Vec<_> = edges
            .outgoing
            .iter()
            .map(|e| e.related_character.id)
            .collect();
        let incoming: Vec<_> = edges.incoming.iter().map(|e| e.character.id).collect();
        assert_eq!(outgoing, vec![b.id, c.id]);
        assert_eq!(incoming, vec![c.id]);
    }

    #[tokio::test]
    async fn test_character_relationships_for_foreign_character_is_not_found() {
        let store = InMemoryStore::new();
        let foreign = seed(&store, NovelId(999), "Stranger").await;

        let result = character_relationships(NOVEL, foreign.id, &store, &store).await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_logs_is_scoped_filtered_and_newest_first() {
        // Arrange
        let store = InMemoryStore::new();
        let a = seed(&store, NOVEL, "A").await;
        let b = seed(&store, NOVEL, "B").await;
        let x = seed(&store, NovelId(999), "X").await;
        let y = seed(&store, NovelId(999), "Y").await;
        let ours = link(&store, NOVEL, &a, &b, "friend").await;
        let theirs = link(&store, NovelId(999), &x, &y, "friend").await;

        let start = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let older = store
            .record_change(&ours.relationship, &log_at(&ours, 4), start)
            .await
            .unwrap();
        let newer = store
            .record_change(
                &ours.relationship,
                &log_at(&ours, 5),
                start + Duration::minutes(5),
            )
            .await
            .unwrap();
        store
            .record_change(&theirs.relationship, &log_at(&theirs, 4), start)
            .await
            .unwrap();

        // Act
        let all = list_logs(NOVEL, None, PageRequest::default(), &store)
            .await
            .unwrap();
        let at_four = list_logs(NOVEL, Some(EpisodeId(4)), PageRequest::default(), &store)
            .await
            .unwrap();

        // Assert
        let ids: Vec<_> = all.items.iter().map(|e| e.log.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert_eq!(at_four.total, 1);
        assert_eq!(at_four.items[0].log.id, older.id);
        assert_eq!(at_four.items[0].character_relationship.character.name, "A");
    }

    #[tokio::test]
    async fn test_get_log_of_other_novel_is_not_found() {
        // Arrange
        let store = InMemoryStore::new();
        let x = seed(&store, NovelId(999), "X").await;
        let y = seed(&store, NovelId(999), "Y").await;
        let theirs = link(&store, NovelId(999), &x, &y, "friend").await;
        let log = store
            .record_change(&theirs.relationship, &log_at(&theirs, 1), FixedClock::standard().0)
            .await
            .unwrap();

        // Act
        let result = get_log(NOVEL, log.id, &store).await;

        // Assert
        assert!(matches!(
            result,
            Err(DomainError::NotFound {
                resource: "relationship_log",
                ..
            })
        ));
        assert!(get_log(NovelId(999), log.id, &store).await.is_ok());
    }
}
