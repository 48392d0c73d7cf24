//! A store that always returns an infrastructure error. Useful for testing
//! error-handling paths.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use yugen_core::error::DomainError;
use yugen_core::ids::{CharacterId, EpisodeId, NovelId};
use yugen_core::model::{Character, CharacterProfile, ContextSnapshot};
use yugen_core::pagination::{Page, PageRequest};
use yugen_core::repository::{CharacterRepository, ContextSnapshotSource};

/// Every call fails with `DomainError::Infrastructure("connection refused")`.
#[derive(Debug)]
pub struct FailingStore;

fn refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

#[async_trait]
impl CharacterRepository for FailingStore {
    async fn list_characters(
        &self,
        _novel_id: NovelId,
        _page: PageRequest,
    ) -> Result<Page<Character>, DomainError> {
        Err(refused())
    }

    async fn find_character(
        &self,
        _novel_id: NovelId,
        _id: CharacterId,
    ) -> Result<Option<Character>, DomainError> {
        Err(refused())
    }

    async fn insert_character(
        &self,
        _novel_id: NovelId,
        _profile: &CharacterProfile,
        _at: DateTime<Utc>,
    ) -> Result<Character, DomainError> {
        Err(refused())
    }

    async fn update_character(&self, _character: &Character) -> Result<(), DomainError> {
        Err(refused())
    }

    async fn delete_character(&self, _id: CharacterId) -> Result<(), DomainError> {
        Err(refused())
    }
}

#[async_trait]
impl ContextSnapshotSource for FailingStore {
    async fn load_context(
        &self,
        _novel_id: NovelId,
        _episode_id: EpisodeId,
    ) -> Result<ContextSnapshot, DomainError> {
        Err(refused())
    }
}
