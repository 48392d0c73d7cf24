//! Store abstractions.
//!
//! One trait per aggregate root. Every read that can be reached from an API
//! route takes the owning `NovelId` and filters by it; a record outside that
//! novel is reported as absent, never as forbidden.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::ids::{
    CharacterId, CharacterStateId, EpisodeId, ForeshadowingId, NovelId, RelationshipId,
    RelationshipLogId, WorldSettingId,
};
use crate::model::{
    Character, CharacterProfile, CharacterRelationship, CharacterState, CharacterStateEntry,
    ContextSnapshot, EpisodeRange, Foreshadowing, ForeshadowingAttributes, ForeshadowingFilter,
    NewRelationshipLog, RelationshipAttributes, RelationshipEntry, RelationshipLog,
    RelationshipLogEntry, StateAttributes, StateFilter, WorldSetting, WorldSettingAttributes,
    WorldSettingCategory,
};
use crate::pagination::{Page, PageRequest};

/// Persistence for characters.
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Lists the novel's characters ordered by id.
    async fn list_characters(
        &self,
        novel_id: NovelId,
        page: PageRequest,
    ) -> Result<Page<Character>, DomainError>;

    /// Loads one character if it belongs to `novel_id`.
    async fn find_character(
        &self,
        novel_id: NovelId,
        id: CharacterId,
    ) -> Result<Option<Character>, DomainError>;

    /// Inserts a character and returns the stored record.
    async fn insert_character(
        &self,
        novel_id: NovelId,
        profile: &CharacterProfile,
        at: DateTime<Utc>,
    ) -> Result<Character, DomainError>;

    /// Overwrites the profile and `updated_at` of an existing character.
    async fn update_character(&self, character: &Character) -> Result<(), DomainError>;

    /// Deletes a character together with every relationship where it is the
    /// source or the target, the logs of those relationships, and all of its
    /// states, atomically.
    async fn delete_character(&self, id: CharacterId) -> Result<(), DomainError>;
}

/// Persistence for per-episode character states.
#[async_trait]
pub trait CharacterStateRepository: Send + Sync {
    /// Lists states of the novel's characters ordered by
    /// (`character_id`, `episode_id`).
    async fn list_states(
        &self,
        novel_id: NovelId,
        filter: StateFilter,
        page: PageRequest,
    ) -> Result<Page<CharacterStateEntry>, DomainError>;

    /// All states of one character within `range`, ordered by episode.
    async fn character_timeline(
        &self,
        character_id: CharacterId,
        range: EpisodeRange,
    ) -> Result<Vec<CharacterState>, DomainError>;

    /// Loads one state if its character belongs to `novel_id`.
    async fn find_state(
        &self,
        novel_id: NovelId,
        id: CharacterStateId,
    ) -> Result<Option<CharacterStateEntry>, DomainError>;

    /// True if another state already exists for the (character, episode)
    /// pair. `excluding` skips the record being updated.
    async fn state_exists(
        &self,
        character_id: CharacterId,
        episode_id: EpisodeId,
        excluding: Option<CharacterStateId>,
    ) -> Result<bool, DomainError>;

    /// Inserts a state. A concurrent duplicate surfaces as
    /// `DomainError::Validation`.
    async fn insert_state(
        &self,
        attributes: &StateAttributes,
        at: DateTime<Utc>,
    ) -> Result<CharacterState, DomainError>;

    /// Overwrites an existing state.
    async fn update_state(&self, state: &CharacterState) -> Result<(), DomainError>;

    /// Deletes a state.
    async fn delete_state(&self, id: CharacterStateId) -> Result<(), DomainError>;
}

/// Persistence for the directed relationship graph.
#[async_trait]
pub trait RelationshipRepository: Send + Sync {
    /// Lists the novel's relationships ordered by id.
    async fn list_relationships(
        &self,
        novel_id: NovelId,
        page: PageRequest,
    ) -> Result<Page<RelationshipEntry>, DomainError>;

    /// Loads one relationship if it belongs to `novel_id`.
    async fn find_relationship(
        &self,
        novel_id: NovelId,
        id: RelationshipId,
    ) -> Result<Option<RelationshipEntry>, DomainError>;

    /// Edges where `character_id` is the source.
    async fn outgoing_relationships(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<RelationshipEntry>, DomainError>;

    /// Edges where `character_id` is the target.
    async fn incoming_relationships(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<RelationshipEntry>, DomainError>;

    /// True if the directed pair already exists. `excluding` skips the record
    /// being updated.
    async fn relationship_exists(
        &self,
        character_id: CharacterId,
        related_character_id: CharacterId,
        excluding: Option<RelationshipId>,
    ) -> Result<bool, DomainError>;

    /// Inserts a relationship. A concurrent duplicate surfaces as
    /// `DomainError::Validation`.
    async fn insert_relationship(
        &self,
        novel_id: NovelId,
        attributes: &RelationshipAttributes,
        at: DateTime<Utc>,
    ) -> Result<CharacterRelationship, DomainError>;

    /// Overwrites an existing relationship.
    async fn update_relationship(
        &self,
        relationship: &CharacterRelationship,
    ) -> Result<(), DomainError>;

    /// Deletes a relationship and its logs.
    async fn delete_relationship(&self, id: RelationshipId) -> Result<(), DomainError>;

    /// Saves the already-modified relationship and appends `log` in one
    /// transaction.
    async fn record_change(
        &self,
        relationship: &CharacterRelationship,
        log: &NewRelationshipLog,
        at: DateTime<Utc>,
    ) -> Result<RelationshipLog, DomainError>;
}

/// Read access to relationship logs. Logs are written only through
/// `RelationshipRepository::record_change`.
#[async_trait]
pub trait RelationshipLogRepository: Send + Sync {
    /// Lists logs reachable from the novel's characters, newest first.
    async fn list_logs(
        &self,
        novel_id: NovelId,
        episode_id: Option<EpisodeId>,
        page: PageRequest,
    ) -> Result<Page<RelationshipLogEntry>, DomainError>;

    /// Loads one log if it is reachable from the novel's characters.
    async fn find_log(
        &self,
        novel_id: NovelId,
        id: RelationshipLogId,
    ) -> Result<Option<RelationshipLogEntry>, DomainError>;
}

/// Persistence for foreshadowing entries.
#[async_trait]
pub trait ForeshadowingRepository: Send + Sync {
    /// Lists the novel's entries ordered by id.
    async fn list_foreshadowings(
        &self,
        novel_id: NovelId,
        filter: ForeshadowingFilter,
        page: PageRequest,
    ) -> Result<Page<Foreshadowing>, DomainError>;

    /// Loads one entry if it belongs to `novel_id`.
    async fn find_foreshadowing(
        &self,
        novel_id: NovelId,
        id: ForeshadowingId,
    ) -> Result<Option<Foreshadowing>, DomainError>;

    /// Inserts an entry.
    async fn insert_foreshadowing(
        &self,
        novel_id: NovelId,
        attributes: &ForeshadowingAttributes,
        at: DateTime<Utc>,
    ) -> Result<Foreshadowing, DomainError>;

    /// Overwrites an existing entry.
    async fn update_foreshadowing(&self, foreshadowing: &Foreshadowing)
    -> Result<(), DomainError>;

    /// Deletes an entry.
    async fn delete_foreshadowing(&self, id: ForeshadowingId) -> Result<(), DomainError>;
}

/// Persistence for world settings.
#[async_trait]
pub trait WorldSettingRepository: Send + Sync {
    /// Lists the novel's settings ordered by id.
    async fn list_world_settings(
        &self,
        novel_id: NovelId,
        category: Option<WorldSettingCategory>,
        page: PageRequest,
    ) -> Result<Page<WorldSetting>, DomainError>;

    /// Loads one setting if it belongs to `novel_id`.
    async fn find_world_setting(
        &self,
        novel_id: NovelId,
        id: WorldSettingId,
    ) -> Result<Option<WorldSetting>, DomainError>;

    /// Inserts a setting.
    async fn insert_world_setting(
        &self,
        novel_id: NovelId,
        attributes: &WorldSettingAttributes,
        at: DateTime<Utc>,
    ) -> Result<WorldSetting, DomainError>;

    /// Overwrites an existing setting.
    async fn update_world_setting(&self, setting: &WorldSetting) -> Result<(), DomainError>;

    /// Deletes a setting.
    async fn delete_world_setting(&self, id: WorldSettingId) -> Result<(), DomainError>;
}

/// Source of the context-summary snapshot.
#[async_trait]
pub trait ContextSnapshotSource: Send + Sync {
    /// Reads the four collections for (`novel_id`, `episode_id`). Stores that
    /// support it read them inside one snapshot transaction.
    async fn load_context(
        &self,
        novel_id: NovelId,
        episode_id: EpisodeId,
    ) -> Result<ContextSnapshot, DomainError>;
}
