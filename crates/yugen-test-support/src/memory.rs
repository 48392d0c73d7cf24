//! In-memory store implementing every repository trait over plain maps so
//! handler and router tests run without PostgreSQL.
//!
//! Uniqueness violations are reported the same way the PostgreSQL store
//! reports a lost insert race: as `DomainError::Validation` on `character_id`.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use yugen_core::error::DomainError;
use yugen_core::ids::{
    CharacterId, CharacterStateId, EpisodeId, ForeshadowingId, NovelId, RelationshipId,
    RelationshipLogId, WorldSettingId,
};
use yugen_core::model::{
    Character, CharacterCard, CharacterProfile, CharacterRef, CharacterRelationship,
    CharacterState, CharacterStateEntry, ContextSnapshot, EpisodeRange, Foreshadowing,
    ForeshadowingAttributes, ForeshadowingFilter, NewRelationshipLog, RelationshipAttributes,
    RelationshipEntry, RelationshipLog, RelationshipLogEntry, RelationshipSummary,
    StateAttributes, StateFilter, WorldSetting, WorldSettingAttributes, WorldSettingCategory,
};
use yugen_core::pagination::{Page, PageRequest};
use yugen_core::repository::{
    CharacterRepository, CharacterStateRepository, ContextSnapshotSource,
    ForeshadowingRepository, RelationshipLogRepository, RelationshipRepository,
    WorldSettingRepository,
};
use yugen_core::validation::TAKEN;

#[derive(Debug, Default)]
struct Tables {
    last_id: i64,
    characters: BTreeMap<CharacterId, Character>,
    states: BTreeMap<CharacterStateId, CharacterState>,
    relationships: BTreeMap<RelationshipId, CharacterRelationship>,
    logs: BTreeMap<RelationshipLogId, RelationshipLog>,
    foreshadowings: BTreeMap<ForeshadowingId, Foreshadowing>,
    world_settings: BTreeMap<WorldSettingId, WorldSetting>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn character_in(&self, novel_id: NovelId, id: CharacterId) -> Option<&Character> {
        self.characters.get(&id).filter(|c| c.novel_id == novel_id)
    }

    fn character_ref(&self, id: CharacterId) -> Option<CharacterRef> {
        self.characters.get(&id).map(Character::to_ref)
    }

    fn relationship_entry(
        &self,
        relationship: &CharacterRelationship,
    ) -> Option<RelationshipEntry> {
        Some(RelationshipEntry {
            character: self.character_ref(relationship.attributes.character_id)?,
            related_character: self.character_ref(relationship.attributes.related_character_id)?,
            relationship: relationship.clone(),
        })
    }

    fn state_entry(&self, state: &CharacterState) -> Option<CharacterStateEntry> {
        Some(CharacterStateEntry {
            character: self.character_ref(state.attributes.character_id)?,
            state: state.clone(),
        })
    }

    /// Novel of the log's source character, if the chain is intact.
    fn log_novel(&self, log: &RelationshipLog) -> Option<NovelId> {
        let relationship = self.relationships.get(&log.character_relationship_id)?;
        self.characters
            .get(&relationship.attributes.character_id)
            .map(|c| c.novel_id)
    }

    fn log_entry(&self, log: &RelationshipLog) -> Option<RelationshipLogEntry> {
        let relationship = self.relationships.get(&log.character_relationship_id)?;
        let entry = self.relationship_entry(relationship)?;
        Some(RelationshipLogEntry {
            log: log.clone(),
            character_relationship: RelationshipSummary {
                id: entry.relationship.id,
                relationship_type: entry.relationship.attributes.relationship_type,
                character: entry.character,
                related_character: entry.related_character,
            },
        })
    }

    fn pair_taken(
        &self,
        character_id: CharacterId,
        related_character_id: CharacterId,
        excluding: Option<RelationshipId>,
    ) -> bool {
        self.relationships.values().any(|r| {
            Some(r.id) != excluding
                && r.attributes.character_id == character_id
                && r.attributes.related_character_id == related_character_id
        })
    }

    fn state_taken(
        &self,
        character_id: CharacterId,
        episode_id: EpisodeId,
        excluding: Option<CharacterStateId>,
    ) -> bool {
        self.states.values().any(|s| {
            Some(s.id) != excluding
                && s.attributes.character_id == character_id
                && s.attributes.episode_id == episode_id
        })
    }

    fn remove_relationship(&mut self, id: RelationshipId) {
        self.relationships.remove(&id);
        self.logs.retain(|_, log| log.character_relationship_id != id);
    }
}

/// A thread-safe in-memory implementation of every repository trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Number of stored characters.
    #[must_use]
    pub fn character_count(&self) -> usize {
        self.lock().characters.len()
    }

    /// Number of stored relationships.
    #[must_use]
    pub fn relationship_count(&self) -> usize {
        self.lock().relationships.len()
    }

    /// Number of stored states.
    #[must_use]
    pub fn state_count(&self) -> usize {
        self.lock().states.len()
    }

    /// Number of stored relationship logs.
    #[must_use]
    pub fn log_count(&self) -> usize {
        self.lock().logs.len()
    }
}

fn taken() -> DomainError {
    DomainError::invalid_field("character_id", TAKEN)
}

fn missing(resource: &'static str, id: i64) -> DomainError {
    DomainError::NotFound { resource, id }
}

#[async_trait]
impl CharacterRepository for InMemoryStore {
    async fn list_characters(
        &self,
        novel_id: NovelId,
        page: PageRequest,
    ) -> Result<Page<Character>, DomainError> {
        let tables = self.lock();
        let rows = tables
            .characters
            .values()
            .filter(|c| c.novel_id == novel_id)
            .cloned()
            .collect();
        Ok(page.paginate(rows))
    }

    async fn find_character(
        &self,
        novel_id: NovelId,
        id: CharacterId,
    ) -> Result<Option<Character>, DomainError> {
        Ok(self.lock().character_in(novel_id, id).cloned())
    }

    async fn insert_character(
        &self,
        novel_id: NovelId,
        profile: &CharacterProfile,
        at: DateTime<Utc>,
    ) -> Result<Character, DomainError> {
        let mut tables = self.lock();
        let character = Character {
            id: CharacterId(tables.next_id()),
            novel_id,
            profile: profile.clone(),
            created_at: at,
            updated_at: at,
        };
        tables.characters.insert(character.id, character.clone());
        Ok(character)
    }

    async fn update_character(&self, character: &Character) -> Result<(), DomainError> {
        let mut tables = self.lock();
        let slot = tables
            .characters
            .get_mut(&character.id)
            .ok_or_else(|| missing("character", character.id.get()))?;
        *slot = character.clone();
        Ok(())
    }

    async fn delete_character(&self, id: CharacterId) -> Result<(), DomainError> {
        let mut tables = self.lock();
        let doomed: Vec<RelationshipId> = tables
            .relationships
            .values()
            .filter(|r| r.attributes.character_id == id || r.attributes.related_character_id == id)
            .map(|r| r.id)
            .collect();
        for relationship_id in doomed {
            tables.remove_relationship(relationship_id);
        }
        tables.states.retain(|_, s| s.attributes.character_id != id);
        tables.characters.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CharacterStateRepository for InMemoryStore {
    async fn list_states(
        &self,
        novel_id: NovelId,
        filter: StateFilter,
        page: PageRequest,
    ) -> Result<Page<CharacterStateEntry>, DomainError> {
        let tables = self.lock();
        let mut rows: Vec<CharacterStateEntry> = tables
            .states
            .values()
            .filter(|s| filter.matches(s))
            .filter(|s| {
                tables
                    .character_in(novel_id, s.attributes.character_id)
                    .is_some()
            })
            .filter_map(|s| tables.state_entry(s))
            .collect();
        rows.sort_by_key(|e| (e.state.attributes.character_id, e.state.attributes.episode_id));
        Ok(page.paginate(rows))
    }

    async fn character_timeline(
        &self,
        character_id: CharacterId,
        range: EpisodeRange,
    ) -> Result<Vec<CharacterState>, DomainError> {
        let tables = self.lock();
        let mut rows: Vec<CharacterState> = tables
            .states
            .values()
            .filter(|s| s.attributes.character_id == character_id)
            .filter(|s| range.contains(s.attributes.episode_id))
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.attributes.episode_id);
        Ok(rows)
    }

    async fn find_state(
        &self,
        novel_id: NovelId,
        id: CharacterStateId,
    ) -> Result<Option<CharacterStateEntry>, DomainError> {
        let tables = self.lock();
        Ok(tables
            .states
            .get(&id)
            .filter(|s| {
                tables
                    .character_in(novel_id, s.attributes.character_id)
                    .is_some()
            })
            .and_then(|s| tables.state_entry(s)))
    }

    async fn state_exists(
        &self,
        character_id: CharacterId,
        episode_id: EpisodeId,
        excluding: Option<CharacterStateId>,
    ) -> Result<bool, DomainError> {
        Ok(self.lock().state_taken(character_id, episode_id, excluding))
    }

    async fn insert_state(
        &self,
        attributes: &StateAttributes,
        at: DateTime<Utc>,
    ) -> Result<CharacterState, DomainError> {
        let mut tables = self.lock();
        if tables.state_taken(attributes.character_id, attributes.episode_id, None) {
            return Err(taken());
        }
        let state = CharacterState {
            id: CharacterStateId(tables.next_id()),
            attributes: attributes.clone(),
            created_at: at,
            updated_at: at,
        };
        tables.states.insert(state.id, state.clone());
        Ok(state)
    }

    async fn update_state(&self, state: &CharacterState) -> Result<(), DomainError> {
        let mut tables = self.lock();
        if tables.state_taken(
            state.attributes.character_id,
            state.attributes.episode_id,
            Some(state.id),
        ) {
            return Err(taken());
        }
        let slot = tables
            .states
            .get_mut(&state.id)
            .ok_or_else(|| missing("character_state", state.id.get()))?;
        *slot = state.clone();
        Ok(())
    }

    async fn delete_state(&self, id: CharacterStateId) -> Result<(), DomainError> {
        self.lock().states.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl RelationshipRepository for InMemoryStore {
    async fn list_relationships(
        &self,
        novel_id: NovelId,
        page: PageRequest,
    ) -> Result<Page<RelationshipEntry>, DomainError> {
        let tables = self.lock();
        let rows = tables
            .relationships
            .values()
            .filter(|r| r.novel_id == novel_id)
            .filter_map(|r| tables.relationship_entry(r))
            .collect();
        Ok(page.paginate(rows))
    }

    async fn find_relationship(
        &self,
        novel_id: NovelId,
        id: RelationshipId,
    ) -> Result<Option<RelationshipEntry>, DomainError> {
        let tables = self.lock();
        Ok(tables
            .relationships
            .get(&id)
            .filter(|r| r.novel_id == novel_id)
            .and_then(|r| tables.relationship_entry(r)))
    }

    async fn outgoing_relationships(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<RelationshipEntry>, DomainError> {
        let tables = self.lock();
        Ok(tables
            .relationships
            .values()
            .filter(|r| r.attributes.character_id == character_id)
            .filter_map(|r| tables.relationship_entry(r))
            .collect())
    }

    async fn incoming_relationships(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<RelationshipEntry>, DomainError> {
        let tables = self.lock();
        Ok(tables
            .relationships
            .values()
            .filter(|r| r.attributes.related_character_id == character_id)
            .filter_map(|r| tables.relationship_entry(r))
            .collect())
    }

    async fn relationship_exists(
        &self,
        character_id: CharacterId,
        related_character_id: CharacterId,
        excluding: Option<RelationshipId>,
    ) -> Result<bool, DomainError> {
        Ok(self
            .lock()
            .pair_taken(character_id, related_character_id, excluding))
    }

    async fn insert_relationship(
        &self,
        novel_id: NovelId,
        attributes: &RelationshipAttributes,
        at: DateTime<Utc>,
    ) -> Result<CharacterRelationship, DomainError> {
        let mut tables = self.lock();
        if tables.pair_taken(attributes.character_id, attributes.related_character_id, None) {
            return Err(taken());
        }
        let relationship = CharacterRelationship {
            id: RelationshipId(tables.next_id()),
            novel_id,
            attributes: attributes.clone(),
            created_at: at,
            updated_at: at,
        };
        tables
            .relationships
            .insert(relationship.id, relationship.clone());
        Ok(relationship)
    }

    async fn update_relationship(
        &self,
        relationship: &CharacterRelationship,
    ) -> Result<(), DomainError> {
        let mut tables = self.lock();
        if tables.pair_taken(
            relationship.attributes.character_id,
            relationship.attributes.related_character_id,
            Some(relationship.id),
        ) {
            return Err(taken());
        }
        let slot = tables
            .relationships
            .get_mut(&relationship.id)
            .ok_or_else(|| missing("character_relationship", relationship.id.get()))?;
        *slot = relationship.clone();
        Ok(())
    }

    async fn delete_relationship(&self, id: RelationshipId) -> Result<(), DomainError> {
        self.lock().remove_relationship(id);
        Ok(())
    }

    async fn record_change(
        &self,
        relationship: &CharacterRelationship,
        log: &NewRelationshipLog,
        at: DateTime<Utc>,
    ) -> Result<RelationshipLog, DomainError> {
        let mut tables = self.lock();
        let slot = tables
            .relationships
            .get_mut(&relationship.id)
            .ok_or_else(|| missing("character_relationship", relationship.id.get()))?;
        *slot = relationship.clone();

        let stored = RelationshipLog {
            id: RelationshipLogId(tables.next_id()),
            character_relationship_id: log.character_relationship_id,
            episode_id: log.episode_id,
            change_description: log.change_description.clone(),
            previous_type: log.previous_type.clone(),
            new_type: log.new_type.clone(),
            previous_intensity: log.previous_intensity,
            new_intensity: log.new_intensity,
            created_at: at,
            updated_at: at,
        };
        tables.logs.insert(stored.id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl RelationshipLogRepository for InMemoryStore {
    async fn list_logs(
        &self,
        novel_id: NovelId,
        episode_id: Option<EpisodeId>,
        page: PageRequest,
    ) -> Result<Page<RelationshipLogEntry>, DomainError> {
        let tables = self.lock();
        let mut rows: Vec<RelationshipLogEntry> = tables
            .logs
            .values()
            .filter(|l| episode_id.is_none_or(|e| e == l.episode_id))
            .filter(|l| tables.log_novel(l) == Some(novel_id))
            .filter_map(|l| tables.log_entry(l))
            .collect();
        rows.sort_by(|a, b| {
            b.log
                .created_at
                .cmp(&a.log.created_at)
                .then(b.log.id.cmp(&a.log.id))
        });
        Ok(page.paginate(rows))
    }

    async fn find_log(
        &self,
        novel_id: NovelId,
        id: RelationshipLogId,
    ) -> Result<Option<RelationshipLogEntry>, DomainError> {
        let tables = self.lock();
        Ok(tables
            .logs
            .get(&id)
            .filter(|l| tables.log_novel(l) == Some(novel_id))
            .and_then(|l| tables.log_entry(l)))
    }
}

#[async_trait]
impl ForeshadowingRepository for InMemoryStore {
    async fn list_foreshadowings(
        &self,
        novel_id: NovelId,
        filter: ForeshadowingFilter,
        page: PageRequest,
    ) -> Result<Page<Foreshadowing>, DomainError> {
        let tables = self.lock();
        let rows = tables
            .foreshadowings
            .values()
            .filter(|f| f.novel_id == novel_id && filter.matches(f))
            .cloned()
            .collect();
        Ok(page.paginate(rows))
    }

    async fn find_foreshadowing(
        &self,
        novel_id: NovelId,
        id: ForeshadowingId,
    ) -> Result<Option<Foreshadowing>, DomainError> {
        Ok(self
            .lock()
            .foreshadowings
            .get(&id)
            .filter(|f| f.novel_id == novel_id)
            .cloned())
    }

    async fn insert_foreshadowing(
        &self,
        novel_id: NovelId,
        attributes: &ForeshadowingAttributes,
        at: DateTime<Utc>,
    ) -> Result<Foreshadowing, DomainError> {
        let mut tables = self.lock();
        let foreshadowing = Foreshadowing {
            id: ForeshadowingId(tables.next_id()),
            novel_id,
            attributes: attributes.clone(),
            created_at: at,
            updated_at: at,
        };
        tables
            .foreshadowings
            .insert(foreshadowing.id, foreshadowing.clone());
        Ok(foreshadowing)
    }

    async fn update_foreshadowing(
        &self,
        foreshadowing: &Foreshadowing,
    ) -> Result<(), DomainError> {
        let mut tables = self.lock();
        let slot = tables
            .foreshadowings
            .get_mut(&foreshadowing.id)
            .ok_or_else(|| missing("foreshadowing", foreshadowing.id.get()))?;
        *slot = foreshadowing.clone();
        Ok(())
    }

    async fn delete_foreshadowing(&self, id: ForeshadowingId) -> Result<(), DomainError> {
        self.lock().foreshadowings.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl WorldSettingRepository for InMemoryStore {
    async fn list_world_settings(
        &self,
        novel_id: NovelId,
        category: Option<WorldSettingCategory>,
        page: PageRequest,
    ) -> Result<Page<WorldSetting>, DomainError> {
        let tables = self.lock();
        let rows = tables
            .world_settings
            .values()
            .filter(|w| w.novel_id == novel_id)
            .filter(|w| category.is_none_or(|c| c == w.attributes.category))
            .cloned()
            .collect();
        Ok(page.paginate(rows))
    }

    async fn find_world_setting(
        &self,
        novel_id: NovelId,
        id: WorldSettingId,
    ) -> Result<Option<WorldSetting>, DomainError> {
        Ok(self
            .lock()
            .world_settings
            .get(&id)
            .filter(|w| w.novel_id == novel_id)
            .cloned())
    }

    async fn insert_world_setting(
        &self,
        novel_id: NovelId,
        attributes: &WorldSettingAttributes,
        at: DateTime<Utc>,
    ) -> Result<WorldSetting, DomainError> {
        let mut tables = self.lock();
        let setting = WorldSetting {
            id: WorldSettingId(tables.next_id()),
            novel_id,
            attributes: attributes.clone(),
            created_at: at,
            updated_at: at,
        };
        tables.world_settings.insert(setting.id, setting.clone());
        Ok(setting)
    }

    async fn update_world_setting(&self, setting: &WorldSetting) -> Result<(), DomainError> {
        let mut tables = self.lock();
        let slot = tables
            .world_settings
            .get_mut(&setting.id)
            .ok_or_else(|| missing("world_setting", setting.id.get()))?;
        *slot = setting.clone();
        Ok(())
    }

    async fn delete_world_setting(&self, id: WorldSettingId) -> Result<(), DomainError> {
        self.lock().world_settings.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ContextSnapshotSource for InMemoryStore {
    async fn load_context(
        &self,
        novel_id: NovelId,
        episode_id: EpisodeId,
    ) -> Result<ContextSnapshot, DomainError> {
        let tables = self.lock();

        let character_states = tables
            .states
            .values()
            .filter(|s| s.attributes.episode_id == episode_id)
            .filter_map(|s| {
                let character = tables.character_in(novel_id, s.attributes.character_id)?;
                Some((
                    s.clone(),
                    CharacterCard {
                        id: character.id,
                        name: character.profile.name.clone(),
                        role: character.profile.role.clone(),
                    },
                ))
            })
            .collect();

        let unresolved_foreshadowings = tables
            .foreshadowings
            .values()
            .filter(|f| f.novel_id == novel_id && f.attributes.status.is_unresolved())
            .cloned()
            .collect();

        let character_relationships = tables
            .relationships
            .values()
            .filter(|r| r.novel_id == novel_id)
            .filter_map(|r| tables.relationship_entry(r))
            .collect();

        let relationship_changes = tables
            .logs
            .values()
            .filter(|l| l.episode_id == episode_id)
            .filter(|l| tables.log_novel(l) == Some(novel_id))
            .filter_map(|l| tables.log_entry(l))
            .collect();

        Ok(ContextSnapshot {
            character_states,
            unresolved_foreshadowings,
            character_relationships,
            relationship_changes,
        })
    }
}
