//! Row structs decoded by `sqlx` and their conversion into domain records.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use yugen_core::error::DomainError;
use yugen_core::ids::{
    CharacterId, CharacterStateId, EpisodeId, ForeshadowingId, NovelId, RelationshipId,
    RelationshipLogId, WorldSettingId,
};
use yugen_core::model::{
    Character, CharacterCard, CharacterProfile, CharacterRef, CharacterRelationship,
    CharacterState, CharacterStateEntry, Foreshadowing, ForeshadowingAttributes,
    ForeshadowingStatus, Importance, RelationshipAttributes, RelationshipEntry, RelationshipLog,
    RelationshipLogEntry, RelationshipSummary, StateAttributes, WorldSetting,
    WorldSettingAttributes, WorldSettingCategory,
};

use crate::error::corrupt;

/// Column list of `characters`.
pub(crate) const CHARACTER_COLUMNS: &str = "id, novel_id, name, age, appearance, abilities, \
     personality, speech_style, background, role, created_at, updated_at";

/// Select list for states joined with their character as `c`.
pub(crate) const STATE_SELECT: &str = "SELECT s.id, s.character_id, s.episode_id, s.location, \
     s.emotional_state, s.physical_state, s.knowledge, s.inventory, s.notes, s.created_at, \
     s.updated_at, c.name AS character_name, c.role AS character_role \
     FROM character_states s JOIN characters c ON c.id = s.character_id";

/// Select list for relationships joined with both endpoints.
pub(crate) const RELATIONSHIP_SELECT: &str = "SELECT r.id, r.novel_id, r.character_id, \
     r.related_character_id, r.relationship_type, r.description, r.intensity, r.created_at, \
     r.updated_at, c.name AS character_name, rc.name AS related_character_name \
     FROM character_relationships r \
     JOIN characters c ON c.id = r.character_id \
     JOIN characters rc ON rc.id = r.related_character_id";

/// Select list for logs joined with their relationship and its endpoints.
/// The source character's `novel_id` is exposed as `c.novel_id` for scoping.
pub(crate) const LOG_SELECT: &str = "SELECT l.id, l.character_relationship_id, l.episode_id, \
     l.change_description, l.previous_type, l.new_type, l.previous_intensity, \
     l.new_intensity, l.created_at, l.updated_at, r.relationship_type, r.character_id, \
     c.name AS character_name, r.related_character_id, rc.name AS related_character_name \
     FROM relationship_logs l \
     JOIN character_relationships r ON r.id = l.character_relationship_id \
     JOIN characters c ON c.id = r.character_id \
     JOIN characters rc ON rc.id = r.related_character_id";

/// Column list of `foreshadowings`.
pub(crate) const FORESHADOWING_COLUMNS: &str = "id, novel_id, title, description, \
     planted_episode_id, resolved_episode_id, planned_resolution_episode, status, importance, \
     created_at, updated_at";

/// Column list of `world_settings`.
pub(crate) const WORLD_SETTING_COLUMNS: &str =
    "id, novel_id, category, title, description, details, created_at, updated_at";

#[derive(Debug, FromRow)]
pub(crate) struct CharacterRow {
    id: i64,
    novel_id: i64,
    name: String,
    age: Option<i32>,
    appearance: Option<String>,
    abilities: Option<String>,
    personality: Option<String>,
    speech_style: Option<String>,
    background: Option<String>,
    role: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CharacterRow> for Character {
    fn from(row: CharacterRow) -> Self {
        Self {
            id: CharacterId(row.id),
            novel_id: NovelId(row.novel_id),
            profile: CharacterProfile {
                name: row.name,
                age: row.age,
                appearance: row.appearance,
                abilities: row.abilities,
                personality: row.personality,
                speech_style: row.speech_style,
                background: row.background,
                role: row.role,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct StateRow {
    id: i64,
    character_id: i64,
    episode_id: i64,
    location: Option<String>,
    emotional_state: Option<String>,
    physical_state: Option<String>,
    knowledge: Option<String>,
    inventory: Json<Vec<String>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    character_name: String,
    character_role: Option<String>,
}

impl StateRow {
    fn split(self) -> (CharacterState, CharacterCard) {
        let card = CharacterCard {
            id: CharacterId(self.character_id),
            name: self.character_name,
            role: self.character_role,
        };
        let state = CharacterState {
            id: CharacterStateId(self.id),
            attributes: StateAttributes {
                character_id: CharacterId(self.character_id),
                episode_id: EpisodeId(self.episode_id),
                location: self.location,
                emotional_state: self.emotional_state,
                physical_state: self.physical_state,
                knowledge: self.knowledge,
                inventory: self.inventory.0,
                notes: self.notes,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (state, card)
    }

    pub(crate) fn into_state(self) -> CharacterState {
        self.split().0
    }

    pub(crate) fn into_entry(self) -> CharacterStateEntry {
        let (state, card) = self.split();
        CharacterStateEntry {
            state,
            character: CharacterRef {
                id: card.id,
                name: card.name,
            },
        }
    }

    pub(crate) fn into_carded(self) -> (CharacterState, CharacterCard) {
        self.split()
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct RelationshipRow {
    #[sqlx(flatten)]
    record: RelationshipRecordRow,
    character_name: String,
    related_character_name: String,
}

impl From<RelationshipRow> for RelationshipEntry {
    fn from(row: RelationshipRow) -> Self {
        let relationship = CharacterRelationship::from(row.record);
        Self {
            character: CharacterRef {
                id: relationship.attributes.character_id,
                name: row.character_name,
            },
            related_character: CharacterRef {
                id: relationship.attributes.related_character_id,
                name: row.related_character_name,
            },
            relationship,
        }
    }
}

/// A bare `character_relationships` row, as returned by `RETURNING *`.
#[derive(Debug, FromRow)]
pub(crate) struct RelationshipRecordRow {
    id: i64,
    novel_id: i64,
    character_id: i64,
    related_character_id: i64,
    relationship_type: String,
    description: Option<String>,
    intensity: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RelationshipRecordRow> for CharacterRelationship {
    fn from(row: RelationshipRecordRow) -> Self {
        Self {
            id: RelationshipId(row.id),
            novel_id: NovelId(row.novel_id),
            attributes: RelationshipAttributes {
                character_id: CharacterId(row.character_id),
                related_character_id: CharacterId(row.related_character_id),
                relationship_type: row.relationship_type,
                description: row.description,
                intensity: row.intensity,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A bare `relationship_logs` row.
#[derive(Debug, FromRow)]
pub(crate) struct LogRecordRow {
    id: i64,
    character_relationship_id: i64,
    episode_id: i64,
    change_description: Option<String>,
    previous_type: Option<String>,
    new_type: Option<String>,
    previous_intensity: Option<i32>,
    new_intensity: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LogRecordRow> for RelationshipLog {
    fn from(row: LogRecordRow) -> Self {
        Self {
            id: RelationshipLogId(row.id),
            character_relationship_id: RelationshipId(row.character_relationship_id),
            episode_id: EpisodeId(row.episode_id),
            change_description: row.change_description,
            previous_type: row.previous_type,
            new_type: row.new_type,
            previous_intensity: row.previous_intensity,
            new_intensity: row.new_intensity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct LogRow {
    #[sqlx(flatten)]
    log: LogRecordRow,
    relationship_type: String,
    character_id: i64,
    character_name: String,
    related_character_id: i64,
    related_character_name: String,
}

impl From<LogRow> for RelationshipLogEntry {
    fn from(row: LogRow) -> Self {
        let log = RelationshipLog::from(row.log);
        Self {
            character_relationship: RelationshipSummary {
                id: log.character_relationship_id,
                relationship_type: row.relationship_type,
                character: CharacterRef {
                    id: CharacterId(row.character_id),
                    name: row.character_name,
                },
                related_character: CharacterRef {
                    id: CharacterId(row.related_character_id),
                    name: row.related_character_name,
                },
            },
            log,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ForeshadowingRow {
    id: i64,
    novel_id: i64,
    title: String,
    description: Option<String>,
    planted_episode_id: Option<i64>,
    resolved_episode_id: Option<i64>,
    planned_resolution_episode: Option<i32>,
    status: String,
    importance: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ForeshadowingRow> for Foreshadowing {
    type Error = DomainError;

    fn try_from(row: ForeshadowingRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ForeshadowingStatus>()
            .map_err(|_| corrupt("status", &row.status))?;
        let importance = row
            .importance
            .parse::<Importance>()
            .map_err(|_| corrupt("importance", &row.importance))?;
        Ok(Self {
            id: ForeshadowingId(row.id),
            novel_id: NovelId(row.novel_id),
            attributes: ForeshadowingAttributes {
                title: row.title,
                description: row.description,
                planted_episode_id: row.planted_episode_id.map(EpisodeId),
                resolved_episode_id: row.resolved_episode_id.map(EpisodeId),
                planned_resolution_episode: row.planned_resolution_episode,
                status,
                importance,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct WorldSettingRow {
    id: i64,
    novel_id: i64,
    category: String,
    title: String,
    description: Option<String>,
    details: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WorldSettingRow> for WorldSetting {
    type Error = DomainError;

    fn try_from(row: WorldSettingRow) -> Result<Self, Self::Error> {
        let category = row
            .category
            .parse::<WorldSettingCategory>()
            .map_err(|_| corrupt("category", &row.category))?;
        Ok(Self {
            id: WorldSettingId(row.id),
            novel_id: NovelId(row.novel_id),
            attributes: WorldSettingAttributes {
                category,
                title: row.title,
                description: row.description,
                details: row.details,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
