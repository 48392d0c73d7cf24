use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::{CharacterId, NovelId};

/// The editable part of a character record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CharacterProfile {
    /// Display name; required.
    pub name: String,
    /// Age in years.
    pub age: Option<i32>,
    /// Physical description.
    pub appearance: Option<String>,
    /// Skills, powers, talents.
    pub abilities: Option<String>,
    /// Temperament.
    pub personality: Option<String>,
    /// How the character talks.
    pub speech_style: Option<String>,
    /// Backstory.
    pub background: Option<String>,
    /// Narrative role (protagonist, rival, ...).
    pub role: Option<String>,
}

/// A stored character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    /// Record identifier.
    pub id: CharacterId,
    /// Owning novel.
    pub novel_id: NovelId,
    /// Profile fields.
    #[serde(flatten)]
    pub profile: CharacterProfile,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// Returns the minimal identity embedded in other records.
    #[must_use]
    pub fn to_ref(&self) -> CharacterRef {
        CharacterRef {
            id: self.id,
            name: self.profile.name.clone(),
        }
    }
}

/// Minimal character identity (id + name) nested in relationship and state
/// payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterRef {
    /// Character identifier.
    pub id: CharacterId,
    /// Character name.
    pub name: String,
}

/// Character identity plus role, nested in context-summary states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterCard {
    /// Character identifier.
    pub id: CharacterId,
    /// Character name.
    pub name: String,
    /// Narrative role.
    pub role: Option<String>,
}
