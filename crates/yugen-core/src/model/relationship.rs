use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::{CharacterId, EpisodeId, NovelId, RelationshipId, RelationshipLogId};

use super::CharacterRef;

/// The editable part of a directed relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipAttributes {
    /// Source of the edge.
    pub character_id: CharacterId,
    /// Target of the edge.
    pub related_character_id: CharacterId,
    /// Free-form label, e.g. "rival"; required.
    pub relationship_type: String,
    /// Free text.
    pub description: Option<String>,
    /// Strength in `1..=10`; `None` means unspecified.
    pub intensity: Option<i32>,
}

/// A stored directed relationship. A→B and B→A are independent records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterRelationship {
    /// Record identifier.
    pub id: RelationshipId,
    /// Owning novel.
    pub novel_id: NovelId,
    /// Editable fields.
    #[serde(flatten)]
    pub attributes: RelationshipAttributes,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A relationship with both endpoints resolved to id + name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipEntry {
    /// The relationship record.
    #[serde(flatten)]
    pub relationship: CharacterRelationship,
    /// Source character.
    pub character: CharacterRef,
    /// Target character.
    pub related_character: CharacterRef,
}

/// The fields of a log row before it is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRelationshipLog {
    /// Relationship the change belongs to.
    pub character_relationship_id: RelationshipId,
    /// Episode at which the change happened.
    pub episode_id: EpisodeId,
    /// Narrative explanation.
    pub change_description: Option<String>,
    /// Type before the change.
    pub previous_type: Option<String>,
    /// Type after the change.
    pub new_type: Option<String>,
    /// Intensity before the change.
    pub previous_intensity: Option<i32>,
    /// Intensity after the change.
    pub new_intensity: Option<i32>,
}

/// An append-only audit record of a relationship change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipLog {
    /// Record identifier.
    pub id: RelationshipLogId,
    /// Relationship the change belongs to.
    pub character_relationship_id: RelationshipId,
    /// Episode at which the change happened.
    pub episode_id: EpisodeId,
    /// Narrative explanation.
    pub change_description: Option<String>,
    /// Type before the change.
    pub previous_type: Option<String>,
    /// Type after the change.
    pub new_type: Option<String>,
    /// Intensity before the change.
    pub previous_intensity: Option<i32>,
    /// Intensity after the change.
    pub new_intensity: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// The relationship a log row hangs off, reduced to what readers need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipSummary {
    /// Relationship identifier.
    pub id: RelationshipId,
    /// Current relationship type.
    pub relationship_type: String,
    /// Source character.
    pub character: CharacterRef,
    /// Target character.
    pub related_character: CharacterRef,
}

/// A log row joined with its relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipLogEntry {
    /// The log record.
    #[serde(flatten)]
    pub log: RelationshipLog,
    /// The relationship it belongs to.
    pub character_relationship: RelationshipSummary,
}
