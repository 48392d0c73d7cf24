//! Commands for the relationships context.
//!
//! Intensity arrives as a raw JSON value so that non-integer input (`5.5`,
//! `"high"`) can be reported as a field error instead of a decode failure.

use serde_json::Value;
use uuid::Uuid;
use yugen_core::ids::{CharacterId, EpisodeId, NovelId, RelationshipId};

/// Command to create a directed relationship.
#[derive(Debug, Clone, Default)]
pub struct CreateRelationship {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning novel.
    pub novel_id: NovelId,
    /// Source character; required.
    pub character_id: Option<CharacterId>,
    /// Target character; required.
    pub related_character_id: Option<CharacterId>,
    /// Label such as "rival"; required.
    pub relationship_type: Option<String>,
    /// Free text.
    pub description: Option<String>,
    /// Raw intensity; `None` or JSON `null` leaves it unspecified.
    pub intensity: Option<Value>,
}

/// Fields of a relationship that an update may touch.
#[derive(Debug, Clone, Default)]
pub struct RelationshipChanges {
    /// New source character.
    pub character_id: Option<CharacterId>,
    /// New target character.
    pub related_character_id: Option<CharacterId>,
    /// New label.
    pub relationship_type: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Raw intensity; `Some(Value::Null)` clears it.
    pub intensity: Option<Value>,
}

/// Command to update a relationship in place without logging.
#[derive(Debug, Clone)]
pub struct UpdateRelationship {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The relationship to update.
    pub relationship_id: RelationshipId,
    /// Fields to change.
    pub changes: RelationshipChanges,
}

/// Command to delete a relationship together with its log.
#[derive(Debug, Clone)]
pub struct DeleteRelationship {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The relationship to delete.
    pub relationship_id: RelationshipId,
}

/// Command to change a relationship at an episode and log the change.
#[derive(Debug, Clone)]
pub struct RecordRelationshipChange {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The relationship that changed.
    pub relationship_id: RelationshipId,
    /// Episode the change happens in; required.
    pub episode_id: Option<EpisodeId>,
    /// Type after the change; `None` keeps the current type.
    pub new_type: Option<String>,
    /// Raw intensity after the change; `None` keeps it, JSON `null` clears it.
    pub new_intensity: Option<Value>,
    /// Narrative explanation of the change.
    pub change_description: Option<String>,
}

yugen_core::impl_command!(
    CreateRelationship => "relationships.create_relationship",
    UpdateRelationship => "relationships.update_relationship",
    DeleteRelationship => "relationships.delete_relationship",
    RecordRelationshipChange => "relationships.record_change",
);
