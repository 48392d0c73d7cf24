//! Timestamp-free projections of the records in a context summary.

use serde::Serialize;
use yugen_core::ids::{
    CharacterStateId, EpisodeId, ForeshadowingId, NovelId, RelationshipId, RelationshipLogId,
};
use yugen_core::model::{
    CharacterCard, CharacterRef, CharacterState, Foreshadowing, ForeshadowingAttributes,
    RelationshipAttributes, RelationshipEntry, RelationshipLogEntry, StateAttributes,
};

/// A character's state at the requested episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateView {
    pub id: CharacterStateId,
    #[serde(flatten)]
    pub attributes: StateAttributes,
    pub character: CharacterCard,
}

impl From<(CharacterState, CharacterCard)> for StateView {
    fn from((state, character): (CharacterState, CharacterCard)) -> Self {
        Self {
            id: state.id,
            attributes: state.attributes,
            character,
        }
    }
}

/// An open foreshadowing thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeshadowingView {
    pub id: ForeshadowingId,
    pub novel_id: NovelId,
    #[serde(flatten)]
    pub attributes: ForeshadowingAttributes,
}

impl From<Foreshadowing> for ForeshadowingView {
    fn from(foreshadowing: Foreshadowing) -> Self {
        Self {
            id: foreshadowing.id,
            novel_id: foreshadowing.novel_id,
            attributes: foreshadowing.attributes,
        }
    }
}

/// One edge of the relationship graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipView {
    pub id: RelationshipId,
    pub novel_id: NovelId,
    #[serde(flatten)]
    pub attributes: RelationshipAttributes,
    pub character: CharacterRef,
    pub related_character: CharacterRef,
}

impl From<RelationshipEntry> for RelationshipView {
    fn from(entry: RelationshipEntry) -> Self {
        Self {
            id: entry.relationship.id,
            novel_id: entry.relationship.novel_id,
            attributes: entry.relationship.attributes,
            character: entry.character,
            related_character: entry.related_character,
        }
    }
}

/// The endpoints of the relationship a change belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipLink {
    pub id: RelationshipId,
    pub character: CharacterRef,
    pub related_character: CharacterRef,
}

/// A relationship change recorded at the requested episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationshipChangeView {
    pub id: RelationshipLogId,
    pub character_relationship_id: RelationshipId,
    pub episode_id: EpisodeId,
    pub change_description: Option<String>,
    pub previous_type: Option<String>,
    pub new_type: Option<String>,
    pub previous_intensity: Option<i32>,
    pub new_intensity: Option<i32>,
    pub character_relationship: RelationshipLink,
}

impl From<RelationshipLogEntry> for RelationshipChangeView {
    fn from(entry: RelationshipLogEntry) -> Self {
        let log = entry.log;
        let relationship = entry.character_relationship;
        Self {
            id: log.id,
            character_relationship_id: log.character_relationship_id,
            episode_id: log.episode_id,
            change_description: log.change_description,
            previous_type: log.previous_type,
            new_type: log.new_type,
            previous_intensity: log.previous_intensity,
            new_intensity: log.new_intensity,
            character_relationship: RelationshipLink {
                id: relationship.id,
                character: relationship.character,
                related_character: relationship.related_character,
            },
        }
    }
}

/// Narrative state of a novel at one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    /// The episode the summary was built for.
    pub episode_id: EpisodeId,
    /// States recorded at exactly this episode.
    pub character_states: Vec<StateView>,
    /// Entries still planted or hinted, regardless of episode.
    pub unresolved_foreshadowings: Vec<ForeshadowingView>,
    /// Every relationship of the novel, as it stands now.
    pub character_relationships: Vec<RelationshipView>,
    /// Log rows recorded at exactly this episode.
    pub recent_relationship_changes: Vec<RelationshipChangeView>,
}
