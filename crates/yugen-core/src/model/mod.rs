//! Entity records and the joined shapes the store hands back.

mod character;
mod foreshadowing;
mod relationship;
mod state;
mod world_setting;

pub use character::{Character, CharacterCard, CharacterProfile, CharacterRef};
pub use foreshadowing::{
    Foreshadowing, ForeshadowingAttributes, ForeshadowingFilter, ForeshadowingStatus, Importance,
};
pub use relationship::{
    CharacterRelationship, NewRelationshipLog, RelationshipAttributes, RelationshipEntry,
    RelationshipLog, RelationshipLogEntry, RelationshipSummary,
};
pub use state::{CharacterState, CharacterStateEntry, EpisodeRange, StateAttributes, StateFilter};
pub use world_setting::{WorldSetting, WorldSettingAttributes, WorldSettingCategory};

/// Everything the context aggregator needs, read from one consistent view
/// of the store.
#[derive(Debug, Clone, Default)]
pub struct ContextSnapshot {
    /// States recorded exactly at the requested episode, with their character.
    pub character_states: Vec<(CharacterState, CharacterCard)>,
    /// Foreshadowing entries still planted or hinted.
    pub unresolved_foreshadowings: Vec<Foreshadowing>,
    /// The live relationship graph of the novel.
    pub character_relationships: Vec<RelationshipEntry>,
    /// Relationship log rows recorded exactly at the requested episode.
    pub relationship_changes: Vec<RelationshipLogEntry>,
}
