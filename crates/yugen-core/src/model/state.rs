use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::{CharacterId, CharacterStateId, EpisodeId};

use super::CharacterRef;

/// The editable part of a character state snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateAttributes {
    /// Character the snapshot describes.
    pub character_id: CharacterId,
    /// Episode the snapshot belongs to.
    pub episode_id: EpisodeId,
    /// Where the character is.
    pub location: Option<String>,
    /// Mood.
    pub emotional_state: Option<String>,
    /// Injuries, fatigue, ...
    pub physical_state: Option<String>,
    /// What the character knows at this point.
    pub knowledge: Option<String>,
    /// Items carried, in order.
    pub inventory: Vec<String>,
    /// Author notes.
    pub notes: Option<String>,
}

/// A stored point-in-time snapshot of one character at one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterState {
    /// Record identifier.
    pub id: CharacterStateId,
    /// Editable fields.
    #[serde(flatten)]
    pub attributes: StateAttributes,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// A state joined with its character's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterStateEntry {
    /// The state record.
    #[serde(flatten)]
    pub state: CharacterState,
    /// The character it describes.
    pub character: CharacterRef,
}

/// Inclusive episode bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpisodeRange {
    /// Lowest episode id included.
    pub from: Option<EpisodeId>,
    /// Highest episode id included.
    pub to: Option<EpisodeId>,
}

impl EpisodeRange {
    /// Returns true when `episode` lies within the bounds.
    #[must_use]
    pub fn contains(&self, episode: EpisodeId) -> bool {
        self.from.is_none_or(|from| episode >= from) && self.to.is_none_or(|to| episode <= to)
    }
}

/// Optional list filters for character states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateFilter {
    /// Exact episode match.
    pub episode_id: Option<EpisodeId>,
    /// Exact character match.
    pub character_id: Option<CharacterId>,
    /// Episode bounds.
    pub range: EpisodeRange,
}

impl StateFilter {
    /// Returns true when `state` passes every set filter.
    #[must_use]
    pub fn matches(&self, state: &CharacterState) -> bool {
        let attrs = &state.attributes;
        self.episode_id.is_none_or(|e| e == attrs.episode_id)
            && self.character_id.is_none_or(|c| c == attrs.character_id)
            && self.range.contains(attrs.episode_id)
    }
}
