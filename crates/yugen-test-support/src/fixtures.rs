//! Builders for the attribute structs used throughout the tests.

use yugen_core::ids::{CharacterId, EpisodeId};
use yugen_core::model::{
    CharacterProfile, ForeshadowingAttributes, RelationshipAttributes, StateAttributes,
    WorldSettingAttributes, WorldSettingCategory,
};

/// A profile with only a name.
#[must_use]
pub fn profile(name: &str) -> CharacterProfile {
    CharacterProfile {
        name: name.to_owned(),
        ..CharacterProfile::default()
    }
}

/// A directed relationship with no description or intensity.
#[must_use]
pub fn relationship(
    character_id: CharacterId,
    related_character_id: CharacterId,
    relationship_type: &str,
) -> RelationshipAttributes {
    RelationshipAttributes {
        character_id,
        related_character_id,
        relationship_type: relationship_type.to_owned(),
        description: None,
        intensity: None,
    }
}

/// An otherwise empty state for (character, episode).
#[must_use]
pub fn state(character_id: CharacterId, episode: i64) -> StateAttributes {
    StateAttributes {
        character_id,
        episode_id: EpisodeId(episode),
        location: None,
        emotional_state: None,
        physical_state: None,
        knowledge: None,
        inventory: Vec::new(),
        notes: None,
    }
}

/// A planted, normal-importance foreshadowing entry.
#[must_use]
pub fn foreshadowing(title: &str) -> ForeshadowingAttributes {
    ForeshadowingAttributes {
        title: title.to_owned(),
        ..ForeshadowingAttributes::default()
    }
}

/// A world setting with empty details.
#[must_use]
pub fn world_setting(category: WorldSettingCategory, title: &str) -> WorldSettingAttributes {
    WorldSettingAttributes {
        category,
        title: title.to_owned(),
        description: None,
        details: serde_json::json!({}),
    }
}
