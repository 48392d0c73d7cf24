//! Commands for the characters context.
//!
//! Update commands carry a change set: an outer `None` leaves a field alone,
//! `Some(None)` clears a nullable field.

use uuid::Uuid;
use yugen_core::ids::{CharacterId, CharacterStateId, EpisodeId, NovelId};
use yugen_core::model::{CharacterProfile, StateAttributes};

/// Command to create a character.
#[derive(Debug, Clone)]
pub struct CreateCharacter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning novel.
    pub novel_id: NovelId,
    /// The profile to store.
    pub profile: CharacterProfile,
}

/// Fields of a character that an update may touch.
#[derive(Debug, Clone, Default)]
pub struct CharacterChanges {
    /// New name.
    pub name: Option<String>,
    /// New age.
    pub age: Option<Option<i32>>,
    /// New appearance.
    pub appearance: Option<Option<String>>,
    /// New abilities.
    pub abilities: Option<Option<String>>,
    /// New personality.
    pub personality: Option<Option<String>>,
    /// New speech style.
    pub speech_style: Option<Option<String>>,
    /// New background.
    pub background: Option<Option<String>>,
    /// New role.
    pub role: Option<Option<String>>,
}

impl CharacterChanges {
    /// Applies the change set to `profile`.
    pub fn apply_to(self, profile: &mut CharacterProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(appearance) = self.appearance {
            profile.appearance = appearance;
        }
        if let Some(abilities) = self.abilities {
            profile.abilities = abilities;
        }
        if let Some(personality) = self.personality {
            profile.personality = personality;
        }
        if let Some(speech_style) = self.speech_style {
            profile.speech_style = speech_style;
        }
        if let Some(background) = self.background {
            profile.background = background;
        }
        if let Some(role) = self.role {
            profile.role = role;
        }
    }
}

/// Command to update a character.
#[derive(Debug, Clone)]
pub struct UpdateCharacter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The character to update.
    pub character_id: CharacterId,
    /// Fields to change.
    pub changes: CharacterChanges,
}

/// Command to delete a character and everything that hangs off it.
#[derive(Debug, Clone)]
pub struct DeleteCharacter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The character to delete.
    pub character_id: CharacterId,
}

/// Command to record a character's state at an episode.
#[derive(Debug, Clone, Default)]
pub struct CreateCharacterState {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The character described; required.
    pub character_id: Option<CharacterId>,
    /// The episode; required.
    pub episode_id: Option<EpisodeId>,
    /// Where the character is.
    pub location: Option<String>,
    /// Mood.
    pub emotional_state: Option<String>,
    /// Physical condition.
    pub physical_state: Option<String>,
    /// What the character knows.
    pub knowledge: Option<String>,
    /// Items carried, in order.
    pub inventory: Vec<String>,
    /// Author notes.
    pub notes: Option<String>,
}

/// Fields of a state that an update may touch.
#[derive(Debug, Clone, Default)]
pub struct StateChanges {
    /// Move the snapshot to another character of the same novel.
    pub character_id: Option<CharacterId>,
    /// Move the snapshot to another episode.
    pub episode_id: Option<EpisodeId>,
    /// New location.
    pub location: Option<Option<String>>,
    /// New mood.
    pub emotional_state: Option<Option<String>>,
    /// New physical condition.
    pub physical_state: Option<Option<String>>,
    /// New knowledge.
    pub knowledge: Option<Option<String>>,
    /// Replacement inventory.
    pub inventory: Option<Vec<String>>,
    /// New notes.
    pub notes: Option<Option<String>>,
}

impl StateChanges {
    /// Applies the change set to `attributes`.
    pub fn apply_to(self, attributes: &mut StateAttributes) {
        if let Some(character_id) = self.character_id {
            attributes.character_id = character_id;
        }
        if let Some(episode_id) = self.episode_id {
            attributes.episode_id = episode_id;
        }
        if let Some(location) = self.location {
            attributes.location = location;
        }
        if let Some(emotional_state) = self.emotional_state {
            attributes.emotional_state = emotional_state;
        }
        if let Some(physical_state) = self.physical_state {
            attributes.physical_state = physical_state;
        }
        if let Some(knowledge) = self.knowledge {
            attributes.knowledge = knowledge;
        }
        if let Some(inventory) = self.inventory {
            attributes.inventory = inventory;
        }
        if let Some(notes) = self.notes {
            attributes.notes = notes;
        }
    }
}

/// Command to update a character state.
#[derive(Debug, Clone)]
pub struct UpdateCharacterState {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The state to update.
    pub state_id: CharacterStateId,
    /// Fields to change.
    pub changes: StateChanges,
}

/// Command to delete a character state.
#[derive(Debug, Clone)]
pub struct DeleteCharacterState {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The state to delete.
    pub state_id: CharacterStateId,
}

yugen_core::impl_command!(
    CreateCharacter => "characters.create_character",
    UpdateCharacter => "characters.update_character",
    DeleteCharacter => "characters.delete_character",
    CreateCharacterState => "characters.create_state",
    UpdateCharacterState => "characters.update_state",
    DeleteCharacterState => "characters.delete_state",
);
