//! Write-time checks for relationships and recorded changes.

use serde_json::Value;
use yugen_core::error::{DomainError, FieldError};
use yugen_core::model::{CharacterRelationship, NewRelationshipLog, RelationshipAttributes};
use yugen_core::validation::{TAKEN, Validator};

use super::commands::{CreateRelationship, RecordRelationshipChange, RelationshipChanges};

/// Allowed intensity values, inclusive.
pub const INTENSITY_RANGE: std::ops::RangeInclusive<i64> = 1..=10;

const INTENSITY_MESSAGE: &str = "must be an integer between 1 and 10";
const SELF_REFERENCE: &str = "can't be the same character";

/// Parses a raw intensity value.
///
/// Absent and `null` mean unspecified. Anything other than a JSON integer in
/// `1..=10` is rejected, including `5.5`, `5.0` and numeric strings.
///
/// # Errors
///
/// Returns a `FieldError` on `field` for every other value.
pub fn parse_intensity(field: &str, raw: Option<&Value>) -> Result<Option<i32>, FieldError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .filter(|n| INTENSITY_RANGE.contains(n))
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| FieldError::new(field, INTENSITY_MESSAGE)),
    }
}

fn check_edge(v: &mut Validator, attributes: &RelationshipAttributes) {
    v.require_text("relationship_type", &attributes.relationship_type);
    if attributes.character_id == attributes.related_character_id {
        v.add("related_character_id", SELF_REFERENCE);
    }
}

/// Turns a create command into relationship attributes.
///
/// # Errors
///
/// Returns `DomainError::Validation` listing every missing id, a blank type,
/// an invalid intensity and a self-referencing edge.
pub fn relationship_attributes(
    command: &CreateRelationship,
) -> Result<RelationshipAttributes, DomainError> {
    let mut v = Validator::new();
    v.require("character_id", command.character_id.as_ref());
    v.require("related_character_id", command.related_character_id.as_ref());
    let intensity = v.check(parse_intensity("intensity", command.intensity.as_ref()));

    let (Some(character_id), Some(related_character_id), Some(intensity)) =
        (command.character_id, command.related_character_id, intensity)
    else {
        v.require_text(
            "relationship_type",
            command.relationship_type.as_deref().unwrap_or_default(),
        );
        return Err(v.into_error());
    };

    let attributes = RelationshipAttributes {
        character_id,
        related_character_id,
        relationship_type: command.relationship_type.clone().unwrap_or_default(),
        description: command.description.clone(),
        intensity,
    };
    check_edge(&mut v, &attributes);
    v.finish()?;
    Ok(attributes)
}

/// Applies an update change set to `attributes` and re-checks the result.
///
/// # Errors
///
/// Returns `DomainError::Validation` when the result is invalid.
pub fn apply_changes(
    changes: RelationshipChanges,
    attributes: &mut RelationshipAttributes,
) -> Result<(), DomainError> {
    let mut v = Validator::new();

    if let Some(character_id) = changes.character_id {
        attributes.character_id = character_id;
    }
    if let Some(related_character_id) = changes.related_character_id {
        attributes.related_character_id = related_character_id;
    }
    if let Some(relationship_type) = changes.relationship_type {
        attributes.relationship_type = relationship_type;
    }
    if let Some(description) = changes.description {
        attributes.description = description;
    }
    if let Some(raw) = changes.intensity
        && let Some(intensity) = v.check(parse_intensity("intensity", Some(&raw)))
    {
        attributes.intensity = intensity;
    }

    check_edge(&mut v, attributes);
    v.finish()
}

/// Applies a recorded change to `relationship` and builds the log row that
/// captures it.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a missing episode, a blank new type
/// or an invalid new intensity. `relationship` is untouched on error.
pub fn apply_recorded_change(
    command: &RecordRelationshipChange,
    relationship: &mut CharacterRelationship,
) -> Result<NewRelationshipLog, DomainError> {
    let mut v = Validator::new();
    v.require("episode_id", command.episode_id.as_ref());
    if let Some(new_type) = &command.new_type {
        v.require_text("new_type", new_type);
    }
    let new_intensity = v.check(parse_intensity("new_intensity", command.new_intensity.as_ref()));

    let (Some(episode_id), Some(new_intensity)) = (command.episode_id, new_intensity) else {
        return Err(v.into_error());
    };
    v.finish()?;

    let attributes = &mut relationship.attributes;
    let previous_type = attributes.relationship_type.clone();
    let previous_intensity = attributes.intensity;

    if let Some(new_type) = &command.new_type {
        attributes.relationship_type.clone_from(new_type);
    }
    if command.new_intensity.is_some() {
        attributes.intensity = new_intensity;
    }

    Ok(NewRelationshipLog {
        character_relationship_id: relationship.id,
        episode_id,
        change_description: command.change_description.clone(),
        previous_type: Some(previous_type),
        new_type: Some(attributes.relationship_type.clone()),
        previous_intensity,
        new_intensity: attributes.intensity,
    })
}

/// The error reported when a directed pair already has a relationship.
#[must_use]
pub fn duplicate_relationship() -> DomainError {
    DomainError::invalid_field("character_id", TAKEN)
}
