//! Command handlers for the relationships context.

use tracing::{info, warn};
use yugen_core::clock::Clock;
use yugen_core::error::DomainError;
use yugen_core::ids::NovelId;
use yugen_core::model::{CharacterRelationship, RelationshipAttributes, RelationshipLog};
use yugen_core::repository::{CharacterRepository, RelationshipRepository};

use crate::application::query_handlers::get_relationship;
use crate::domain::commands::{
    CreateRelationship, DeleteRelationship, RecordRelationshipChange, UpdateRelationship,
};
use crate::domain::validation::{
    apply_changes, apply_recorded_change, duplicate_relationship, relationship_attributes,
};

/// Both endpoints must be characters of `novel_id`.
async fn ensure_endpoints_in_novel(
    novel_id: NovelId,
    attributes: &RelationshipAttributes,
    characters: &dyn CharacterRepository,
) -> Result<(), DomainError> {
    for id in [attributes.character_id, attributes.related_character_id] {
        if characters.find_character(novel_id, id).await?.is_none() {
            return Err(DomainError::NotFound {
                resource: "character",
                id: id.get(),
            });
        }
    }
    Ok(())
}

/// Handles `CreateRelationship`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for invalid input or an existing edge in
/// the same direction, `DomainError::NotFound` if either character is not in
/// the novel.
pub async fn handle_create_relationship(
    command: &CreateRelationship,
    clock: &dyn Clock,
    characters: &dyn CharacterRepository,
    relationships: &dyn RelationshipRepository,
) -> Result<CharacterRelationship, DomainError> {
    let attributes = relationship_attributes(command)?;
    ensure_endpoints_in_novel(command.novel_id, &attributes, characters).await?;

    if relationships
        .relationship_exists(attributes.character_id, attributes.related_character_id, None)
        .await?
    {
        warn!(
            character_id = %attributes.character_id,
            related_character_id = %attributes.related_character_id,
            "duplicate relationship rejected"
        );
        return Err(duplicate_relationship());
    }

    let relationship = relationships
        .insert_relationship(command.novel_id, &attributes, clock.now())
        .await?;

    info!(relationship_id = %relationship.id, "relationship created");
    Ok(relationship)
}

/// Handles `UpdateRelationship`.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the relationship or a newly referenced
/// character is not in the novel, `DomainError::Validation` if the result is
/// invalid or collides with another edge.
pub async fn handle_update_relationship(
    command: UpdateRelationship,
    clock: &dyn Clock,
    characters: &dyn CharacterRepository,
    relationships: &dyn RelationshipRepository,
) -> Result<CharacterRelationship, DomainError> {
    let mut relationship =
        get_relationship(command.novel_id, command.relationship_id, relationships)
            .await?
            .relationship;
    let before = relationship.attributes.clone();

    apply_changes(command.changes, &mut relationship.attributes)?;

    let attributes = &relationship.attributes;
    let endpoints_changed = attributes.character_id != before.character_id
        || attributes.related_character_id != before.related_character_id;
    if endpoints_changed {
        ensure_endpoints_in_novel(command.novel_id, attributes, characters).await?;
        if relationships
            .relationship_exists(
                attributes.character_id,
                attributes.related_character_id,
                Some(relationship.id),
            )
            .await?
        {
            return Err(duplicate_relationship());
        }
    }

    relationship.updated_at = clock.now();
    relationships.update_relationship(&relationship).await?;
    Ok(relationship)
}

/// Handles `DeleteRelationship`; the relationship's log goes with it.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the relationship is not in the novel.
pub async fn handle_delete_relationship(
    command: &DeleteRelationship,
    relationships: &dyn RelationshipRepository,
) -> Result<(), DomainError> {
    let entry = get_relationship(command.novel_id, command.relationship_id, relationships).await?;
    relationships
        .delete_relationship(entry.relationship.id)
        .await?;

    info!(relationship_id = %entry.relationship.id, "relationship deleted");
    Ok(())
}

/// Handles `RecordRelationshipChange`: updates type and intensity and appends
/// one log row in a single store write.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the relationship is not in the novel,
/// `DomainError::Validation` for a missing episode or invalid new values.
pub async fn handle_record_change(
    command: &RecordRelationshipChange,
    clock: &dyn Clock,
    relationships: &dyn RelationshipRepository,
) -> Result<RelationshipLog, DomainError> {
    let mut relationship =
        get_relationship(command.novel_id, command.relationship_id, relationships)
            .await?
            .relationship;

    let log = apply_recorded_change(command, &mut relationship)?;
    let now = clock.now();
    relationship.updated_at = now;

    let stored = relationships.record_change(&relationship, &log, now).await?;

    info!(
        relationship_id = %relationship.id,
        episode_id = %stored.episode_id,
        "relationship change recorded"
    );
    Ok(stored)
}
