//! Status lifecycle of a foreshadowing entry.
//!
//! Any status may move to any status. Resolving and abandoning overwrite, so
//! repeating either is a no-op apart from the timestamp.

use yugen_core::error::DomainError;
use yugen_core::ids::EpisodeId;
use yugen_core::model::{ForeshadowingAttributes, ForeshadowingStatus};

/// Moves `attributes` to `to`. The single place a status is written.
pub fn transition(attributes: &mut ForeshadowingAttributes, to: ForeshadowingStatus) {
    attributes.status = to;
}

/// Marks the entry as resolved at `resolved_episode_id`.
///
/// # Errors
///
/// Returns `DomainError::MissingParameter` when no episode is given; the
/// entry is untouched.
pub fn resolve(
    attributes: &mut ForeshadowingAttributes,
    resolved_episode_id: Option<EpisodeId>,
) -> Result<(), DomainError> {
    let episode = resolved_episode_id.ok_or(DomainError::MissingParameter("resolved_episode_id"))?;
    attributes.resolved_episode_id = Some(episode);
    transition(attributes, ForeshadowingStatus::Resolved);
    Ok(())
}

/// Marks the entry as abandoned. A previously recorded
/// `resolved_episode_id` stays as it was.
pub fn abandon(attributes: &mut ForeshadowingAttributes) {
    transition(attributes, ForeshadowingStatus::Abandoned);
}
