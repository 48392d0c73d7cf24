//! The context summary query.

use tracing::{debug, info};
use yugen_core::error::DomainError;
use yugen_core::ids::{EpisodeId, NovelId};
use yugen_core::repository::ContextSnapshotSource;

use crate::domain::views::ContextSummary;

/// Builds the context summary of `novel_id` at `episode_id`.
///
/// An unknown novel yields empty collections, not an error.
///
/// # Errors
///
/// Returns `DomainError::MissingParameter` when `episode_id` is absent,
/// before anything is read; otherwise the store error if the read fails.
pub async fn get_context_summary(
    novel_id: NovelId,
    episode_id: Option<EpisodeId>,
    source: &dyn ContextSnapshotSource,
) -> Result<ContextSummary, DomainError> {
    let episode_id = episode_id.ok_or(DomainError::MissingParameter("episode_id"))?;

    let snapshot = source.load_context(novel_id, episode_id).await?;
    debug!(
        states = snapshot.character_states.len(),
        foreshadowings = snapshot.unresolved_foreshadowings.len(),
        relationships = snapshot.character_relationships.len(),
        changes = snapshot.relationship_changes.len(),
        "context snapshot loaded"
    );

    let summary = ContextSummary {
        episode_id,
        character_states: snapshot.character_states.into_iter().map(Into::into).collect(),
        unresolved_foreshadowings: snapshot
            .unresolved_foreshadowings
            .into_iter()
            .map(Into::into)
            .collect(),
        character_relationships: snapshot
            .character_relationships
            .into_iter()
            .map(Into::into)
            .collect(),
        recent_relationship_changes: snapshot
            .relationship_changes
            .into_iter()
            .map(Into::into)
            .collect(),
    };

    info!(%novel_id, %episode_id, "context summary built");
    Ok(summary)
}
