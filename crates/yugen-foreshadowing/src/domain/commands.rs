//! Commands for the foreshadowing context.

use uuid::Uuid;
use yugen_core::ids::{EpisodeId, ForeshadowingId, NovelId};
use yugen_core::model::{ForeshadowingAttributes, ForeshadowingStatus, Importance};

/// Command to create a foreshadowing entry.
#[derive(Debug, Clone, Default)]
pub struct CreateForeshadowing {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning novel.
    pub novel_id: NovelId,
    /// Short label; required.
    pub title: Option<String>,
    /// Free text.
    pub description: Option<String>,
    /// Episode where it was planted.
    pub planted_episode_id: Option<EpisodeId>,
    /// Episode where it was paid off.
    pub resolved_episode_id: Option<EpisodeId>,
    /// Episode number the author intends to resolve it in.
    pub planned_resolution_episode: Option<i32>,
    /// Initial status; defaults to `planted`.
    pub status: Option<ForeshadowingStatus>,
    /// Plot weight; defaults to `normal`.
    pub importance: Option<Importance>,
}

/// Fields of an entry that an update may touch.
#[derive(Debug, Clone, Default)]
pub struct ForeshadowingChanges {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New planted episode.
    pub planted_episode_id: Option<Option<EpisodeId>>,
    /// New resolved episode.
    pub resolved_episode_id: Option<Option<EpisodeId>>,
    /// New planned resolution episode number.
    pub planned_resolution_episode: Option<Option<i32>>,
    /// New status.
    pub status: Option<ForeshadowingStatus>,
    /// New importance.
    pub importance: Option<Importance>,
}

impl ForeshadowingChanges {
    /// Applies every field except `status` to `attributes`; the status is
    /// handed back so the caller routes it through the lifecycle.
    pub fn apply_to(self, attributes: &mut ForeshadowingAttributes) -> Option<ForeshadowingStatus> {
        if let Some(title) = self.title {
            attributes.title = title;
        }
        if let Some(description) = self.description {
            attributes.description = description;
        }
        if let Some(planted) = self.planted_episode_id {
            attributes.planted_episode_id = planted;
        }
        if let Some(resolved) = self.resolved_episode_id {
            attributes.resolved_episode_id = resolved;
        }
        if let Some(planned) = self.planned_resolution_episode {
            attributes.planned_resolution_episode = planned;
        }
        if let Some(importance) = self.importance {
            attributes.importance = importance;
        }
        self.status
    }
}

/// Command to update a foreshadowing entry.
#[derive(Debug, Clone)]
pub struct UpdateForeshadowing {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The entry to update.
    pub foreshadowing_id: ForeshadowingId,
    /// Fields to change.
    pub changes: ForeshadowingChanges,
}

/// Command to delete a foreshadowing entry.
#[derive(Debug, Clone)]
pub struct DeleteForeshadowing {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The entry to delete.
    pub foreshadowing_id: ForeshadowingId,
}

/// Command to mark an entry as paid off.
#[derive(Debug, Clone)]
pub struct ResolveForeshadowing {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The entry to resolve.
    pub foreshadowing_id: ForeshadowingId,
    /// Episode of the payoff; required.
    pub resolved_episode_id: Option<EpisodeId>,
}

/// Command to drop an entry.
#[derive(Debug, Clone)]
pub struct AbandonForeshadowing {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The entry to abandon.
    pub foreshadowing_id: ForeshadowingId,
}

yugen_core::impl_command!(
    CreateForeshadowing => "foreshadowing.create",
    UpdateForeshadowing => "foreshadowing.update",
    DeleteForeshadowing => "foreshadowing.delete",
    ResolveForeshadowing => "foreshadowing.resolve",
    AbandonForeshadowing => "foreshadowing.abandon",
);
