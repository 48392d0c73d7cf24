//! Shared application state.

use std::sync::Arc;

use yugen_core::clock::Clock;
use yugen_core::repository::{
    CharacterRepository, CharacterStateRepository, ContextSnapshotSource,
    ForeshadowingRepository, RelationshipLogRepository, RelationshipRepository,
    WorldSettingRepository,
};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of record timestamps.
    pub clock: Arc<dyn Clock>,
    /// Character persistence.
    pub characters: Arc<dyn CharacterRepository>,
    /// Character state persistence.
    pub states: Arc<dyn CharacterStateRepository>,
    /// Relationship persistence.
    pub relationships: Arc<dyn RelationshipRepository>,
    /// Relationship log reads.
    pub relationship_logs: Arc<dyn RelationshipLogRepository>,
    /// Foreshadowing persistence.
    pub foreshadowings: Arc<dyn ForeshadowingRepository>,
    /// World setting persistence.
    pub world_settings: Arc<dyn WorldSettingRepository>,
    /// Context summary reads.
    pub context: Arc<dyn ContextSnapshotSource>,
}

impl AppState {
    /// Builds state where one store serves every repository.
    #[must_use]
    pub fn from_store<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Self
    where
        S: CharacterRepository
            + CharacterStateRepository
            + RelationshipRepository
            + RelationshipLogRepository
            + ForeshadowingRepository
            + WorldSettingRepository
            + ContextSnapshotSource
            + 'static,
    {
        Self {
            clock,
            characters: store.clone(),
            states: store.clone(),
            relationships: store.clone(),
            relationship_logs: store.clone(),
            foreshadowings: store.clone(),
            world_settings: store.clone(),
            context: store,
        }
    }
}
