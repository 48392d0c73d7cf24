//! Commands for the world settings context.
//!
//! The category travels as its raw token; an unknown token is a field error
//! on write, not a decode failure.

use serde_json::Value;
use uuid::Uuid;
use yugen_core::ids::{NovelId, WorldSettingId};

/// Command to create a world setting.
#[derive(Debug, Clone, Default)]
pub struct CreateWorldSetting {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The owning novel.
    pub novel_id: NovelId,
    /// Category token; required.
    pub category: Option<String>,
    /// Short label; required.
    pub title: Option<String>,
    /// Free text.
    pub description: Option<String>,
    /// Free-form JSON object; defaults to `{}`.
    pub details: Option<Value>,
}

/// Fields of a world setting that an update may touch.
#[derive(Debug, Clone, Default)]
pub struct WorldSettingChanges {
    /// New category token.
    pub category: Option<String>,
    /// New title.
    pub title: Option<String>,
    /// New description; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Replacement details; JSON `null` resets them to `{}`.
    pub details: Option<Value>,
}

/// Command to update a world setting.
#[derive(Debug, Clone)]
pub struct UpdateWorldSetting {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The setting to update.
    pub world_setting_id: WorldSettingId,
    /// Fields to change.
    pub changes: WorldSettingChanges,
}

/// Command to delete a world setting.
#[derive(Debug, Clone)]
pub struct DeleteWorldSetting {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The novel the caller is working in.
    pub novel_id: NovelId,
    /// The setting to delete.
    pub world_setting_id: WorldSettingId,
}

yugen_core::impl_command!(
    CreateWorldSetting => "world.create_setting",
    UpdateWorldSetting => "world.update_setting",
    DeleteWorldSetting => "world.delete_setting",
);
