//! Domain layer for world settings.

pub mod commands;
pub mod validation;
