//! Domain layer for foreshadowing.

pub mod commands;
pub mod lifecycle;
pub mod validation;
