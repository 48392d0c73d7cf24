//! Domain layer for characters and character states.

pub mod commands;
pub mod validation;
