//! Domain layer for relationships.

pub mod commands;
pub mod validation;
