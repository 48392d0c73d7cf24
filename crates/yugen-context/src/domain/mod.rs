//! Domain layer: the summary view objects.

pub mod views;
