//! Characters and per-episode character states.
//!
//! A character is the aggregation root for its states: every state belongs to
//! exactly one character, and a character's novel decides which novel the
//! state is visible from.

pub mod application;
pub mod domain;
