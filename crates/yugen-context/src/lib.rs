//! The context aggregator.
//!
//! Given a novel and an episode, assembles the narrative state a generation
//! client needs: who is where at that episode, which threads are still open,
//! how the cast relates, and which relationships changed at that episode.
//! Read-only; never writes to the store.

pub mod application;
pub mod domain;
