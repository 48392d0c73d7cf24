//! Foreshadowing tracking.
//!
//! Entries move freely between `planted`, `hinted`, `resolved` and
//! `abandoned`; every status change goes through
//! [`domain::lifecycle::transition`].

pub mod application;
pub mod domain;
