//! World settings: geography, magic systems, cultures, history and
//! politics of a novel's world, each with free-form JSON details.

pub mod application;
pub mod domain;
