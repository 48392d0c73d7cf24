//! Shared domain model and store abstractions.
//!
//! This crate defines the entity records, identifiers, error taxonomy and
//! repository traits that every bounded context depends on. It contains no
//! infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod ids;
pub mod model;
pub mod pagination;
pub mod repository;
pub mod validation;
