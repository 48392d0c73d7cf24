//! HTTP surface of the Yugen novel companion.
//!
//! Exposed as a library so integration tests can build the router against a
//! real store.

pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod state;
pub mod telemetry;
