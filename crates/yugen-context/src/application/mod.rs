//! Application layer: the summary query.

pub mod query_handlers;
