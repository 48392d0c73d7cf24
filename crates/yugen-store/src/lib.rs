//! `PostgreSQL` implementation of every repository trait.

mod error;
pub mod pg_store;
mod rows;

pub use pg_store::PgStore;

/// Embedded schema migrations from the workspace `migrations/` directory.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
