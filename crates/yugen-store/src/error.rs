//! Translation of `sqlx` failures into `DomainError`.

use sqlx::postgres::PgDatabaseError;
use tracing::{error, warn};
use yugen_core::error::DomainError;
use yugen_core::validation::TAKEN;

/// `PostgreSQL` SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// `PostgreSQL` SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps a database error to the domain taxonomy.
///
/// A unique violation means another writer claimed the same
/// (character, related character) or (character, episode) pair between the
/// existence check and the write; the loser sees the same validation error
/// the check would have produced. A foreign key violation means the parent
/// row was deleted in that window, so the write reports the parent as
/// missing.
pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return DomainError::invalid_field("character_id", TAKEN),
            Some(FOREIGN_KEY_VIOLATION) => {
                let detail = db
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(PgDatabaseError::detail);
                if let Some(missing) = detail.and_then(missing_parent) {
                    warn!(error = %err, "write raced a delete of its parent row");
                    return missing;
                }
            }
            _ => {}
        }
    }
    error!(error = %err, "database operation failed");
    DomainError::Infrastructure(err.to_string())
}

/// Reads the missing parent out of a foreign key violation detail such as
/// `Key (character_id)=(7) is not present in table "characters".`
fn missing_parent(detail: &str) -> Option<DomainError> {
    let (_, key) = detail.split_once(")=(")?;
    let (id, rest) = key.split_once(')')?;
    let id = id.parse().ok()?;
    let (_, table) = rest.split_once("table \"")?;
    let resource = match table.trim_end_matches(['"', '.']) {
        "characters" => "character",
        "character_relationships" => "character_relationship",
        _ => return None,
    };
    Some(DomainError::NotFound { resource, id })
}

/// Error for a stored enum token the domain no longer recognizes.
pub(crate) fn corrupt(column: &str, value: &str) -> DomainError {
    DomainError::Infrastructure(format!("unrecognized {column} '{value}' in store"))
}
