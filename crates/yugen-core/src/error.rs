//! Domain error types.

use serde::Serialize;
use thiserror::Error;

/// A single field-level problem reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field as it appears on the wire.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A record was not found, or exists outside the requested novel.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource name, e.g. `character`.
        resource: &'static str,
        /// The identifier that was looked up.
        id: i64,
    },

    /// The record failed one or more model constraints.
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    /// A required request parameter was absent.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// A closed-set token (status, importance, category) was not recognized.
    #[error("'{value}' is not a valid {field}")]
    InvalidToken {
        /// The field the token was supplied for.
        field: &'static str,
        /// The rejected token.
        value: String,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a validation error on a single field.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// Returns the field-level details carried by this error, if any.
    #[must_use]
    pub fn details(&self) -> Vec<FieldError> {
        match self {
            Self::Validation(errors) => errors.clone(),
            Self::InvalidToken { field, .. } => vec![FieldError::new(*field, self.to_string())],
            _ => Vec::new(),
        }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_field() {
        let err = DomainError::Validation(vec![
            FieldError::new("name", "can't be blank"),
            FieldError::new("age", "must be a number"),
        ]);

        assert_eq!(
            err.to_string(),
            "validation failed: name can't be blank, age must be a number"
        );
    }

    #[test]
    fn test_invalid_token_exposes_single_detail() {
        let err = DomainError::InvalidToken {
            field: "status",
            value: "lost".into(),
        };

        let details = err.details();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "status");
        assert_eq!(details[0].message, "'lost' is not a valid status");
    }

    #[test]
    fn test_not_found_has_no_details() {
        let err = DomainError::NotFound {
            resource: "character",
            id: 7,
        };

        assert!(err.details().is_empty());
        assert_eq!(err.to_string(), "character not found: 7");
    }
}
