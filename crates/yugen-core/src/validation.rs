//! Field-level validation accumulator.
//!
//! Checks record every failure instead of stopping at the first one, so a
//! caller sees all offending fields in a single `VALIDATION_ERROR` response.

use crate::error::{DomainError, FieldError};

/// Message used for missing or blank required fields.
pub const BLANK: &str = "can't be blank";

/// Message used when a uniqueness constraint would be violated.
pub const TAKEN: &str = "has already been taken";

/// Collects field errors for one record.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    /// Creates an empty validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error on `field`.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Records `BLANK` on `field` when `value` is empty or whitespace.
    pub fn require_text(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, BLANK);
        }
    }

    /// Records `BLANK` on `field` when `value` is `None`.
    pub fn require<T>(&mut self, field: &str, value: Option<&T>) {
        if value.is_none() {
            self.add(field, BLANK);
        }
    }

    /// Records the outcome of a fallible conversion, returning the value when
    /// it succeeded.
    pub fn check<T>(&mut self, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finishes validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` carrying every recorded field error.
    pub fn finish(self) -> Result<(), DomainError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(self.errors))
        }
    }

    /// Converts the recorded errors into a `DomainError`, for callers that
    /// already know validation failed.
    #[must_use]
    pub fn into_error(self) -> DomainError {
        DomainError::Validation(self.errors)
    }
}
