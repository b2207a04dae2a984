//! # Validation Errors
//!
//! Structured validation failures for domain type construction. These
//! surface at system boundaries (catalog append, feedback submission)
//! and map onto caller-input HTTP statuses in the API layer.

use thiserror::Error;

/// A domain value failed validation at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field was empty or all whitespace.
    #[error("{field} must not be empty")]
    EmptyField {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A field contained a double quote, which the delimited catalog
    /// format cannot carry (the format has no escape sequence).
    #[error("{field} must not contain double quotes")]
    ForbiddenQuote {
        /// Name of the offending field.
        field: &'static str,
    },

    /// A correction kind string did not name a known kind.
    #[error("unknown correction kind: {value:?}")]
    UnknownKind {
        /// The rejected input.
        value: String,
    },

    /// A correction status string did not name a known status.
    #[error("unknown correction status: {value:?}")]
    UnknownStatus {
        /// The rejected input.
        value: String,
    },

    /// A correction id was not a valid UUID.
    #[error("invalid correction id: {value:?}")]
    InvalidId {
        /// The rejected input.
        value: String,
    },
}

/// Check that `value` has non-whitespace content, returning the trimmed
/// string.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyField`] when the trimmed value is
/// empty.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// Check that `value` carries no double quote.
///
/// # Errors
///
/// Returns [`ValidationError::ForbiddenQuote`] when a `"` is present.
pub fn reject_quotes(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.contains('"') {
        return Err(ValidationError::ForbiddenQuote { field });
    }
    Ok(())
}
