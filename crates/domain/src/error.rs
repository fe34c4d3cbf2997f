//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Two fields in the same form share an id.
    #[error("duplicate field id: {0}")]
    DuplicateFieldId(String),

    /// A field definition is missing its id.
    #[error("field with label '{0}' has an empty id")]
    EmptyFieldId(String),

    /// A form identifier is invalid or empty.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// An email rule cannot be used as configured.
    #[error("invalid email rule '{rule}': {reason}")]
    InvalidEmailRule {
        /// Rule identifier.
        rule: String,
        /// Why the rule was rejected.
        reason: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
