//! Application error types

use officiant_domain::DomainError;
use thiserror::Error;

use crate::ports::FormRepositoryError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Loading forms or submissions failed.
    #[error("repository error: {0}")]
    Repository(#[from] FormRepositoryError),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A submission does not belong to the form it was rendered with.
    #[error("submission {submission} belongs to form {expected}, not {actual}")]
    FormMismatch {
        /// Submission id.
        submission: String,
        /// Form id recorded on the submission.
        expected: String,
        /// Form id supplied by the caller.
        actual: String,
    },
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
