//! Form repository port
//!
//! Defines the interface for loading forms and submissions.

use async_trait::async_trait;

use officiant_domain::form::Form;
use officiant_domain::submission::Submission;

/// Errors that can occur during form repository operations.
#[derive(Debug, thiserror::Error)]
pub enum FormRepositoryError {
    /// Form or submission not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid stored data.
    #[error("Invalid data: {0}")]
    Invalid(String),
}

/// Repository trait for forms and submissions.
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Loads a form by id.
    ///
    /// # Errors
    /// Returns `FormRepositoryError::NotFound` if the form doesn't exist.
    async fn load_form(&self, id: &str) -> Result<Form, FormRepositoryError>;

    /// Lists all stored forms.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    async fn list_forms(&self) -> Result<Vec<Form>, FormRepositoryError>;

    /// Loads a submission by id.
    ///
    /// # Errors
    /// Returns `FormRepositoryError::NotFound` if the submission doesn't exist.
    async fn load_submission(&self, id: &str) -> Result<Submission, FormRepositoryError>;

    /// Returns the id of the form flagged as the default booking form, if any.
    ///
    /// # Errors
    /// Returns an error if the forms cannot be listed.
    async fn default_booking_form_id(&self) -> Result<Option<String>, FormRepositoryError> {
        Ok(self
            .list_forms()
            .await?
            .into_iter()
            .find(|f| f.is_default_booking_form)
            .map(|f| f.id))
    }
}
