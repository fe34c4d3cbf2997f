//! File-backed form repository.
//!
//! Layout under the data directory:
//! - `forms/<id>.json`
//! - `submissions/<id>.json`
//! - `email_rules.json`

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use officiant_application::ports::{FormRepository, FormRepositoryError};
use officiant_domain::email::EmailRule;
use officiant_domain::form::Form;
use officiant_domain::submission::Submission;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, warn};

use crate::serialization::{SerializationError, read_json_file, write_json_file};

const FORMS_DIR: &str = "forms";
const SUBMISSIONS_DIR: &str = "submissions";
const EMAIL_RULES_FILE: &str = "email_rules.json";

/// Form repository reading JSON files from a data directory.
#[derive(Debug, Clone)]
pub struct FileFormRepository {
    root: PathBuf,
}

impl FileFormRepository {
    /// Creates a repository rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the data directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a form to `forms/<id>.json`.
    ///
    /// # Errors
    /// Returns an error if the id is unusable as a file name or the write fails.
    pub async fn save_form(&self, form: &Form) -> Result<PathBuf, FormRepositoryError> {
        form.validate()
            .map_err(|e| FormRepositoryError::Invalid(e.to_string()))?;
        let path = self.entry_path(FORMS_DIR, &form.id)?;
        write_json_file(&path, form).await.map_err(|e| to_repository_error(e, &form.id))?;
        Ok(path)
    }

    /// Writes a submission to `submissions/<id>.json`.
    ///
    /// # Errors
    /// Returns an error if the id is unusable as a file name or the write fails.
    pub async fn save_submission(&self, submission: &Submission) -> Result<PathBuf, FormRepositoryError> {
        let path = self.entry_path(SUBMISSIONS_DIR, &submission.id)?;
        write_json_file(&path, submission)
            .await
            .map_err(|e| to_repository_error(e, &submission.id))?;
        Ok(path)
    }

    /// Loads the email rules. A missing rules file means no rules.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load_email_rules(&self) -> Result<Vec<EmailRule>, FormRepositoryError> {
        let path = self.root.join(EMAIL_RULES_FILE);
        match read_json_file(&path).await {
            Ok(rules) => Ok(rules),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(to_repository_error(e, EMAIL_RULES_FILE)),
        }
    }

    fn entry_path(&self, dir: &str, id: &str) -> Result<PathBuf, FormRepositoryError> {
        if !is_safe_id(id) {
            return Err(FormRepositoryError::Invalid(format!("unusable id: {id:?}")));
        }
        Ok(self.root.join(dir).join(format!("{id}.json")))
    }

    async fn read_entry<T: DeserializeOwned>(&self, dir: &str, id: &str) -> Result<T, FormRepositoryError> {
        let path = self.entry_path(dir, id)?;
        debug!(path = %path.display(), "reading entry");
        read_json_file(&path).await.map_err(|e| to_repository_error(e, id))
    }
}

#[async_trait]
impl FormRepository for FileFormRepository {
    async fn load_form(&self, id: &str) -> Result<Form, FormRepositoryError> {
        let form: Form = self.read_entry(FORMS_DIR, id).await?;
        form.validate()
            .map_err(|e| FormRepositoryError::Invalid(format!("form {id}: {e}")))?;
        let duplicates = form.duplicate_stable_ids();
        if !duplicates.is_empty() {
            warn!(form_id = id, ?duplicates, "stable ids shared by several fields");
        }
        Ok(form)
    }

    async fn list_forms(&self) -> Result<Vec<Form>, FormRepositoryError> {
        let dir = self.root.join(FORMS_DIR);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut forms = Vec::with_capacity(paths.len());
        for path in paths {
            match read_json_file::<Form>(&path).await {
                Ok(form) => forms.push(form),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable form"),
            }
        }
        Ok(forms)
    }

    async fn load_submission(&self, id: &str) -> Result<Submission, FormRepositoryError> {
        self.read_entry(SUBMISSIONS_DIR, id).await
    }
}

fn to_repository_error(error: SerializationError, id: &str) -> FormRepositoryError {
    match error {
        e if e.is_not_found() => FormRepositoryError::NotFound(id.to_string()),
        SerializationError::Io(e) => FormRepositoryError::Io(e),
        e => FormRepositoryError::Serialization(format!("{id}: {e}")),
    }
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
