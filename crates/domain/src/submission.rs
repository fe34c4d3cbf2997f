//! Form submissions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::{generate_id, generate_tracking_token};

/// Submitted values keyed by field id, stable id or a label-derived key.
///
/// No schema is enforced when a submission is written.
pub type SubmissionData = Map<String, Value>;

/// A submitted form. Submitted data is never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Unique identifier
    pub id: String,
    /// Form the submission belongs to.
    pub form_id: String,
    /// Submitted values.
    #[serde(default)]
    pub data: SubmissionData,
    /// When the submission was received.
    pub created_at: DateTime<Utc>,
    /// Token used to track email opens and clicks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_token: Option<String>,
    /// Lead record created for this submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<String>,
}

impl Submission {
    /// Creates a submission for the given form.
    #[must_use]
    pub fn new(form_id: impl Into<String>, data: SubmissionData, created_at: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            form_id: form_id.into(),
            data,
            created_at,
            tracking_token: None,
            lead_id: None,
        }
    }

    /// Sets the tracking token.
    #[must_use]
    pub fn with_tracking_token(mut self, token: impl Into<String>) -> Self {
        self.tracking_token = Some(token.into());
        self
    }

    /// Returns the tracking token, generating one if the submission has none.
    pub fn ensure_tracking_token(&mut self) -> &str {
        self.tracking_token.get_or_insert_with(generate_tracking_token)
    }

    /// Sets the lead id.
    #[must_use]
    pub fn with_lead_id(mut self, lead_id: impl Into<String>) -> Self {
        self.lead_id = Some(lead_id.into());
        self
    }

    /// Returns a submitted value by key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submission_roundtrips_camel_case() {
        let json = json!({
            "id": "sub-1",
            "formId": "form-1",
            "createdAt": "2026-02-14T10:00:00Z",
            "leadId": "lead-9",
            "data": {"name": "Thandi Mokoena"}
        });
        let submission: Submission = serde_json::from_value(json).expect("valid submission");
        assert_eq!(submission.form_id, "form-1");
        assert_eq!(submission.lead_id.as_deref(), Some("lead-9"));
        assert_eq!(submission.value("name"), Some(&json!("Thandi Mokoena")));
        assert!(submission.tracking_token.is_none());
    }

    #[test]
    fn test_ensure_tracking_token_is_stable() {
        let mut submission = Submission::new("form-1", SubmissionData::new(), Utc::now());
        let token = submission.ensure_tracking_token().to_string();
        assert_eq!(token.len(), 32);
        assert_eq!(submission.ensure_tracking_token(), token);

        let mut tagged = Submission::new("form-1", SubmissionData::new(), Utc::now())
            .with_tracking_token("tok");
        assert_eq!(tagged.ensure_tracking_token(), "tok");
    }
}
