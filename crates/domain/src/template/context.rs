//! Layered data context for template rendering
//!
//! A context is assembled fresh for every render and discarded afterwards.

use serde_json::{Map, Value, json};

use crate::submission::Submission;

/// Values for the reserved template names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedSlots {
    /// `{{timeStamp}}`; the renderer's clock is used when absent.
    pub time_stamp: Option<String>,
    /// `{{trackingToken}}`
    pub tracking_token: Option<String>,
    /// `{{leadId}}`
    pub lead_id: Option<String>,
    /// `{{bookingLink}}`; the configured placeholder is used when absent.
    pub booking_link: Option<String>,
}

/// The runtime data a template is rendered against.
///
/// Layers are consulted by the resolver in a fixed order; see the resolver
/// engine for details.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    /// Direct top-level fields (submission metadata, booking details).
    pub top_level: Map<String, Value>,

    /// The original nested `submission.data`.
    pub submission_data: Map<String, Value>,

    /// Submission values flattened by field id, mapping and label key.
    pub form_data: Map<String, Value>,

    /// Values synthesized from other layers, such as `firstName`.
    pub derived: Map<String, Value>,

    /// Reserved slots.
    pub reserved: ReservedSlots,
}

impl TemplateContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from a submission.
    ///
    /// The submission's metadata is placed in the top-level layer (also under
    /// `submission`, so `{{submission.data.x}}` paths work) and its data in
    /// the submission layer.
    #[must_use]
    pub fn from_submission(submission: &Submission) -> Self {
        let mut top_level = Map::new();
        top_level.insert("submissionId".into(), json!(submission.id));
        top_level.insert("formId".into(), json!(submission.form_id));
        top_level.insert("createdAt".into(), json!(submission.created_at.to_rfc3339()));
        top_level.insert(
            "submission".into(),
            json!({
                "id": submission.id,
                "formId": submission.form_id,
                "createdAt": submission.created_at.to_rfc3339(),
                "data": submission.data,
            }),
        );

        Self {
            top_level,
            submission_data: submission.data.clone(),
            form_data: Map::new(),
            derived: Map::new(),
            reserved: ReservedSlots {
                time_stamp: None,
                tracking_token: submission.tracking_token.clone(),
                lead_id: submission.lead_id.clone(),
                booking_link: None,
            },
        }
    }

    /// Sets a top-level value.
    #[must_use]
    pub fn with_top_level(mut self, key: impl Into<String>, value: Value) -> Self {
        self.top_level.insert(key.into(), value);
        self
    }

    /// Replaces the submission layer.
    #[must_use]
    pub fn with_submission_data(mut self, data: Map<String, Value>) -> Self {
        self.submission_data = data;
        self
    }

    /// Replaces the flattened form-data layer.
    #[must_use]
    pub fn with_form_data(mut self, data: Map<String, Value>) -> Self {
        self.form_data = data;
        self
    }

    /// Sets a derived value.
    #[must_use]
    pub fn with_derived(mut self, key: impl Into<String>, value: Value) -> Self {
        self.derived.insert(key.into(), value);
        self
    }

    /// Sets the booking link.
    #[must_use]
    pub fn with_booking_link(mut self, link: impl Into<String>) -> Self {
        self.reserved.booking_link = Some(link.into());
        self
    }

    /// Sets the time stamp.
    #[must_use]
    pub fn with_time_stamp(mut self, time_stamp: impl Into<String>) -> Self {
        self.reserved.time_stamp = Some(time_stamp.into());
        self
    }

    /// Sets the tracking token.
    #[must_use]
    pub fn with_tracking_token(mut self, token: impl Into<String>) -> Self {
        self.reserved.tracking_token = Some(token.into());
        self
    }

    /// Sets the lead id.
    #[must_use]
    pub fn with_lead_id(mut self, lead_id: impl Into<String>) -> Self {
        self.reserved.lead_id = Some(lead_id.into());
        self
    }

    /// Returns true if no layer holds any value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
            && self.submission_data.is_empty()
            && self.form_data.is_empty()
            && self.derived.is_empty()
            && self.reserved == ReservedSlots::default()
    }
}

/// The layer or rule a variable's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSource {
    /// Dotted-path traversal of nested objects.
    Path,
    /// A `field_`-prefixed name looked up in the form data.
    FieldPrefix,
    /// One of the reserved names.
    Reserved,
    /// A derived value such as `firstName`.
    Derived,
    /// The flattened form data.
    FormData,
    /// The top-level layer.
    TopLevel,
    /// The original submission data.
    Submission,
    /// The id-like key scan over submission data.
    IdScan,
}

impl ValueSource {
    /// Returns a human-readable name for the source.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Path => "Path",
            Self::FieldPrefix => "Field prefix",
            Self::Reserved => "Reserved",
            Self::Derived => "Derived",
            Self::FormData => "Form data",
            Self::TopLevel => "Top level",
            Self::Submission => "Submission",
            Self::IdScan => "Id scan",
        }
    }
}

/// A resolved variable with its value and source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariable {
    /// The variable name (without {{ }}).
    pub name: String,
    /// The rendered value.
    pub value: String,
    /// Where the value came from.
    pub source: ValueSource,
}

impl ResolvedVariable {
    /// Creates a new resolved variable.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, source: ValueSource) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_submission_layers() {
        let mut data = Map::new();
        data.insert("venue".into(), json!("Stellenbosch"));
        let created = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().unwrap_or_default();
        let submission = Submission::new("form-1", data, created).with_lead_id("lead-1");

        let ctx = TemplateContext::from_submission(&submission);
        assert_eq!(ctx.top_level.get("formId"), Some(&json!("form-1")));
        assert_eq!(ctx.submission_data.get("venue"), Some(&json!("Stellenbosch")));
        assert_eq!(
            ctx.top_level["submission"]["data"]["venue"],
            json!("Stellenbosch")
        );
        assert_eq!(ctx.reserved.lead_id.as_deref(), Some("lead-1"));
        assert!(ctx.form_data.is_empty());
    }

    #[test]
    fn test_empty_context() {
        assert!(TemplateContext::new().is_empty());
        assert!(!TemplateContext::new().with_booking_link("x").is_empty());
    }
}
