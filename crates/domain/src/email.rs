//! Email automation rules

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::generate_id;

/// Event that fires an email rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailTrigger {
    /// A form was submitted.
    OnSubmission,
    /// A booking was confirmed by the marriage officer.
    OnBookingConfirmed,
    /// An invoice was issued.
    OnInvoiceIssued,
    /// Sent by hand from the dashboard.
    Manual,
}

impl fmt::Display for EmailTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OnSubmission => "on_submission",
            Self::OnBookingConfirmed => "on_booking_confirmed",
            Self::OnInvoiceIssued => "on_invoice_issued",
            Self::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// A rule that renders and sends an email when its trigger fires.
///
/// `recipient`, `subject` and `body` are templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRule {
    /// Unique identifier
    pub id: String,
    /// Rule name shown in the dashboard.
    pub name: String,
    /// Event that fires the rule.
    pub trigger: EmailTrigger,
    /// Restricts the rule to one form; `None` applies to every form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    /// Recipient address template, e.g. `{{email}}`.
    pub recipient: String,
    /// Subject template.
    pub subject: String,
    /// Body template (HTML or text).
    pub body: String,
    /// Disabled rules never fire.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl EmailRule {
    /// Creates an enabled rule that applies to every form.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        trigger: EmailTrigger,
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            trigger,
            form_id: None,
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            enabled: true,
        }
    }

    /// Restricts the rule to a form.
    #[must_use]
    pub fn for_form(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    /// Returns whether the rule fires for the trigger on the given form.
    #[must_use]
    pub fn applies_to(&self, trigger: EmailTrigger, form_id: &str) -> bool {
        self.enabled
            && self.trigger == trigger
            && self.form_id.as_deref().is_none_or(|id| id == form_id)
    }

    /// Checks that the templates are usable.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmailRule` when the recipient or subject
    /// template is blank.
    pub fn validate(&self) -> DomainResult<()> {
        if self.recipient.trim().is_empty() {
            return Err(DomainError::InvalidEmailRule {
                rule: self.id.clone(),
                reason: "recipient is empty".to_string(),
            });
        }
        if self.subject.trim().is_empty() {
            return Err(DomainError::InvalidEmailRule {
                rule: self.id.clone(),
                reason: "subject is empty".to_string(),
            });
        }
        Ok(())
    }
}

/// An email ready to hand to the mailer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedEmail {
    /// Rule that produced the email.
    pub rule_id: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Body.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> EmailRule {
        EmailRule::new(
            "Confirmation",
            EmailTrigger::OnSubmission,
            "{{email}}",
            "Thanks {{firstName}}",
            "Hi",
        )
    }

    #[test]
    fn test_applies_to_any_form_when_unscoped() {
        let rule = rule();
        assert!(rule.applies_to(EmailTrigger::OnSubmission, "form-a"));
        assert!(!rule.applies_to(EmailTrigger::Manual, "form-a"));
    }

    #[test]
    fn test_scoped_and_disabled_rules() {
        let scoped = rule().for_form("form-a");
        assert!(scoped.applies_to(EmailTrigger::OnSubmission, "form-a"));
        assert!(!scoped.applies_to(EmailTrigger::OnSubmission, "form-b"));

        let mut disabled = rule();
        disabled.enabled = false;
        assert!(!disabled.applies_to(EmailTrigger::OnSubmission, "form-a"));
    }

    #[test]
    fn test_validate_blank_recipient() {
        let mut broken = rule();
        broken.recipient = "  ".to_string();
        assert!(matches!(
            broken.validate(),
            Err(DomainError::InvalidEmailRule { .. })
        ));
        assert!(rule().validate().is_ok());
    }

    #[test]
    fn test_trigger_display() {
        assert_eq!(EmailTrigger::OnInvoiceIssued.to_string(), "on_invoice_issued");
    }
}
