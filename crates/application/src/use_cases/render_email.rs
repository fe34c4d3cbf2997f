//! Render email use case

use officiant_domain::email::{EmailRule, EmailTrigger, RenderedEmail};
use officiant_domain::form::Form;
use officiant_domain::submission::Submission;
use tracing::{info, warn};

use super::render_template::RenderTemplate;
use crate::error::ApplicationResult;

/// A rule that matched but produced no email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRule {
    /// Rule id.
    pub rule_id: String,
    /// Why no email was produced.
    pub reason: String,
}

/// Output of rendering the emails for a trigger.
#[derive(Debug, Clone, Default)]
pub struct RenderEmailOutput {
    /// Emails ready to send.
    pub emails: Vec<RenderedEmail>,
    /// Matching rules that produced nothing.
    pub skipped: Vec<SkippedRule>,
}

/// Renders every email rule that fires for a trigger on a submission.
pub struct RenderEmail<'r> {
    renderer: &'r RenderTemplate,
}

impl<'r> RenderEmail<'r> {
    /// Creates a new `RenderEmail` use case.
    #[must_use]
    pub const fn new(renderer: &'r RenderTemplate) -> Self {
        Self { renderer }
    }

    /// Executes the use case.
    ///
    /// Rules that fail validation or whose recipient renders empty are
    /// skipped and reported rather than failing the whole batch.
    ///
    /// # Errors
    /// Returns `ApplicationError::FormMismatch` if the submission was made
    /// with a different form.
    pub fn execute(
        &self,
        rules: &[EmailRule],
        trigger: EmailTrigger,
        form: &Form,
        submission: &Submission,
        booking_link: Option<&str>,
    ) -> ApplicationResult<RenderEmailOutput> {
        let mut resolver = self.renderer.resolver_for(form, submission, booking_link)?;
        let mut output = RenderEmailOutput::default();

        for rule in rules.iter().filter(|r| r.applies_to(trigger, &form.id)) {
            if let Err(e) = rule.validate() {
                warn!(rule = %rule.id, error = %e, "email rule skipped");
                output.skipped.push(SkippedRule {
                    rule_id: rule.id.clone(),
                    reason: e.to_string(),
                });
                continue;
            }

            let to = resolver.render(&rule.recipient).rendered.trim().to_string();
            if to.is_empty() {
                warn!(rule = %rule.id, "email rule recipient rendered empty");
                output.skipped.push(SkippedRule {
                    rule_id: rule.id.clone(),
                    reason: "recipient rendered empty".to_string(),
                });
                continue;
            }

            let subject = resolver.render(&rule.subject);
            let body = resolver.render(&rule.body);
            if !body.is_complete || !subject.is_complete {
                let unresolved: Vec<&String> =
                    subject.unresolved.iter().chain(&body.unresolved).collect();
                info!(rule = %rule.id, ?unresolved, "email rendered with empty variables");
            }

            output.emails.push(RenderedEmail {
                rule_id: rule.id.clone(),
                to,
                subject: subject.rendered,
                body: body.rendered,
            });
        }

        Ok(output)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use crate::settings::RenderSettings;
    use chrono::{TimeZone, Utc};
    use officiant_domain::form::{FieldDefinition, FieldType, FormSection};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn renderer() -> RenderTemplate {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 2, 14, 8, 30, 0).single().unwrap());
        RenderTemplate::new(Arc::new(clock), RenderSettings::default())
    }

    fn form() -> Form {
        let mut form = Form::new("Booking").with_section(
            FormSection::new("Couple")
                .with_field(FieldDefinition::new("n", "Full Name", FieldType::Text))
                .with_field(FieldDefinition::new("e", "Email", FieldType::Email)),
        );
        form.id = "form-1".to_string();
        form
    }

    fn submission(data: serde_json::Value) -> Submission {
        Submission::new("form-1", data.as_object().cloned().unwrap(), Utc::now())
    }

    #[test]
    fn test_renders_matching_rules_only() {
        let rules = vec![
            EmailRule::new(
                "Confirmation",
                EmailTrigger::OnSubmission,
                "{{email}}",
                "Thank you {{firstName}}",
                "<p>We received your booking{{#if notes}}: {{notes}}{{/if}}.</p>",
            ),
            EmailRule::new("Invoice", EmailTrigger::OnInvoiceIssued, "{{email}}", "Invoice", "..."),
            EmailRule::new("Other form", EmailTrigger::OnSubmission, "{{email}}", "x", "y")
                .for_form("form-9"),
        ];
        let form = form();
        let submission = submission(json!({"n": "Thandi Mokoena", "e": "thandi@example.com"}));

        let output = RenderEmail::new(&renderer())
            .execute(&rules, EmailTrigger::OnSubmission, &form, &submission, None)
            .unwrap();

        assert_eq!(output.emails.len(), 1);
        let email = &output.emails[0];
        assert_eq!(email.to, "thandi@example.com");
        assert_eq!(email.subject, "Thank you Thandi");
        assert_eq!(email.body, "<p>We received your booking.</p>");
        assert!(output.skipped.is_empty());
    }

    #[test]
    fn test_empty_recipient_is_skipped() {
        let rules = vec![EmailRule::new(
            "Confirmation",
            EmailTrigger::OnSubmission,
            "{{email}}",
            "Hi",
            "Body",
        )];
        let form = form();
        let submission = submission(json!({"n": "Thandi Mokoena"}));

        let output = RenderEmail::new(&renderer())
            .execute(&rules, EmailTrigger::OnSubmission, &form, &submission, None)
            .unwrap();

        assert!(output.emails.is_empty());
        assert_eq!(output.skipped.len(), 1);
        assert_eq!(output.skipped[0].reason, "recipient rendered empty");
    }

    #[test]
    fn test_invalid_rule_is_skipped() {
        let rules = vec![EmailRule::new(
            "Broken",
            EmailTrigger::Manual,
            "{{email}}",
            "   ",
            "Body",
        )];
        let form = form();
        let submission = submission(json!({"e": "a@example.com"}));

        let output = RenderEmail::new(&renderer())
            .execute(&rules, EmailTrigger::Manual, &form, &submission, None)
            .unwrap();
        assert!(output.emails.is_empty());
        assert!(output.skipped[0].reason.contains("subject is empty"));
    }
}
