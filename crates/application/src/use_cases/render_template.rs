//! Render template use case

use std::sync::Arc;

use officiant_domain::form::Form;
use officiant_domain::submission::Submission;

use crate::error::{ApplicationError, ApplicationResult};
use crate::fields::FormDataMapper;
use crate::ports::Clock;
use crate::settings::RenderSettings;
use crate::template::{RenderResult, VariableResolver};

/// Input for rendering a template against a submission.
pub struct RenderTemplateInput<'a> {
    /// The template text.
    pub template: &'a str,
    /// The form the submission was made with.
    pub form: &'a Form,
    /// The submission.
    pub submission: &'a Submission,
    /// Booking link for `{{bookingLink}}`, if one is known.
    pub booking_link: Option<&'a str>,
}

/// Renders an email or invoice template for a submission.
pub struct RenderTemplate {
    clock: Arc<dyn Clock>,
    settings: RenderSettings,
}

impl RenderTemplate {
    /// Creates a new `RenderTemplate` use case.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, settings: RenderSettings) -> Self {
        Self { clock, settings }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Returns `ApplicationError::FormMismatch` if the submission was made
    /// with a different form. Rendering itself never fails.
    pub fn execute(&self, input: &RenderTemplateInput<'_>) -> ApplicationResult<RenderResult> {
        let mut resolver = self.resolver_for(input.form, input.submission, input.booking_link)?;
        Ok(resolver.render(input.template))
    }

    /// Builds a resolver for the submission, for rendering several templates
    /// with one consistent time stamp.
    ///
    /// # Errors
    /// Returns `ApplicationError::FormMismatch` if the submission was made
    /// with a different form.
    pub fn resolver_for(
        &self,
        form: &Form,
        submission: &Submission,
        booking_link: Option<&str>,
    ) -> ApplicationResult<VariableResolver> {
        if submission.form_id != form.id {
            return Err(ApplicationError::FormMismatch {
                submission: submission.id.clone(),
                expected: submission.form_id.clone(),
                actual: form.id.clone(),
            });
        }

        let mut context = FormDataMapper::context_for(form, submission);
        if let Some(link) = booking_link {
            context = context.with_booking_link(link);
        }
        Ok(VariableResolver::new(context, Arc::clone(&self.clock)).with_settings(self.settings.clone()))
    }
}
