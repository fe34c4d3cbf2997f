//! Subcommand handlers

use std::sync::Arc;

use anyhow::{Context, bail};
use officiant_application::fields::{FieldQuery, FormDataMapper, VisibilityEvaluator, normalize_options};
use officiant_application::ports::FormRepository;
use officiant_application::use_cases::{
    RenderEmail, RenderTemplate, RenderTemplateInput, ResolveBookingForm,
};
use officiant_application::DefaultFormIdCache;
use officiant_application::template::ReservedVariables;
use officiant_domain::email::EmailTrigger;
use officiant_domain::form::Form;
use officiant_domain::submission::Submission;
use officiant_infrastructure::{AppConfig, FileFormRepository, SystemClock};
use serde_json::Value;
use tracing::{debug, warn};

/// Wired services for one CLI invocation.
pub struct App {
    config: AppConfig,
    repository: FileFormRepository,
    cache: DefaultFormIdCache<SystemClock>,
    renderer: RenderTemplate,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let clock = SystemClock::new();
        Self {
            repository: FileFormRepository::new(&config.data_dir),
            cache: DefaultFormIdCache::with_ttl(clock, config.cache_ttl()),
            renderer: RenderTemplate::new(Arc::new(clock), config.render_settings()),
            config,
        }
    }

    fn booking_forms(&self) -> ResolveBookingForm<'_, FileFormRepository, SystemClock> {
        ResolveBookingForm::new(&self.repository, &self.cache)
            .with_configured_id(self.config.default_booking_form_id())
    }

    async fn submission_with_form(&self, submission_id: &str) -> anyhow::Result<(Submission, Form)> {
        let submission = self
            .repository
            .load_submission(submission_id)
            .await
            .with_context(|| format!("loading submission {submission_id}"))?;
        let form = self.booking_forms().execute(Some(&submission.form_id)).await?;
        Ok((submission, form))
    }

    pub async fn render(
        &self,
        submission_id: &str,
        template: &str,
        booking_link: Option<&str>,
    ) -> anyhow::Result<String> {
        let (submission, form) = self.submission_with_form(submission_id).await?;
        let result = self.renderer.execute(&RenderTemplateInput {
            template,
            form: &form,
            submission: &submission,
            booking_link,
        })?;
        if !result.is_complete {
            warn!(unresolved = ?result.unresolved, "template rendered with empty variables");
        }
        Ok(result.rendered)
    }

    pub async fn emails(
        &self,
        submission_id: &str,
        trigger: EmailTrigger,
        booking_link: Option<&str>,
    ) -> anyhow::Result<String> {
        let (mut submission, form) = self.submission_with_form(submission_id).await?;
        if submission.tracking_token.is_none() {
            let token = submission.ensure_tracking_token().to_string();
            self.repository.save_submission(&submission).await?;
            debug!(submission_id, %token, "assigned email tracking token");
        }
        let rules = self.repository.load_email_rules().await?;
        let output = RenderEmail::new(&self.renderer).execute(
            &rules,
            trigger,
            &form,
            &submission,
            booking_link,
        )?;
        for skipped in &output.skipped {
            warn!(rule = %skipped.rule_id, reason = %skipped.reason, "email not rendered");
        }
        Ok(serde_json::to_string_pretty(&output.emails)?)
    }

    pub async fn match_field(
        &self,
        form_id: Option<&str>,
        id: &str,
        label: Option<&str>,
    ) -> anyhow::Result<String> {
        let form = self.booking_forms().execute(form_id).await?;
        let fields = form.field_list();
        let query = label.map_or_else(|| FieldQuery::by_id(id), |label| FieldQuery::with_label(id, label));

        let Some(found) = self.config.matcher().find_with_strategy(&fields, &query) else {
            bail!("no field in form {} matches '{id}'", form.id);
        };
        Ok(format!("{}\t{}\t{}", found.field.id, found.field.label, found.strategy))
    }

    pub async fn visible_fields(&self, submission_id: &str) -> anyhow::Result<String> {
        let (submission, form) = self.submission_with_form(submission_id).await?;
        let values = FormDataMapper::flatten(&form, &submission.data);
        let ids = VisibilityEvaluator::new(self.config.matcher()).visible_field_ids(&form, &values);
        Ok(ids.join("\n"))
    }

    pub async fn booking_form(&self, form_id: Option<&str>) -> anyhow::Result<String> {
        let form = self.booking_forms().execute(form_id).await?;
        Ok(serde_json::to_string_pretty(&form)?)
    }
}

/// Normalizes a raw options value. Input that is not JSON is treated as text.
pub fn options(raw: Option<&str>) -> anyhow::Result<String> {
    let value = raw.map(|raw| serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string())));
    let options = normalize_options(value.as_ref(), "cli", "options");
    Ok(serde_json::to_string_pretty(&options)?)
}

/// Lists the reserved template variables, one per line.
pub fn variables() -> String {
    ReservedVariables::available()
        .iter()
        .map(|info| format!("{}\t{}\t{}", info.name, info.description, info.example))
        .collect::<Vec<_>>()
        .join("\n")
}
