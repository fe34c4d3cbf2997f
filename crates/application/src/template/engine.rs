//! Variable resolution engine
//!
//! Renders templates against a layered [`TemplateContext`]. Unresolved
//! variables render as an empty string; rendering never fails.

use std::sync::Arc;

use officiant_domain::template::{ResolvedVariable, TemplateContext, ValueSource};
use serde_json::Value;
use tracing::debug;

use super::conditionals::apply_conditionals;
use super::first_name::derive_first_name;
use super::parser::parse_variables;
use super::reserved::ReservedVariables;
use super::value::{is_truthy, lookup_path, render_value};
use crate::ports::Clock;
use crate::settings::RenderSettings;

/// Minimum length of an id-like submission key.
const ID_KEY_MIN_LEN: usize = 24;

/// Result of rendering a template.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// The rendered text.
    pub rendered: String,

    /// Variables that were resolved.
    pub resolved_variables: Vec<ResolvedVariable>,

    /// Variable names that rendered empty because nothing matched.
    pub unresolved: Vec<String>,

    /// Whether every variable resolved.
    pub is_complete: bool,
}

impl RenderResult {
    /// Creates a result for input with no tokens.
    #[must_use]
    pub fn no_variables(input: &str) -> Self {
        Self {
            rendered: input.to_string(),
            resolved_variables: Vec::new(),
            unresolved: Vec::new(),
            is_complete: true,
        }
    }

    /// Returns the count of resolved variables.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.resolved_variables.len()
    }

    /// Returns the count of unresolved variables.
    #[must_use]
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }
}

/// The template rendering engine.
///
/// A bare variable name is resolved in this order, first hit wins:
/// 1. dotted path (`a.b.c`) through the top-level, submission and form-data
///    layers; a dotted name that fails here is unresolved
/// 2. `field_`-prefixed name in the form data
/// 3. reserved names (`timeStamp`, `trackingToken`, `leadId`, `bookingLink`)
/// 4. derived values, including the synthesized `firstName`
/// 5. form data, then top level, then submission data
/// 6. id-like keys in the submission data holding `{name, value}` objects
pub struct VariableResolver {
    context: TemplateContext,
    clock: Arc<dyn Clock>,
    settings: RenderSettings,
    /// Keeps `timeStamp` stable across renders in one session.
    time_stamp_cache: Option<String>,
}

impl VariableResolver {
    /// Creates a resolver with default settings.
    #[must_use]
    pub fn new(context: TemplateContext, clock: Arc<dyn Clock>) -> Self {
        Self {
            context,
            clock,
            settings: RenderSettings::default(),
            time_stamp_cache: None,
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: RenderSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Updates the context and forgets the cached time stamp.
    pub fn set_context(&mut self, context: TemplateContext) {
        self.context = context;
        self.time_stamp_cache = None;
    }

    /// Returns a reference to the current context.
    #[must_use]
    pub const fn context(&self) -> &TemplateContext {
        &self.context
    }

    /// Forgets the cached time stamp so the next render reads the clock again.
    pub fn clear_time_stamp_cache(&mut self) {
        self.time_stamp_cache = None;
    }

    /// Renders a template: conditional blocks first, then variables.
    pub fn render(&mut self, template: &str) -> RenderResult {
        let now = self.session_time_stamp();
        self.render_at(template, &now)
    }

    /// Renders without caching the time stamp.
    #[must_use]
    pub fn preview(&self, template: &str) -> RenderResult {
        let now = self.clock.now().to_rfc3339();
        self.render_at(template, &now)
    }

    /// Returns the variables in the template that would render empty.
    #[must_use]
    pub fn find_unresolved(&self, template: &str) -> Vec<String> {
        self.preview(template).unresolved
    }

    /// Resolves a single variable to its rendered value.
    pub fn resolve_value(&mut self, name: &str) -> Option<String> {
        let now = self.session_time_stamp();
        self.resolve_variable(name, &now).map(|r| r.value)
    }

    /// Extracts all variable names from the template without resolving them.
    #[must_use]
    pub fn extract_variable_names(template: &str) -> Vec<String> {
        super::parser::extract_variable_names(template)
    }

    fn session_time_stamp(&mut self) -> String {
        self.time_stamp_cache
            .get_or_insert_with(|| self.clock.now().to_rfc3339())
            .clone()
    }

    fn render_at(&self, template: &str, now: &str) -> RenderResult {
        let expanded = apply_conditionals(template, |condition| {
            self.condition_holds(condition, now)
        });

        let references = parse_variables(&expanded);
        if references.iter().all(|r| r.is_block) {
            return RenderResult::no_variables(&expanded);
        }

        let mut resolved_vars = Vec::new();
        let mut unresolved = Vec::new();
        let mut result = String::with_capacity(expanded.len());
        let mut last_end = 0;

        for var_ref in &references {
            result.push_str(&expanded[last_end..var_ref.span.start]);

            if var_ref.is_block {
                // Stray marker from a malformed block
                result.push_str(&expanded[var_ref.span.clone()]);
            } else if let Some(resolved) = self.resolve_variable(&var_ref.name, now) {
                result.push_str(&resolved.value);
                resolved_vars.push(resolved);
            } else {
                debug!(variable = %var_ref.name, "template variable unresolved, rendering empty");
                unresolved.push(var_ref.name.clone());
            }

            last_end = var_ref.span.end;
        }

        result.push_str(&expanded[last_end..]);

        RenderResult {
            rendered: result,
            resolved_variables: resolved_vars,
            is_complete: unresolved.is_empty(),
            unresolved,
        }
    }

    fn resolve_variable(&self, name: &str, now: &str) -> Option<ResolvedVariable> {
        let found = |value: &Value, source| {
            Some(ResolvedVariable::new(name, render_value(value), source))
        };
        let ctx = &self.context;

        if name.contains('.') {
            return [&ctx.top_level, &ctx.submission_data, &ctx.form_data]
                .into_iter()
                .find_map(|layer| present(lookup_path(layer, name)))
                .and_then(|value| found(value, ValueSource::Path));
        }

        if let Some(field_key) = name.strip_prefix("field_")
            && let Some(value) = present(ctx.form_data.get(field_key))
        {
            return found(value, ValueSource::FieldPrefix);
        }

        if let Some(value) = ReservedVariables::resolve(
            name,
            &ctx.reserved,
            now,
            &self.settings.booking_link_placeholder,
        ) {
            return Some(ResolvedVariable::new(name, value, ValueSource::Reserved));
        }

        if let Some(value) = present(ctx.derived.get(name)) {
            return found(value, ValueSource::Derived);
        }
        if name == "firstName"
            && let Some(first) =
                derive_first_name(ctx).or_else(|| self.settings.first_name_fallback.clone())
        {
            return Some(ResolvedVariable::new(name, first, ValueSource::Derived));
        }

        let layers = [
            (&ctx.form_data, ValueSource::FormData),
            (&ctx.top_level, ValueSource::TopLevel),
            (&ctx.submission_data, ValueSource::Submission),
        ];
        for (layer, source) in layers {
            if let Some(value) = present(layer.get(name)) {
                return found(value, source);
            }
        }

        self.scan_id_keys(name)
            .map(|value| ResolvedVariable::new(name, value, ValueSource::IdScan))
    }

    /// Looks through id-like submission keys for `{name: <name>, value}` entries.
    fn scan_id_keys(&self, name: &str) -> Option<String> {
        self.context
            .submission_data
            .iter()
            .filter(|(key, _)| is_id_like(key))
            .find_map(|(key, value)| match value {
                Value::Object(entry)
                    if entry.get("name").and_then(Value::as_str) == Some(name) =>
                {
                    entry.get("value").map(render_value)
                }
                other if key == name => Some(render_value(other)),
                _ => None,
            })
    }

    fn condition_holds(&self, condition: &str, now: &str) -> bool {
        let ctx = &self.context;
        let direct = [
            &ctx.top_level,
            &ctx.submission_data,
            &ctx.form_data,
            &ctx.derived,
        ]
        .into_iter()
        .find_map(|layer| present(layer.get(condition)));

        if let Some(value) = direct {
            return is_truthy(value);
        }
        if condition.contains('.') {
            return [&ctx.top_level, &ctx.submission_data, &ctx.form_data]
                .into_iter()
                .find_map(|layer| present(lookup_path(layer, condition)))
                .is_some_and(is_truthy);
        }
        self.resolve_variable(condition, now)
            .is_some_and(|r| is_truthy(&Value::String(r.value)))
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

/// Database-style ids: 24 or more lowercase ASCII letters and digits.
fn is_id_like(key: &str) -> bool {
    key.len() >= ID_KEY_MIN_LEN
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}
