//! Submission to form-data mapping
//!
//! Submission data is keyed inconsistently: by current field id, by stable
//! id, by a label-derived key, or under database-style ids holding
//! `{name, value}` objects. The mapper finds each field's value and
//! republishes it under every key a template may use.

use officiant_domain::form::{FieldDefinition, Form};
use officiant_domain::submission::{Submission, SubmissionData};
use officiant_domain::template::TemplateContext;
use serde_json::{Map, Value};
use tracing::debug;

use super::matcher::normalize_id;
use crate::template::derive_first_name;

/// Builds the flattened form-data layer of a template context.
pub struct FormDataMapper;

impl FormDataMapper {
    /// Finds the submitted value of a field.
    ///
    /// Tries the field's lookup keys, then submission keys whose normalized
    /// form equals the field's normalized id, then `{name, value}` entries
    /// naming the field. Entry objects are unwrapped to their `value`.
    #[must_use]
    pub fn value_for<'d>(field: &FieldDefinition, data: &'d SubmissionData) -> Option<&'d Value> {
        let keys = field.lookup_keys();

        let direct = keys
            .iter()
            .find_map(|key| data.get(key).filter(|v| !v.is_null()));
        if let Some(value) = direct {
            return Some(unwrap_entry(value));
        }

        let wanted = normalize_id(&field.id);
        if !wanted.is_empty()
            && let Some((key, value)) = data
                .iter()
                .find(|(key, v)| !v.is_null() && normalize_id(key) == wanted)
        {
            debug!(field = %field.id, key = %key, "submission value found by normalized id");
            return Some(unwrap_entry(value));
        }

        data.values().find_map(|value| {
            let entry = value.as_object()?;
            let name = entry.get("name")?.as_str()?;
            keys.iter()
                .any(|k| k == name)
                .then(|| entry.get("value"))
                .flatten()
        })
    }

    /// Flattens submission data into the form-data layer.
    ///
    /// Raw submission keys are copied first and `{name, value}` entries are
    /// exposed under their name. Each field's value is then written under its
    /// id and template mapping, and under its stable id, name and camelCase
    /// label key unless those keys are already taken.
    #[must_use]
    pub fn flatten(form: &Form, data: &SubmissionData) -> Map<String, Value> {
        let mut flat = data.clone();

        for value in data.values() {
            if let Some(entry) = value.as_object()
                && let (Some(Value::String(name)), Some(inner)) = (entry.get("name"), entry.get("value"))
            {
                flat.entry(name.clone()).or_insert_with(|| inner.clone());
            }
        }

        for field in form.fields() {
            let Some(value) = Self::value_for(field, data) else {
                continue;
            };
            flat.insert(field.id.clone(), value.clone());
            if let Some(mapping) = &field.mapping {
                flat.insert(mapping.clone(), value.clone());
            }

            let aliases = field
                .stable_id
                .iter()
                .chain(field.name.iter())
                .cloned()
                .chain(Some(field.label_key()).filter(|k| !k.is_empty()));
            for alias in aliases {
                flat.entry(alias).or_insert_with(|| value.clone());
            }
        }

        flat
    }

    /// Builds a template context for a submission rendered with its form.
    ///
    /// The form-data layer is the flattened submission and `firstName` is
    /// derived when a proper first name can be found.
    #[must_use]
    pub fn context_for(form: &Form, submission: &Submission) -> TemplateContext {
        let mut context = TemplateContext::from_submission(submission)
            .with_form_data(Self::flatten(form, &submission.data));
        if let Some(first_name) = derive_first_name(&context) {
            context = context.with_derived("firstName", Value::String(first_name));
        }
        context
    }
}

fn unwrap_entry(value: &Value) -> &Value {
    match value {
        Value::Object(entry)
            if entry.contains_key("value")
                && (entry.contains_key("name") || entry.contains_key("label")) =>
        {
            entry.get("value").unwrap_or(value)
        }
        _ => value,
    }
}
