//! Options normalization
//!
//! Turns any accepted options shape into a list of canonical
//! [`FieldOption`]s. Unusable input falls back to three placeholder options
//! instead of failing.

use officiant_domain::form::{FieldOption, Form, OptionEntry, OptionsInput, slugify};
use serde_json::Value;
use tracing::{debug, warn};

/// Number of placeholder options generated for missing input.
const DEFAULT_OPTION_COUNT: usize = 3;

/// Returns the placeholder options `option1`..`option3`.
#[must_use]
pub fn default_options() -> Vec<FieldOption> {
    (1..=DEFAULT_OPTION_COUNT)
        .map(|i| FieldOption::new(format!("option{i}"), format!("option{i}"), format!("Option {i}")))
        .collect()
}

/// Normalizes a raw options value.
///
/// `field_id` and `field_label` identify the owning field in logs.
#[must_use]
pub fn normalize_options(raw: Option<&Value>, field_id: &str, field_label: &str) -> Vec<FieldOption> {
    normalize(&OptionsInput::parse_optional(raw), field_id, field_label)
}

/// Normalizes already-classified options.
#[must_use]
pub fn normalize(input: &OptionsInput, field_id: &str, field_label: &str) -> Vec<FieldOption> {
    match input {
        OptionsInput::Missing => default_options(),
        OptionsInput::Text(text) => from_text(text),
        OptionsInput::List(entries) | OptionsInput::Wrapped(entries) => {
            entries.iter().filter_map(from_entry).collect()
        }
        OptionsInput::SelfReference => {
            warn!(
                field = field_id,
                label = field_label,
                "options hold a field definition, using placeholder options"
            );
            default_options()
        }
        OptionsInput::Map(pairs) if pairs.is_empty() => default_options(),
        OptionsInput::Map(pairs) => pairs
            .iter()
            .map(|(key, label)| FieldOption::new(key.clone(), key.clone(), label.clone()))
            .collect(),
    }
}

/// Rewrites the options of every choice field in the form to the canonical
/// array shape.
///
/// Run once when a form is loaded so later reads see a single shape.
pub fn canonicalize_form(form: &mut Form) {
    for field in form.sections.iter_mut().flat_map(|s| s.fields.iter_mut()) {
        if !field.field_type.is_choice() {
            continue;
        }
        let options = normalize_options(field.options.as_ref(), &field.id, &field.label);
        debug!(field = %field.id, count = options.len(), "canonicalized field options");
        field.options = serde_json::to_value(options).ok();
    }
}

fn from_text(text: &str) -> Vec<FieldOption> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return default_options();
    }
    if trimmed.contains(',') {
        return trimmed
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(FieldOption::identity)
            .collect();
    }
    vec![FieldOption::identity(trimmed)]
}

fn from_entry(entry: &OptionEntry) -> Option<FieldOption> {
    let option = match entry {
        OptionEntry::Plain(text) | OptionEntry::Named(text) | OptionEntry::Texted(text) => {
            FieldOption::identity(text.clone())
        }
        OptionEntry::Labelled { label, value, id } => {
            let value = value
                .clone()
                .or_else(|| id.clone())
                .unwrap_or_else(|| label.clone());
            let id = id.clone().unwrap_or_else(|| value.clone());
            FieldOption::new(id, value, label.clone())
        }
        OptionEntry::Valued { value, id } => FieldOption::new(
            id.clone().unwrap_or_else(|| value.clone()),
            value.clone(),
            value.clone(),
        ),
        OptionEntry::Opaque(raw) => FieldOption::identity(clean(&raw.to_string())),
    };

    if option.label.trim().is_empty() && option.value.trim().is_empty() {
        return None;
    }
    if option.id.trim().is_empty() {
        let id = slugify(&option.label);
        return Some(FieldOption { id, ..option });
    }
    Some(option)
}

/// Strips JSON punctuation from a stringified value.
fn clean(text: &str) -> String {
    let stripped: String = text
        .chars()
        .filter(|c| !matches!(c, '"' | '{' | '}' | '[' | ']'))
        .collect();
    let stripped = stripped.trim();
    if stripped == "null" {
        String::new()
    } else {
        stripped.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use officiant_domain::form::{FieldDefinition, FieldType, FormSection};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn norm(value: &Value) -> Vec<FieldOption> {
        normalize_options(Some(value), "f1", "Field")
    }

    #[test]
    fn test_null_gives_three_defaults() {
        let options = normalize_options(None, "f1", "Province");
        let ids: Vec<&str> = options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["option1", "option2", "option3"]);
        assert_eq!(options[0].label, "Option 1");
        assert_eq!(norm(&Value::Null), options);
    }

    #[test]
    fn test_string_array() {
        assert_eq!(
            norm(&json!(["a", "b"])),
            vec![FieldOption::identity("a"), FieldOption::identity("b")]
        );
    }

    #[test]
    fn test_json_encoded_map() {
        assert_eq!(
            norm(&json!(r#"{"x":"X"}"#)),
            vec![FieldOption::new("x", "x", "X")]
        );
    }

    #[test]
    fn test_json_encoded_null_and_strings() {
        assert_eq!(norm(&json!("null")), default_options());
        assert_eq!(norm(&json!(r#""Yes""#)), vec![FieldOption::identity("Yes")]);
        assert_eq!(
            norm(&json!(r#""Civil, Religious""#)),
            vec![FieldOption::identity("Civil"), FieldOption::identity("Religious")]
        );
        assert_eq!(norm(&json!("42")), vec![FieldOption::identity("42")]);
    }

    #[test]
    fn test_comma_list_and_single_text() {
        assert_eq!(
            norm(&json!("Civil, Religious , ,Customary")),
            vec![
                FieldOption::identity("Civil"),
                FieldOption::identity("Religious"),
                FieldOption::identity("Customary"),
            ]
        );
        assert_eq!(norm(&json!("Only one")), vec![FieldOption::identity("Only one")]);
        assert_eq!(norm(&json!("   ")), default_options());
    }

    #[test]
    fn test_object_entries() {
        let options = norm(&json!([
            {"label": "Western Cape", "value": "wc"},
            {"label": "Gauteng", "id": "gp"},
            {"label": "KwaZulu-Natal"},
            {"value": "fs"},
            {"value": "nc", "id": "9"},
            {"name": "Limpopo"},
            {"text": "Other"},
        ]));
        assert_eq!(
            options,
            vec![
                FieldOption::new("wc", "wc", "Western Cape"),
                FieldOption::new("gp", "gp", "Gauteng"),
                FieldOption::identity("KwaZulu-Natal"),
                FieldOption::identity("fs"),
                FieldOption::new("9", "nc", "nc"),
                FieldOption::identity("Limpopo"),
                FieldOption::identity("Other"),
            ]
        );
    }

    #[test]
    fn test_opaque_entries_are_cleaned() {
        let options = norm(&json!([{"colour": "red"}, null, [1]]));
        assert_eq!(
            options,
            vec![FieldOption::identity("colour:red"), FieldOption::identity("1")]
        );
    }

    #[test]
    fn test_wrapper_and_self_reference() {
        assert_eq!(
            norm(&json!({"options": ["Yes", "No"]})),
            vec![FieldOption::identity("Yes"), FieldOption::identity("No")]
        );
        assert_eq!(
            norm(&json!({"id": "f1", "type": "select", "label": "Province"})),
            default_options()
        );
    }

    #[test]
    fn test_blank_id_gets_slug() {
        assert_eq!(
            norm(&json!([{"label": "Full Day", "value": ""}])),
            vec![FieldOption::new("full_day", "", "Full Day")]
        );
    }

    #[test]
    fn test_empty_shapes() {
        assert!(norm(&json!([])).is_empty());
        assert_eq!(norm(&json!({})), default_options());
    }

    #[test]
    fn test_canonical_list_is_idempotent() {
        let canonical = vec![
            FieldOption::new("wc", "western-cape", "Western Cape"),
            FieldOption::identity("Gauteng"),
        ];
        let raw = serde_json::to_value(&canonical).unwrap_or_default();
        let once = norm(&raw);
        assert_eq!(once, canonical);
        let twice = norm(&serde_json::to_value(&once).unwrap_or_default());
        assert_eq!(twice, canonical);
    }

    #[test]
    fn test_canonicalize_form_only_touches_choice_fields() {
        let mut form = Form::new("Booking").with_section(
            FormSection::new("A")
                .with_field(
                    FieldDefinition::new("p", "Province", FieldType::Select)
                        .with_options(json!("Gauteng,Limpopo")),
                )
                .with_field(FieldDefinition::new("n", "Name", FieldType::Text)),
        );
        canonicalize_form(&mut form);

        let province = form.field("p").and_then(|f| f.options.clone());
        assert_eq!(
            province,
            Some(json!([
                {"id": "Gauteng", "value": "Gauteng", "label": "Gauteng"},
                {"id": "Limpopo", "value": "Limpopo", "label": "Limpopo"},
            ]))
        );
        assert_eq!(form.field("n").and_then(|f| f.options.clone()), None);
    }
}
