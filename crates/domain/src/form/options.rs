//! Field option shapes
//!
//! Options arrive in many shapes: JSON-encoded strings, comma lists, arrays of
//! strings, arrays of objects keyed by `label`, `value`, `name` or `text`,
//! wrapper objects and plain key→label maps. `OptionsInput::parse` classifies
//! a raw value once so the normalizer can work on a closed set of cases.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical option shape used by selection-type fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldOption {
    /// Stable option id.
    pub id: String,
    /// Value stored in submissions.
    pub value: String,
    /// Text shown to the user.
    pub label: String,
}

impl FieldOption {
    /// Creates an option.
    #[must_use]
    pub fn new(id: impl Into<String>, value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            label: label.into(),
        }
    }

    /// Creates an option whose id, value and label are the same text.
    #[must_use]
    pub fn identity(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: text.clone(),
            value: text.clone(),
            label: text,
        }
    }
}

/// One element of an options array.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionEntry {
    /// A bare string, number or boolean.
    Plain(String),
    /// An object carrying a `label`.
    Labelled {
        /// The label.
        label: String,
        /// The `value` member, if any.
        value: Option<String>,
        /// The `id` member, if any.
        id: Option<String>,
    },
    /// An object carrying a `value` but no `label`.
    Valued {
        /// The value.
        value: String,
        /// The `id` member, if any.
        id: Option<String>,
    },
    /// An object carrying only a `name`.
    Named(String),
    /// An object carrying only a `text`.
    Texted(String),
    /// Anything else.
    Opaque(Value),
}

impl OptionEntry {
    /// Classifies one array element.
    #[must_use]
    pub fn parse(value: &Value) -> Self {
        if let Some(text) = scalar_text(value) {
            return Self::Plain(text);
        }
        let Value::Object(map) = value else {
            return Self::Opaque(value.clone());
        };

        let member = |key: &str| map.get(key).and_then(scalar_text);

        if let Some(label) = member("label") {
            return Self::Labelled {
                label,
                value: member("value"),
                id: member("id"),
            };
        }
        if let Some(value) = member("value") {
            return Self::Valued {
                value,
                id: member("id"),
            };
        }
        if let Some(name) = member("name") {
            return Self::Named(name);
        }
        if let Some(text) = member("text") {
            return Self::Texted(text);
        }
        Self::Opaque(value.clone())
    }
}

/// A raw options value classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsInput {
    /// Null or absent.
    Missing,
    /// Plain text, or a JSON-encoded number or boolean.
    Text(String),
    /// An array.
    List(Vec<OptionEntry>),
    /// An `{options: [...]}` wrapper around an array.
    Wrapped(Vec<OptionEntry>),
    /// The value is a field definition rather than options.
    SelfReference,
    /// A key→label object.
    Map(Vec<(String, String)>),
}

impl OptionsInput {
    /// Classifies a raw options value.
    ///
    /// Strings are first decoded as JSON: `null` is missing, an encoded string
    /// is unwrapped and arrays or objects are classified by their contents.
    #[must_use]
    pub fn parse(value: &Value) -> Self {
        match value {
            Value::Null => Self::Missing,
            Value::String(text) => Self::parse_text(text),
            Value::Bool(_) | Value::Number(_) => Self::Text(value.to_string()),
            Value::Array(items) => Self::List(items.iter().map(OptionEntry::parse).collect()),
            Value::Object(map) => Self::parse_object(map),
        }
    }

    /// Classifies an optional raw value, treating `None` as missing.
    #[must_use]
    pub fn parse_optional(value: Option<&Value>) -> Self {
        value.map_or(Self::Missing, Self::parse)
    }

    fn parse_text(text: &str) -> Self {
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(Value::String(inner)) => Self::parse_text(&inner),
            Ok(decoded @ (Value::Null | Value::Array(_) | Value::Object(_))) => Self::parse(&decoded),
            _ => Self::Text(text.to_string()),
        }
    }

    fn parse_object(map: &Map<String, Value>) -> Self {
        match map.get("options") {
            Some(Value::Array(items)) => {
                return Self::Wrapped(items.iter().map(OptionEntry::parse).collect());
            }
            Some(inner @ Value::String(_)) => return Self::parse(inner),
            _ => {}
        }

        if map.contains_key("type") && map.contains_key("id") {
            return Self::SelfReference;
        }

        Self::Map(
            map.iter()
                .map(|(key, label)| (key.clone(), map_label(label)))
                .collect(),
        )
    }
}

/// Returns the textual form of a string, number or boolean.
#[must_use]
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn map_label(value: &Value) -> String {
    if let Some(text) = scalar_text(value) {
        return text;
    }
    if let Value::Object(inner) = value
        && let Some(label) = inner.get("label").and_then(scalar_text)
    {
        return label;
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_null_is_missing() {
        assert_eq!(OptionsInput::parse(&Value::Null), OptionsInput::Missing);
        assert_eq!(OptionsInput::parse_optional(None), OptionsInput::Missing);
    }

    #[test]
    fn test_parse_json_string_array() {
        let parsed = OptionsInput::parse(&json!(r#"["a", {"label": "B", "value": "b"}]"#));
        assert_eq!(
            parsed,
            OptionsInput::List(vec![
                OptionEntry::Plain("a".to_string()),
                OptionEntry::Labelled {
                    label: "B".to_string(),
                    value: Some("b".to_string()),
                    id: None,
                },
            ])
        );
    }

    #[test]
    fn test_parse_plain_text() {
        assert_eq!(
            OptionsInput::parse(&json!("Yes, No")),
            OptionsInput::Text("Yes, No".to_string())
        );
        assert_eq!(
            OptionsInput::parse(&json!("[not json")),
            OptionsInput::Text("[not json".to_string())
        );
    }

    #[test]
    fn test_parse_decodes_json_scalars() {
        assert_eq!(OptionsInput::parse(&json!("null")), OptionsInput::Missing);
        assert_eq!(
            OptionsInput::parse(&json!(r#""Yes""#)),
            OptionsInput::Text("Yes".to_string())
        );
        assert_eq!(OptionsInput::parse(&json!("true")), OptionsInput::Text("true".to_string()));
    }

    #[test]
    fn test_parse_entries() {
        assert_eq!(
            OptionEntry::parse(&json!({"value": "v", "id": 3})),
            OptionEntry::Valued {
                value: "v".to_string(),
                id: Some("3".to_string()),
            }
        );
        assert_eq!(
            OptionEntry::parse(&json!({"name": "Gauteng"})),
            OptionEntry::Named("Gauteng".to_string())
        );
        assert_eq!(
            OptionEntry::parse(&json!({"text": "Other"})),
            OptionEntry::Texted("Other".to_string())
        );
        assert_eq!(
            OptionEntry::parse(&json!({"colour": "red"})),
            OptionEntry::Opaque(json!({"colour": "red"}))
        );
        assert_eq!(OptionEntry::parse(&json!(7)), OptionEntry::Plain("7".to_string()));
    }

    #[test]
    fn test_parse_wrapper_and_self_reference() {
        assert_eq!(
            OptionsInput::parse(&json!({"options": ["x"]})),
            OptionsInput::Wrapped(vec![OptionEntry::Plain("x".to_string())])
        );
        assert_eq!(
            OptionsInput::parse(&json!({"id": "f1", "type": "select", "label": "Province"})),
            OptionsInput::SelfReference
        );
    }

    #[test]
    fn test_parse_key_label_map() {
        assert_eq!(
            OptionsInput::parse(&json!({"x": "X", "y": {"label": "Why"}})),
            OptionsInput::Map(vec![
                ("x".to_string(), "X".to_string()),
                ("y".to_string(), "Why".to_string()),
            ])
        );
    }
}
