//! Field definition types

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::conditional::ConditionalLogic;

/// The kind of input a field renders as in the form builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Numeric input.
    Number,
    /// Date picker.
    Date,
    /// Time picker.
    Time,
    /// Dropdown with a single selection.
    Select,
    /// Radio group.
    Radio,
    /// Checkbox or checkbox group.
    Checkbox,
    /// Dropdown with multiple selections.
    Multiselect,
    /// File upload.
    File,
    /// Hidden value.
    Hidden,
    /// Static heading, carries no value.
    Heading,
    /// Any type the builder knows that this crate does not.
    Other(String),
}

impl FieldType {
    /// Returns the wire name of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Number => "number",
            Self::Date => "date",
            Self::Time => "time",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Multiselect => "multiselect",
            Self::File => "file",
            Self::Hidden => "hidden",
            Self::Heading => "heading",
            Self::Other(name) => name,
        }
    }

    /// Returns true for types whose value is picked from a list of options.
    #[must_use]
    pub const fn is_choice(&self) -> bool {
        matches!(
            self,
            Self::Select | Self::Radio | Self::Checkbox | Self::Multiselect
        )
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "input" => Self::Text,
            "textarea" => Self::Textarea,
            "email" => Self::Email,
            "phone" | "tel" => Self::Phone,
            "number" => Self::Number,
            "date" => Self::Date,
            "time" => Self::Time,
            "select" | "dropdown" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "multiselect" | "multi_select" | "multi-select" => Self::Multiselect,
            "file" => Self::File,
            "hidden" => Self::Hidden,
            "heading" => Self::Heading,
            _ => Self::Other(value),
        }
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field in a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Primary id; may be regenerated when the form is edited.
    pub id: String,

    /// Label shown to the person filling the form.
    #[serde(default)]
    pub label: String,

    /// Input kind.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Optional machine name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Identifier meant to survive id churn across edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stable_id: Option<String>,

    /// Raw options as stored; see `OptionsInput` for the accepted shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,

    /// Caller-defined key used to reference this field from templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<String>,

    /// Whether a value is required on submit.
    #[serde(default)]
    pub required: bool,

    /// Placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Show/hide rule depending on another field's value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogic>,
}

impl FieldDefinition {
    /// Creates a field with the given id, label and type.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            name: None,
            stable_id: None,
            options: None,
            mapping: None,
            required: false,
            placeholder: None,
            conditional_logic: None,
        }
    }

    /// Sets the stable id.
    #[must_use]
    pub fn with_stable_id(mut self, stable_id: impl Into<String>) -> Self {
        self.stable_id = Some(stable_id.into());
        self
    }

    /// Sets the machine name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the template mapping key.
    #[must_use]
    pub fn with_mapping(mut self, mapping: impl Into<String>) -> Self {
        self.mapping = Some(mapping.into());
        self
    }

    /// Sets the raw options.
    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the conditional logic.
    #[must_use]
    pub fn with_conditional_logic(mut self, logic: ConditionalLogic) -> Self {
        self.conditional_logic = Some(logic);
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Returns the camelCase key derived from the label (`"Full Name"` → `"fullName"`).
    #[must_use]
    pub fn label_key(&self) -> String {
        label_key(&self.label)
    }

    /// Returns every identifier this field may be stored under in submission data,
    /// most specific first.
    #[must_use]
    pub fn lookup_keys(&self) -> Vec<String> {
        let mut keys = vec![self.id.clone()];
        keys.extend(self.stable_id.iter().cloned());
        keys.extend(self.mapping.iter().cloned());
        keys.extend(self.name.iter().cloned());
        if !self.label.trim().is_empty() {
            keys.push(self.label_key());
            keys.push(slugify(&self.label));
            keys.push(self.label.clone());
        }
        let mut seen = std::collections::HashSet::new();
        keys.retain(|k| !k.is_empty() && seen.insert(k.clone()));
        keys
    }
}

/// Converts a label into a camelCase key.
///
/// Non-alphanumeric characters separate words and are dropped.
#[must_use]
pub fn label_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    for (i, word) in label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .enumerate()
    {
        let lower = word.to_lowercase();
        if i == 0 {
            key.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                key.extend(first.to_uppercase());
                key.push_str(chars.as_str());
            }
        }
    }
    key
}

/// Converts text into a lowercase, underscore-separated slug.
#[must_use]
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_type_aliases() {
        assert_eq!(FieldType::from("tel".to_string()), FieldType::Phone);
        assert_eq!(FieldType::from("Dropdown".to_string()), FieldType::Select);
        assert_eq!(
            FieldType::from("signature".to_string()),
            FieldType::Other("signature".to_string())
        );
        assert!(FieldType::Radio.is_choice());
        assert!(!FieldType::Email.is_choice());
    }

    #[test]
    fn test_field_type_serializes_as_string() {
        let json = serde_json::to_string(&FieldType::Multiselect).expect("serialize");
        assert_eq!(json, "\"multiselect\"");
    }

    #[test]
    fn test_label_key() {
        assert_eq!(label_key("Full Name"), "fullName");
        assert_eq!(label_key("Date of ceremony?"), "dateOfCeremony");
        assert_eq!(label_key("  "), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Full Name"), "full_name");
        assert_eq!(slugify("Province / Region"), "province_region");
    }

    #[test]
    fn test_lookup_keys_order_and_dedup() {
        let field = FieldDefinition::new("f1", "Full Name", FieldType::Text)
            .with_stable_id("name")
            .with_mapping("clientName")
            .with_name("name");
        assert_eq!(
            field.lookup_keys(),
            vec!["f1", "name", "clientName", "fullName", "full_name", "Full Name"]
        );
    }
}
