//! Form builder domain types
//!
//! Forms are stored in the `form → sections → fields` shape produced by the
//! form builder. Field options and conditional logic live alongside each
//! field definition.

mod conditional;
mod field;
mod options;

pub use conditional::{Condition, ConditionAction, ConditionOperator, ConditionalLogic};
pub use field::{FieldDefinition, FieldType, label_key, slugify};
pub use options::{FieldOption, OptionEntry, OptionsInput, scalar_text};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::generate_id;

/// A titled group of fields within a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    /// Unique identifier
    pub id: String,
    /// Section heading shown in the builder.
    #[serde(default)]
    pub title: String,
    /// Display order within the form.
    #[serde(default)]
    pub order: u32,
    /// Fields in display order.
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormSection {
    /// Creates an empty section.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            order: 0,
            fields: Vec::new(),
        }
    }

    /// Appends a field and returns the section.
    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }
}

/// A form definition as built in the form builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Unique identifier
    pub id: String,
    /// Form name (e.g., "Wedding Booking")
    pub name: String,
    /// Sections in display order.
    #[serde(default)]
    pub sections: Vec<FormSection>,
    /// Whether this form is the booking form used when no form id is given.
    #[serde(default)]
    pub is_default_booking_form: bool,
}

impl Form {
    /// Creates an empty form with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            sections: Vec::new(),
            is_default_booking_form: false,
        }
    }

    /// Appends a section and returns the form.
    #[must_use]
    pub fn with_section(mut self, section: FormSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Iterates over every field, sections ordered by `order` then position.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        let mut sections: Vec<&FormSection> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        sections.into_iter().flat_map(|s| s.fields.iter())
    }

    /// Returns all fields flattened into a vector.
    #[must_use]
    pub fn field_list(&self) -> Vec<FieldDefinition> {
        self.fields().cloned().collect()
    }

    /// Looks up a field by its exact id.
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields().find(|f| f.id == id)
    }

    /// Returns the number of fields across all sections.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields.len()).sum()
    }

    /// Checks that the form has an id and every field has a non-empty id
    /// unique within the form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidIdentifier` for a blank form id, or
    /// `DomainError::EmptyFieldId` / `DomainError::DuplicateFieldId` for the
    /// first offending field.
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.trim().is_empty() {
            return Err(DomainError::InvalidIdentifier(format!("form '{}' has an empty id", self.name)));
        }
        let mut seen = HashSet::new();
        for field in self.fields() {
            if field.id.trim().is_empty() {
                return Err(DomainError::EmptyFieldId(field.label.clone()));
            }
            if !seen.insert(field.id.as_str()) {
                return Err(DomainError::DuplicateFieldId(field.id.clone()));
            }
        }
        Ok(())
    }

    /// Returns stable ids used by more than one field.
    ///
    /// Stable ids are expected to be unique but this is not enforced.
    #[must_use]
    pub fn duplicate_stable_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates: Vec<String> = self
            .fields()
            .filter_map(|f| f.stable_id.as_deref())
            .filter(|sid| !seen.insert(*sid))
            .map(ToString::to_string)
            .collect();
        duplicates.sort();
        duplicates.dedup();
        duplicates
    }
}
