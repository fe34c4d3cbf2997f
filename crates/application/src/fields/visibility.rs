//! Conditional field visibility

use officiant_domain::form::{FieldDefinition, Form};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::matcher::{FieldMatcher, FieldQuery};

/// Longest chain of conditions followed before giving up.
const MAX_CONDITION_DEPTH: usize = 8;

/// Decides which fields are shown for the current form values.
///
/// The field a condition depends on is located with the field matcher, so
/// rules survive id churn when a label hint is recorded. A rule whose
/// controlling field cannot be found leaves the field visible. When the
/// controlling field is itself hidden, its value counts as absent.
#[derive(Default)]
pub struct VisibilityEvaluator {
    matcher: FieldMatcher,
}

impl VisibilityEvaluator {
    /// Creates an evaluator using the given matcher.
    #[must_use]
    pub const fn new(matcher: FieldMatcher) -> Self {
        Self { matcher }
    }

    /// Returns whether `field` is visible.
    #[must_use]
    pub fn is_visible(
        &self,
        field: &FieldDefinition,
        fields: &[FieldDefinition],
        values: &Map<String, Value>,
    ) -> bool {
        self.visible_at_depth(field, fields, values, 0)
    }

    /// Returns the visible fields in order.
    #[must_use]
    pub fn visible_fields<'f>(
        &self,
        fields: &'f [FieldDefinition],
        values: &Map<String, Value>,
    ) -> Vec<&'f FieldDefinition> {
        fields
            .iter()
            .filter(|f| self.is_visible(f, fields, values))
            .collect()
    }

    /// Returns the ids of the visible fields of a form.
    #[must_use]
    pub fn visible_field_ids(&self, form: &Form, values: &Map<String, Value>) -> Vec<String> {
        let fields = form.field_list();
        self.visible_fields(&fields, values)
            .into_iter()
            .map(|f| f.id.clone())
            .collect()
    }

    fn visible_at_depth(
        &self,
        field: &FieldDefinition,
        fields: &[FieldDefinition],
        values: &Map<String, Value>,
        depth: usize,
    ) -> bool {
        let Some(logic) = &field.conditional_logic else {
            return true;
        };
        if depth >= MAX_CONDITION_DEPTH {
            warn!(field = %field.id, "conditional logic chain too deep, treating field as visible");
            return true;
        }

        let query = FieldQuery {
            id: &logic.when.field,
            label_hint: logic.when.field_label.as_deref(),
        };
        let controller = self
            .matcher
            .find(fields, &query)
            .filter(|c| c.id != field.id);

        let Some(controller) = controller else {
            debug!(
                field = %field.id,
                depends_on = %logic.when.field,
                "controlling field not found, field stays visible"
            );
            return true;
        };

        let actual = if self.visible_at_depth(controller, fields, values, depth + 1) {
            field_value(controller, values)
        } else {
            None
        };
        logic.is_visible(actual)
    }
}

/// Reads a field's value from form values by id, stable id, mapping, name or label.
#[must_use]
pub fn field_value<'v>(field: &FieldDefinition, values: &'v Map<String, Value>) -> Option<&'v Value> {
    field
        .lookup_keys()
        .iter()
        .find_map(|key| values.get(key).filter(|v| !v.is_null()))
}
