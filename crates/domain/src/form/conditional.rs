//! Conditional show/hide logic attached to fields

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::options::scalar_text;

/// What happens to the field when the condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionAction {
    /// Field is visible only when the condition holds.
    Show,
    /// Field is hidden when the condition holds.
    Hide,
}

/// Comparison applied to the controlling field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    /// Values are equal.
    Equals,
    /// Values differ.
    NotEquals,
    /// Actual value contains the expected one.
    Contains,
    /// Actual value does not contain the expected one.
    NotContains,
    /// Actual value is numerically greater.
    GreaterThan,
    /// Actual value is numerically smaller.
    LessThan,
    /// Actual value is missing or blank. Takes no expected value.
    IsEmpty,
    /// Actual value is present and not blank. Takes no expected value.
    IsNotEmpty,
}

impl ConditionOperator {
    /// Returns true for operators that ignore the expected value.
    #[must_use]
    pub const fn is_unary(&self) -> bool {
        matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }
}

/// The `when` part of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Id of the controlling field.
    pub field: String,
    /// Label of the controlling field, kept as a hint for when ids churn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
    /// Comparison operator.
    pub operator: ConditionOperator,
    /// Expected value; absent for unary operators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Condition {
    /// Creates a condition on the given field.
    #[must_use]
    pub fn new(field: impl Into<String>, operator: ConditionOperator, value: Option<Value>) -> Self {
        Self {
            field: field.into(),
            field_label: None,
            operator,
            value,
        }
    }

    /// Sets the label hint.
    #[must_use]
    pub fn with_field_label(mut self, label: impl Into<String>) -> Self {
        self.field_label = Some(label.into());
        self
    }

    /// Evaluates the condition against the controlling field's current value.
    ///
    /// `None` means the controlling field has no value at all.
    #[must_use]
    pub fn evaluate(&self, actual: Option<&Value>) -> bool {
        let actual = actual.unwrap_or(&Value::Null);
        let expected = self.value.as_ref().unwrap_or(&Value::Null);

        match self.operator {
            ConditionOperator::IsEmpty => is_blank(actual),
            ConditionOperator::IsNotEmpty => !is_blank(actual),
            ConditionOperator::Equals => equals(actual, expected),
            ConditionOperator::NotEquals => !equals(actual, expected),
            ConditionOperator::Contains => contains(actual, expected),
            ConditionOperator::NotContains => !contains(actual, expected),
            ConditionOperator::GreaterThan => {
                compare(actual, expected).is_some_and(std::cmp::Ordering::is_gt)
            }
            ConditionOperator::LessThan => {
                compare(actual, expected).is_some_and(std::cmp::Ordering::is_lt)
            }
        }
    }
}

/// A show/hide rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalLogic {
    /// Effect when the condition holds.
    pub action: ConditionAction,
    /// The condition.
    pub when: Condition,
}

impl ConditionalLogic {
    /// Creates a rule that shows the field when `when` holds.
    #[must_use]
    pub const fn show_when(when: Condition) -> Self {
        Self {
            action: ConditionAction::Show,
            when,
        }
    }

    /// Creates a rule that hides the field when `when` holds.
    #[must_use]
    pub const fn hide_when(when: Condition) -> Self {
        Self {
            action: ConditionAction::Hide,
            when,
        }
    }

    /// Returns whether the owning field is visible given the controlling value.
    #[must_use]
    pub fn is_visible(&self, actual: Option<&Value>) -> bool {
        let holds = self.when.evaluate(actual);
        match self.action {
            ConditionAction::Show => holds,
            ConditionAction::Hide => !holds,
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn equals(actual: &Value, expected: &Value) -> bool {
    if let Value::Array(items) = actual {
        return items.iter().any(|item| equals(item, expected));
    }
    match (scalar_text(actual), scalar_text(expected)) {
        (Some(a), Some(e)) => a == e,
        _ => actual == expected,
    }
}

fn contains(actual: &Value, expected: &Value) -> bool {
    let Some(needle) = scalar_text(expected) else {
        return false;
    };
    match actual {
        Value::Array(items) => items
            .iter()
            .any(|item| scalar_text(item).is_some_and(|s| s == needle)),
        other => scalar_text(other).is_some_and(|s| s.contains(&needle)),
    }
}

fn compare(actual: &Value, expected: &Value) -> Option<std::cmp::Ordering> {
    let a = as_number(actual)?;
    let e = as_number(expected)?;
    a.partial_cmp(&e)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cond(operator: ConditionOperator, value: Option<Value>) -> Condition {
        Condition::new("service", operator, value)
    }

    #[test]
    fn test_equals_and_not_equals() {
        let c = cond(ConditionOperator::Equals, Some(json!("Wedding")));
        assert!(c.evaluate(Some(&json!("Wedding"))));
        assert!(!c.evaluate(Some(&json!("wedding"))));
        assert!(!c.evaluate(None));

        let c = cond(ConditionOperator::NotEquals, Some(json!("Wedding")));
        assert!(c.evaluate(Some(&json!("Vow renewal"))));
        assert!(c.evaluate(None));
    }

    #[test]
    fn test_equals_matches_numbers_against_strings() {
        let c = cond(ConditionOperator::Equals, Some(json!("2")));
        assert!(c.evaluate(Some(&json!(2))));
    }

    #[test]
    fn test_equals_any_element_of_array() {
        let c = cond(ConditionOperator::Equals, Some(json!("b")));
        assert!(c.evaluate(Some(&json!(["a", "b"]))));
    }

    #[test]
    fn test_contains() {
        let c = cond(ConditionOperator::Contains, Some(json!("Cape")));
        assert!(c.evaluate(Some(&json!("Western Cape"))));
        assert!(c.evaluate(Some(&json!(["Cape", "Gauteng"]))));
        assert!(!c.evaluate(Some(&json!(["Western Cape"]))));

        let c = cond(ConditionOperator::NotContains, Some(json!("Cape")));
        assert!(c.evaluate(Some(&json!("Gauteng"))));
    }

    #[test]
    fn test_numeric_comparisons() {
        let gt = cond(ConditionOperator::GreaterThan, Some(json!(50)));
        assert!(gt.evaluate(Some(&json!("120"))));
        assert!(!gt.evaluate(Some(&json!(10))));
        assert!(!gt.evaluate(Some(&json!("many"))));

        let lt = cond(ConditionOperator::LessThan, Some(json!("5.5")));
        assert!(lt.evaluate(Some(&json!(5))));
    }

    #[test]
    fn test_empty_operators_ignore_value() {
        let empty = cond(ConditionOperator::IsEmpty, Some(json!("ignored")));
        assert!(empty.evaluate(None));
        assert!(empty.evaluate(Some(&json!("  "))));
        assert!(empty.evaluate(Some(&json!([]))));
        assert!(!empty.evaluate(Some(&json!(0))));

        let not_empty = cond(ConditionOperator::IsNotEmpty, None);
        assert!(not_empty.evaluate(Some(&json!("x"))));
        assert!(ConditionOperator::IsNotEmpty.is_unary());
    }

    #[test]
    fn test_hide_action_negates() {
        let logic = ConditionalLogic::hide_when(cond(
            ConditionOperator::Equals,
            Some(json!("Civil")),
        ));
        assert!(!logic.is_visible(Some(&json!("Civil"))));
        assert!(logic.is_visible(Some(&json!("Religious"))));
    }

    #[test]
    fn test_deserializes_wire_format() {
        let logic: ConditionalLogic = serde_json::from_value(json!({
            "action": "show",
            "when": {"field": "f1", "fieldLabel": "Service", "operator": "is_not_empty"}
        }))
        .expect("valid conditional logic");
        assert_eq!(logic.action, ConditionAction::Show);
        assert_eq!(logic.when.operator, ConditionOperator::IsNotEmpty);
        assert_eq!(logic.when.field_label.as_deref(), Some("Service"));
    }
}
