//! Value lookup and rendering helpers for the resolver

use serde_json::{Map, Value};

/// Walks a dotted path (`a.b.c`) through nested objects.
///
/// Numeric segments index into arrays. Returns `None` as soon as a segment
/// is absent.
#[must_use]
pub fn lookup_path<'v>(root: &'v Map<String, Value>, path: &str) -> Option<&'v Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Renders a JSON value as template text.
///
/// Strings are verbatim, null is empty, arrays are joined with `", "` and
/// objects render their `value` or `label` member when they have one.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .get("value")
            .or_else(|| map.get("label"))
            .filter(|v| !v.is_object())
            .map_or_else(|| value.to_string(), render_value),
    }
}

/// Returns whether a value counts as true in an `{{#if}}` block.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty() || s.eq_ignore_ascii_case("false") || s == "0")
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_lookup_path() {
        let data = root(json!({"a": {"b": {"c": "deep"}}, "list": [{"x": 1}]}));
        assert_eq!(lookup_path(&data, "a.b.c"), Some(&json!("deep")));
        assert_eq!(lookup_path(&data, "list.0.x"), Some(&json!(1)));
        assert_eq!(lookup_path(&data, "a.missing.c"), None);
        assert_eq!(lookup_path(&data, "a.b.c.d"), None);
        assert_eq!(lookup_path(&data, "list.7"), None);
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!(null)), "");
        assert_eq!(render_value(&json!(3.5)), "3.5");
        assert_eq!(render_value(&json!(["Civil", "", "Religious"])), "Civil, Religious");
        assert_eq!(render_value(&json!({"name": "f", "value": "Durban"})), "Durban");
        assert_eq!(render_value(&json!({"label": "Gauteng"})), "Gauteng");
        assert_eq!(render_value(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!(["x"])));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("false")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
    }
}
