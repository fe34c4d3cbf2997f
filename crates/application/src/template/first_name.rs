//! First-name derivation
//!
//! `{{firstName}}` is derived from a name-like field by taking the first
//! whitespace-separated token and accepting it only when it looks like a
//! proper name.

use officiant_domain::template::TemplateContext;
use serde_json::{Map, Value};

use super::value::render_value;

/// Tokens that are never accepted as a first name.
pub const STOP_WORDS: &[&str] = &[
    "mr", "mrs", "ms", "miss", "dr", "prof", "the", "dear", "hello", "hi", "test", "client",
    "customer", "user", "name", "n/a",
];

/// Keys that hold a first name directly.
const EXPLICIT_KEYS: &[&str] = &["firstName", "first_name", "firstname"];

/// Keys that hold a full name, most specific first.
const FULL_NAME_KEYS: &[&str] = &["name", "fullName", "full_name", "clientName", "yourName"];

/// Key fragments that rule out a name-like key in the fallback scan.
const EXCLUDED_FRAGMENTS: &[&str] = &["last", "surname", "user", "company", "venue", "file"];

/// Extracts a first name from a full name, or `None` if the first token does
/// not look like a proper name.
///
/// ```
/// use officiant_application::template::first_name::first_name_from;
///
/// assert_eq!(first_name_from("Thandi Mokoena"), Some("Thandi".to_string()));
/// assert_eq!(first_name_from("Mr Smith"), None);
/// assert_eq!(first_name_from("thandi"), None);
/// ```
#[must_use]
pub fn first_name_from(full_name: &str) -> Option<String> {
    let token = full_name
        .split_whitespace()
        .next()?
        .trim_end_matches([',', '.', ';', ':']);

    let mut chars = token.chars();
    let first = chars.next()?;
    if !first.is_uppercase() || token.chars().count() < 2 {
        return None;
    }
    if !chars.all(|c| c.is_alphabetic() || c == '\'' || c == '-') || token.ends_with(['\'', '-'])
    {
        return None;
    }
    if STOP_WORDS.contains(&token.to_lowercase().as_str()) {
        return None;
    }
    Some(token.to_string())
}

/// Derives `firstName` from a template context.
///
/// An explicit first-name value wins. Otherwise the first full-name key
/// found in the form data, top-level or submission layer is run through
/// [`first_name_from`], then any other key containing `name`.
#[must_use]
pub fn derive_first_name(context: &TemplateContext) -> Option<String> {
    let layers = [&context.form_data, &context.top_level, &context.submission_data];

    for key in EXPLICIT_KEYS {
        if let Some(text) = find_text(&layers, key) {
            return Some(text.trim().to_string());
        }
    }

    for key in FULL_NAME_KEYS {
        if let Some(text) = find_text(&layers, key) {
            return first_name_from(&text);
        }
    }

    layers.iter().find_map(|layer| {
        layer
            .iter()
            .filter(|(key, _)| is_name_like(key))
            .find_map(|(_, value)| first_name_from(&render_value(value)))
    })
}

fn find_text(layers: &[&Map<String, Value>], key: &str) -> Option<String> {
    layers
        .iter()
        .filter_map(|layer| layer.get(key))
        .map(render_value)
        .find(|text| !text.trim().is_empty())
}

fn is_name_like(key: &str) -> bool {
    let lower = key.to_lowercase();
    lower.contains("name") && !EXCLUDED_FRAGMENTS.iter().any(|f| lower.contains(f))
}
