//! Template parser for `{{variable}}` syntax
//!
//! Parses strings to extract variable references with their positions.
//! Block markers (`{{#if x}}`, `{{/if}}`) are reported but never resolved.

use std::ops::Range;

/// Represents a parsed `{{...}}` token in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableReference {
    /// The token body without the braces, trimmed.
    pub name: String,

    /// Whether this token is a block marker (starts with `#` or `/`).
    pub is_block: bool,

    /// Byte range in the original string where this token appears.
    pub span: Range<usize>,
}

impl VariableReference {
    /// Creates a new variable reference.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Range<usize>) -> Self {
        let name = name.into();
        let is_block = name.starts_with('#') || name.starts_with('/');
        Self {
            name,
            is_block,
            span,
        }
    }

    /// Returns true if the name is a dotted path such as `submission.data.venue`.
    #[must_use]
    pub fn is_path(&self) -> bool {
        !self.is_block && self.name.contains('.')
    }
}

/// Parses a template and extracts all `{{...}}` tokens.
///
/// # Examples
///
/// ```
/// use officiant_application::template::parser::parse_variables;
///
/// let refs = parse_variables("Dear {{firstName}}, see {{bookingLink}}");
/// assert_eq!(refs.len(), 2);
/// assert_eq!(refs[0].name, "firstName");
/// assert_eq!(refs[1].name, "bookingLink");
/// ```
#[must_use]
pub fn parse_variables(input: &str) -> Vec<VariableReference> {
    let mut references = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch != '{' || !matches!(chars.peek(), Some((_, '{'))) {
            continue;
        }
        chars.next();
        let start = i;
        let mut name = String::new();
        let mut found_end = false;

        while let Some((_, ch)) = chars.next() {
            if ch == '}'
                && let Some((end_idx, '}')) = chars.peek()
            {
                let end = *end_idx + 1;
                chars.next();

                let trimmed_name = name.trim();
                if !trimmed_name.is_empty() {
                    references.push(VariableReference::new(trimmed_name, start..end));
                }
                found_end = true;
                break;
            }
            name.push(ch);
        }

        // Unclosed {{ consumes the rest of the input
        if !found_end {
            break;
        }
    }

    references
}

/// Validates a variable name.
///
/// Valid names start with a letter or underscore and continue with
/// alphanumerics, underscores, hyphens or dots.
#[must_use]
pub fn is_valid_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Returns true if the input string contains any `{{...}}` tokens.
#[must_use]
pub fn has_variables(input: &str) -> bool {
    input.contains("{{") && input.contains("}}")
}

/// Extracts the names of variable tokens, skipping block markers.
#[must_use]
pub fn extract_variable_names(input: &str) -> Vec<String> {
    parse_variables(input)
        .into_iter()
        .filter(|r| !r.is_block)
        .map(|r| r.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_variable() {
        let refs = parse_variables("{{name}}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "name");
        assert!(!refs[0].is_block);
        assert_eq!(refs[0].span, 0..8);
    }

    #[test]
    fn test_parse_multiple_variables() {
        let refs = parse_variables("Hi {{firstName}}, ref {{leadId}} on {{timeStamp}}");
        let names: Vec<&str> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["firstName", "leadId", "timeStamp"]);
    }

    #[test]
    fn test_parse_with_whitespace() {
        let refs = parse_variables("{{ venue }}");
        assert_eq!(refs[0].name, "venue");
    }

    #[test]
    fn test_block_markers_flagged() {
        let refs = parse_variables("{{#if paid}}Paid{{/if}}");
        assert_eq!(refs.len(), 2);
        assert!(refs[0].is_block);
        assert!(refs[1].is_block);
        assert!(extract_variable_names("{{#if paid}}{{amount}}{{/if}}") == vec!["amount"]);
    }

    #[test]
    fn test_dotted_path() {
        let refs = parse_variables("{{submission.data.venue}}");
        assert!(refs[0].is_path());
    }

    #[test]
    fn test_unclosed_and_empty() {
        assert!(parse_variables("{{name").is_empty());
        assert!(parse_variables("{{}}").is_empty());
        assert!(parse_variables("{{   }}").is_empty());
        assert!(parse_variables("no tokens { here }").is_empty());
    }

    #[test]
    fn test_unicode_text_around_tokens() {
        let input = "Geagte {{name}} – baie dankie";
        let refs = parse_variables(input);
        assert_eq!(&input[refs[0].span.clone()], "{{name}}");
    }

    #[test]
    fn test_valid_variable_names() {
        assert!(is_valid_variable_name("firstName"));
        assert!(is_valid_variable_name("field_abc-1"));
        assert!(is_valid_variable_name("submission.data.venue"));
        assert!(!is_valid_variable_name(""));
        assert!(!is_valid_variable_name("1abc"));
        assert!(!is_valid_variable_name("a..b"));
        assert!(!is_valid_variable_name("a b"));
    }

    #[test]
    fn test_has_variables() {
        assert!(has_variables("{{x}}"));
        assert!(!has_variables("plain"));
    }
}
