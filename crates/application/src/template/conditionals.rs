//! `{{#if cond}}...{{/if}}` blocks
//!
//! Blocks are handled by a single non-greedy regex pass before variables are
//! substituted. Nested blocks are not supported: an inner `{{/if}}` closes the
//! outer block. Unterminated blocks are left in the output untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
static IF_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{\s*#if\s+([^}]+?)\s*\}\}(.*?)\{\{\s*/if\s*\}\}")
        .expect("conditional block pattern is valid")
});

/// A conditional block found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalBlock {
    /// Condition name, e.g. `paid` in `{{#if paid}}`.
    pub condition: String,
    /// Text between the markers.
    pub body: String,
}

/// Lists the conditional blocks in a template.
#[must_use]
pub fn conditional_blocks(template: &str) -> Vec<ConditionalBlock> {
    IF_BLOCK
        .captures_iter(template)
        .map(|caps| ConditionalBlock {
            condition: caps[1].to_string(),
            body: caps[2].to_string(),
        })
        .collect()
}

/// Keeps the body of every block whose condition holds and drops the rest.
pub fn apply_conditionals(template: &str, mut holds: impl FnMut(&str) -> bool) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }
    IF_BLOCK
        .replace_all(template, |caps: &Captures<'_>| {
            if holds(&caps[1]) {
                caps[2].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_and_drops_blocks() {
        let template = "A{{#if yes}}1{{/if}}B{{#if no}}2{{/if}}C";
        let out = apply_conditionals(template, |c| c == "yes");
        assert_eq!(out, "A1BC");
    }

    #[test]
    fn test_multiline_body_and_whitespace() {
        let template = "{{ #if paid }}\nThank you\n{{ /if }}";
        assert_eq!(apply_conditionals(template, |_| true), "\nThank you\n");
    }

    #[test]
    fn test_unterminated_block_is_untouched() {
        let template = "{{#if paid}}never closed";
        assert_eq!(apply_conditionals(template, |_| false), template);
    }

    #[test]
    fn test_nested_blocks_are_not_nesting_safe() {
        let template = "{{#if a}}x{{#if b}}y{{/if}}z{{/if}}";
        let out = apply_conditionals(template, |_| true);
        // The first {{/if}} closes the outer block.
        assert_eq!(out, "x{{#if b}}yz{{/if}}");
    }

    #[test]
    fn test_conditional_blocks_listing() {
        let blocks = conditional_blocks("{{#if deposit}}Pay {{amount}}{{/if}}");
        assert_eq!(
            blocks,
            vec![ConditionalBlock {
                condition: "deposit".to_string(),
                body: "Pay {{amount}}".to_string(),
            }]
        );
    }
}
