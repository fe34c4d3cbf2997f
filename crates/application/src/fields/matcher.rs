//! Field matching
//!
//! Finds the form field a caller is referring to when ids have churned
//! between edits. Matching runs an ordered list of named strategies and the
//! first strategy that finds a field wins. Within one strategy the first
//! field in form order wins; no ranking is applied, so substring and keyword
//! matches can be ambiguous.

use officiant_domain::form::FieldDefinition;
use tracing::debug;

/// Prefixes stripped from ids before substring comparison.
const ID_PREFIXES: &[&str] = &["field-", "field_", "item_", "item-"];

/// Suffixes stripped from ids before substring comparison.
const ID_SUFFIXES: &[&str] = &["_field", "-field"];

/// Keywords used by [`KeywordHeuristic`] when none are configured.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "nationality",
    "province",
    "service",
    "country",
    "city",
    "ceremony",
    "venue",
    "date",
    "email",
    "phone",
    "name",
];

/// What the caller is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldQuery<'q> {
    /// Requested field id (possibly stale).
    pub id: &'q str,
    /// Label recorded alongside the id, if any.
    pub label_hint: Option<&'q str>,
}

impl<'q> FieldQuery<'q> {
    /// Creates a query by id only.
    #[must_use]
    pub const fn by_id(id: &'q str) -> Self {
        Self {
            id,
            label_hint: None,
        }
    }

    /// Creates a query by id with a label hint.
    #[must_use]
    pub const fn with_label(id: &'q str, label: &'q str) -> Self {
        Self {
            id,
            label_hint: Some(label),
        }
    }
}

/// One way of locating a field.
pub trait MatchStrategy: Send + Sync {
    /// Strategy name used in logs and match results.
    fn name(&self) -> &'static str;

    /// Returns the first field this strategy accepts.
    fn find<'f>(
        &self,
        fields: &'f [FieldDefinition],
        query: &FieldQuery<'_>,
    ) -> Option<&'f FieldDefinition>;
}

/// Matches `field.id == query.id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactId;

impl MatchStrategy for ExactId {
    fn name(&self) -> &'static str {
        "exact_id"
    }

    fn find<'f>(
        &self,
        fields: &'f [FieldDefinition],
        query: &FieldQuery<'_>,
    ) -> Option<&'f FieldDefinition> {
        fields.iter().find(|f| f.id == query.id)
    }
}

/// Matches `field.stable_id == query.id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StableId;

impl MatchStrategy for StableId {
    fn name(&self) -> &'static str {
        "stable_id"
    }

    fn find<'f>(
        &self,
        fields: &'f [FieldDefinition],
        query: &FieldQuery<'_>,
    ) -> Option<&'f FieldDefinition> {
        fields
            .iter()
            .find(|f| f.stable_id.as_deref() == Some(query.id))
    }
}

/// Matches when either normalized id contains the other.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizedSubstring;

impl MatchStrategy for NormalizedSubstring {
    fn name(&self) -> &'static str {
        "normalized_substring"
    }

    fn find<'f>(
        &self,
        fields: &'f [FieldDefinition],
        query: &FieldQuery<'_>,
    ) -> Option<&'f FieldDefinition> {
        let wanted = normalize_id(query.id);
        if wanted.is_empty() {
            return None;
        }
        fields.iter().find(|f| {
            let candidate = normalize_id(&f.id);
            !candidate.is_empty() && (candidate.contains(&wanted) || wanted.contains(&candidate))
        })
    }
}

/// Matches the label hint against field labels, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelMatch;

impl MatchStrategy for LabelMatch {
    fn name(&self) -> &'static str {
        "label"
    }

    fn find<'f>(
        &self,
        fields: &'f [FieldDefinition],
        query: &FieldQuery<'_>,
    ) -> Option<&'f FieldDefinition> {
        let hint = query.label_hint?.trim().to_lowercase();
        if hint.is_empty() {
            return None;
        }
        fields
            .iter()
            .find(|f| f.label.trim().to_lowercase() == hint)
    }
}

/// Legacy keyword matching: a keyword in the requested id selects the first
/// field whose label contains the same keyword.
#[derive(Debug, Clone)]
pub struct KeywordHeuristic {
    keywords: Vec<String>,
}

impl KeywordHeuristic {
    /// Creates the heuristic with the given keywords (lowercased).
    #[must_use]
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Returns the configured keywords.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

impl MatchStrategy for KeywordHeuristic {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn find<'f>(
        &self,
        fields: &'f [FieldDefinition],
        query: &FieldQuery<'_>,
    ) -> Option<&'f FieldDefinition> {
        let id = query.id.to_lowercase();
        self.keywords
            .iter()
            .filter(|k| id.contains(k.as_str()))
            .find_map(|k| {
                fields
                    .iter()
                    .find(|f| f.label.to_lowercase().contains(k.as_str()))
            })
    }
}

/// A field found by the matcher, with the strategy that found it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldMatch<'f> {
    /// The matched field.
    pub field: &'f FieldDefinition,
    /// Name of the winning strategy.
    pub strategy: &'static str,
}

/// Runs match strategies in order; the first hit wins.
pub struct FieldMatcher {
    strategies: Vec<Box<dyn MatchStrategy>>,
}

impl FieldMatcher {
    /// Creates the default cascade: exact id, stable id, normalized
    /// substring, label, keyword heuristic.
    #[must_use]
    pub fn new() -> Self {
        Self::with_keywords(DEFAULT_KEYWORDS)
    }

    /// Creates the default cascade with a custom keyword list.
    ///
    /// An empty list drops the keyword heuristic.
    #[must_use]
    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keyword = KeywordHeuristic::new(keywords);
        let mut strategies: Vec<Box<dyn MatchStrategy>> = vec![
            Box::new(ExactId),
            Box::new(StableId),
            Box::new(NormalizedSubstring),
            Box::new(LabelMatch),
        ];
        if !keyword.keywords().is_empty() {
            strategies.push(Box::new(keyword));
        }
        Self { strategies }
    }

    /// Creates a matcher from an explicit strategy list.
    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn MatchStrategy>>) -> Self {
        Self { strategies }
    }

    /// Creates the default cascade without the keyword heuristic.
    #[must_use]
    pub fn without_keyword_heuristic() -> Self {
        Self::with_keywords(std::iter::empty::<&str>())
    }

    /// Returns the strategy names in evaluation order.
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Finds the best-matching field.
    #[must_use]
    pub fn find<'f>(
        &self,
        fields: &'f [FieldDefinition],
        query: &FieldQuery<'_>,
    ) -> Option<&'f FieldDefinition> {
        self.find_with_strategy(fields, query).map(|m| m.field)
    }

    /// Finds the best-matching field and reports which strategy found it.
    #[must_use]
    pub fn find_with_strategy<'f>(
        &self,
        fields: &'f [FieldDefinition],
        query: &FieldQuery<'_>,
    ) -> Option<FieldMatch<'f>> {
        let found = self.strategies.iter().find_map(|strategy| {
            strategy.find(fields, query).map(|field| FieldMatch {
                field,
                strategy: strategy.name(),
            })
        });

        match &found {
            Some(m) if m.strategy != "exact_id" => debug!(
                query = query.id,
                field = %m.field.id,
                strategy = m.strategy,
                "field matched heuristically"
            ),
            None => debug!(query = query.id, "no field matched"),
            Some(_) => {}
        }
        found
    }
}

impl Default for FieldMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercases an id and strips builder prefixes and suffixes.
///
/// ```
/// use officiant_application::fields::normalize_id;
///
/// assert_eq!(normalize_id("item_123_name"), "123_name");
/// assert_eq!(normalize_id("name_field"), "name");
/// assert_eq!(normalize_id("Field-Venue"), "venue");
/// ```
#[must_use]
pub fn normalize_id(id: &str) -> String {
    let mut normalized = id.trim().to_lowercase();
    loop {
        let before = normalized.len();
        for prefix in ID_PREFIXES {
            if let Some(rest) = normalized.strip_prefix(prefix) {
                normalized = rest.to_string();
            }
        }
        for suffix in ID_SUFFIXES {
            if let Some(rest) = normalized.strip_suffix(suffix) {
                normalized = rest.to_string();
            }
        }
        if normalized.len() == before {
            return normalized;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use officiant_domain::form::FieldType;
    use pretty_assertions::assert_eq;

    fn field(id: &str, label: &str) -> FieldDefinition {
        FieldDefinition::new(id, label, FieldType::Text)
    }

    fn booking_fields() -> Vec<FieldDefinition> {
        vec![
            field("name_field", "Full Name"),
            field("cm1nationality0000000000000", "Nationality of bride"),
            field("field-email", "Email Address"),
            field("service_type", "Type of Service"),
        ]
    }

    #[test]
    fn test_exact_id_wins_over_heuristics() {
        let fields = vec![field("name_field", "Name"), field("name", "Other")];
        let matcher = FieldMatcher::new();
        let found = matcher
            .find_with_strategy(&fields, &FieldQuery::by_id("name"))
            .map(|m| (m.field.label.as_str(), m.strategy));
        assert_eq!(found, Some(("Other", "exact_id")));
    }

    #[test]
    fn test_stable_id_after_exact_id() {
        let fields = vec![
            field("f-new-1", "Venue").with_stable_id("venue"),
            field("other", "Other"),
        ];
        let found = FieldMatcher::new().find_with_strategy(&fields, &FieldQuery::by_id("venue"));
        assert_eq!(found.map(|m| m.strategy), Some("stable_id"));
        assert_eq!(found.map(|m| m.field.id.as_str()), Some("f-new-1"));
    }

    #[test]
    fn test_item_prefixed_id_matches_name_field() {
        // item_123_name -> "123_name", name_field -> "name": "123_name" contains "name"
        let fields = booking_fields();
        let found =
            FieldMatcher::new().find_with_strategy(&fields, &FieldQuery::by_id("item_123_name"));
        assert_eq!(found.map(|m| m.field.id.as_str()), Some("name_field"));
        assert_eq!(found.map(|m| m.strategy), Some("normalized_substring"));
    }

    #[test]
    fn test_normalized_substring_either_direction() {
        let fields = booking_fields();
        let found = NormalizedSubstring.find(&fields, &FieldQuery::by_id("email"));
        assert_eq!(found.map(|f| f.id.as_str()), Some("field-email"));

        let found = NormalizedSubstring.find(&fields, &FieldQuery::by_id("item_service_type_v2"));
        assert_eq!(found.map(|f| f.id.as_str()), Some("service_type"));
    }

    #[test]
    fn test_label_hint_match_is_case_insensitive() {
        let fields = booking_fields();
        let query = FieldQuery::with_label("zzz-deleted", "  email address ");
        let found = FieldMatcher::new().find_with_strategy(&fields, &query);
        assert_eq!(found.map(|m| m.strategy), Some("label"));
        assert_eq!(found.map(|m| m.field.id.as_str()), Some("field-email"));
    }

    #[test]
    fn test_keyword_heuristic() {
        let fields = booking_fields();
        let query = FieldQuery::by_id("old_nationality_select");
        let found = FieldMatcher::new().find_with_strategy(&fields, &query);
        assert_eq!(found.map(|m| m.strategy), Some("keyword"));
        assert_eq!(
            found.map(|m| m.field.id.as_str()),
            Some("cm1nationality0000000000000")
        );
    }

    #[test]
    fn test_without_keyword_heuristic() {
        let fields = booking_fields();
        let matcher = FieldMatcher::without_keyword_heuristic();
        assert_eq!(
            matcher.strategy_names(),
            vec!["exact_id", "stable_id", "normalized_substring", "label"]
        );
        assert!(
            matcher
                .find(&fields, &FieldQuery::by_id("old_nationality_select"))
                .is_none()
        );
    }

    #[test]
    fn test_custom_strategy_order() {
        let fields = vec![field("service", "Venue"), field("x", "Service")];
        let matcher = FieldMatcher::with_strategies(vec![Box::new(LabelMatch), Box::new(ExactId)]);
        let found = matcher.find(&fields, &FieldQuery::with_label("service", "service"));
        assert_eq!(found.map(|f| f.id.as_str()), Some("x"));
    }

    #[test]
    fn test_no_match() {
        let fields = booking_fields();
        assert!(
            FieldMatcher::new()
                .find(&fields, &FieldQuery::by_id("zzz"))
                .is_none()
        );
        assert!(FieldMatcher::new().find(&[], &FieldQuery::by_id("name")).is_none());
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("item_123_name"), "123_name");
        assert_eq!(normalize_id("field_item_x_field"), "x");
        assert_eq!(normalize_id("field-"), "");
        assert_eq!(normalize_id("plain"), "plain");
    }

    #[test]
    fn test_empty_normalized_ids_never_match() {
        let fields = vec![field("field-", "Odd")];
        assert!(NormalizedSubstring.find(&fields, &FieldQuery::by_id("x")).is_none());
        assert!(NormalizedSubstring.find(&fields, &FieldQuery::by_id("item_")).is_none());
    }
}
