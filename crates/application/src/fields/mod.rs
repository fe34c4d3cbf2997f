//! Form field helpers: matching, options, visibility and value mapping

pub mod mapping;
pub mod matcher;
pub mod options;
pub mod visibility;

pub use mapping::FormDataMapper;
pub use matcher::{
    DEFAULT_KEYWORDS, ExactId, FieldMatch, FieldMatcher, FieldQuery, KeywordHeuristic, LabelMatch,
    MatchStrategy, NormalizedSubstring, StableId, normalize_id,
};
pub use options::{canonicalize_form, default_options, normalize, normalize_options};
pub use visibility::{VisibilityEvaluator, field_value};
