//! Template rendering
//!
//! Provides parsing and resolution of `{{variable}}` tokens and
//! `{{#if cond}}...{{/if}}` blocks in email and invoice templates.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use chrono::{TimeZone, Utc};
//! use officiant_application::ports::FixedClock;
//! use officiant_application::template::VariableResolver;
//! use officiant_domain::template::TemplateContext;
//! use serde_json::json;
//!
//! let clock = Arc::new(FixedClock::new(Utc.timestamp_opt(0, 0).unwrap()));
//! let ctx = TemplateContext::new().with_top_level("venue", json!("Kirstenbosch"));
//! let mut resolver = VariableResolver::new(ctx, clock);
//!
//! let result = resolver.render("Ceremony at {{venue}}{{#if paid}} (paid){{/if}}");
//! assert_eq!(result.rendered, "Ceremony at Kirstenbosch");
//! ```

pub mod conditionals;
pub mod engine;
pub mod first_name;
pub mod parser;
pub mod reserved;
pub mod value;

pub use conditionals::{ConditionalBlock, apply_conditionals, conditional_blocks};
pub use engine::{RenderResult, VariableResolver};
pub use first_name::{derive_first_name, first_name_from};
pub use parser::{
    VariableReference, extract_variable_names, has_variables, is_valid_variable_name,
    parse_variables,
};
pub use reserved::{ReservedInfo, ReservedVariables};
