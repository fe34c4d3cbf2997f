//! Officiant Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (clock, form repository)
//! - The template variable resolver
//! - Field matching, options normalization and visibility
//! - Use case orchestration

pub mod cache;
pub mod error;
pub mod fields;
pub mod ports;
pub mod settings;
pub mod template;
pub mod use_cases;

pub use cache::DefaultFormIdCache;
pub use error::{ApplicationError, ApplicationResult};
pub use fields::{FieldMatcher, FieldQuery, FormDataMapper, VisibilityEvaluator};
pub use ports::{Clock, FixedClock, FormRepository, FormRepositoryError};
pub use settings::RenderSettings;
pub use template::{RenderResult, VariableResolver};
pub use use_cases::{
    RenderEmail, RenderEmailOutput, RenderTemplate, RenderTemplateInput, ResolveBookingForm,
    SkippedRule,
};
