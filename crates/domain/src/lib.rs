//! Officiant Domain - Core business types
//!
//! This crate defines the domain model for the Officiant booking system:
//! form definitions, submissions, email rules and the layered template
//! context used when rendering emails and invoices.
//! All types here are pure Rust with no I/O dependencies.

pub mod email;
pub mod error;
pub mod form;
pub mod id;
pub mod submission;
pub mod template;

pub use email::{EmailRule, EmailTrigger, RenderedEmail};
pub use error::{DomainError, DomainResult};
pub use form::{
    Condition, ConditionAction, ConditionOperator, ConditionalLogic, FieldDefinition, FieldOption,
    FieldType, Form, FormSection, OptionEntry, OptionsInput,
};
pub use id::{generate_id, generate_tracking_token};
pub use submission::{Submission, SubmissionData};
pub use template::{ReservedSlots, ResolvedVariable, TemplateContext, ValueSource};
