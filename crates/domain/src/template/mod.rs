//! Template rendering context types

mod context;

pub use context::{ReservedSlots, ResolvedVariable, TemplateContext, ValueSource};
