//! Use cases
//!
//! Application use cases that orchestrate domain logic.

mod render_email;
mod render_template;
mod resolve_booking_form;

pub use render_email::{RenderEmail, RenderEmailOutput, SkippedRule};
pub use render_template::{RenderTemplate, RenderTemplateInput};
pub use resolve_booking_form::ResolveBookingForm;
