//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod form_repository;

pub use clock::{Clock, FixedClock};
pub use form_repository::{FormRepository, FormRepositoryError};
