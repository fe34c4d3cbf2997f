//! Deterministic JSON serialization for stored forms and submissions.
//!
//! Output uses 2-space indentation and a trailing newline so stored files
//! diff cleanly.

mod json;

pub use json::*;
