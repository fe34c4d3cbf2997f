//! ID generation utilities.

use uuid::Uuid;

/// Generates a new UUID v7 as a string.
///
/// This is the id format for forms, sections, submissions and email rules.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

/// Generates a tracking token for outbound emails.
///
/// Tokens are simple (hyphen-less) UUID v7 strings so they can be embedded
/// in links without escaping.
#[must_use]
pub fn generate_tracking_token() -> String {
    Uuid::now_v7().simple().to_string()
}
