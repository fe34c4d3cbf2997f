//! Reserved template variables
//!
//! These names are resolved from dedicated context slots instead of the
//! submission data, with synthesized defaults when a slot is empty.

use officiant_domain::template::ReservedSlots;

/// Information about a reserved variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedInfo {
    /// Variable name
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Example output
    pub example: &'static str,
}

/// Resolves the reserved names `timeStamp`, `trackingToken`, `leadId` and `bookingLink`.
pub struct ReservedVariables;

impl ReservedVariables {
    /// Reserved names in resolution order.
    pub const NAMES: [&'static str; 4] = ["timeStamp", "trackingToken", "leadId", "bookingLink"];

    /// Returns whether the name is reserved.
    #[must_use]
    pub fn is_reserved(name: &str) -> bool {
        Self::NAMES.contains(&name)
    }

    /// Resolves a reserved name.
    ///
    /// `now` supplies the time stamp when the slot is empty and
    /// `booking_link_placeholder` the booking link. Missing tracking tokens
    /// and lead ids resolve to an empty string. Returns `None` for names that
    /// are not reserved.
    #[must_use]
    pub fn resolve(
        name: &str,
        slots: &ReservedSlots,
        now: &str,
        booking_link_placeholder: &str,
    ) -> Option<String> {
        let value = match name {
            "timeStamp" => slots.time_stamp.clone().unwrap_or_else(|| now.to_string()),
            "trackingToken" => slots.tracking_token.clone().unwrap_or_default(),
            "leadId" => slots.lead_id.clone().unwrap_or_default(),
            "bookingLink" => slots
                .booking_link
                .clone()
                .unwrap_or_else(|| booking_link_placeholder.to_string()),
            _ => return None,
        };
        Some(value)
    }

    /// Returns all reserved names with descriptions.
    #[must_use]
    pub fn available() -> Vec<ReservedInfo> {
        vec![
            ReservedInfo {
                name: "timeStamp",
                description: "Render time (RFC 3339, UTC) unless the context supplies one",
                example: "2026-02-14T10:00:00+00:00",
            },
            ReservedInfo {
                name: "trackingToken",
                description: "Email tracking token of the submission",
                example: "01954f3c8a2b7e6d9c0f1a2b3c4d5e6f",
            },
            ReservedInfo {
                name: "leadId",
                description: "Lead record created for the submission",
                example: "lead_8f2c",
            },
            ReservedInfo {
                name: "bookingLink",
                description: "Link to the booking page; a placeholder when not configured",
                example: "https://book.example.com/officer/jane",
            },
        ]
    }
}
