//! Rendering and matching settings

/// Placeholder rendered for `{{bookingLink}}` when no link is configured.
pub const DEFAULT_BOOKING_LINK_PLACEHOLDER: &str = "[Booking Link]";

/// Settings that shape template rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Rendered for `{{bookingLink}}` when the context has no link.
    pub booking_link_placeholder: String,
    /// Rendered for `{{firstName}}` when no first name can be derived.
    pub first_name_fallback: Option<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            booking_link_placeholder: DEFAULT_BOOKING_LINK_PLACEHOLDER.to_string(),
            first_name_fallback: None,
        }
    }
}
