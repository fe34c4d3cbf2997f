//! Application configuration
//!
//! Settings are layered: built-in defaults, then an optional file (TOML,
//! JSON or YAML, picked by extension), then `OFFICIANT__*` environment
//! variables. List values in the environment are comma separated.

use std::path::{Path, PathBuf};

use chrono::Duration;
use officiant_application::fields::{DEFAULT_KEYWORDS, FieldMatcher};
use officiant_application::settings::{DEFAULT_BOOKING_LINK_PLACEHOLDER, RenderSettings};
use serde::{Deserialize, Serialize};
use url::Url;

/// Prefix for environment overrides, e.g. `OFFICIANT__BOOKING_LINK`.
pub const ENV_PREFIX: &str = "OFFICIANT";

const ENV_SEPARATOR: &str = "__";

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the expected shape.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// `booking_link` is neither the placeholder nor an http(s) URL.
    #[error("invalid booking link '{link}': {reason}")]
    InvalidBookingLink {
        /// The configured value.
        link: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Form used for bookings when a request names none.
    pub default_booking_form_id: Option<String>,
    /// Link rendered for `{{bookingLink}}` when a submission has none.
    pub booking_link: String,
    /// How long a looked-up default form id stays cached.
    pub default_form_cache_ttl_secs: u64,
    /// Keywords for the legacy field-matching heuristic. Empty disables it.
    pub keyword_heuristics: Vec<String>,
    /// Directory holding forms, submissions and email rules.
    pub data_dir: PathBuf,
    /// Rendered for `{{firstName}}` when no first name can be derived.
    pub first_name_fallback: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_booking_form_id: None,
            booking_link: DEFAULT_BOOKING_LINK_PLACEHOLDER.to_string(),
            default_form_cache_ttl_secs: 300,
            keyword_heuristics: DEFAULT_KEYWORDS.iter().map(ToString::to_string).collect(),
            data_dir: default_data_dir(),
            first_name_fallback: None,
        }
    }
}

impl AppConfig {
    /// Checks values the type system cannot.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidBookingLink` for a link that is not an
    /// absolute http(s) URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let link = self.booking_link.trim();
        if link == DEFAULT_BOOKING_LINK_PLACEHOLDER {
            return Ok(());
        }
        let invalid = |reason: String| ConfigError::InvalidBookingLink {
            link: link.to_string(),
            reason,
        };
        let url = Url::parse(link).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(())
    }

    /// Settings for the variable resolver.
    #[must_use]
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            booking_link_placeholder: self.booking_link.trim().to_string(),
            first_name_fallback: self
                .first_name_fallback
                .clone()
                .filter(|f| !f.trim().is_empty()),
        }
    }

    /// Field matcher using the configured keywords.
    #[must_use]
    pub fn matcher(&self) -> FieldMatcher {
        FieldMatcher::with_keywords(&self.keyword_heuristics)
    }

    /// Cache lifetime for the default form id lookup.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        i64::try_from(self.default_form_cache_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }

    /// The configured default form id, if set and not blank.
    #[must_use]
    pub fn default_booking_form_id(&self) -> Option<String> {
        self.default_booking_form_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToString::to_string)
    }
}

/// Loads configuration from defaults, an optional file and the environment.
///
/// # Errors
/// Returns an error if the file is missing or malformed, or validation fails.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_env(path, None)
}

fn load_with_env(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }
    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("keyword_heuristics")
            .source(env),
    );

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");
    Ok(config)
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("officiant-data"), |p| p.join("officiant"))
}
