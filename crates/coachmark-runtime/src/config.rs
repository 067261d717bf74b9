#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! [`EngineConfig`] collects the session-wide knobs: the overlay fade-in, the
//! visibility retry policy and the rounded-rect corner radius. Defaults match
//! the classic onboarding behaviour (no fade, 20 × 100 ms retries, radius 10).
//!
//! # Loading
//!
//! With the `config-file` feature the config can be read from TOML or JSON:
//!
//! ```toml
//! fade_in_ms = 300
//! corner_radius = 6.0
//!
//! [retry]
//! max_retries = 10
//!
//! [retry.backoff]
//! kind = "linear"
//! base_ms = 50
//! max_ms = 400
//! ```
//!
//! ```rust,ignore
//! let config = EngineConfig::from_toml_file("coachmark.toml")?;
//! ```
//!
//! Loaded configs are validated; invalid values surface as
//! [`ConfigError::Validation`] with one message per problem.

#[cfg(feature = "config-file")]
use std::path::Path;

use web_time::Duration;

use crate::retry::RetryPolicy;

/// Corner radius applied to [`Shape::RoundedRect`](coachmark_core::Shape) cutouts.
pub const DEFAULT_CORNER_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct EngineConfig {
    /// Overlay fade-in on first display. `None` shows it at full opacity.
    pub fade_in_ms: Option<u64>,
    pub retry: RetryPolicy,
    pub corner_radius: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fade_in_ms: None,
            retry: RetryPolicy::default(),
            corner_radius: DEFAULT_CORNER_RADIUS,
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn fade_in(mut self, duration: Duration) -> Self {
        self.fade_in_ms = Some(duration.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    #[must_use]
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    #[must_use]
    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    /// The fade-in as a duration; zero counts as no fade.
    #[must_use]
    pub fn fade_in_duration(&self) -> Option<Duration> {
        self.fade_in_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.retry.validate();
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            errors.push(format!(
                "corner_radius must be finite and >= 0, got {}",
                self.corner_radius
            ));
        }
        errors
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config-file")]
    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading an engine configuration.
#[cfg(feature = "config-file")]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
