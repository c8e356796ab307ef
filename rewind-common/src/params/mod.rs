//! Rewind setting metadata
//!
//! Single source of truth for the two user-facing rewind settings. The
//! settings UI, the TOML loader and `RewindConfig` construction all validate
//! through the same `SettingMetadata` entries.
//!
//! # Usage
//!
//! ```rust
//! use rewind_common::params::{SettingMetadata, REWIND_SECONDS};
//!
//! let meta = SettingMetadata::find(REWIND_SECONDS).unwrap();
//! assert_eq!(meta.validate(3.04).unwrap(), 3.0);
//! assert!(meta.validate(0.5).is_err());
//! ```

use crate::error::ConfigError;

mod metadata;

/// Key of the rewind amount setting (seconds)
pub const REWIND_SECONDS: &str = "rewind_seconds";

/// Key of the invulnerability window setting (seconds)
pub const GRACE_SECONDS: &str = "grace_seconds";

/// Metadata for a single bounded numeric setting
///
/// # Fields
///
/// - `key`: Setting name (e.g., "rewind_seconds")
/// - `label`: Short label shown next to the slider
/// - `description`: Tooltip text
/// - `default_value`: Value used when nothing is configured
/// - `min` / `max`: Inclusive bounds
/// - `step`: Slider precision; accepted values are snapped to this grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingMetadata {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub default_value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SettingMetadata {
    /// Look up metadata by key
    pub fn find(key: &str) -> Option<&'static SettingMetadata> {
        Self::all().iter().find(|m| m.key == key)
    }

    /// Look up metadata by key, failing with `ConfigError::UnknownKey`
    pub fn require(key: &str) -> Result<&'static SettingMetadata, ConfigError> {
        Self::find(key).ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
    }

    /// Validate a value against the bounds and snap it to the step grid
    ///
    /// Out-of-range values are rejected rather than clamped so that a
    /// misconfiguration is never silently masked.
    pub fn validate(&self, value: f64) -> Result<f64, ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NotFinite { key: self.key, value });
        }
        if value < self.min || value > self.max {
            return Err(ConfigError::OutOfRange {
                key: self.key,
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(self.snap(value))
    }

    /// Parse a textual value, then validate it
    pub fn parse(&self, raw: &str) -> Result<f64, ConfigError> {
        let value: f64 = raw.trim().parse().map_err(|_| ConfigError::Parse {
            key: self.key,
            raw: raw.to_string(),
        })?;
        self.validate(value)
    }

    /// Round to the nearest multiple of `step`, kept inside the bounds
    fn snap(&self, value: f64) -> f64 {
        // Divide by an integral scale so 0.1 increments don't drift (1.7, not 1.7000000000000002)
        let scale = (1.0 / self.step).round();
        ((value * scale).round() / scale).clamp(self.min, self.max)
    }
}
