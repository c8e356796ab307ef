//! Rewind configuration value object

use rewind_common::config::RewindSection;
use rewind_common::params::{SettingMetadata, GRACE_SECONDS, REWIND_SECONDS};
use rewind_common::time::seconds_to_ms;
use rewind_common::ConfigError;

/// Validated rewind parameters
///
/// Fields are private: once built, a config cannot change for the lifetime
/// of the controller that owns it.
///
/// # Examples
///
/// ```
/// use rewind_player::rewind::RewindConfig;
///
/// let config = RewindConfig::new(3.0, 1.5).unwrap();
/// assert_eq!(config.rewind_ms(), 3000.0);
///
/// assert!(RewindConfig::new(0.5, 1.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewindConfig {
    rewind_seconds: f64,
    grace_seconds: f64,
}

impl RewindConfig {
    /// Validate both parameters against `[1, 10]` and snap them to 0.1 s
    pub fn new(rewind_seconds: f64, grace_seconds: f64) -> Result<Self, ConfigError> {
        let rewind_seconds = SettingMetadata::require(REWIND_SECONDS)?.validate(rewind_seconds)?;
        let grace_seconds = SettingMetadata::require(GRACE_SECONDS)?.validate(grace_seconds)?;

        Ok(Self {
            rewind_seconds,
            grace_seconds,
        })
    }

    /// Build from the `[rewind]` TOML section
    pub fn from_section(section: &RewindSection) -> Result<Self, ConfigError> {
        Self::new(section.rewind_seconds, section.grace_seconds)
    }

    pub fn rewind_seconds(&self) -> f64 {
        self.rewind_seconds
    }

    pub fn grace_seconds(&self) -> f64 {
        self.grace_seconds
    }

    /// Rewind amount in gameplay milliseconds
    pub fn rewind_ms(&self) -> f64 {
        seconds_to_ms(self.rewind_seconds)
    }

    /// Grace period in gameplay milliseconds
    pub fn grace_ms(&self) -> f64 {
        seconds_to_ms(self.grace_seconds)
    }
}

impl Default for RewindConfig {
    fn default() -> Self {
        Self {
            rewind_seconds: 3.0,
            grace_seconds: 1.5,
        }
    }
}
