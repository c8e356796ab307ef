//! Configuration loading and config file resolution
//!
//! Bootstrap configuration lives in a small TOML file:
//!
//! ```toml
//! [rewind]
//! rewind_seconds = 3.0
//! grace_seconds = 1.5
//! debounce_ms = 500
//! trigger = "combo_break"
//!
//! [logging]
//! level = "info"
//!
//! [simulation]
//! frame_ms = 16
//! ```
//!
//! Every section is optional. Missing values fall back to the compiled
//! defaults from the setting metadata.

use crate::error::{Error, Result};
use crate::params::{SettingMetadata, GRACE_SECONDS, REWIND_SECONDS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "REWIND_CONFIG";

/// Real-time delay before the controller accepts misses again after a rewind
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Upper bound for the debounce delay
///
/// Longer windows start swallowing genuine misses after the grace period.
pub const MAX_DEBOUNCE_MS: u64 = 5000;

/// How a miss is derived from the scoring stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// The last hit result in the history breaks combo
    #[default]
    ComboBreak,
    /// The combo counter drops to zero
    ComboReset,
}

impl std::fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerMode::ComboBreak => write!(f, "combo_break"),
            TriggerMode::ComboReset => write!(f, "combo_reset"),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub rewind: RewindSection,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// `[rewind]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewindSection {
    /// Seconds to rewind on a miss, [1, 10]
    #[serde(default = "default_rewind_seconds")]
    pub rewind_seconds: f64,

    /// Seconds of invulnerability after the rewind target, [1, 10]
    #[serde(default = "default_grace_seconds")]
    pub grace_seconds: f64,

    /// Debounce delay in real milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub trigger: TriggerMode,
}

impl Default for RewindSection {
    fn default() -> Self {
        Self {
            rewind_seconds: default_rewind_seconds(),
            grace_seconds: default_grace_seconds(),
            debounce_ms: default_debounce_ms(),
            trigger: TriggerMode::default(),
        }
    }
}

impl RewindSection {
    /// Check the settings and the debounce delay against their bounds
    pub fn validate(&self) -> Result<()> {
        SettingMetadata::require(REWIND_SECONDS)?.validate(self.rewind_seconds)?;
        SettingMetadata::require(GRACE_SECONDS)?.validate(self.grace_seconds)?;

        if self.debounce_ms == 0 || self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(Error::Config(format!(
                "debounce_ms: value {} out of range [1, {}]",
                self.debounce_ms, MAX_DEBOUNCE_MS
            )));
        }

        Ok(())
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// `[simulation]` section, read by the playback simulator only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Frame interval of the simulated game loop (milliseconds)
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_ms: default_frame_ms(),
        }
    }
}

fn default_rewind_seconds() -> f64 {
    setting_default(REWIND_SECONDS)
}

fn default_grace_seconds() -> f64 {
    setting_default(GRACE_SECONDS)
}

fn setting_default(key: &str) -> f64 {
    SettingMetadata::find(key).map_or(1.0, |m| m.default_value)
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_frame_ms() -> u64 {
    16
}

impl TomlConfig {
    /// Parse and validate a TOML document
    pub fn parse(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check every value against its declared bounds
    pub fn validate(&self) -> Result<()> {
        self.rewind.validate()?;

        if self.simulation.frame_ms == 0 {
            return Err(Error::Config("frame_ms: must be at least 1".to_string()));
        }

        Ok(())
    }
}

/// Resolve the config file path
///
/// Priority order:
/// 1. Command-line argument (highest priority)
/// 2. `REWIND_CONFIG` environment variable
/// 3. Platform config dir (`~/.config/practice-rewind/config.toml` on Linux)
///
/// Returns None when no candidate applies; callers fall back to defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path().filter(|p| p.exists())
}

/// Platform default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("practice-rewind").join("config.toml"))
}

/// Load configuration, tolerating a missing file
///
/// A missing file logs a warning and yields compiled defaults. A file that
/// exists but fails to parse or validate is an error.
pub fn load_or_default(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = resolve_config_path(cli_arg) else {
        info!("No config file found, using built-in defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} not found, using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    TomlConfig::load(&path)
}

/// Write configuration atomically (temp file + rename)
///
/// The config is validated first, and an interrupted write never leaves a
/// half-written file at `target`.
pub fn write_toml_config(config: &TomlConfig, target: &Path) -> Result<()> {
    config.validate()?;
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp = target.with_extension("toml.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, target)?;

    debug!("Wrote configuration to {}", target.display());
    Ok(())
}
