//! Common error types for the rewind crates

use thiserror::Error;

/// Common result type for rewind operations
pub type Result<T> = std::result::Result<T, Error>;

/// Setting validation failure
///
/// Raised at construction time only. Runtime gameplay events never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value lies outside the declared bounds of the setting
    #[error("{key}: value {value} out of range [{min}, {max}]")]
    OutOfRange {
        key: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value is NaN or infinite
    #[error("{key}: value {value} is not a finite number")]
    NotFinite { key: &'static str, value: f64 },

    /// Value could not be parsed from its textual form
    #[error("{key}: invalid number format '{raw}'")]
    Parse { key: &'static str, raw: String },

    /// No setting is registered under the given key
    #[error("unknown setting '{0}'")]
    UnknownKey(String),
}

/// Common error types across the rewind crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML document could not be parsed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML document could not be serialized
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Setting outside its declared bounds
    #[error("Invalid setting: {0}")]
    Setting(#[from] ConfigError),

    /// Configuration loading error
    #[error("Configuration error: {0}")]
    Config(String),
}
