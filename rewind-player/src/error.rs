//! Error types for rewind-player
//!
//! Runtime gameplay events are total and never produce these; errors only
//! arise while building a session (configuration, chart, mod selection).

use rewind_common::ConfigError;
use thiserror::Error;

/// Main error type for rewind-player
#[derive(Error, Debug)]
pub enum Error {
    /// Shared configuration/loading errors
    #[error(transparent)]
    Common(#[from] rewind_common::Error),

    /// Setting outside its declared bounds
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Chart file missing objects or malformed
    #[error("Chart error: {0}")]
    Chart(String),

    /// Selected mods cannot be combined with the practice mod
    #[error("Incompatible mods: {}", .0.join(", "))]
    IncompatibleMods(Vec<String>),

    /// Acronym does not name a known mod
    #[error("Unknown mod: {0}")]
    UnknownMod(String),

    /// No async runtime available for the debounce timer
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using rewind-player Error
pub type Result<T> = std::result::Result<T, Error>;
