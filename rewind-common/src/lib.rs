//! # Rewind Common Library
//!
//! Shared code for the practice-rewind crates including:
//! - Setting metadata and bounds validation
//! - Event types (RewindEvent enum) and the EventBus
//! - Hit result taxonomy used by the miss detector
//! - TOML configuration loading
//! - Timestamp utilities

pub mod config;
pub mod error;
pub mod events;
pub mod params;
pub mod time;

pub use error::{ConfigError, Error, Result};
