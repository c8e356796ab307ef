//! # Practice Rewind Player Library (rewind-player)
//!
//! Rewind controller for the practice mod: watches the scoring stream for
//! combo breaks, seeks the playback clock backward, then ignores further
//! misses for a grace period.
//!
//! **Architecture:** a synchronous state machine (`rewind::RewindController`)
//! fed by an ordered event loop (`rewind::RewindSession`), with the debounce
//! release running on a tokio timer task.

pub mod error;
pub mod practice;
pub mod rewind;
pub mod sim;

pub use error::{Error, Result};
