//! Rewind controller and its collaborators

pub mod clock;
pub mod config;
pub mod controller;
pub mod detector;
pub mod session;
pub mod state;

pub use clock::{ClockAdapter, Scheduler, SeekCommand, TimerCallback, TokioScheduler};
pub use config::RewindConfig;
pub use controller::{RewindController, DEFAULT_DEBOUNCE};
pub use detector::{ComboResetDetector, MissDetector};
pub use session::{GameplayInput, RewindSession, SessionSummary};
pub use state::{ControllerState, ControllerStats, MissOutcome, Phase};
