//! Collaborator seams: the playback clock and the debounce timer
//!
//! Both are owned by the host. The controller only ever calls outward
//! through these traits and never waits on either.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::trace;

use crate::error::{Error, Result};

/// Request to move the playback clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekCommand {
    /// Destination position (milliseconds, never negative)
    pub target_time_ms: f64,
}

/// Playback clock owned by the host
///
/// `seek` is fire-and-forget: the controller neither waits for nor observes
/// completion. Positions come back to the controller through `on_tick`.
pub trait ClockAdapter: Send + Sync {
    fn seek(&self, command: SeekCommand);
}

impl<T: ClockAdapter + ?Sized> ClockAdapter for Arc<T> {
    fn seek(&self, command: SeekCommand) {
        (**self).seek(command)
    }
}

/// Callback run once when a scheduled delay elapses
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Real-time timer owned by the host
///
/// Scheduled callbacks are not cancellable. They may run after the
/// scheduling controller is gone and must tolerate that.
pub trait Scheduler: Send + Sync {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback);
}

impl<T: Scheduler + ?Sized> Scheduler for Arc<T> {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) {
        (**self).schedule_after(delay, callback)
    }
}

/// Scheduler backed by tokio timers
///
/// Each call spawns a detached task that sleeps, then runs the callback.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime of the calling context
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current()
            .map_err(|e| Error::Runtime(format!("debounce timer needs a tokio runtime: {}", e)))?;
        Ok(Self::new(handle))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) {
        trace!("Scheduling timer callback in {:?}", delay);
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        });
    }
}
