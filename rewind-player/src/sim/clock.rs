//! Simulated playback clock
//!
//! Seeks are queued, not applied: the frame loop picks the request up and
//! completes it after a configurable number of frames, the way a real
//! playback system finishes a seek some time after it was asked.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::rewind::{ClockAdapter, SeekCommand};

#[derive(Debug, Default)]
struct ClockInner {
    pending_seek: Option<SeekCommand>,
    seek_log: Vec<SeekCommand>,
}

/// Clock adapter handed to the controller by the simulator
#[derive(Debug, Clone, Default)]
pub struct SimulatedClock {
    inner: Arc<Mutex<ClockInner>>,
}

impl SimulatedClock {
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned lock only means a panicking test thread; the data is plain values
    fn lock(&self) -> MutexGuard<'_, ClockInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Take the most recent unapplied seek request
    pub fn take_pending_seek(&self) -> Option<SeekCommand> {
        self.lock().pending_seek.take()
    }

    pub fn has_pending_seek(&self) -> bool {
        self.lock().pending_seek.is_some()
    }

    /// Every seek requested so far, in order
    pub fn seek_log(&self) -> Vec<SeekCommand> {
        self.lock().seek_log.clone()
    }
}

impl ClockAdapter for SimulatedClock {
    fn seek(&self, command: SeekCommand) {
        let mut inner = self.lock();
        inner.pending_seek = Some(command);
        inner.seek_log.push(command);
    }
}
