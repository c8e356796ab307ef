//! Test helpers for rewind-player integration tests
//!
//! - RecordingClock: ClockAdapter that logs every seek
//! - ManualScheduler: Scheduler that holds callbacks until the test fires them

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rewind_player::rewind::{
    ClockAdapter, RewindConfig, RewindController, Scheduler, SeekCommand, TimerCallback,
};

#[derive(Default)]
pub struct RecordingClock {
    seeks: Mutex<Vec<SeekCommand>>,
}

impl RecordingClock {
    pub fn seeks(&self) -> Vec<SeekCommand> {
        self.seeks.lock().unwrap().clone()
    }

    pub fn targets(&self) -> Vec<f64> {
        self.seeks().iter().map(|s| s.target_time_ms).collect()
    }
}

impl ClockAdapter for RecordingClock {
    fn seek(&self, command: SeekCommand) {
        self.seeks.lock().unwrap().push(command);
    }
}

#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<(Duration, TimerCallback)>>,
}

impl ManualScheduler {
    /// Run every pending callback, as if all delays elapsed
    pub fn fire_all(&self) -> usize {
        let pending: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        let count = pending.len();
        for (_, callback) in pending {
            callback();
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) {
        self.pending.lock().unwrap().push((delay, callback));
    }
}

pub type ManualController = RewindController<Arc<RecordingClock>, Arc<ManualScheduler>>;

/// Controller wired to a recording clock and a manual scheduler
pub fn manual_controller(
    rewind_seconds: f64,
    grace_seconds: f64,
) -> (ManualController, Arc<RecordingClock>, Arc<ManualScheduler>) {
    let clock = Arc::new(RecordingClock::default());
    let scheduler = Arc::new(ManualScheduler::default());
    let config = RewindConfig::new(rewind_seconds, grace_seconds).unwrap();
    let controller = RewindController::new(config, clock.clone(), scheduler.clone());
    (controller, clock, scheduler)
}
