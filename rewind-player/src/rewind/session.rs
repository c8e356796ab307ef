//! Rewind session: the ordered event loop around one controller
//!
//! The host publishes `GameplayInput`s on a channel in the order they happen.
//! The session applies them one at a time, so a frame's tick is always seen
//! before the score notification that follows it.

use rewind_common::config::{RewindSection, TriggerMode};
use rewind_common::events::{EventBus, HitEvent, RewindEvent};
use rewind_common::time::{self, millis_to_duration};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use super::clock::{ClockAdapter, Scheduler};
use super::config::RewindConfig;
use super::controller::RewindController;
use super::detector::{ComboResetDetector, MissDetector};
use super::state::{ControllerState, MissOutcome};
use crate::error::Result;

/// One notification from the gameplay host
#[derive(Debug, Clone, PartialEq)]
pub enum GameplayInput {
    /// Playback clock sample for this frame
    Tick { time_ms: f64 },

    /// The score processor changed; carries the newest history entry
    ///
    /// Sent for every change, including re-scoring after a seek where the
    /// newest entry may be unchanged.
    ScoreChanged { latest: Option<HitEvent> },

    /// The combo counter changed
    ComboChanged { combo: u32 },
}

/// Totals reported when a session ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub misses_seen: u64,
    pub rewinds_issued: u64,
    pub suppressed_debounce: u64,
    pub suppressed_invulnerable: u64,
    pub final_time_ms: f64,
}

/// Detector + controller pair driven by ordered gameplay input
pub struct RewindSession<C, S> {
    controller: RewindController<C, S>,
    trigger: TriggerMode,
    detector: MissDetector,
    combo_reset: ComboResetDetector,
}

impl<C, S> RewindSession<C, S>
where
    C: ClockAdapter + 'static,
    S: Scheduler + 'static,
{
    pub fn new(controller: RewindController<C, S>, trigger: TriggerMode) -> Self {
        Self {
            controller,
            trigger,
            detector: MissDetector::new(),
            combo_reset: ComboResetDetector::new(),
        }
    }

    /// Build controller and session from the `[rewind]` config section
    pub fn from_section(
        section: &RewindSection,
        clock: C,
        scheduler: S,
        events: EventBus,
    ) -> Result<Self> {
        section.validate()?;
        let config = RewindConfig::from_section(section)?;
        let controller = RewindController::new(config, clock, scheduler)
            .with_debounce(millis_to_duration(section.debounce_ms))
            .with_event_bus(events);
        Ok(Self::new(controller, section.trigger))
    }

    /// Replace the combo-break predicate
    pub fn with_detector(mut self, detector: MissDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Apply one input; returns the outcome if it produced a miss signal
    pub fn handle(&mut self, input: GameplayInput) -> Option<MissOutcome> {
        match input {
            GameplayInput::Tick { time_ms } => {
                self.controller.on_tick(time_ms);
                None
            }
            GameplayInput::ScoreChanged { latest } => {
                let missed = self.trigger == TriggerMode::ComboBreak
                    && self.detector.evaluate_latest(latest.as_ref());
                missed.then(|| self.controller.on_miss())
            }
            GameplayInput::ComboChanged { combo } => {
                // Always fed so the transition tracking stays current
                let dropped = self.combo_reset.on_combo(combo);
                (self.trigger == TriggerMode::ComboReset && dropped)
                    .then(|| self.controller.on_miss())
            }
        }
    }

    pub fn start(&self) {
        let config = self.controller.config();
        info!(
            "Rewind session {} started: rewind {}s, grace {}s, trigger {}",
            self.controller.session_id(),
            config.rewind_seconds(),
            config.grace_seconds(),
            self.trigger
        );
        if let Some(events) = self.controller.event_bus() {
            debug!("Publishing rewind events to {} subscribers", events.subscriber_count());
            events.emit_lossy(RewindEvent::SessionStarted {
                session_id: self.controller.session_id(),
                rewind_seconds: config.rewind_seconds(),
                grace_seconds: config.grace_seconds(),
                timestamp: time::now(),
            });
        }
    }

    /// End the session and report totals
    ///
    /// Drops the controller; a debounce release still pending becomes a no-op.
    pub fn finish(self) -> SessionSummary {
        let summary = self.summary();
        info!(
            "Rewind session {} ended: {} misses, {} rewinds",
            summary.session_id, summary.misses_seen, summary.rewinds_issued
        );
        if let Some(events) = self.controller.event_bus() {
            events.emit_lossy(RewindEvent::SessionEnded {
                session_id: summary.session_id,
                misses_seen: summary.misses_seen,
                rewinds_issued: summary.rewinds_issued,
                timestamp: time::now(),
            });
        }
        summary
    }

    /// Consume inputs until every sender is dropped
    pub async fn run(mut self, mut rx: mpsc::Receiver<GameplayInput>) -> SessionSummary {
        self.start();
        while let Some(input) = rx.recv().await {
            if let Some(outcome) = self.handle(input) {
                debug!("Miss outcome: {:?}", outcome);
            }
        }
        self.finish()
    }

    /// Spawn `run` on the current runtime
    ///
    /// Returns the input sender and a handle resolving to the summary once the
    /// sender (and all its clones) are dropped.
    pub fn spawn(self, capacity: usize) -> (mpsc::Sender<GameplayInput>, JoinHandle<SessionSummary>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(self.run(rx));
        (tx, handle)
    }

    pub fn summary(&self) -> SessionSummary {
        let stats = self.controller.stats();
        SessionSummary {
            session_id: self.controller.session_id(),
            misses_seen: stats.misses_seen,
            rewinds_issued: stats.rewinds_issued,
            suppressed_debounce: stats.suppressed_debounce,
            suppressed_invulnerable: stats.suppressed_invulnerable,
            final_time_ms: self.controller.state().current_time_ms,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    pub fn controller(&self) -> &RewindController<C, S> {
        &self.controller
    }

    pub fn trigger(&self) -> TriggerMode {
        self.trigger
    }
}
