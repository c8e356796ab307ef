//! Rewind controller state machine
//!
//! # Ingress contract
//!
//! The host calls `on_tick` once per frame with the playback clock position
//! and `on_miss` once per detected combo break. Within a frame the tick must
//! be delivered before any miss: the acceptance test reads the position set
//! by the most recent tick.
//!
//! # Concurrency
//!
//! `on_tick` and `on_miss` take `&mut self` and run on the host's gameplay
//! timeline. The debounce release runs on the scheduler's context and only
//! ever clears the shared `AtomicBool`; every other field has a single writer.
//! The release callback holds a `Weak` to the flag, so firing after the
//! controller is dropped does nothing.
//!
//! # Known weakness
//!
//! The debounce window is a fixed real-time delay, not an acknowledgement
//! of seek completion. If a seek (and the re-scoring it triggers) takes
//! longer than the delay, a stale miss can cause a second rewind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use rewind_common::config::DEFAULT_DEBOUNCE_MS;
use rewind_common::events::{EventBus, RewindEvent, SuppressReason};
use rewind_common::time;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::clock::{ClockAdapter, Scheduler, SeekCommand};
use super::config::RewindConfig;
use super::state::{ControllerState, ControllerStats, MissOutcome, Phase};

/// Default debounce delay
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

/// Rewinds the playback clock on accepted misses
///
/// One controller per gameplay session. See module docs for the ingress
/// ordering contract.
pub struct RewindController<C, S> {
    session_id: Uuid,
    config: RewindConfig,
    debounce_delay: Duration,

    current_time_ms: f64,
    invulnerable_until_ms: f64,

    /// Set by `on_miss`, cleared by the scheduled release
    debounce_active: Arc<AtomicBool>,

    clock: C,
    scheduler: S,
    events: Option<EventBus>,
    stats: ControllerStats,
}

impl<C: ClockAdapter, S: Scheduler> RewindController<C, S> {
    /// Create a controller in the Idle, vulnerable state at time zero
    pub fn new(config: RewindConfig, clock: C, scheduler: S) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            config,
            debounce_delay: DEFAULT_DEBOUNCE,
            current_time_ms: 0.0,
            invulnerable_until_ms: 0.0,
            debounce_active: Arc::new(AtomicBool::new(false)),
            clock,
            scheduler,
            events: None,
            stats: ControllerStats::default(),
        }
    }

    /// Override the debounce delay
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Publish `SeekIssued` / `MissSuppressed` / `DebounceReleased` on this bus
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Record the latest playback clock sample
    ///
    /// Backward jumps are expected (they follow every rewind). Non-finite
    /// samples are dropped.
    pub fn on_tick(&mut self, current_time_ms: f64) {
        if !current_time_ms.is_finite() {
            warn!("Ignoring non-finite clock sample: {}", current_time_ms);
            return;
        }

        trace!("Tick: {}ms", current_time_ms);
        self.current_time_ms = current_time_ms;
    }

    /// Handle one combo-break signal
    ///
    /// Accepted only while Idle and at or past the end of the invulnerability
    /// window. An accepted miss seeks `rewind_seconds` back (floored at zero),
    /// extends invulnerability to `grace_seconds` past the target, and opens
    /// the debounce window.
    pub fn on_miss(&mut self) -> MissOutcome {
        self.stats.misses_seen += 1;

        if self.debounce_active.load(Ordering::Acquire) {
            return self.suppress(SuppressReason::Debounce);
        }

        if self.current_time_ms < self.invulnerable_until_ms {
            return self.suppress(SuppressReason::Invulnerable);
        }

        let target = self.current_time_ms - self.config.rewind_ms();
        let command = if target >= 0.0 {
            self.invulnerable_until_ms = target + self.config.grace_ms();
            SeekCommand {
                target_time_ms: target,
            }
        } else {
            self.invulnerable_until_ms = self.config.grace_ms();
            SeekCommand { target_time_ms: 0.0 }
        };

        // Open the window before seeking so a synchronous re-score is ignored
        self.debounce_active.store(true, Ordering::Release);

        debug!(
            "Miss accepted at {}ms: seeking to {}ms, invulnerable until {}ms",
            self.current_time_ms, command.target_time_ms, self.invulnerable_until_ms
        );

        self.clock.seek(command);
        self.stats.rewinds_issued += 1;

        if let Some(events) = &self.events {
            events.emit_lossy(RewindEvent::SeekIssued {
                session_id: self.session_id,
                from_time_ms: self.current_time_ms,
                target_time_ms: command.target_time_ms,
                invulnerable_until_ms: self.invulnerable_until_ms,
                timestamp: time::now(),
            });
        }

        self.schedule_release();

        MissOutcome::Rewound(command)
    }

    fn suppress(&mut self, reason: SuppressReason) -> MissOutcome {
        match reason {
            SuppressReason::Debounce => self.stats.suppressed_debounce += 1,
            SuppressReason::Invulnerable => self.stats.suppressed_invulnerable += 1,
        }

        debug!(
            "Miss at {}ms suppressed ({}), invulnerable until {}ms",
            self.current_time_ms, reason, self.invulnerable_until_ms
        );

        if let Some(events) = &self.events {
            events.emit_lossy(RewindEvent::MissSuppressed {
                session_id: self.session_id,
                reason,
                current_time_ms: self.current_time_ms,
                timestamp: time::now(),
            });
        }

        MissOutcome::Suppressed(reason)
    }

    fn schedule_release(&self) {
        let flag: Weak<AtomicBool> = Arc::downgrade(&self.debounce_active);
        let events = self.events.clone();
        let session_id = self.session_id;

        self.scheduler.schedule_after(
            self.debounce_delay,
            Box::new(move || {
                let Some(flag) = flag.upgrade() else {
                    trace!("Debounce release for ended session {}", session_id);
                    return;
                };

                flag.store(false, Ordering::Release);
                debug!("Debounce window closed");

                if let Some(events) = events {
                    events.emit_lossy(RewindEvent::DebounceReleased {
                        session_id,
                        timestamp: time::now(),
                    });
                }
            }),
        );
    }

    /// Snapshot of the mutable state
    pub fn state(&self) -> ControllerState {
        ControllerState {
            current_time_ms: self.current_time_ms,
            invulnerable_until_ms: self.invulnerable_until_ms,
            debounce_active: self.debounce_active.load(Ordering::Acquire),
        }
    }

    pub fn phase(&self) -> Phase {
        self.state().phase()
    }

    pub fn is_invulnerable(&self) -> bool {
        self.current_time_ms < self.invulnerable_until_ms
    }

    pub fn config(&self) -> &RewindConfig {
        &self.config
    }

    pub fn debounce_delay(&self) -> Duration {
        self.debounce_delay
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn event_bus(&self) -> Option<&EventBus> {
        self.events.as_ref()
    }
}
