//! Playback simulator
//!
//! Drives a `RewindSession` with a scripted player on a fixed-rate frame
//! loop. Each frame:
//! 1. Complete a queued seek once its latency has elapsed, undo the judged
//!    history past the target and re-publish the score (the re-scoring that
//!    can re-trigger a miss).
//! 2. Otherwise advance the clock and publish the tick.
//! 3. Judge objects the clock passed and publish score and combo changes.
//!
//! Frames run on tokio time while the debounce release runs on its own timer
//! task, so both race exactly as they would in a game.

pub mod chart;
pub mod clock;
pub mod playfield;

pub use chart::{Chart, ScriptedMiss};
pub use clock::SimulatedClock;
pub use playfield::{Judgement, Playfield};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::rewind::{GameplayInput, RewindSession, Scheduler, SeekCommand, SessionSummary};

/// Frame loop parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    /// Real time between frames
    pub frame_ms: u64,

    /// Gameplay milliseconds advanced per real millisecond
    pub rate: f64,

    /// Frames between a seek request and its completion
    pub seek_latency_frames: u32,

    /// Hard stop, in frames
    pub max_frames: u64,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            rate: 1.0,
            seek_latency_frames: 2,
            max_frames: 1_000_000,
        }
    }
}

/// Outcome of a simulated play
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub summary: SessionSummary,
    pub seeks: Vec<SeekCommand>,
    pub frames: u64,
    /// Every object judged and no seek outstanding
    pub completed: bool,
    pub final_combo: u32,
    pub max_combo: u32,
    /// Combo-breaking judgements left in the final history
    pub misses_in_history: usize,
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Session:        {}", self.summary.session_id)?;
        writeln!(f, "Completed:      {}", self.completed)?;
        writeln!(f, "Frames:         {}", self.frames)?;
        writeln!(f, "Misses seen:    {}", self.summary.misses_seen)?;
        writeln!(f, "Rewinds:        {}", self.summary.rewinds_issued)?;
        writeln!(
            f,
            "Suppressed:     {} (debounce), {} (invulnerable)",
            self.summary.suppressed_debounce, self.summary.suppressed_invulnerable
        )?;
        writeln!(f, "Final combo:    {} (max {})", self.final_combo, self.max_combo)?;
        write!(f, "Misses kept:    {}", self.misses_in_history)
    }
}

/// Run `chart` to completion against `session`
///
/// `clock` must be the adapter the session's controller seeks through.
pub async fn run<S>(
    chart: &Chart,
    mut session: RewindSession<SimulatedClock, S>,
    clock: SimulatedClock,
    options: &SimulationOptions,
) -> SimulationReport
where
    S: Scheduler + 'static,
{
    let frame_ms = options.frame_ms.max(1);
    let advance_ms = frame_ms as f64 * options.rate;
    let end_ms = chart.end_time_ms();

    let mut playfield = Playfield::new(chart);
    let mut position_ms = 0.0;
    let mut in_flight: Option<(SeekCommand, u32)> = None;
    let mut frames = 0u64;
    let mut completed = false;

    let mut interval = tokio::time::interval(Duration::from_millis(frame_ms));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    session.start();
    info!(
        "Simulating {} objects ({}ms of gameplay) at {}x",
        chart.objects.len(),
        end_ms,
        options.rate
    );

    while frames < options.max_frames {
        interval.tick().await;
        frames += 1;

        // A newer request supersedes one still in flight
        if let Some(command) = clock.take_pending_seek() {
            in_flight = Some((command, options.seek_latency_frames));
        }

        match in_flight {
            Some((command, 0)) => {
                in_flight = None;
                position_ms = command.target_time_ms;
                playfield.rewind_to(position_ms);
                debug!(
                    "Seek to {}ms completed, {} judgements kept",
                    position_ms,
                    playfield.history().len()
                );

                session.handle(GameplayInput::Tick {
                    time_ms: position_ms,
                });
                session.handle(GameplayInput::ScoreChanged {
                    latest: playfield.latest(),
                });
                session.handle(GameplayInput::ComboChanged {
                    combo: playfield.combo(),
                });
                continue;
            }
            Some((command, frames_left)) => in_flight = Some((command, frames_left - 1)),
            None => {}
        }

        position_ms += advance_ms;
        session.handle(GameplayInput::Tick {
            time_ms: position_ms,
        });

        for judgement in playfield.judge_until(position_ms) {
            session.handle(GameplayInput::ScoreChanged {
                latest: Some(judgement.hit),
            });
            session.handle(GameplayInput::ComboChanged {
                combo: judgement.combo,
            });
        }

        if playfield.is_complete() && in_flight.is_none() && !clock.has_pending_seek() {
            completed = true;
            break;
        }
    }

    if !completed {
        warn!("Simulation stopped after {} frames without finishing", frames);
    }

    let report = SimulationReport {
        summary: session.finish(),
        seeks: clock.seek_log(),
        frames,
        completed,
        final_combo: playfield.combo(),
        max_combo: playfield.max_combo(),
        misses_in_history: playfield.miss_count(),
    };

    info!(
        "Simulation finished after {} frames: {} rewinds, final combo {}",
        report.frames, report.summary.rewinds_issued, report.final_combo
    );

    report
}
