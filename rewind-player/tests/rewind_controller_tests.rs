//! Rewind controller integration tests
//!
//! Covers tick tracking, rewind arithmetic, the zero floor, invulnerability
//! and debounce suppression, and construction-time validation. Debounce
//! timing runs on tokio's paused clock.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use rewind_common::events::SuppressReason;
use rewind_common::ConfigError;
use rewind_player::rewind::{
    MissOutcome, Phase, RewindConfig, RewindController, SeekCommand, TokioScheduler,
};

use helpers::{manual_controller, RecordingClock};

#[test]
fn test_tick_sequence_keeps_latest_value() {
    let (mut ctl, _, _) = manual_controller(3.0, 1.5);
    let mut t = 0.0;
    for step in [16.0, 17.0, 16.5, 0.0, 33.3, 16.7] {
        t += step;
        ctl.on_tick(t);
        assert_eq!(ctl.state().current_time_ms, t);
    }
}

#[test]
fn test_tick_accepts_backward_jump_after_seek() {
    let (mut ctl, _, _) = manual_controller(3.0, 1.5);
    ctl.on_tick(10_000.0);
    ctl.on_miss();
    ctl.on_tick(7_000.0);
    assert_eq!(ctl.state().current_time_ms, 7_000.0);
}

#[test]
fn test_rewind_arithmetic() {
    let (mut ctl, clock, _) = manual_controller(3.0, 1.5);
    ctl.on_tick(10_000.0);

    assert_eq!(
        ctl.on_miss(),
        MissOutcome::Rewound(SeekCommand {
            target_time_ms: 7_000.0
        })
    );
    assert_eq!(ctl.state().invulnerable_until_ms, 7_000.0 + 1_500.0);
    assert_eq!(clock.targets(), vec![7_000.0]);
}

#[test]
fn test_rewind_arithmetic_other_grace() {
    let (mut ctl, clock, _) = manual_controller(3.0, 4.2);
    ctl.on_tick(10_000.0);
    ctl.on_miss();
    assert_eq!(ctl.state().invulnerable_until_ms, 7_000.0 + 4_200.0);
    assert_eq!(clock.targets(), vec![7_000.0]);
}

#[test]
fn test_floor_clamp() {
    let (mut ctl, clock, _) = manual_controller(3.0, 1.5);
    ctl.on_tick(1_000.0);

    assert_eq!(
        ctl.on_miss(),
        MissOutcome::Rewound(SeekCommand { target_time_ms: 0.0 })
    );
    assert_eq!(ctl.state().invulnerable_until_ms, 1_500.0);
    assert_eq!(clock.targets(), vec![0.0]);
}

#[test]
fn test_invulnerability_suppression() {
    let (mut ctl, clock, scheduler) = manual_controller(3.0, 1.5);
    ctl.on_tick(10_000.0);
    ctl.on_miss();
    scheduler.fire_all();

    for t in [7_000.0, 7_800.0, 8_499.9] {
        ctl.on_tick(t);
        let before = ctl.state();
        assert_eq!(
            ctl.on_miss(),
            MissOutcome::Suppressed(SuppressReason::Invulnerable)
        );
        assert_eq!(ctl.state(), before);
    }

    assert_eq!(clock.seeks().len(), 1);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn test_debounce_suppression_manual() {
    let (mut ctl, clock, scheduler) = manual_controller(3.0, 1.5);
    ctl.on_tick(10_000.0);
    ctl.on_miss();

    ctl.on_tick(10_010.0);
    assert_eq!(
        ctl.on_miss(),
        MissOutcome::Suppressed(SuppressReason::Debounce)
    );
    assert_eq!(clock.seeks().len(), 1);
    assert_eq!(scheduler.pending(), 1);

    assert_eq!(scheduler.fire_all(), 1);
    assert_eq!(ctl.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_debounce_window_on_tokio_timer() {
    let clock = Arc::new(RecordingClock::default());
    let scheduler = TokioScheduler::current().unwrap();
    let config = RewindConfig::new(3.0, 1.5).unwrap();
    let mut ctl = RewindController::new(config, clock.clone(), scheduler);

    ctl.on_tick(10_000.0);
    assert!(ctl.on_miss().seek().is_some());

    // Second miss 10ms later, clock not yet moved
    tokio::time::sleep(Duration::from_millis(10)).await;
    ctl.on_tick(10_010.0);
    assert_eq!(
        ctl.on_miss(),
        MissOutcome::Suppressed(SuppressReason::Debounce)
    );
    assert_eq!(clock.seeks().len(), 1);

    // Still inside the window just before 500ms
    tokio::time::sleep(Duration::from_millis(480)).await;
    assert_eq!(ctl.phase(), Phase::Rewinding);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(ctl.phase(), Phase::Idle);

    // Seek landed at 7000; a miss past 8500 rewinds again
    ctl.on_tick(8_600.0);
    assert_eq!(
        ctl.on_miss().seek(),
        Some(SeekCommand {
            target_time_ms: 5_600.0
        })
    );
    assert_eq!(clock.targets(), vec![7_000.0, 5_600.0]);
}

#[tokio::test(start_paused = true)]
async fn test_custom_debounce_delay() {
    let clock = Arc::new(RecordingClock::default());
    let mut ctl = RewindController::new(
        RewindConfig::default(),
        clock.clone(),
        TokioScheduler::current().unwrap(),
    )
    .with_debounce(Duration::from_millis(100));

    ctl.on_tick(5_000.0);
    ctl.on_miss();
    tokio::time::sleep(Duration::from_millis(101)).await;
    assert_eq!(ctl.phase(), Phase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_release_after_session_end_is_noop() {
    let clock = Arc::new(RecordingClock::default());
    let mut ctl = RewindController::new(
        RewindConfig::default(),
        clock.clone(),
        TokioScheduler::current().unwrap(),
    );
    ctl.on_tick(5_000.0);
    ctl.on_miss();
    drop(ctl);

    // Timer fires into a dropped controller
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(clock.seeks().len(), 1);
}

#[test]
fn test_rapid_miss_burst_yields_one_seek() {
    let (mut ctl, clock, _) = manual_controller(2.0, 1.0);
    ctl.on_tick(20_000.0);
    for i in 0..10 {
        ctl.on_tick(20_000.0 + i as f64);
        ctl.on_miss();
    }
    assert_eq!(clock.targets(), vec![18_000.0]);
    assert_eq!(ctl.stats().rewinds_issued, 1);
    assert_eq!(ctl.stats().suppressed_debounce, 9);
}

#[test]
fn test_construction_validation() {
    assert!(matches!(
        RewindConfig::new(0.5, 1.5),
        Err(ConfigError::OutOfRange { .. })
    ));

    let config = RewindConfig::new(3.0, 1.5).unwrap();
    assert_eq!(config.rewind_seconds(), 3.0);
    assert_eq!(config.grace_seconds(), 1.5);

    // Controller exposes the config read-only
    let ctl = RewindController::new(
        config,
        Arc::new(RecordingClock::default()),
        Arc::new(helpers::ManualScheduler::default()),
    );
    assert_eq!(*ctl.config(), config);
}
