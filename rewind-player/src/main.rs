//! Practice rewind player (rewind-player) - Main entry point
//!
//! Runs a practice chart against the rewind controller with a scripted
//! player and prints what the controller did.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rewind_common::config::{self, TriggerMode};
use rewind_common::events::{EventBus, RewindEvent};
use rewind_common::params::{SettingMetadata, GRACE_SECONDS, REWIND_SECONDS};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use rewind_player::practice::{GameMod, PracticeMod};
use rewind_player::rewind::{RewindSession, TokioScheduler};
use rewind_player::sim::{self, Chart, ScriptedMiss, SimulatedClock, SimulationOptions};

/// Command-line arguments for rewind-player
#[derive(Parser, Debug)]
#[command(name = "rewind-player")]
#[command(about = "Rewind-on-miss practice simulator")]
#[command(version)]
struct Args {
    /// Config file (TOML)
    #[arg(short, long, env = "REWIND_CONFIG")]
    config: Option<PathBuf>,

    /// Seconds to rewind on a miss [1, 10]
    #[arg(long, value_parser = parse_rewind_seconds)]
    rewind_seconds: Option<f64>,

    /// Seconds of invulnerability after a rewind [1, 10]
    #[arg(long, value_parser = parse_grace_seconds)]
    grace_seconds: Option<f64>,

    /// Debounce delay after a rewind (real milliseconds)
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Miss trigger: combo-break or combo-reset
    #[arg(long, value_parser = parse_trigger)]
    trigger: Option<TriggerMode>,

    /// Chart file (TOML); generated from --objects/--interval-ms when absent
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Number of generated objects
    #[arg(long, default_value = "100")]
    objects: usize,

    /// Spacing of generated objects (milliseconds)
    #[arg(long, default_value = "400")]
    interval_ms: f64,

    /// Time of the first generated object (milliseconds)
    #[arg(long, default_value = "1000")]
    offset_ms: f64,

    /// Scripted miss INDEX[:TIMES], repeatable
    #[arg(long = "miss", value_parser = parse_miss)]
    misses: Vec<ScriptedMiss>,

    /// Other active mods, comma separated acronyms (e.g. "HD,HR")
    #[arg(long, default_value = "")]
    mods: String,

    /// Gameplay speed relative to real time
    #[arg(long, default_value = "1.0")]
    rate: f64,

    /// Frames a seek takes to complete
    #[arg(long, default_value = "2")]
    seek_latency_frames: u32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn crate_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("rewind_player={level},rewind_common={level}"))
}

fn parse_setting(key: &str, raw: &str) -> std::result::Result<f64, String> {
    SettingMetadata::require(key)
        .and_then(|meta| meta.parse(raw))
        .map_err(|e| e.to_string())
}

fn parse_rewind_seconds(s: &str) -> std::result::Result<f64, String> {
    parse_setting(REWIND_SECONDS, s)
}

fn parse_grace_seconds(s: &str) -> std::result::Result<f64, String> {
    parse_setting(GRACE_SECONDS, s)
}

fn parse_trigger(s: &str) -> std::result::Result<TriggerMode, String> {
    match s.replace('-', "_").as_str() {
        "combo_break" => Ok(TriggerMode::ComboBreak),
        "combo_reset" => Ok(TriggerMode::ComboReset),
        other => Err(format!("unknown trigger '{}'", other)),
    }
}

fn parse_miss(s: &str) -> std::result::Result<ScriptedMiss, String> {
    ScriptedMiss::parse(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing before anything logs; the filter is swapped once the
    // config file has been read
    let env_filter = EnvFilter::try_from_default_env();
    let level_from_env = env_filter.is_ok();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|_| crate_filter("info")));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut toml_config =
        config::load_or_default(args.config.as_deref()).context("Failed to load configuration")?;

    // RUST_LOG wins over the config file
    if !level_from_env {
        filter_handle
            .reload(crate_filter(&toml_config.logging.level))
            .context("Failed to apply log level")?;
    }

    if let Some(v) = args.rewind_seconds {
        toml_config.rewind.rewind_seconds = v;
    }
    if let Some(v) = args.grace_seconds {
        toml_config.rewind.grace_seconds = v;
    }
    if let Some(v) = args.debounce_ms {
        toml_config.rewind.debounce_ms = v;
    }
    if let Some(v) = args.trigger {
        toml_config.rewind.trigger = v;
    }
    toml_config.validate().context("Invalid rewind settings")?;
    anyhow::ensure!(
        args.rate.is_finite() && args.rate > 0.0,
        "rate must be a positive number, got {}",
        args.rate
    );

    let mut active_mods: Vec<GameMod> = PracticeMod::parse_mods(&args.mods)?;
    PracticeMod::check_compatibility(&active_mods)
        .with_context(|| format!("{} cannot be combined with the selected mods", PracticeMod::NAME))?;
    active_mods.retain(|m| *m != GameMod::Practice);
    active_mods.push(GameMod::Practice);
    info!(
        "Mods: {}",
        active_mods.iter().map(|m| m.acronym()).collect::<Vec<_>>().join(",")
    );

    let chart = match &args.chart {
        Some(path) => {
            let mut chart = Chart::load(path)
                .with_context(|| format!("Failed to load chart {}", path.display()))?;
            chart.misses.extend(args.misses.iter().copied());
            chart
        }
        None => Chart::generate(args.objects, args.interval_ms, args.offset_ms)
            .with_misses(args.misses.clone()),
    };
    chart.validate().context("Invalid chart")?;

    let events = EventBus::new(1000);
    spawn_event_logger(&events);

    let clock = SimulatedClock::new();
    let scheduler = TokioScheduler::current()?;
    let session =
        RewindSession::from_section(&toml_config.rewind, clock.clone(), scheduler, events)?;

    let options = SimulationOptions {
        frame_ms: toml_config.simulation.frame_ms,
        rate: args.rate,
        seek_latency_frames: args.seek_latency_frames,
        ..SimulationOptions::default()
    };

    let report = sim::run(&chart, session, clock, &options).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}

/// Log every rewind event as JSON at debug level
fn spawn_event_logger(events: &EventBus) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => warn!("Event logger lagged, skipped {}", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn log_event(event: &RewindEvent) {
    match serde_json::to_string(event) {
        Ok(json) => debug!("Event: {}", json),
        Err(e) => warn!("Failed to serialize event: {}", e),
    }
}
