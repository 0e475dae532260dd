//! Run command - simulate a playback session against a cue sheet.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use admarkers::cuesheet::{self, CueMarker};
use admarkers::engine::{AdEngine, AdEngineConfig, MarkerEngine, MarkerEngineConfig};
use clap::Args;
use tracing::debug;

use crate::error::CliError;
use crate::sim::{describe, ConsoleRenderer, SharedClock, SimClock};

/// A scripted seek: once the simulated clock reaches `at`, jump to `to`.
#[derive(Debug, Clone, Copy)]
pub struct Seek {
    pub at: f64,
    pub to: f64,
}

fn parse_seek(s: &str) -> Result<Seek, String> {
    let (at, to) = s
        .split_once(':')
        .ok_or_else(|| format!("expected AT:TO, got '{s}'"))?;
    let at: f64 = at.parse().map_err(|_| format!("invalid seek time '{at}'"))?;
    let to: f64 = to.parse().map_err(|_| format!("invalid seek target '{to}'"))?;
    Ok(Seek { at, to })
}

/// Arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path to the JSON cue sheet
    pub cuesheet: PathBuf,

    /// Total media duration in seconds
    #[arg(long)]
    pub duration: f64,

    /// Clock tick interval in milliseconds
    #[arg(long, default_value_t = 250)]
    pub tick: u64,

    /// Simulated playback seconds advanced per wall-clock second
    #[arg(long, default_value_t = 1.0)]
    pub rate: f64,

    /// Seek directive AT:TO (jump to TO once the clock reaches AT); repeatable
    #[arg(long = "seek", value_parser = parse_seek)]
    pub seeks: Vec<Seek>,

    /// Drive the two-phase ad scheduler instead of reached events
    #[arg(long)]
    pub ads: bool,

    /// Simulated ad playback length in seconds (with --ads)
    #[arg(long, default_value_t = 4.0)]
    pub ad_duration: f64,
}

/// Run the simulation.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    if !args.duration.is_finite() || args.duration <= 0.0 {
        return Err(CliError::InvalidArgument(
            "duration must be a positive number of seconds".to_string(),
        ));
    }
    if args.tick == 0 {
        return Err(CliError::InvalidArgument(
            "tick must be at least 1 millisecond".to_string(),
        ));
    }

    let cues = cuesheet::load(&args.cuesheet)?;

    println!("AdMarkers Playback Simulator v{}", admarkers::VERSION);
    println!("==================================");
    println!();
    println!("Cue sheet: {} ({} cues)", args.cuesheet.display(), cues.len());
    println!(
        "Duration:  {}s, tick {}ms, rate {}x{}",
        args.duration,
        args.tick,
        args.rate,
        if args.ads { ", ad scheduling" } else { "" }
    );
    println!();

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .map_err(|e| CliError::Signal(e.to_string()))?;
    }

    if args.ads {
        run_ad_session(&args, cues, &running)
    } else {
        run_reached_session(&args, cues, &running)
    }
}

/// Print reached events as the clock crosses marker intervals.
fn run_reached_session(
    args: &RunArgs,
    cues: Vec<CueMarker>,
    running: &AtomicBool,
) -> Result<(), CliError> {
    let clock = SimClock::new(args.duration);
    let stamp = Arc::clone(&clock);
    let config = MarkerEngineConfig::new(|c: &CueMarker| c.time)
        .with_markers(cues)
        .with_on_marker_reached(move |marker| {
            println!("[{:>7.2}s] reached {}", stamp.time(), describe(marker.payload()));
        });
    let mut engine = MarkerEngine::new(
        SharedClock(Arc::clone(&clock)),
        ConsoleRenderer::new(),
        config,
    );
    engine.handle_metadata_ready();
    debug!(seeks = args.seeks.len(), "reached-event simulation starting");

    let tick = Duration::from_millis(args.tick);
    let step = args.rate * tick.as_secs_f64();
    let mut seeks = sorted_seeks(args);
    let mut t = 0.0;

    while running.load(Ordering::SeqCst) && t < args.duration {
        thread::sleep(tick);
        t = advance(t, step, &mut seeks, args.duration);
        clock.set_time(t);
        engine.handle_time_update();
    }

    engine.destroy();
    println!();
    println!("Session ended at {:.2}s", t);
    Ok(())
}

/// Drive the prepare/fire protocol, with a fired ad occupying the clock
/// for `--ad-duration` simulated seconds before completion.
fn run_ad_session(
    args: &RunArgs,
    cues: Vec<CueMarker>,
    running: &AtomicBool,
) -> Result<(), CliError> {
    let clock = SimClock::new(args.duration);
    let prepare_stamp = Arc::clone(&clock);
    let play_stamp = Arc::clone(&clock);
    let config = AdEngineConfig::new(|c: &CueMarker| c.time)
        .with_markers(cues)
        .with_prepare_next_ad(move |marker| {
            println!(
                "[{:>7.2}s] prepare {}",
                prepare_stamp.time(),
                describe(marker.payload())
            );
        })
        .with_play_ad(move |marker| {
            println!(
                "[{:>7.2}s] play    {}",
                play_stamp.time(),
                describe(marker.payload())
            );
        });
    let mut engine = AdEngine::new(
        SharedClock(Arc::clone(&clock)),
        ConsoleRenderer::new(),
        config,
    );
    engine.handle_metadata_ready();
    debug!(seeks = args.seeks.len(), "ad-scheduling simulation starting");

    let tick = Duration::from_millis(args.tick);
    let step = args.rate * tick.as_secs_f64();
    let mut seeks = sorted_seeks(args);
    let mut t = 0.0;
    let mut ad_remaining = 0.0;

    while running.load(Ordering::SeqCst) && t < args.duration {
        thread::sleep(tick);

        if engine.ad_active() {
            // Inserted content occupies playback; the content clock holds.
            ad_remaining -= step;
            if ad_remaining <= 0.0 {
                println!("[{:>7.2}s] ad finished, resuming content", t);
                engine.set_ad_active(false);
            }
            continue;
        }

        t = advance(t, step, &mut seeks, args.duration);
        clock.set_time(t);
        engine.handle_time_update();
        if engine.ad_active() {
            ad_remaining = args.ad_duration;
        }
    }

    engine.destroy();
    println!();
    println!("Session ended at {:.2}s", t);
    Ok(())
}

fn sorted_seeks(args: &RunArgs) -> Vec<Seek> {
    let mut seeks = args.seeks.clone();
    seeks.sort_by(|a, b| a.at.total_cmp(&b.at));
    seeks
}

/// Advance the simulated clock one step, applying at most one due seek.
fn advance(t: f64, step: f64, seeks: &mut Vec<Seek>, duration: f64) -> f64 {
    let mut t = t + step;
    if let Some(position) = seeks.iter().position(|s| t >= s.at) {
        let seek = seeks.remove(position);
        println!("[{:>7.2}s] seek -> {}s", t, seek.to);
        t = seek.to;
    }
    t.min(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seek() {
        let seek = parse_seek("25:10.5").unwrap();
        assert_eq!(seek.at, 25.0);
        assert_eq!(seek.to, 10.5);
    }

    #[test]
    fn test_parse_seek_rejects_garbage() {
        assert!(parse_seek("25").is_err());
        assert!(parse_seek("a:b").is_err());
    }

    #[test]
    fn test_advance_applies_due_seek_once() {
        let mut seeks = vec![Seek { at: 5.0, to: 2.0 }];
        let t = advance(4.8, 0.5, &mut seeks, 100.0);
        assert_eq!(t, 2.0);
        assert!(seeks.is_empty());
        // No seek left; plain step.
        assert_eq!(advance(t, 0.5, &mut seeks, 100.0), 2.5);
    }

    #[test]
    fn test_advance_clamps_to_duration() {
        let mut seeks = Vec::new();
        assert_eq!(advance(99.9, 0.5, &mut seeks, 100.0), 100.0);
    }
}
