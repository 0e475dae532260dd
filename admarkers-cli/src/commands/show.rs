//! Show command - load a cue sheet and print the resolved timeline.

use std::path::PathBuf;

use admarkers::cuesheet::{self, CueMarker};
use admarkers::marker::MarkerStore;
use admarkers::render::MarkerPosition;
use clap::Args;

use crate::error::CliError;

/// Arguments for the show command.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Path to the JSON cue sheet
    pub cuesheet: PathBuf,

    /// Total media duration in seconds
    #[arg(long)]
    pub duration: f64,
}

/// Run the show command.
pub fn run(args: ShowArgs) -> Result<(), CliError> {
    if !args.duration.is_finite() || args.duration <= 0.0 {
        return Err(CliError::InvalidArgument(
            "duration must be a positive number of seconds".to_string(),
        ));
    }

    let cues = cuesheet::load(&args.cuesheet)?;
    let mut store = MarkerStore::new(|c: &CueMarker| c.time);
    store.add(cues);

    println!(
        "{} markers on a {}s timeline",
        store.len(),
        args.duration
    );
    println!();
    for marker in store.markers() {
        let cue = marker.payload();
        let position = MarkerPosition::new(cue.time, args.duration);
        println!(
            "{:>8.2}s  {:>5.1}%  {:<9}  {}",
            cue.time,
            position.percent,
            if cue.loader { "announcer" } else { "standard" },
            cue.label.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}
