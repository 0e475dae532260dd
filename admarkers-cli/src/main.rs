//! AdMarkers CLI - playback simulator and cue-sheet tools
//!
//! This binary drives the admarkers engines against a scripted clock so
//! marker timelines and ad schedules can be exercised without a real media
//! player.

mod commands;
mod error;
mod sim;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "admarkers",
    version,
    about = "Timed marker tracking and ad insertion, simulated from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate a playback session against a cue sheet
    Run(commands::run::RunArgs),
    /// Load a cue sheet and print the resolved marker timeline
    Show(commands::show::ShowArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result: Result<(), CliError> = match cli.command {
        Command::Run(args) => commands::run::run(args),
        Command::Show(args) => commands::show::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
