//! Tic-tac-toe against a Q-learning agent
//!
//! This CLI provides:
//! - Playing against the agent on the terminal
//! - Self-play training with progress display
//! - Statistics, JSON export/import and reset of the saved state
//!
//! Log output is controlled with `RUST_LOG` (default `info`).

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tictac_rl::cli::commands::{data, play, stats, train};

#[derive(Parser)]
#[command(name = "tictac")]
#[command(version, about = "Tic-tac-toe against a Q-learning agent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against the agent
    Play(play::PlayArgs),

    /// Train the agent by self-play
    Train(train::TrainArgs),

    /// Show statistics and recent matches
    Stats(stats::StatsArgs),

    /// Export all saved state as JSON
    Export(data::ExportArgs),

    /// Replace the saved state from a JSON export
    Import(data::ImportArgs),

    /// Delete all saved state
    Reset(data::ResetArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::execute(args),
        Commands::Train(args) => train::execute(args),
        Commands::Stats(args) => stats::execute(args),
        Commands::Export(args) => data::export(args).map(|_| ()),
        Commands::Import(args) => data::import(args),
        Commands::Reset(args) => data::reset(args),
    }
}
