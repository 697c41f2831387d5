//! Train command - self-play training with periodic saves

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::{config::StoreArgs, output},
    pipeline::{DisplayPace, ProgressObserver, SelfPlay, SelfPlayConfig, SelfPlaySummary},
    q_learning::Hyperparameters,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: SelfPlaySummary,
    params: Hyperparameters,
    total_games: u64,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    store: String,
    seed: Option<u64>,
    save_interval: usize,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Trailing separator or no file name means a directory target
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the agent by self-play")]
pub struct TrainArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Number of self-play games
    #[arg(long, short = 'g', default_value_t = 1000)]
    pub games: usize,

    /// Save every this many games
    #[arg(long, default_value_t = 10)]
    pub save_interval: usize,

    /// Print the board after every move, pausing 1000ms/speed per move
    #[arg(long, default_value_t = false)]
    pub show_board: bool,

    /// Display speed multiplier for --show-board
    #[arg(long, default_value_t = 1.0)]
    pub speed: f64,

    /// Keep a match record for every self-play game
    #[arg(long, default_value_t = false)]
    pub keep_history: bool,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let mut app = args.store.open_app()?;

    let mut config = SelfPlayConfig::new()
        .with_games(args.games)
        .with_save_interval(args.save_interval)
        .with_history(args.keep_history);
    if args.show_board {
        config = config.with_display(DisplayPace::new(args.speed));
    }

    let mut session = SelfPlay::new(config);
    if args.show_board {
        session = session.with_observer(Box::new(output::BoardPrinter));
    } else if !args.no_progress {
        session = session.with_observer(Box::new(ProgressObserver::new()));
    }

    let summary = session.run(&mut app).context("self-play failed")?;

    output::print_section("Self-play results");
    output::print_kv("Games", &output::format_number(summary.games as u64));
    output::print_kv("X wins", &summary.x_wins.to_string());
    output::print_kv("O wins", &summary.o_wins.to_string());
    output::print_kv("Draws", &summary.draws.to_string());
    output::print_kv("Known states", &output::format_number(summary.table_size as u64));

    if let Some(raw) = &args.summary {
        let path = sanitize_summary_path(raw);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let file = TrainingSummaryFile {
            training: summary,
            params: app.agent().params(),
            total_games: app.stats().total_games,
            metadata: SummaryMetadata {
                store: args.store.store.display().to_string(),
                seed: args.store.seed,
                save_interval: args.save_interval,
            },
        };
        let writer = File::create(&path)
            .with_context(|| format!("failed to create summary {}", path.display()))?;
        to_writer_pretty(writer, &file).context("failed to write summary")?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
    }
}
