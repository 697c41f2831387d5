//! Export, import and reset commands for the saved state

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::Parser;

use crate::{
    cli::config::StoreArgs,
    export::default_file_name,
};

#[derive(Parser, Debug)]
#[command(about = "Export the agent, statistics and history as JSON")]
pub struct ExportArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output file (defaults to tictactoe-ai-YYYY-MM-DD.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(about = "Replace the saved state with an exported JSON file")]
pub struct ImportArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// File written by `export`
    pub input: PathBuf,
}

#[derive(Parser, Debug)]
#[command(about = "Delete the learned table, statistics and history")]
pub struct ResetArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Confirm the reset
    #[arg(long, default_value_t = false)]
    pub yes: bool,
}

pub fn export(args: ExportArgs) -> Result<PathBuf> {
    let app = args.store.open_app()?;
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(default_file_name(Local::now().date_naive())));

    app.export_to(&path)
        .with_context(|| format!("failed to export to {}", path.display()))?;
    println!(
        "Exported {} states and {} matches to {}",
        app.agent().table_size(),
        app.history().len(),
        path.display()
    );
    Ok(path)
}

pub fn import(args: ImportArgs) -> Result<()> {
    let mut app = args.store.open_app()?;
    app.import_from(&args.input)
        .with_context(|| format!("failed to import {}", args.input.display()))?;
    println!(
        "Imported {} states, {} games played",
        app.agent().table_size(),
        app.stats().total_games
    );
    Ok(())
}

pub fn reset(args: ResetArgs) -> Result<()> {
    if !args.yes {
        bail!("refusing to delete all data without --yes");
    }
    let mut app = args.store.open_app()?;
    app.clear_all().context("failed to clear data")?;
    println!("All data cleared.");
    Ok(())
}
