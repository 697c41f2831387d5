//! Stats command - statistics, parameters and recent matches

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::{config::StoreArgs, output};

#[derive(Parser, Debug)]
#[command(about = "Show statistics and recent matches")]
pub struct StatsArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Number of recent matches to list
    #[arg(long, short = 'n', default_value_t = 10)]
    pub recent: usize,

    /// Print the statistics as JSON instead
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn execute(args: StatsArgs) -> Result<()> {
    let app = args.store.open_app()?;

    if args.json {
        let text = serde_json::to_string_pretty(app.stats()).context("failed to encode stats")?;
        println!("{text}");
        return Ok(());
    }

    output::print_section("Tic-tac-toe agent");
    let params = app.agent().params();
    output::print_kv("Store", &args.store.store.display().to_string());
    output::print_kv("Known states", &output::format_number(app.agent().table_size() as u64));
    output::print_kv(
        "Parameters",
        &format!("α={} γ={} ε={}", params.alpha, params.gamma, params.epsilon),
    );

    output::print_stats(app.stats());

    let recent = app.history().recent(Some(args.recent));
    if !recent.is_empty() {
        output::print_subsection(&format!(
            "Recent matches ({} of {})",
            recent.len(),
            app.history().len()
        ));
        for record in recent {
            output::print_match_line(record);
        }
    }
    Ok(())
}
