//! Pivot a queue benchmark log and draw one bar chart per queue.

use anyhow::{Context, Result};
use clap::Parser;

mod cli;

const ABOUT: &str = "Pivot a queue benchmark log into <LOG>.csv and draw lam.svg and ff.svg. Charts are SVG files.";

#[derive(Parser, Debug)]
#[command(name = "plot-queues", version, about = ABOUT)]
struct Cli {
    #[command(flatten)]
    args: cli::Args,
}

fn main() -> Result<()> {
    cli::init_logging();
    let cfg = Cli::parse().args.into_config();
    let report = benchplot::queue::run(&cfg)
        .with_context(|| format!("failed to plot queue log {}", cfg.input.display()))?;

    println!("{}", report.table.display());
    if report.charts.is_empty() && !cfg.table_only {
        tracing::warn!("no charts drawn");
    }
    for chart in &report.charts {
        println!("{}", chart.display());
    }
    Ok(())
}
