//! Pivot a lock benchmark log and draw the lock scalability charts.

use anyhow::{Context, Result};
use clap::Parser;

mod cli;

const ABOUT: &str = "Pivot a lock benchmark log into <LOG>.csv and draw lock_scalability.svg and lock_scalability_until8.svg. Charts are SVG files.";

#[derive(Parser, Debug)]
#[command(name = "plot-locks", version, about = ABOUT)]
struct Cli {
    #[command(flatten)]
    args: cli::Args,
}

fn main() -> Result<()> {
    cli::init_logging();
    let cfg = Cli::parse().args.into_config();
    let report = benchplot::lock::run(&cfg)
        .with_context(|| format!("failed to plot lock log {}", cfg.input.display()))?;

    println!("{}", report.table.display());
    for chart in &report.charts {
        println!("{}", chart.display());
    }
    Ok(())
}
