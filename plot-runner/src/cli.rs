//! Arguments and logging setup shared by both binaries.

use std::path::PathBuf;

use benchplot::Config;
use clap::Args as ClapArgs;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// The benchmark log to read. The table is written to `<INPUT>.csv`.
    pub input: PathBuf,

    /// Directory the charts are written to.
    #[arg(long, short = 'd', default_value = ".")]
    pub output_dir: PathBuf,

    /// Key of the value put in the table, with or without the colon.
    #[arg(long)]
    pub metric: Option<String>,

    /// Only write the table.
    #[arg(long)]
    pub table_only: bool,
}

impl Args {
    pub fn into_config(self) -> Config {
        Config {
            input: self.input,
            output_dir: self.output_dir,
            metric: self.metric,
            table_only: self.table_only,
        }
    }
}

/// Log to stderr. `RUST_LOG` overrides the default `info` level.
pub fn init_logging() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        args: Args,
    }

    fn parse(argv: &[&str]) -> Config {
        Cli::try_parse_from(argv).unwrap().args.into_config()
    }

    #[test]
    fn defaults() {
        let cfg = parse(&["plot", "locks.log"]);
        assert_eq!(cfg.input, PathBuf::from("locks.log"));
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert_eq!(cfg.metric, None);
        assert!(!cfg.table_only);
    }

    #[test]
    fn all_flags() {
        let cfg = parse(&[
            "plot",
            "-d",
            "figs",
            "--metric",
            "cycles_per_iter",
            "--table-only",
            "q.log",
        ]);
        assert_eq!(cfg.output_dir, PathBuf::from("figs"));
        assert_eq!(cfg.metric.as_deref(), Some("cycles_per_iter"));
        assert!(cfg.table_only);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["plot"]).is_err());
    }
}
