//! Turn lock and queue microbenchmark logs into pivot tables and charts.
//!
//! Both pipelines have the same three stages. A log is scanned once and the
//! `key:value` records are collected ([`lock::LockLog`], [`queue::QueueLog`]).
//! The records are pivoted into a [`table::Table`] that is written next to the
//! log as `<log>.csv`. The table is then loaded again and drawn as SVG charts.

pub mod chart;
pub mod error;
pub mod lock;
pub mod queue;
pub mod table;

use std::path::PathBuf;

pub use error::{Error, Result};
pub use table::Table;

/// Settings for one run of a pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    /// The benchmark log to read.
    pub input: PathBuf,
    /// Where chart files go.
    pub output_dir: PathBuf,
    /// Key of the value copied into table cells. `None` picks the pipeline's
    /// default.
    pub metric: Option<String>,
    /// Write the table but draw nothing.
    pub table_only: bool,
}

impl Config {
    pub fn new<P: Into<PathBuf>>(input: P) -> Self {
        Config {
            input: input.into(),
            output_dir: PathBuf::from("."),
            metric: None,
            table_only: false,
        }
    }

    /// The metric key to look up, with its trailing colon.
    pub fn metric_key(&self, default: &str) -> String {
        match self.metric {
            Some(ref m) if m.ends_with(':') => m.clone(),
            Some(ref m) => format!("{}:", m),
            None => default.to_string(),
        }
    }
}

/// Files written by a run.
#[derive(Debug)]
pub struct Report {
    pub table: PathBuf,
    pub charts: Vec<PathBuf>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn metric_key_gets_colon() {
        let mut cfg = Config::new("x.log");
        assert_eq!(cfg.metric_key("cycles:"), "cycles:");
        cfg.metric = Some("cycles_per_iter".into());
        assert_eq!(cfg.metric_key("cycles:"), "cycles_per_iter:");
        cfg.metric = Some("cycles_per_iter:".into());
        assert_eq!(cfg.metric_key("cycles:"), "cycles_per_iter:");
    }
}
