//! Lock scalability logs.
//!
//! The lock benchmark prints one record per (thread count, lock) pair:
//!
//! ```text
//! 	nthreads:4 	lock:spin_lock_ttas 	cycles:123.400000
//! ```
//!
//! The table has one row per thread count from 1 up to the largest count in
//! the log, and one column per lock in the order the locks first appear.

pub mod chart;

use std::fs::File;
use std::io::{BufRead, BufReader};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::table::{table_path, Table};
use crate::{Config, Report};

/// Thread count key. Any line carrying it is a lock record.
pub const THREADS: &str = "nthreads:";
pub const LOCK: &str = "lock:";
pub const DEFAULT_METRIC: &str = "cycles:";

/// Name of the row-index column.
pub const INDEX: &str = "nthreads";

/// Everything the pivot needs from one lock log.
#[derive(Debug, Default)]
pub struct LockLog {
    max_threads: u32,
    locks: Vec<String>,
    lines: Vec<String>,
}

impl LockLog {
    /// Scan a log once, keeping every line that carries [`THREADS`].
    pub fn collect<R: BufRead>(r: R) -> Result<LockLog> {
        let mut log = LockLog::default();
        for record in kv::records(r, THREADS) {
            let (line_no, line) = record?;
            let threads = field(&line, line_no, THREADS)?;
            let threads: u32 = threads.parse().map_err(|_| Error::InvalidNumber {
                line: line_no,
                value: threads.to_string(),
            })?;
            log.max_threads = log.max_threads.max(threads);

            let lock = field(&line, line_no, LOCK)?;
            if !log.locks.iter().any(|l| l == lock) {
                log.locks.push(lock.to_string());
            }
            log.lines.push(line.trim().to_string());
        }
        debug!(
            records = log.lines.len(),
            locks = log.locks.len(),
            max_threads = log.max_threads,
            "collected lock log"
        );
        Ok(log)
    }

    pub fn max_threads(&self) -> u32 {
        self.max_threads
    }

    /// Lock names in first-seen order.
    pub fn locks(&self) -> &[String] {
        &self.locks
    }

    /// The retained record lines, trimmed.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The first record for `threads` and `lock`.
    pub fn find(&self, threads: &str, lock: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| kv::has_field(l, THREADS, threads) && kv::has_field(l, LOCK, lock))
            .map(String::as_str)
    }

    /// Build the `nthreads` x lock table of `metric` values.
    pub fn pivot(&self, metric: &str) -> Table {
        let mut header = vec![INDEX.to_string()];
        header.extend(self.locks.iter().cloned());
        let mut table = Table::new(header);

        for threads in 1..=self.max_threads {
            let threads = threads.to_string();
            let mut row = vec![threads.clone()];
            for lock in &self.locks {
                let cell = self
                    .find(&threads, lock)
                    .and_then(|line| kv::extract(line, metric))
                    .unwrap_or("");
                row.push(cell.to_string());
            }
            table.push_row(row);
        }
        table
    }
}

fn field<'a>(line: &'a str, line_no: usize, key: &str) -> Result<&'a str> {
    kv::extract(line, key).ok_or_else(|| Error::MissingField {
        line: line_no,
        key: key.to_string(),
    })
}

/// Run the whole lock pipeline for `cfg`.
pub fn run(cfg: &Config) -> Result<Report> {
    let log = LockLog::collect(BufReader::new(File::open(&cfg.input)?))?;
    let table = log.pivot(&cfg.metric_key(DEFAULT_METRIC));
    let table_file = table_path(&cfg.input);
    table.save(&table_file)?;
    info!(path = %table_file.display(), rows = table.len(), "wrote lock table");

    let charts = if cfg.table_only {
        Vec::new()
    } else {
        chart::render(&Table::load(&table_file)?, &cfg.output_dir)?
    };
    Ok(Report {
        table: table_file,
        charts,
    })
}
