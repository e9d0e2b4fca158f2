//! Queue throughput logs.
//!
//! The queue benchmark prints one record per (queue, queue size, spin time)
//! run:
//!
//! ```text
//! Queue:stage_lam queue_size:1000 iters:1000000 nsecs_to_spin:10 cycles_to_spin:27 cycles_per_iter:83.7 cycles_per_iter_wo_delay:56.7
//! ```
//!
//! The table has one row per queue size, smallest first, and one column per
//! `<queue>+<nsecs_to_spin>` pair.

pub mod chart;

use std::fs::File;
use std::io::{BufRead, BufReader};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::table::{table_path, Table};
use crate::{Config, Report};

/// Queue name key. Any line carrying it is a queue record.
pub const QUEUE: &str = "Queue:";
pub const SIZE: &str = "queue_size:";
pub const SPIN: &str = "nsecs_to_spin:";
pub const DEFAULT_METRIC: &str = "cycles_per_iter_wo_delay:";

/// Synthetic row number, counting from one.
pub const ID: &str = "id";
pub const SIZE_COLUMN: &str = "queue_size";

/// Joins queue name and spin time in a column name.
pub const COLUMN_SEP: &str = "+";

#[derive(Debug, Default)]
pub struct QueueLog {
    queues: Vec<String>,
    sizes: Vec<String>,
    spins: Vec<String>,
    lines: Vec<String>,
}

impl QueueLog {
    /// Scan a log once, keeping every line that carries [`QUEUE`].
    ///
    /// Queue sizes and spin times end up deduplicated and in ascending
    /// numeric order; queue names stay in first-seen order.
    pub fn collect<R: BufRead>(r: R) -> Result<QueueLog> {
        let mut log = QueueLog::default();
        for record in kv::records(r, QUEUE) {
            let (line_no, line) = record?;
            let queue = field(&line, line_no, QUEUE)?;
            let size = numeric_field(&line, line_no, SIZE)?;
            let spin = numeric_field(&line, line_no, SPIN)?;
            insert(&mut log.queues, queue);
            insert(&mut log.sizes, size);
            insert(&mut log.spins, spin);
            log.lines.push(line.trim().to_string());
        }
        log.sizes = kv::sort_numeric(&log.sizes)?;
        log.spins = kv::sort_numeric(&log.spins)?;
        debug!(
            records = log.lines.len(),
            queues = log.queues.len(),
            sizes = log.sizes.len(),
            spins = log.spins.len(),
            "collected queue log"
        );
        Ok(log)
    }

    /// Queue names in first-seen order.
    pub fn queues(&self) -> &[String] {
        &self.queues
    }

    /// Queue sizes, ascending.
    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    /// Spin times in nanoseconds, ascending.
    pub fn spins(&self) -> &[String] {
        &self.spins
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Column names: every queue with every spin time, queue-major.
    pub fn columns(&self) -> Vec<String> {
        kv::string_product(&self.queues, &self.spins, COLUMN_SEP)
    }

    /// The first record for `size`, `queue` and `spin`.
    pub fn find(&self, size: &str, queue: &str, spin: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| {
                kv::has_field(l, SIZE, size)
                    && kv::has_field(l, QUEUE, queue)
                    && kv::has_field(l, SPIN, spin)
            })
            .map(String::as_str)
    }

    /// Build the queue size x (queue, spin time) table of `metric` values.
    pub fn pivot(&self, metric: &str) -> Table {
        let mut header = vec![ID.to_string(), SIZE_COLUMN.to_string()];
        header.extend(self.columns());
        let mut table = Table::new(header);

        for (i, size) in self.sizes.iter().enumerate() {
            let mut row = vec![(i + 1).to_string(), size.clone()];
            for queue in &self.queues {
                for spin in &self.spins {
                    let cell = self
                        .find(size, queue, spin)
                        .and_then(|line| kv::extract(line, metric))
                        .unwrap_or("");
                    row.push(cell.to_string());
                }
            }
            table.push_row(row);
        }
        table
    }
}

fn insert(set: &mut Vec<String>, value: &str) {
    if !set.iter().any(|v| v == value) {
        set.push(value.to_string());
    }
}

fn field<'a>(line: &'a str, line_no: usize, key: &str) -> Result<&'a str> {
    kv::extract(line, key).ok_or_else(|| Error::MissingField {
        line: line_no,
        key: key.to_string(),
    })
}

/// Like [`field`], but the value must be a whole number.
fn numeric_field<'a>(line: &'a str, line_no: usize, key: &str) -> Result<&'a str> {
    let value = field(line, line_no, key)?;
    match value.parse::<u64>() {
        Ok(_) => Ok(value),
        Err(_) => Err(Error::InvalidNumber {
            line: line_no,
            value: value.to_string(),
        }),
    }
}

/// Run the whole queue pipeline for `cfg`.
pub fn run(cfg: &Config) -> Result<Report> {
    let log = QueueLog::collect(BufReader::new(File::open(&cfg.input)?))?;
    let table = log.pivot(&cfg.metric_key(DEFAULT_METRIC));
    let table_file = table_path(&cfg.input);
    table.save(&table_file)?;
    info!(path = %table_file.display(), rows = table.len(), "wrote queue table");

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
