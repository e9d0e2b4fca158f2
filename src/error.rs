use std::io;
use std::num::ParseIntError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A data line (or table row) lacks a field every record must carry.
    #[error("line {line}: missing `{key}`")]
    MissingField { line: usize, key: String },

    #[error("line {line}: `{value}` is not a number")]
    InvalidNumber { line: usize, value: String },

    #[error("table file: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    ParseInt(#[from] ParseIntError),

    #[error("table has no column `{0}`")]
    NoSuchColumn(String),

    #[error("drawing failed: {0}")]
    Chart(String),
}

/// Turn a plotting backend error into an [`Error::Chart`].
pub(crate) fn chart_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Chart(e.to_string())
}
