//! The intermediate pivot table.
//!
//! On disk a table is plain text: one header line naming every column, then
//! one line per row. Fields are separated by a single space and a blank cell
//! is an empty field, so `2 20.0 ` is a row whose last cell is blank. Keeping
//! the separator for blank cells is what lets [`Table::read_from`] put every
//! value back under the right header.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::debug;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>) -> Self {
        Table {
            header,
            rows: Vec::new(),
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row. Rows are padded with blank cells (or cut) to the header
    /// width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.header.len(), String::new());
        self.rows.push(row);
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// The raw fields of column `name`, one per row.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self
            .position(name)
            .ok_or_else(|| Error::NoSuchColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Column `name` parsed as numbers. Blank cells are `None`.
    pub fn numeric(&self, name: &str) -> Result<Vec<Option<f64>>> {
        self.column(name)?
            .into_iter()
            .enumerate()
            .map(|(i, field)| {
                if field.is_empty() {
                    return Ok(None);
                }
                field.parse::<f64>().map(Some).map_err(|_| Error::InvalidNumber {
                    // +1 for the header line, +1 to count from one.
                    line: i + 2,
                    value: field.to_string(),
                })
            })
            .collect()
    }

    pub fn write_to<W: Write>(&self, w: W) -> Result<()> {
        let mut wtr = WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(w);
        wtr.write_record(&self.header)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Parse a table written by [`Table::write_to`].
    ///
    /// Header names may be separated by runs of spaces and a trailing space is
    /// ignored; data rows are split on single spaces so blank cells survive.
    pub fn read_from<R: Read>(r: R) -> Result<Table> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .flexible(true)
            .from_reader(r);
        let mut records = rdr.records();
        let header = match records.next() {
            Some(record) => record?
                .iter()
                .filter(|h| !h.is_empty())
                .map(String::from)
                .collect(),
            None => Vec::new(),
        };
        let mut table = Table::new(header);
        for record in records {
            table.push_row(record?.iter().map(String::from).collect());
        }
        Ok(table)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.write_to(File::create(path)?)?;
        debug!(path = %path.display(), rows = self.len(), "wrote table");
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Table> {
        Table::read_from(File::open(path)?)
    }
}

/// Where the table for the log at `input` is stored: `<input>.csv`.
pub fn table_path<P: AsRef<Path>>(input: P) -> PathBuf {
    let mut path = input.as_ref().as_os_str().to_owned();
    path.push(".csv");
    PathBuf::from(path)
}
