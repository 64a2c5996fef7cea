//! Parsed tabular data ready for serialization

use crate::ExportError;
use std::collections::HashSet;
use tabscrape_domain::MasterTable;

/// A table of string cells with named columns
///
/// Column names are unique: blank names become `Unnamed: <index>` and
/// repeated names get a `.1`, `.2`, ... suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table from column names and rows of the same width
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, ExportError> {
        let width = columns.len();
        if let Some(row) = rows.iter().find(|r| r.len() != width) {
            return Err(ExportError::RaggedRow {
                expected: width,
                found: row.len(),
            });
        }
        Ok(Self {
            columns: unique_columns(columns),
            rows,
        })
    }

    /// Parse CSV text whose first record is the header
    pub fn from_csv(text: &str) -> Result<Self, ExportError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.trim().as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(ExportError::EmptyTable);
        }

        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        Self::new(columns, rows)
    }

    /// Build from a reconciled master table, one record per line
    ///
    /// Each line is parsed on its own so a row can never run into the next.
    pub fn from_master(table: &MasterTable) -> Result<Self, ExportError> {
        let columns = parse_record(table.header())?;
        if columns.is_empty() {
            return Err(ExportError::EmptyTable);
        }

        let rows = table
            .rows()
            .iter()
            .map(|row| parse_record(row))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(columns, rows)
    }

    /// Column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Data rows
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Replace the column names, keeping the rows
    pub(crate) fn rename_columns(&mut self, columns: &[String]) {
        self.columns = columns.to_vec();
    }

    /// Append another table's rows
    pub(crate) fn append_rows(&mut self, other: Table) {
        self.rows.extend(other.rows);
    }
}

fn parse_record(line: &str) -> Result<Vec<String>, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

fn unique_columns(columns: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    columns
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", index)
            } else {
                name
            };
            let mut candidate = base.clone();
            let mut suffix = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            candidate
        })
        .collect()
}
