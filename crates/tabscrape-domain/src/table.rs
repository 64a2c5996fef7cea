//! Table module - cleaned CSV fragments and reconciled master tables
//!
//! Both types keep their lines verbatim (already CSV-encoded). Field-count
//! validation needs a CSV parser and therefore lives in the extractor; the
//! constructors here trust their callers to have done it.

use std::fmt;

/// Unicode byte-order mark as it appears at the start of a decoded line
pub const BOM: char = '\u{feff}';

/// Strip any leading byte-order marks from a line
pub fn strip_bom(line: &str) -> &str {
    line.trim_start_matches(BOM)
}

/// A cleaned CSV fragment derived from one chunk's LLM response
///
/// Invariants (upheld by the cleaner): every row has the header's field
/// count, no row repeats the header, and no line carries a BOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFragment {
    header: String,
    rows: Vec<String>,
}

impl CsvFragment {
    /// Create a fragment from an already-validated header and rows
    pub fn new(header: impl Into<String>, rows: Vec<String>) -> Self {
        Self {
            header: header.into(),
            rows,
        }
    }

    /// Parse fragment text without validation: first line header, rest rows
    ///
    /// Returns `None` for blank text.
    pub fn from_text(text: &str) -> Option<Self> {
        let mut lines = text.trim().lines();
        let header = strip_bom(lines.next()?).to_string();
        if header.trim().is_empty() {
            return None;
        }
        let rows = lines.map(|l| strip_bom(l).to_string()).collect();
        Some(Self { header, rows })
    }

    /// Header line
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Data lines
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Total character length of the fragment text (header + rows + newlines)
    pub fn char_len(&self) -> usize {
        self.header.chars().count()
            + self
                .rows
                .iter()
                .map(|r| r.chars().count() + 1)
                .sum::<usize>()
    }

    /// Render as newline-joined CSV text
    pub fn to_text(&self) -> String {
        join_lines(&self.header, &self.rows)
    }
}

impl fmt::Display for CsvFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// The reconciled table: one header plus every compatible data row
///
/// Invariant: every row's field count equals the header's field count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterTable {
    header: String,
    field_count: usize,
    rows: Vec<String>,
}

impl MasterTable {
    /// Start a table with a header and its parsed field count
    pub fn new(header: impl Into<String>, field_count: usize) -> Self {
        Self {
            header: header.into(),
            field_count,
            rows: Vec::new(),
        }
    }

    /// Append a row already verified to have `field_count` fields
    pub fn push_row(&mut self, row: impl Into<String>) {
        self.rows.push(row.into());
    }

    /// Header line
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Number of fields in the header
    pub fn field_count(&self) -> usize {
        self.field_count
    }

    /// Data lines
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has a header but no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as newline-joined CSV text (header first)
    pub fn to_csv_text(&self) -> String {
        join_lines(&self.header, &self.rows)
    }
}

impl fmt::Display for MasterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv_text())
    }
}

fn join_lines(header: &str, rows: &[String]) -> String {
    let mut text = String::with_capacity(
        header.len() + rows.iter().map(|r| r.len() + 1).sum::<usize>(),
    );
    text.push_str(header);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}name,price"), "name,price");
        assert_eq!(strip_bom("name,price"), "name,price");
    }

    #[test]
    fn test_fragment_from_text() {
        let fragment = CsvFragment::from_text("\u{feff}a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(fragment.header(), "a,b");
        assert_eq!(fragment.rows(), &["1,2".to_string(), "3,4".to_string()]);
        assert_eq!(fragment.to_text(), "a,b\n1,2\n3,4");
    }

    #[test]
    fn test_fragment_from_blank_text() {
        assert!(CsvFragment::from_text("   \n ").is_none());
    }

    #[test]
    fn test_fragment_char_len_matches_text() {
        let fragment = CsvFragment::new("a,b,c", vec!["1,2,3".into(), "4,5,6".into()]);
        assert_eq!(fragment.char_len(), fragment.to_text().chars().count());
    }

    #[test]
    fn test_master_table_rendering() {
        let mut table = MasterTable::new("a,b,c", 3);
        assert!(table.is_empty());
        assert_eq!(table.to_csv_text(), "a,b,c");

        table.push_row("1,2,3");
        table.push_row("4,5,6");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.to_csv_text(), "a,b,c\n1,2,3\n4,5,6");
    }
}
