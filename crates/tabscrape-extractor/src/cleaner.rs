//! Cleaning of raw LLM responses into CSV fragments
//!
//! A response is unwrapped from any markdown code fence, split into
//! non-blank lines, and validated against its own first line. Rows that do
//! not parse to the header's field count are dropped one by one; only a
//! header that cannot be parsed rejects the whole response.

use crate::error::FragmentError;
use crate::types::CleanedFragment;
use tabscrape_domain::{CsvFragment, BOM};
use tracing::debug;

const FENCE: &str = "```";

/// Parse one CSV line into its fields
///
/// Returns `None` when the line is not a complete CSV record on its own:
/// a quoted field that is never closed, or text after a closing quote.
/// Such a line would swallow the lines after it once the table is joined.
pub fn parse_fields(line: &str) -> Option<Vec<String>> {
    if !is_complete_record(line) {
        return None;
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let record = reader.records().next()?.ok()?;
    Some(record.iter().map(str::to_string).collect())
}

/// Whether every quoted field in `line` is closed before the next comma
///
/// Quotes inside an unquoted field are literal, as in `12" pizza`.
fn is_complete_record(line: &str) -> bool {
    let mut chars = line.chars().peekable();
    loop {
        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    None => return false,
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                    }
                    Some('"') => break,
                    Some(_) => {}
                }
            }
            match chars.next() {
                None => return true,
                Some(',') => continue,
                Some(_) => return false,
            }
        }

        loop {
            match chars.next() {
                None => return true,
                Some(',') => break,
                Some(_) => {}
            }
        }
    }
}

/// Number of CSV fields in `line`, or `None` if it does not parse
pub fn field_count(line: &str) -> Option<usize> {
    parse_fields(line).map(|fields| fields.len())
}

/// Remove a surrounding markdown code fence, if any
///
/// The opening fence line (including a language tag such as `csv`) is
/// dropped, as is a closing fence at the end. Text without a fence is
/// returned unchanged.
pub fn unwrap_code_fence(raw: &str) -> &str {
    let Some(rest) = raw.trim_start().strip_prefix(FENCE) else {
        return raw;
    };

    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => "",
    };
    body.trim_end().strip_suffix(FENCE).unwrap_or(body)
}

/// Cleans a single raw extraction into a [`CsvFragment`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FragmentCleaner;

impl FragmentCleaner {
    /// Create a new cleaner
    pub fn new() -> Self {
        Self
    }

    /// Clean one raw LLM response
    ///
    /// Cleaning is idempotent: cleaning the text of a cleaned fragment
    /// yields the same fragment.
    pub fn clean(&self, raw: &str) -> Result<CleanedFragment, FragmentError> {
        let body = unwrap_code_fence(raw);
        let mut lines = body
            .lines()
            .map(scrub)
            .filter(|line| !line.trim().is_empty());

        let header = lines
            .next()
            .map(|line| line.trim().to_string())
            .ok_or(FragmentError::EmptyExtraction)?;

        let expected = field_count(&header)
            .ok_or_else(|| FragmentError::MalformedHeader(header.clone()))?;

        let mut rows = Vec::new();
        let mut dropped_rows = 0;
        let mut duplicate_headers = 0;

        for line in lines {
            if line.trim() == header {
                duplicate_headers += 1;
                continue;
            }
            match field_count(&line) {
                Some(found) if found == expected => rows.push(line),
                Some(found) => {
                    debug!(
                        "Dropping row: {}",
                        FragmentError::ColumnCountMismatch { expected, found }
                    );
                    dropped_rows += 1;
                }
                None => {
                    debug!("Dropping unparseable row: {:?}", line);
                    dropped_rows += 1;
                }
            }
        }

        Ok(CleanedFragment {
            fragment: CsvFragment::new(header, rows),
            dropped_rows,
            duplicate_headers,
        })
    }
}

/// Remove byte-order marks from a line; cell text is otherwise kept as is
fn scrub(line: &str) -> String {
    line.replace(BOM, "")
}
