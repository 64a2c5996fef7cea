//! tabscrape Export Layer
//!
//! Combines per-document tables and serializes the result in one of the
//! supported [`OutputFormat`]s.
//!
//! # Formats
//!
//! - `csv`: RFC 4180 CSV with a header row
//! - `json`: array of row objects, pretty-printed with 4-space indentation
//! - `excel`: base64-encoded `.xlsx` workbook plus an HTML preview table
//! - `xml`: `<data>` root, one `<item>` per row, one child per column
//!
//! # Examples
//!
//! ```
//! use tabscrape_domain::OutputFormat;
//! use tabscrape_export::{render, Table};
//!
//! let table = Table::from_csv("name,price\nWidget,9.99").unwrap();
//! let rendered = render(&table, OutputFormat::Json).unwrap();
//! assert!(rendered.data.contains("\"name\": \"Widget\""));
//! assert!(rendered.preview.is_none());
//! ```

#![warn(missing_docs)]

pub mod combine;
pub mod excel;
pub mod render;
pub mod table;
pub mod xml;

use tabscrape_domain::OutputFormat;
use thiserror::Error;

pub use combine::{combine, Combined};
pub use excel::{to_excel_base64, to_html_preview, to_xlsx};
pub use render::{to_csv, to_json};
pub use table::Table;
pub use xml::{sanitize_element_name, to_xml};

/// Errors that can occur while parsing or serializing tables
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV parsing or writing failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Workbook generation failed
    #[error("Excel error: {0}")]
    Excel(String),

    /// XML generation failed
    #[error("XML error: {0}")]
    Xml(String),

    /// Output was not valid UTF-8 or could not be flushed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A row's width differs from the header's
    #[error("Row has {found} fields, expected {expected}")]
    RaggedRow {
        /// Header width
        expected: usize,
        /// Row width
        found: usize,
    },

    /// The table has no columns
    #[error("Table has no columns")]
    EmptyTable,
}

/// A table serialized for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Serialized table (base64 for Excel)
    pub data: String,

    /// HTML preview, for Excel only
    pub preview: Option<String>,
}

/// Serialize `table` in the requested format
pub fn render(table: &Table, format: OutputFormat) -> Result<Rendered, ExportError> {
    let rendered = match format {
        OutputFormat::Csv => Rendered {
            data: to_csv(table)?,
            preview: None,
        },
        OutputFormat::Json => Rendered {
            data: to_json(table)?,
            preview: None,
        },
        OutputFormat::Excel => Rendered {
            data: to_excel_base64(table)?,
            preview: Some(to_html_preview(table)),
        },
        OutputFormat::Xml => Rendered {
            data: to_xml(table)?,
            preview: None,
        },
    };
    tracing::debug!(
        "Rendered {} rows as {} ({} bytes)",
        table.row_count(),
        format,
        rendered.data.len()
    );
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_every_format() {
        let table = Table::from_csv("name,price\nWidget,9.99").unwrap();
        for format in OutputFormat::ALL {
            let rendered = render(&table, format).unwrap();
            assert!(!rendered.data.is_empty());
            assert_eq!(rendered.preview.is_some(), format == OutputFormat::Excel);
        }
    }

    #[test]
    fn test_render_csv() {
        let table = Table::from_csv("name,price\nWidget,9.99").unwrap();
        let rendered = render(&table, OutputFormat::Csv).unwrap();
        assert_eq!(rendered.data, "name,price\nWidget,9.99\n");
    }
}
