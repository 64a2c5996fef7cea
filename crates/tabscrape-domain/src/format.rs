//! Output format module - the serializations a caller may request

use std::fmt;

/// Output format of the final combined table
///
/// The set is closed: any other value supplied by a caller is a
/// request-validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Comma-separated values
    Csv,

    /// Pretty-printed JSON array of row objects
    Json,

    /// Base64-encoded `.xlsx` workbook plus an HTML preview
    Excel,

    /// `<data>` document with one `<item>` element per row
    Xml,
}

impl OutputFormat {
    /// All supported formats, in their canonical order
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Csv,
        OutputFormat::Json,
        OutputFormat::Excel,
        OutputFormat::Xml,
    ];

    /// Get the format name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Excel => "excel",
            OutputFormat::Xml => "xml",
        }
    }

    /// Parse a format from its wire name
    ///
    /// Matching is exact: `"CSV"` is rejected just like `"yaml"`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(OutputFormat::Csv),
            "json" => Some(OutputFormat::Json),
            "excel" => Some(OutputFormat::Excel),
            "xml" => Some(OutputFormat::Xml),
            _ => None,
        }
    }

    /// Conventional file extension for this format
    pub fn file_extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Excel => "xlsx",
            OutputFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!(
                "Invalid output format. Allowed values: {}.",
                Self::ALL
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}
