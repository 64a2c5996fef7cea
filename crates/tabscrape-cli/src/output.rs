//! Output formatting for the CLI.

use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tabscrape_domain::Chunk;
use tabscrape_export::Table;
use tabscrape_sdk::{ScrapeOutcome, UrlReport, UrlStatus};

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Render the first `limit` rows of a table.
    pub fn table_preview(&self, table: &Table, limit: usize) -> String {
        if table.is_empty() {
            return self.colorize("No rows.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(table.columns().iter().map(String::as_str));
        for row in table.rows().iter().take(limit) {
            builder.push_record(row.iter().map(String::as_str));
        }

        let mut rendered = builder.build();
        rendered
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let mut out = rendered.to_string();
        if table.row_count() > limit {
            out.push('\n');
            out.push_str(&self.info(&format!(
                "{} more row(s) not shown",
                table.row_count() - limit
            )));
        }
        out
    }

    /// One line per requested URL.
    pub fn url_summary(&self, reports: &[UrlReport]) -> String {
        reports
            .iter()
            .map(|report| match &report.status {
                UrlStatus::Extracted { rows } => {
                    self.success(&format!("{} ({} rows)", report.url, rows))
                }
                UrlStatus::NoTable => self.warning(&format!("{} (no table)", report.url)),
                UrlStatus::FetchFailed(reason) => {
                    self.error(&format!("{} ({})", report.url, reason))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Closing summary for a local scrape.
    pub fn outcome_summary(&self, outcome: &ScrapeOutcome) -> String {
        let chunks: usize = outcome
            .urls
            .iter()
            .filter_map(|r| r.stats.as_ref())
            .map(|s| s.chunks)
            .sum();
        let mut summary = self.success(&format!(
            "{} rows x {} columns as {} ({} chunk(s), {}ms)",
            outcome.table.row_count(),
            outcome.table.width(),
            outcome.format,
            chunks,
            outcome.processing_time_ms
        ));
        if outcome.tables_rejected > 0 {
            summary.push('\n');
            summary.push_str(&self.warning(&format!(
                "{} table(s) left out for mismatched columns",
                outcome.tables_rejected
            )));
        }
        summary
    }

    /// Listing of chunks with their token counts.
    pub fn chunk_listing(&self, chunks: &[Chunk]) -> String {
        let mut out = String::new();
        for chunk in chunks {
            out.push_str(&self.colorize(
                &format!("--- chunk {} ({} tokens) ---", chunk.index, chunk.token_count),
                "cyan",
            ));
            out.push('\n');
            out.push_str(&chunk.text);
            out.push('\n');
        }
        out.push_str(&self.info(&format!("{} chunk(s)", chunks.len())));
        out
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
