//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabscrape_domain::OutputFormat;

/// tabscrape - Turn web pages into tables with an LLM.
#[derive(Debug, Parser)]
#[command(name = "tabscrape")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.tabscrape/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape one or more pages into a single table
    Scrape(ScrapeArgs),

    /// Show how a saved page would be chunked
    Chunk(ChunkArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the scrape command.
#[derive(Debug, Parser)]
pub struct ScrapeArgs {
    /// Page to scrape (repeatable, processed in order)
    #[arg(short, long = "url", required = true)]
    pub urls: Vec<String>,

    /// What the table should contain
    #[arg(short = 'd', long = "describe")]
    pub description: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Write the data to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Token budget per chunk
    #[arg(long)]
    pub max_tokens: Option<usize>,

    /// Maximum concurrent LLM calls
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Send the request to a running router instead of scraping locally
    #[arg(long, env = "TABSCRAPE_SERVER")]
    pub server: Option<String>,

    /// Rows shown in the preview table
    #[arg(long, default_value = "10")]
    pub preview_rows: usize,
}

/// Arguments for the chunk command.
#[derive(Debug, Parser)]
pub struct ChunkArgs {
    /// Saved HTML or text file
    pub file: PathBuf,

    /// Token budget per chunk
    #[arg(long)]
    pub max_tokens: Option<usize>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    /// Comma-separated values
    Csv,
    /// JSON array of row objects
    Json,
    /// Excel workbook
    Excel,
    /// XML document
    Xml,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Excel => OutputFormat::Excel,
            FormatArg::Xml => OutputFormat::Xml,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_command() {
        let cli = Cli::parse_from([
            "tabscrape",
            "scrape",
            "--url",
            "https://a.test",
            "-u",
            "https://b.test",
            "--describe",
            "product names",
            "--format",
            "excel",
            "--max-tokens",
            "300",
        ]);
        match cli.command {
            Command::Scrape(args) => {
                assert_eq!(args.urls, vec!["https://a.test", "https://b.test"]);
                assert_eq!(args.description, "product names");
                assert_eq!(args.format, FormatArg::Excel);
                assert_eq!(args.max_tokens, Some(300));
                assert_eq!(args.preview_rows, 10);
            }
            _ => panic!("Expected Scrape command"),
        }
    }

    #[test]
    fn test_scrape_requires_url() {
        let result = Cli::try_parse_from(["tabscrape", "scrape", "--describe", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = Cli::try_parse_from([
            "tabscrape", "scrape", "-u", "https://a.test", "-d", "x", "-f", "pdf",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["tabscrape", "--no-color", "config", "init", "--force"]);
        assert!(cli.no_color);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { force: true }
            })
        ));
    }

    #[test]
    fn test_format_conversion() {
        let format: OutputFormat = FormatArg::Xml.into();
        assert_eq!(format, OutputFormat::Xml);
    }
}
