//! Scrape command implementation.

use crate::cli::ScrapeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fs;
use std::path::Path;
use tabscrape_domain::traits::LlmProvider;
use tabscrape_domain::OutputFormat;
use tabscrape_export::Table;
use tabscrape_sdk::{ScrapeClient, ScrapeOutcome, ScrapeRequest, ScrapeService};

/// Execute the scrape command.
///
/// Data goes to `--output` or stdout; everything else goes to stderr so
/// the data can be piped.
pub async fn execute_scrape(args: ScrapeArgs, config: &mut Config, formatter: &Formatter) -> Result<()> {
    config.apply_overrides(args.max_tokens, args.concurrency)?;

    let format: OutputFormat = args.format.into();
    let request = ScrapeRequest::new(args.urls.clone(), args.description.clone(), format);

    match args.server.clone().or_else(|| config.settings.server.clone()) {
        Some(server) => {
            if args.max_tokens.is_some() || args.concurrency.is_some() {
                eprintln!(
                    "{}",
                    formatter.warning("--max-tokens and --concurrency are ignored with --server")
                );
            }
            eprintln!("{}", formatter.info(&format!("Sending request to {}", server)));

            let client = ScrapeClient::new(&server)?;
            let response = client.scrape(&request).await?;
            write_output(args.output.as_deref(), format, &response.data)?;

            if format == OutputFormat::Csv {
                if let Ok(table) = Table::from_csv(&response.data) {
                    eprintln!("{}", formatter.table_preview(&table, args.preview_rows));
                }
            }
            eprintln!("{}", formatter.success(&response.message));
        }
        None => {
            let service = ScrapeService::from_config(&config.service)?;
            scrape_locally(
                &service,
                &request,
                args.output.as_deref(),
                args.preview_rows,
                formatter,
            )
            .await?;
        }
    }

    Ok(())
}

/// Run a request in-process, write the data and print the summary.
pub async fn scrape_locally<L>(
    service: &ScrapeService<L>,
    request: &ScrapeRequest,
    output: Option<&Path>,
    preview_rows: usize,
    formatter: &Formatter,
) -> Result<ScrapeOutcome>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let outcome = service.run(request).await?;

    eprintln!("{}", formatter.url_summary(&outcome.urls));
    write_output(output, outcome.format, &outcome.response.data)?;
    eprintln!("{}", formatter.table_preview(&outcome.table, preview_rows));
    eprintln!("{}", formatter.outcome_summary(&outcome));

    Ok(outcome)
}

/// Write rendered data to a file, or to stdout when no path is given
///
/// Excel data is decoded to a binary workbook when written to a file.
pub fn write_output(path: Option<&Path>, format: OutputFormat, data: &str) -> Result<()> {
    match path {
        Some(path) if format == OutputFormat::Excel => {
            let bytes = STANDARD
                .decode(data)
                .map_err(|e| CliError::Decode(e.to_string()))?;
            fs::write(path, bytes)?;
        }
        Some(path) => fs::write(path, data)?,
        None if data.ends_with('\n') => print!("{}", data),
        None => println!("{}", data),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tabscrape_extractor::{DocumentExtractor, ExtractorConfig};
    use tabscrape_fetch::StaticFetcher;
    use tabscrape_llm::MockProvider;
    use tempfile::TempDir;

    const PAGE: &str = "https://shop.test/";

    fn service(response: &str) -> ScrapeService<MockProvider> {
        let fetcher = StaticFetcher::new().with_page(PAGE, "<body><p>Widget 9.99</p></body>");
        let extractor =
            DocumentExtractor::new(Arc::new(MockProvider::new(response)), ExtractorConfig::default())
                .unwrap();
        ScrapeService::new(Arc::new(fetcher), extractor)
    }

    #[tokio::test]
    async fn test_scrape_locally_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let request = ScrapeRequest::new(vec![PAGE.to_string()], "products", OutputFormat::Csv);

        let outcome = scrape_locally(
            &service("name,price\nWidget,9.99"),
            &request,
            Some(&path),
            5,
            &Formatter::new(false),
        )
        .await
        .unwrap();

        assert_eq!(outcome.table.row_count(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "name,price\nWidget,9.99\n");
    }

    #[tokio::test]
    async fn test_excel_file_is_binary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");
        let request = ScrapeRequest::new(vec![PAGE.to_string()], "products", OutputFormat::Excel);

        scrape_locally(
            &service("name,price\nWidget,9.99"),
            &request,
            Some(&path),
            5,
            &Formatter::new(false),
        )
        .await
        .unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn test_no_data_is_an_error() {
        let request = ScrapeRequest::new(vec![PAGE.to_string()], "products", OutputFormat::Csv);

        let result = scrape_locally(&service(""), &request, None, 5, &Formatter::new(false)).await;
        assert!(matches!(result, Err(CliError::Scrape(_))));
    }

    #[test]
    fn test_bad_excel_payload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");
        let result = write_output(Some(&path), OutputFormat::Excel, "not base64!");
        assert!(matches!(result, Err(CliError::Decode(_))));
    }
}
