//! End-to-end tests for the scrape service
//!
//! Pages come from a `StaticFetcher` and extractions from a pattern-keyed
//! `MockProvider`, so the whole pipeline runs offline: validation, fetch,
//! reduce, chunk, invoke, clean, reconcile, combine and render.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::Arc;
use tabscrape_domain::OutputFormat;
use tabscrape_extractor::{DocumentExtractor, ExtractorConfig};
use tabscrape_fetch::StaticFetcher;
use tabscrape_llm::MockProvider;
use tabscrape_sdk::{
    CombinePolicy, ScrapeError, ScrapeRequest, ScrapeService, UrlStatus, EXCEL_SUCCESS_MESSAGE,
    NO_DATA_DETAIL, NO_VALID_CHUNKS_DETAIL, SUCCESS_MESSAGE,
};

const SHOP_A: &str = "https://shop-a.test/products";
const SHOP_B: &str = "https://shop-b.test/catalog";
const MISSING: &str = "https://missing.test/";

fn pages() -> StaticFetcher {
    StaticFetcher::new()
        .with_page(
            SHOP_A,
            "<html><body><h1>ALPHASHOP</h1><p>Widget 9.99</p><script>x()</script></body></html>",
        )
        .with_page(
            SHOP_B,
            "<html><body><h1>BETASHOP</h1><p>Gadget 4.50</p></body></html>",
        )
}

fn service(llm: MockProvider) -> ScrapeService<MockProvider> {
    let extractor = DocumentExtractor::new(Arc::new(llm), ExtractorConfig::default()).unwrap();
    ScrapeService::new(Arc::new(pages()), extractor)
}

fn request(urls: &[&str], format: OutputFormat) -> ScrapeRequest {
    ScrapeRequest::new(
        urls.iter().map(|u| u.to_string()).collect(),
        "product name and price",
        format,
    )
}

#[tokio::test]
async fn test_failed_fetch_is_skipped() {
    let mut llm = MockProvider::default();
    llm.add_response("ALPHASHOP", "name,price\nWidget,9.99");

    let outcome = service(llm)
        .run(&request(&[MISSING, SHOP_A], OutputFormat::Csv))
        .await
        .unwrap();

    assert_eq!(outcome.response.status, "success");
    assert_eq!(outcome.response.message, SUCCESS_MESSAGE);
    assert_eq!(outcome.response.data, "name,price\nWidget,9.99\n");
    assert!(outcome.response.preview.is_none());

    assert_eq!(outcome.urls.len(), 2);
    assert!(matches!(outcome.urls[0].status, UrlStatus::FetchFailed(_)));
    assert!(outcome.urls[0].stats.is_none());
    assert_eq!(outcome.urls[1].status, UrlStatus::Extracted { rows: 1 });
}

#[tokio::test]
async fn test_tables_combined_by_column_count() {
    let mut llm = MockProvider::default();
    llm.add_response("ALPHASHOP", "name,price\nWidget,9.99");
    llm.add_response("BETASHOP", "product,cost\nGadget,4.50");

    let outcome = service(llm)
        .run(&request(&[SHOP_A, SHOP_B], OutputFormat::Csv))
        .await
        .unwrap();

    assert_eq!(outcome.response.data, "name,price\nWidget,9.99\nGadget,4.50\n");
    assert_eq!(outcome.table.row_count(), 2);
    assert_eq!(outcome.tables_rejected, 0);
}

#[tokio::test]
async fn test_mismatched_width_is_rejected() {
    let mut llm = MockProvider::default();
    llm.add_response("ALPHASHOP", "name,price\nWidget,9.99");
    llm.add_response("BETASHOP", "name,price,stock\nGadget,4.50,3");

    let outcome = service(llm)
        .run(&request(&[SHOP_A, SHOP_B], OutputFormat::Csv))
        .await
        .unwrap();

    assert_eq!(outcome.response.data, "name,price\nWidget,9.99\n");
    assert_eq!(outcome.tables_rejected, 1);
}

#[tokio::test]
async fn test_header_policy_keeps_longest_table() {
    let mut llm = MockProvider::default();
    llm.add_response("ALPHASHOP", "name,price\nWidget,9.99");
    llm.add_response("BETASHOP", "product,cost\nGadget,4.50");

    let outcome = service(llm)
        .with_combine_policy(CombinePolicy::Header)
        .run(&request(&[SHOP_A, SHOP_B], OutputFormat::Csv))
        .await
        .unwrap();

    assert_eq!(outcome.response.data, "product,cost\nGadget,4.50\n");
    assert_eq!(outcome.tables_rejected, 1);
}

#[tokio::test]
async fn test_json_output() {
    let llm = MockProvider::new("name,price\nWidget,9.99");

    let response = service(llm)
        .scrape(&request(&[SHOP_A], OutputFormat::Json))
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&response.data).unwrap();
    assert_eq!(value[0]["name"], "Widget");
    assert_eq!(value[0]["price"], "9.99");
}

#[tokio::test]
async fn test_unterminated_quote_row_is_dropped_not_merged() {
    let llm = MockProvider::new("name,size\n12\" pizza,\"large\nSmall,1\nMedium,2");

    let outcome = service(llm)
        .run(&request(&[SHOP_A], OutputFormat::Json))
        .await
        .unwrap();

    assert_eq!(outcome.urls[0].status, UrlStatus::Extracted { rows: 2 });
    assert_eq!(outcome.table.row_count(), 2);

    let value: serde_json::Value = serde_json::from_str(&outcome.response.data).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[0]["name"], "Small");
    assert_eq!(value[1]["size"], "2");
}

#[tokio::test]
async fn test_excel_output_has_preview() {
    let llm = MockProvider::new("name,price\nWidget,9.99");

    let response = service(llm)
        .scrape(&request(&[SHOP_A], OutputFormat::Excel))
        .await
        .unwrap();

    assert_eq!(response.message, EXCEL_SUCCESS_MESSAGE);
    let workbook = STANDARD.decode(&response.data).unwrap();
    assert_eq!(&workbook[..2], b"PK");

    let preview = response.preview.unwrap();
    assert!(preview.contains("table table-bordered table-striped"));
    assert!(preview.contains("<td>Widget</td>"));
}

#[tokio::test]
async fn test_xml_output() {
    let llm = MockProvider::new("product name,price\nWidget,9.99");

    let response = service(llm)
        .scrape(&request(&[SHOP_A], OutputFormat::Xml))
        .await
        .unwrap();

    assert_eq!(
        response.data,
        "<data><item><product_name>Widget</product_name><price>9.99</price></item></data>"
    );
}

#[tokio::test]
async fn test_no_extractable_data() {
    let llm = MockProvider::new("");

    let result = service(llm)
        .scrape(&request(&[SHOP_A, MISSING], OutputFormat::Csv))
        .await;

    match result {
        Err(ScrapeError::NoExtractableData(detail)) => assert_eq!(detail, NO_DATA_DETAIL),
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_header_only_tables_are_no_data() {
    let llm = MockProvider::new("name,price");

    let result = service(llm)
        .scrape(&request(&[SHOP_A], OutputFormat::Csv))
        .await;

    match result {
        Err(ScrapeError::NoExtractableData(detail)) => assert_eq!(detail, NO_VALID_CHUNKS_DETAIL),
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_format_fetches_nothing() {
    let llm = MockProvider::new("name,price\nWidget,9.99");
    let probe = llm.clone();

    let mut req = request(&[SHOP_A], OutputFormat::Csv);
    req.output_format = "pdf".to_string();

    let result = service(llm).scrape(&req).await;
    assert!(matches!(result, Err(ScrapeError::InvalidRequest(_))));
    assert_eq!(probe.call_count(), 0);
}
