//! tabscrape Router binary
//!
//! Starts the HTTP server for the scrape API.

use anyhow::Context;
use std::env;
use std::process;
use tabscrape_router::{config::RouterConfig, start_server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // API keys may live in .env
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        let config_path = &args[2];
        RouterConfig::from_file(config_path)
            .with_context(|| format!("loading {}", config_path))?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        return Ok(());
    } else {
        eprintln!("Warning: No config file specified, using default configuration");
        eprintln!("Usage: tabscrape-router --config <path-to-config.toml>");
        eprintln!();
        RouterConfig::default()
    };

    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("tabscrape Router - LLM web scraper HTTP API");
    println!();
    println!("USAGE:");
    println!("    tabscrape-router --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENDPOINTS:");
    println!("    GET  /                     Welcome message");
    println!("    GET  /health               Liveness check");
    println!("    POST /scrape_and_parse/    Scrape URLs into one table");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address, bind_port: where to listen (default 127.0.0.1:8000)");
    println!("    - cors_origins: browser origins allowed to call the API");
    println!("    - combine: 'column_count' or 'header'");
    println!("    - [llm], [extractor], [fetch]: pipeline sections");
    println!();
    println!("    Set RUST_LOG to adjust logging (default: info).");
}
