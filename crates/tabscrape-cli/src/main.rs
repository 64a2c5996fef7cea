//! tabscrape CLI - Scrape web pages into tables from the command line.

use anyhow::Context;
use clap::Parser;
use tabscrape_cli::commands;
use tabscrape_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // API keys may live in .env
    dotenvy::dotenv().ok();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = Config::resolve_path(cli.config.as_deref())?;
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let formatter = Formatter::new(!cli.no_color && config.settings.color);

    match cli.command {
        Command::Scrape(args) => commands::execute_scrape(args, &mut config, &formatter).await?,
        Command::Chunk(args) => commands::execute_chunk(args, &config, &formatter).await?,
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter).await?
        }
    }

    Ok(())
}
