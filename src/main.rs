// src/main.rs

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use catalog_crawler::{CrawlConfig, CrawlError, Crawler};

/// The main entry point, which dispatches to the correct mode (page or crawl).
#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    // The first argument picks the mode, the optional second one the output directory.
    let command = args.get(1).map_or("crawl", |s| s.as_str());

    let mut config = match CrawlConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = args.get(2) {
        config.output_dir = PathBuf::from(dir);
    }

    let result = match command {
        "page" => run_single_page(&config).await,
        "crawl" => run_crawl(&config).await,
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_configuration() => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("Run aborted, no further files written. {e}");
            ExitCode::FAILURE
        }
    }
}

/// Scrapes the configured product page into `first_page.csv`.
async fn run_single_page(config: &CrawlConfig) -> Result<(), CrawlError> {
    let crawler = Crawler::from_config(config)?;

    log::info!("Scraping {}", config.product_url);
    let path = crawler
        .scrape_product(&config.product_url, &config.output_dir)
        .await?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// Crawls every category reachable from the configured home page.
async fn run_crawl(config: &CrawlConfig) -> Result<(), CrawlError> {
    let crawler = Crawler::from_config(config)?;

    log::info!("Starting crawl from {}", config.root_url);
    let report = crawler.crawl(&config.root_url, &config.output_dir).await?;
    for category in &report.categories {
        log::info!(
            "  {:>4} products  {}",
            category.products,
            category.path.display()
        );
    }
    Ok(())
}

/// Prints the help message for the user.
fn print_usage() {
    println!("--- Catalog Crawler ---");
    println!("Usage: cargo run -- [COMMAND] [OUTPUT_DIR]");
    println!("\nCommands:");
    println!("  page      Scrape the single configured product page into first_page.csv.");
    println!("  crawl     Scrape every category into one CSV per category (default).");
    println!("\nSettings can also be given as CATALOG_* environment variables or in a .env file.");
}
