// src/lib.rs

//! Crawls the books catalog (categories → paginated listings → product pages)
//! and writes one CSV file of product records per category.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod error;
pub mod export;
pub mod extract;
pub mod record;

pub use config::CrawlConfig;
pub use crawler::fetcher::{Fetch, HttpFetcher};
pub use crawler::{CategoryReport, CrawlReport, Crawler};
pub use error::{CrawlError, ExtractionError, FetchError, OutputError, PaginationError};
pub use record::{CategoryListing, HEADER, ProductRecord};
