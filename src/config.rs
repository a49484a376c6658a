// src/config.rs

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const ROOT_URL: &str = "http://books.toscrape.com/index.html";
const PRODUCT_URL: &str = "http://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html";
const CONCURRENCY: usize = 8;
const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_RETRIES: u32 = 2;
const RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid URL: {source}")]
    Url {
        key: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{key}={value:?} is not a valid number")]
    Number { key: &'static str, value: String },
}

/// Settings for a run. Defaults target the live catalog.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Home page whose side navigation lists every category.
    pub root_url: Url,
    /// The product scraped in single-page mode.
    pub product_url: Url,
    /// Base directory for output files; empty means the working directory.
    pub output_dir: PathBuf,
    /// Product pages fetched at once within a category.
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            root_url: Url::parse(ROOT_URL).unwrap(),
            product_url: Url::parse(PRODUCT_URL).unwrap(),
            output_dir: PathBuf::new(),
            concurrency: CONCURRENCY,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_retries: MAX_RETRIES,
            retry_delay: Duration::from_millis(RETRY_DELAY_MS),
        }
    }
}

impl CrawlConfig {
    /// Defaults overridden by `CATALOG_*` variables from the environment or a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("CATALOG_ROOT_URL") {
            config.root_url = parse_url("CATALOG_ROOT_URL", value)?;
        }
        if let Some(value) = lookup("CATALOG_PRODUCT_URL") {
            config.product_url = parse_url("CATALOG_PRODUCT_URL", value)?;
        }
        if let Some(value) = lookup("CATALOG_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("CATALOG_CONCURRENCY") {
            config.concurrency = parse_number("CATALOG_CONCURRENCY", value)?;
        }
        if let Some(value) = lookup("CATALOG_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse_number("CATALOG_TIMEOUT_SECS", value)?);
        }
        if let Some(value) = lookup("CATALOG_MAX_RETRIES") {
            config.max_retries = parse_number("CATALOG_MAX_RETRIES", value)?;
        }
        if let Some(value) = lookup("CATALOG_RETRY_DELAY_MS") {
            config.retry_delay = Duration::from_millis(parse_number("CATALOG_RETRY_DELAY_MS", value)?);
        }

        Ok(config)
    }
}

fn parse_url(key: &'static str, value: String) -> Result<Url, ConfigError> {
    Url::parse(&value).map_err(|source| ConfigError::Url { key, value, source })
}

fn parse_number<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Number { key, value })
}
