// src/crawler/mod.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;
use tokio::task::JoinSet;
use url::Url;

pub mod fetcher;
use fetcher::{Fetch, HttpFetcher};

use crate::catalog;
use crate::config::CrawlConfig;
use crate::error::{CrawlError, FetchError};
use crate::export;
use crate::extract::product;
use crate::record::ProductRecord;

/// Output file name used in single-page mode.
pub const SINGLE_PAGE_STEM: &str = "first_page";

/// Outcome of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub name: String,
    pub path: PathBuf,
    pub products: usize,
}

/// Outcome of a full crawl, one entry per category in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    pub categories: Vec<CategoryReport>,
}

impl CrawlReport {
    pub fn total_products(&self) -> usize {
        self.categories.iter().map(|c| c.products).sum()
    }
}

/// Runs the fetch → extract → write pipeline in either mode.
pub struct Crawler<F> {
    fetcher: Arc<F>,
    concurrency: usize,
    fetch_timeout: Duration,
}

impl Crawler<HttpFetcher> {
    pub fn from_config(config: &CrawlConfig) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::from_config(config).map_err(CrawlError::Client)?;
        Ok(Self::new(fetcher, config.concurrency, task_deadline(config)))
    }
}

/// Deadline for one product fetch task.
///
/// Retries happen inside the task, so the deadline covers every attempt and
/// the pauses between them. Saturates instead of overflowing on huge settings.
fn task_deadline(config: &CrawlConfig) -> Duration {
    let attempts = config.max_retries.saturating_add(1);
    config
        .request_timeout
        .saturating_add(config.retry_delay)
        .checked_mul(attempts)
        .unwrap_or(Duration::MAX)
}

impl<F> Crawler<F>
where
    F: Fetch + Send + Sync + 'static,
{
    pub fn new(fetcher: F, concurrency: usize, fetch_timeout: Duration) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            concurrency: concurrency.max(1),
            fetch_timeout,
        }
    }

    /// Single-page mode: scrape one product and write it to `first_page.csv`.
    pub async fn scrape_product(&self, url: &Url, out_dir: &Path) -> Result<PathBuf, CrawlError> {
        let out_dir = export::ensure_output_dir(out_dir)?;
        let records = self.scrape_products(std::slice::from_ref(url)).await?;
        Ok(export::write_records(&out_dir, SINGLE_PAGE_STEM, &records)?)
    }

    /// Full-crawl mode: one CSV per category under `out_dir`.
    ///
    /// The output directory is checked before any request goes out, so a
    /// misconfigured path fails fast without touching the network.
    pub async fn crawl(&self, root_url: &Url, out_dir: &Path) -> Result<CrawlReport, CrawlError> {
        let out_dir = export::ensure_output_dir(out_dir)?;
        let categories = catalog::discover(self.fetcher.as_ref(), root_url).await?;

        let mut report = CrawlReport::default();
        for (position, category_url) in categories.iter().enumerate() {
            log::info!("[{}/{}] {category_url}", position + 1, categories.len());

            let listing = catalog::paginate(self.fetcher.as_ref(), category_url).await?;
            let records = self.scrape_products(&listing.product_urls).await?;
            let path = export::write_records(&out_dir, &export::file_stem(&listing.name), &records)?;

            report.categories.push(CategoryReport {
                name: listing.name,
                path,
                products: records.len(),
            });
        }

        log::info!(
            "Crawl finished: {} products in {} categories",
            report.total_products(),
            report.categories.len()
        );
        Ok(report)
    }

    /// Fetches and extracts `urls`, returning records in the same order.
    async fn scrape_products(&self, urls: &[Url]) -> Result<Vec<ProductRecord>, CrawlError> {
        let bodies = self.fetch_all(urls).await?;
        let urls = urls.to_vec();

        // Parsing is CPU work; keep it off the async worker threads.
        let records = tokio::task::spawn_blocking(move || {
            urls.par_iter()
                .zip(bodies.par_iter())
                .map(|(url, body)| product::extract(body, url))
                .collect::<Result<Vec<_>, _>>()
        })
        .await??;
        Ok(records)
    }

    /// Fetches `urls` with at most `concurrency` requests in flight.
    ///
    /// Bodies come back in input order whatever order the requests finish in.
    /// The first failure aborts the remaining requests.
    async fn fetch_all(&self, urls: &[Url]) -> Result<Vec<String>, CrawlError> {
        let mut bodies: Vec<Option<String>> = vec![None; urls.len()];
        let mut pending = urls.iter().cloned().enumerate();
        let mut join_set = JoinSet::new();

        loop {
            while join_set.len() < self.concurrency {
                let Some((index, url)) = pending.next() else {
                    break;
                };
                let fetcher = Arc::clone(&self.fetcher);
                let timeout = self.fetch_timeout;

                join_set.spawn(async move {
                    let body = match tokio::time::timeout(timeout, fetcher.fetch(&url)).await {
                        Ok(result) => result,
                        Err(_) => Err(FetchError::Timeout {
                            url: url.to_string(),
                        }),
                    };
                    (index, body)
                });
            }

            let Some(joined) = join_set.join_next().await else {
                break;
            };
            let (index, body) = joined?;
            bodies[index] = Some(body?);
        }

        Ok(bodies.into_iter().flatten().collect())
    }
}
