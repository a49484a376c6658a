// src/extract/listing.rs

use std::sync::OnceLock;

use scraper::{Html, Selector};
use url::Url;

use super::{normalized_text, selector};
use crate::error::PaginationError;

static HEADER: OnceLock<Selector> = OnceLock::new();
static RESULTS_COUNT: OnceLock<Selector> = OnceLock::new();
static PRODUCT_LINK: OnceLock<Selector> = OnceLock::new();
static CATEGORY_LINK: OnceLock<Selector> = OnceLock::new();

/// Products shown on one listing page. Fixed by the site.
pub const PAGE_SIZE: usize = 20;

/// What the first page of a category tells us.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Lowercased category display name.
    pub category: String,
    pub item_count: usize,
    pub product_urls: Vec<Url>,
}

/// Parses the first page of a category listing.
pub fn parse_listing(markup: &str, page_url: &Url) -> Result<ListingPage, PaginationError> {
    let document = Html::parse_document(markup);

    let category = document
        .select(selector(&HEADER, "div.page-header h1"))
        .next()
        .map(|h1| normalized_text(h1).to_lowercase())
        .ok_or_else(|| PaginationError::MissingHeader {
            url: page_url.to_string(),
        })?;

    let count_text = document
        .select(selector(&RESULTS_COUNT, "form strong"))
        .next()
        .map(normalized_text)
        .ok_or_else(|| PaginationError::MissingCount {
            url: page_url.to_string(),
        })?;
    let item_count = count_text
        .parse::<usize>()
        .map_err(|_| PaginationError::InvalidCount {
            url: page_url.to_string(),
            text: count_text.clone(),
        })?;

    Ok(ListingPage {
        category,
        item_count,
        product_urls: product_links(&document, page_url)?,
    })
}

/// Product page URLs of any listing page, in document order.
pub fn parse_product_links(markup: &str, page_url: &Url) -> Result<Vec<Url>, PaginationError> {
    product_links(&Html::parse_document(markup), page_url)
}

/// Listing URLs of every category in the side navigation, in document order.
pub fn parse_category_links(markup: &str, root_url: &Url) -> Result<Vec<Url>, PaginationError> {
    let document = Html::parse_document(markup);
    resolve_links(&document, selector(&CATEGORY_LINK, "ul.nav-list ul a[href]"), root_url)
}

/// Number of listing pages holding `item_count` products.
///
/// The site renders page 1 even for an empty category, so the result is never zero.
pub fn page_count(item_count: usize) -> usize {
    let pages = item_count / PAGE_SIZE + usize::from(item_count % PAGE_SIZE > 0);
    pages.max(1)
}

fn product_links(document: &Html, page_url: &Url) -> Result<Vec<Url>, PaginationError> {
    resolve_links(
        document,
        selector(&PRODUCT_LINK, "article.product_pod h3 a[href]"),
        page_url,
    )
}

/// Resolves every matched href against `base_url`.
///
/// A link that cannot be resolved fails the whole page: dropping it would
/// silently lose a product or category.
fn resolve_links(
    document: &Html,
    links: &Selector,
    base_url: &Url,
) -> Result<Vec<Url>, PaginationError> {
    let mut resolved = Vec::new();
    for element in document.select(links) {
        if let Some(href) = element.value().attr("href") {
            let url = base_url
                .join(href)
                .map_err(|_| PaginationError::UnresolvableLink {
                    url: base_url.to_string(),
                    href: href.to_string(),
                })?;
            resolved.push(url);
        }
    }
    Ok(resolved)
}
