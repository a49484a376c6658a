// src/record.rs

use serde::{Deserialize, Serialize};
use url::Url;

/// Column names of every output file, in write order.
pub const HEADER: [&str; 10] = [
    "product_page_url",
    "image_url",
    "product_description",
    "universal_product_code",
    "price_excluding_tax",
    "price_including_tax",
    "review_rating",
    "title",
    "number_available",
    "category",
];

/// One product, as scraped from its detail page.
///
/// Field order matches [`HEADER`]; the CSV writer serializes fields positionally,
/// so reordering them here shifts columns in every output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_page_url: String,
    pub image_url: String,
    /// `None` when the page has no description paragraph at all.
    pub product_description: Option<String>,
    pub universal_product_code: String,
    pub price_excluding_tax: String,
    pub price_including_tax: String,
    pub review_rating: String,
    pub title: String,
    pub number_available: String,
    pub category: String,
}

/// All product pages of one category, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryListing {
    /// Lowercased display name from the listing header.
    pub name: String,
    pub product_urls: Vec<Url>,
}
