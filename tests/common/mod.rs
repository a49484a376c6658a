//! Helpers for integration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use catalog_crawler::{Fetch, FetchError};
use reqwest::StatusCode;
use url::Url;

pub const ROOT: &str = "http://books.example/index.html";

/// An in-memory site that records every URL requested from it.
#[derive(Default)]
pub struct FixtureSite {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FixtureSite {
    pub fn with_page(mut self, url: &str, markup: String) -> Self {
        self.pages.insert(url.to_string(), markup);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Fetch for FixtureSite {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })
    }
}

/// Serves a [`FixtureSite`] but holds chosen URLs back before answering.
pub struct DelayedSite {
    site: FixtureSite,
    delays: HashMap<String, Duration>,
}

impl DelayedSite {
    pub fn new(site: FixtureSite) -> Self {
        Self {
            site,
            delays: HashMap::new(),
        }
    }

    pub fn with_delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }
}

impl Fetch for DelayedSite {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        if let Some(delay) = self.delays.get(url.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        self.site.fetch(url).await
    }
}

/// Home page linking to `categories`, given as `(slug, name)` pairs.
pub fn home_page(categories: &[(&str, &str)]) -> String {
    let links: String = categories
        .iter()
        .map(|(slug, name)| {
            format!(r#"<li><a href="catalogue/category/books/{slug}/index.html">{name}</a></li>"#)
        })
        .collect();
    format!(
        r#"<html><body><div class="side_categories"><ul class="nav nav-list"><li>
<a href="catalogue/category/books_1/index.html">Books</a>
<ul>{links}</ul>
</li></ul></div></body></html>"#
    )
}

pub fn category_url(slug: &str, page: usize) -> String {
    let file = if page == 1 {
        "index.html".to_string()
    } else {
        format!("page-{page}.html")
    };
    format!("http://books.example/catalogue/category/books/{slug}/{file}")
}

pub fn product_url(slug: &str) -> String {
    format!("http://books.example/catalogue/{slug}/index.html")
}

/// One listing page showing `slugs`, announcing `total` results.
pub fn listing_page(name: &str, total: usize, slugs: &[String]) -> String {
    let cards: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li><article class="product_pod">
<div class="image_container"><a href="../../../{slug}/index.html"><img src="../../../../media/{slug}.jpg"></a></div>
<h3><a href="../../../{slug}/index.html" title="{slug}">{slug}</a></h3>
</article></li>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
<div class="page-header action"><h1>{name}</h1></div>
<form method="get" class="form-horizontal">
<strong>{total}</strong> results - showing <strong>1</strong> to <strong>20</strong>.
</form>
<ol class="row">{cards}</ol>
</body></html>"#
    )
}

/// A product detail page for `slug` in category `category`.
pub fn product_page(slug: &str, category: &str, stock: Option<u32>) -> String {
    let availability = match stock {
        Some(n) => format!(
            "<p class=\"instock availability\">\n    <i class=\"icon-ok\"></i>\n\n        In stock ({n} available)\n\n</p>"
        ),
        None => "<p class=\"outofstock availability\">Out of stock</p>".to_string(),
    };
    format!(
        r#"<html><body><div class="page_inner">
<ul class="breadcrumb">
  <li><a href="../../index.html">Home</a></li>
  <li><a href="../category/books_1/index.html">Books</a></li>
  <li>
      <a href="../category/books/x/index.html">{category}</a>
  </li>
  <li class="active">{slug}</li>
</ul>
<div class="content"><article class="product_page">
  <img src="../../media/cache/{slug}.jpg" alt="{slug}" />
  <h1>Title of {slug}</h1>
  <p class="price_color">£10.00</p>
  {availability}
  <p class="star-rating Four"></p>
  <p>Description of {slug}, with a comma.</p>
  <table class="table table-striped">
    <tr><th>UPC</th><td>upc-{slug}</td></tr>
    <tr><th>Product Type</th><td>Books</td></tr>
    <tr><th>Price (excl. tax)</th><td>£10.00</td></tr>
    <tr><th>Price (incl. tax)</th><td>£12.00</td></tr>
    <tr><th>Tax</th><td>£2.00</td></tr>
    <tr><th>Availability</th><td>In stock</td></tr>
    <tr><th>Number of reviews</th><td>0</td></tr>
  </table>
</article></div>
</div></body></html>"#
    )
}

/// Adds a whole category (listing pages and product pages) to `site`.
pub fn with_category(
    mut site: FixtureSite,
    slug: &str,
    name: &str,
    product_count: usize,
) -> (FixtureSite, Vec<String>) {
    let products: Vec<String> = (0..product_count)
        .map(|i| format!("{slug}-book-{i:02}"))
        .collect();

    let chunks: Vec<&[String]> = if products.is_empty() {
        vec![&products[..]]
    } else {
        products.chunks(20).collect()
    };
    for (index, chunk) in chunks.iter().enumerate() {
        site = site.with_page(
            &category_url(slug, index + 1),
            listing_page(name, product_count, chunk),
        );
    }
    for (i, product) in products.iter().enumerate() {
        let stock = if i % 5 == 0 { None } else { Some(i as u32) };
        site = site.with_page(&product_url(product), product_page(product, name, stock));
    }

    let urls = products.iter().map(|p| product_url(p)).collect();
    (site, urls)
}
