// src/catalog.rs

//! Walking the catalog structure: home page → categories → listing pages.

use url::Url;

use crate::crawler::fetcher::Fetch;
use crate::error::{CrawlError, PaginationError};
use crate::extract::listing::{self, ListingPage};
use crate::record::CategoryListing;

/// Listing URLs of every category linked from the home page, in document order.
pub async fn discover<F: Fetch>(fetcher: &F, root_url: &Url) -> Result<Vec<Url>, CrawlError> {
    let markup = fetcher.fetch(root_url).await?;
    let categories = listing::parse_category_links(&markup, root_url)?;
    log::info!("Discovered {} categories on {root_url}", categories.len());
    Ok(categories)
}

/// Every product URL of one category, page 1 first, then by increasing page index.
pub async fn paginate<F: Fetch>(fetcher: &F, first_page: &Url) -> Result<CategoryListing, CrawlError> {
    let markup = fetcher.fetch(first_page).await?;
    let ListingPage {
        category,
        item_count,
        mut product_urls,
    } = listing::parse_listing(&markup, first_page)?;

    let pages = listing::page_count(item_count);
    log::info!("Category '{category}': {item_count} products on {pages} page(s)");

    for index in 2..=pages {
        let page_url = page_url(first_page, index)?;
        let markup = fetcher.fetch(&page_url).await?;
        let links = listing::parse_product_links(&markup, &page_url)?;
        if links.is_empty() {
            return Err(PaginationError::MissingProducts {
                url: page_url.to_string(),
            }
            .into());
        }
        product_urls.extend(links);
    }

    // A short listing would be written out as if the category were complete.
    if product_urls.len() != item_count {
        return Err(PaginationError::CountMismatch {
            url: first_page.to_string(),
            announced: item_count,
            listed: product_urls.len(),
        }
        .into());
    }

    Ok(CategoryListing {
        name: category,
        product_urls,
    })
}

/// `page-<index>.html` next to the category's first listing page.
fn page_url(first_page: &Url, index: usize) -> Result<Url, CrawlError> {
    let reference = format!("page-{index}.html");
    first_page.join(&reference).map_err(|source| CrawlError::Url {
        base: first_page.to_string(),
        reference,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_pages_sit_next_to_the_index() {
        let first = Url::parse("http://books.toscrape.com/catalogue/category/books/mystery_3/index.html").unwrap();
        assert_eq!(
            page_url(&first, 2).unwrap().as_str(),
            "http://books.toscrape.com/catalogue/category/books/mystery_3/page-2.html"
        );
    }
}
