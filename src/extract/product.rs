// src/extract/product.rs

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{normalized_text, selector, trimmed_text};
use crate::error::ExtractionError;
use crate::record::ProductRecord;

static PANEL: OnceLock<Selector> = OnceLock::new();
static IMAGE: OnceLock<Selector> = OnceLock::new();
static DESCRIPTION: OnceLock<Selector> = OnceLock::new();
static TABLE_ROW: OnceLock<Selector> = OnceLock::new();
static CELL: OnceLock<Selector> = OnceLock::new();
static TITLE: OnceLock<Selector> = OnceLock::new();
static AVAILABILITY: OnceLock<Selector> = OnceLock::new();
static STAR_RATING: OnceLock<Selector> = OnceLock::new();
static BREADCRUMB_ITEM: OnceLock<Selector> = OnceLock::new();

const CURRENCY_GLYPH: char = '£';
const IN_STOCK_CLASS: &str = "instock";
const RATING_LABELS: [&str; 5] = ["One", "Two", "Three", "Four", "Five"];
const BREADCRUMB_CATEGORY_INDEX: usize = 2;

/// Rows of the product information table that feed the record.
///
/// The table has no per-row markers, so rows are addressed by position. A
/// change in the site's table layout only needs this mapping updated.
#[derive(Debug, Clone, Copy)]
enum AttributeRow {
    Upc,
    PriceExcludingTax,
    PriceIncludingTax,
    Reviews,
}

impl AttributeRow {
    const TABLE_ROWS: usize = 7;

    fn index(self) -> usize {
        match self {
            AttributeRow::Upc => 0,
            AttributeRow::PriceExcludingTax => 2,
            AttributeRow::PriceIncludingTax => 3,
            AttributeRow::Reviews => 6,
        }
    }

    fn anchor(self) -> &'static str {
        match self {
            AttributeRow::Upc => "UPC cell",
            AttributeRow::PriceExcludingTax => "price (excl. tax) cell",
            AttributeRow::PriceIncludingTax => "price (incl. tax) cell",
            AttributeRow::Reviews => "reviews cell",
        }
    }
}

/// Pulls a [`ProductRecord`] out of a product detail page.
///
/// Fails when one of the template anchors (content panel, attributes table,
/// title heading, availability, star rating, breadcrumb) is missing. A missing
/// description paragraph is not an error.
pub fn extract(markup: &str, source_url: &Url) -> Result<ProductRecord, ExtractionError> {
    let document = Html::parse_document(markup);
    let missing = |anchor: &'static str| ExtractionError::MissingElement {
        url: source_url.to_string(),
        anchor,
    };

    let panel = document
        .select(selector(&PANEL, "div.content"))
        .next()
        .ok_or_else(|| missing("content panel"))?;

    let image_src = panel
        .select(selector(&IMAGE, "img"))
        .next()
        .and_then(|img| img.value().attr("src"))
        .ok_or_else(|| missing("cover image"))?;
    let image_url = source_url
        .join(image_src)
        .map_err(|_| ExtractionError::MalformedValue {
            url: source_url.to_string(),
            field: "image_url",
            value: image_src.to_string(),
        })?;

    let product_description = panel
        .select(selector(&DESCRIPTION, "p:not([class])"))
        .next()
        .map(trimmed_text);

    let rows: Vec<ElementRef<'_>> = panel.select(selector(&TABLE_ROW, "table tr")).collect();
    if rows.len() < AttributeRow::TABLE_ROWS {
        return Err(missing("attributes table"));
    }
    let cell = |row: AttributeRow| {
        rows[row.index()]
            .select(selector(&CELL, "td"))
            .next()
            .map(trimmed_text)
            .ok_or_else(|| missing(row.anchor()))
    };
    let universal_product_code = cell(AttributeRow::Upc)?;
    let price_excluding_tax = strip_currency(&cell(AttributeRow::PriceExcludingTax)?);
    let price_including_tax = strip_currency(&cell(AttributeRow::PriceIncludingTax)?);
    // Only checked for presence; the star rating element supersedes it below.
    cell(AttributeRow::Reviews)?;

    let title = panel
        .select(selector(&TITLE, "h1"))
        .next()
        .map(trimmed_text)
        .ok_or_else(|| missing("title heading"))?;

    let availability = panel
        .select(selector(&AVAILABILITY, "p.availability"))
        .next()
        .ok_or_else(|| missing("availability"))?;
    let number_available = if availability.value().classes().any(|c| c == IN_STOCK_CLASS) {
        let text = normalized_text(availability);
        first_number(&text)
            .ok_or_else(|| ExtractionError::MalformedValue {
                url: source_url.to_string(),
                field: "number_available",
                value: text.clone(),
            })?
            .to_string()
    } else {
        "0".to_string()
    };

    let rating_element = panel
        .select(selector(&STAR_RATING, "p.star-rating"))
        .next()
        .ok_or_else(|| missing("star rating"))?;
    let rating_token = rating_element
        .value()
        .attr("class")
        .and_then(|classes| classes.split_whitespace().nth(1))
        .unwrap_or_default();
    if !RATING_LABELS.contains(&rating_token) {
        return Err(ExtractionError::MalformedValue {
            url: source_url.to_string(),
            field: "review_rating",
            value: rating_token.to_string(),
        });
    }

    // The breadcrumb sits above the content panel, so it is looked up document-wide.
    let category = document
        .select(selector(&BREADCRUMB_ITEM, "ul.breadcrumb > li"))
        .nth(BREADCRUMB_CATEGORY_INDEX)
        .map(normalized_text)
        .ok_or_else(|| missing("breadcrumb category"))?;

    Ok(ProductRecord {
        product_page_url: source_url.to_string(),
        image_url: image_url.to_string(),
        product_description,
        universal_product_code,
        price_excluding_tax,
        price_including_tax,
        review_rating: rating_token.to_string(),
        title,
        number_available,
        category,
    })
}

fn strip_currency(text: &str) -> String {
    text.replace(CURRENCY_GLYPH, "").trim().to_string()
}

/// First run of ASCII digits in `text`, e.g. `"23"` out of `"In stock (23 available)"`.
fn first_number(text: &str) -> Option<&str> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}
