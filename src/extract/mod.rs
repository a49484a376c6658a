// src/extract/mod.rs

//! Markup parsing for the catalog's page templates. Everything in here is a
//! pure function of the page body and the URL it was served from.

use std::sync::OnceLock;

use scraper::{ElementRef, Selector};

pub mod listing;
pub mod product;

/// Compiles a selector literal once and hands out the shared instance.
fn selector(cell: &'static OnceLock<Selector>, css: &str) -> &'static Selector {
    cell.get_or_init(|| Selector::parse(css).unwrap())
}

/// Concatenated text of an element, trimmed at both ends.
fn trimmed_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of an element with every whitespace run (newlines included) folded to one space.
fn normalized_text(element: ElementRef<'_>) -> String {
    let raw = element.text().collect::<String>();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
