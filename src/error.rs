// src/error.rs

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// A page could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("connection to {url} failed: {source}")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("fetching {url} timed out")]
    Timeout { url: String },
}

impl FetchError {
    /// Whether trying the same request again could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Connection { .. } | FetchError::Timeout { .. } => true,
            FetchError::Status { status, .. } => status.is_server_error(),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            FetchError::Connection { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Timeout { url } => url,
        }
    }
}

/// A product page did not match the expected template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("{url}: missing {anchor}")]
    MissingElement { url: String, anchor: &'static str },
    #[error("{url}: unexpected {field} value {value:?}")]
    MalformedValue {
        url: String,
        field: &'static str,
        value: String,
    },
}

/// A listing or home page did not yield the links and counts it should.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("{url}: listing has no category header")]
    MissingHeader { url: String },
    #[error("{url}: listing has no results count")]
    MissingCount { url: String },
    #[error("{url}: results count {text:?} is not a number")]
    InvalidCount { url: String, text: String },
    #[error("{url}: listing page shows no products")]
    MissingProducts { url: String },
    #[error("{url}: category announced {announced} products but its pages list {listed}")]
    CountMismatch {
        url: String,
        announced: usize,
        listed: usize,
    },
    #[error("{url}: cannot resolve link {href:?}")]
    UnresolvableLink { url: String, href: String },
}

/// Output files could not be written.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Something that is not a directory sits where the output directory should be.
    #[error("configuration error: {} exists and is not a directory", .0.display())]
    PathConflict(PathBuf),
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Everything that can stop a run, tagged with the stage it happened in.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("pagination failed: {0}")]
    Pagination(#[from] PaginationError),
    #[error("output failed: {0}")]
    Output(#[from] OutputError),
    #[error("cannot resolve {reference:?} against {base}: {source}")]
    Url {
        base: String,
        reference: String,
        #[source]
        source: url::ParseError,
    },
    #[error("fetch task did not complete: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl CrawlError {
    /// True for the output directory misconfiguration, which no retry can fix.
    pub fn is_configuration(&self) -> bool {
        matches!(self, CrawlError::Output(OutputError::PathConflict(_)))
    }
}
