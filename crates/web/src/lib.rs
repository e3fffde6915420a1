//! # newsqa-web: Category Crawler
//!
//! Walks a paginated news category, collects article links, downloads each
//! article and stores its main text as numbered files inside a timestamped
//! output directory together with a `summary.txt` log.

pub mod browser;
pub mod crawler;

pub use browser::{build_http_client, HttpListingBrowser, ListingBrowser};
pub use crawler::{
    collect_article_links, crawl_articles, crawl_category, fetch_article, summary_entry,
    CrawlReport, CrawlerConfig, ListingSelectors,
};

use newsqa_html::HtmlError;
use thiserror::Error;

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to fetch content: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("No page has been loaded yet")]
    NoPageLoaded,
    #[error("Element '{0}' not found on the current page")]
    ElementNotFound(String),
    #[error("Could not find content in either container for {0}")]
    ContentNotFound(String),
    #[error("Content container for {0} holds no text")]
    EmptyContent(String),
    #[error("HTML processing error: {0}")]
    Html(#[from] HtmlError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
