//! # Category Crawler
//!
//! Stage one of the pipeline. The category listing is walked page by page to
//! collect article links, then every article is downloaded and its main text
//! saved as `content_<i>.txt`, where `i` is the 1-based position of the link.
//! Each attempt is logged in `summary.txt`, success or not.

use crate::{browser::ListingBrowser, CrawlError};
use newsqa::constants::{content_file_name, timestamp_now, CRAWL_DIR_PREFIX, SUMMARY_FILE};
use newsqa_html::ArticleSelectors;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

/// Separator line written after each summary entry.
const SUMMARY_SEPARATOR_WIDTH: usize = 80;

/// Selectors used on category listing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSelectors {
    /// An element that must be present before links are read.
    pub item: String,
    /// Links to article detail pages.
    pub detail_link: String,
    /// The link to the next page. `{page}` is replaced by the page number.
    pub next_page: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item: ".post-item".to_string(),
            detail_link: "a.btn.btn-default.btn-lighter".to_string(),
            next_page: "a.page.larger[href*='page/{page}/']".to_string(),
        }
    }
}

impl ListingSelectors {
    pub fn next_page_selector(&self, page: usize) -> String {
        self.next_page.replace("{page}", &page.to_string())
    }
}

/// Settings of a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Listing pages visited at most, counting the first one.
    pub max_pages: usize,
    /// Pause after moving to the next listing page.
    pub page_delay: Duration,
    /// Upper bound for loading one listing page.
    pub render_timeout: Duration,
    /// Upper bound for downloading one article.
    pub request_timeout: Duration,
    /// Directory under which `crawl_results_<timestamp>` is created.
    pub output_root: PathBuf,
    pub listing: ListingSelectors,
    pub article: ArticleSelectors,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 5,
            page_delay: Duration::from_secs(2),
            render_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            output_root: PathBuf::from("."),
            listing: ListingSelectors::default(),
            article: ArticleSelectors::default(),
        }
    }
}

/// Outcome of downloading a batch of articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub output_dir: PathBuf,
    pub summary_path: PathBuf,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Walks the category listing starting at `category_url` and returns every
/// article link found, in page order.
///
/// The walk stops after `max_pages` pages or when no next-page link exists.
/// Any other failure aborts the walk with an error.
pub async fn collect_article_links<B>(
    browser: &mut B,
    category_url: &str,
    config: &CrawlerConfig,
) -> Result<Vec<String>, CrawlError>
where
    B: ListingBrowser + ?Sized,
{
    info!("Accessing category page: {category_url}");
    browser.navigate(category_url).await?;

    let selectors = &config.listing;
    let mut links = Vec::new();
    let mut current_page = 1;
    loop {
        info!("Processing page {current_page}");
        browser.wait_for(&selectors.item).await?;

        let page_links = browser.query_attribute(&selectors.detail_link, "href")?;
        for link in &page_links {
            info!("Found article: {link}");
        }
        links.extend(page_links);

        if current_page >= config.max_pages {
            info!("Reached maximum page limit ({})", config.max_pages);
            break;
        }

        let next_page = current_page + 1;
        if !browser.click(&selectors.next_page_selector(next_page)).await? {
            info!("No more pages available");
            break;
        }
        info!("Moving to page {next_page}");
        tokio::time::sleep(config.page_delay).await;
        current_page = next_page;
    }

    Ok(links)
}

/// Downloads one article page and extracts its main text.
pub async fn fetch_article(
    client: &reqwest::Client,
    url: &str,
    selectors: &ArticleSelectors,
) -> Result<String, CrawlError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    let html = response.text().await?;

    match newsqa_html::extract_article_text(&html, selectors)? {
        None => Err(CrawlError::ContentNotFound(url.to_string())),
        Some(text) if text.is_empty() => Err(CrawlError::EmptyContent(url.to_string())),
        Some(text) => Ok(text),
    }
}

/// Renders one `summary.txt` entry. `file_name` is `None` for a failed attempt.
pub fn summary_entry(index: usize, url: &str, file_name: Option<&str>) -> String {
    let mut entry = format!("Website {index}: {url}\n");
    match file_name {
        Some(file_name) => {
            entry.push_str("Status: Success\n");
            entry.push_str(&format!("File: {file_name}\n"));
        }
        None => entry.push_str("Status: Failed\n"),
    }
    entry.push_str(&"-".repeat(SUMMARY_SEPARATOR_WIDTH));
    entry.push('\n');
    entry
}

/// Downloads every URL and stores the extracted text under a new
/// `crawl_results_<timestamp>` directory in `output_root`.
///
/// A failed article is logged and recorded in the summary; the batch carries on.
/// Failing to create the output directory or to write a file is fatal.
pub async fn crawl_articles(
    client: &reqwest::Client,
    urls: &[String],
    output_root: &Path,
    selectors: &ArticleSelectors,
) -> Result<CrawlReport, CrawlError> {
    let output_dir = output_root.join(format!("{CRAWL_DIR_PREFIX}{}", timestamp_now()));
    tokio::fs::create_dir_all(&output_dir).await?;
    info!("Saving crawl results to {}", output_dir.display());

    let summary_path = output_dir.join(SUMMARY_FILE);
    let mut summary = tokio::fs::File::create(&summary_path).await?;

    let total = urls.len();
    let mut succeeded = 0;
    for (position, url) in urls.iter().enumerate() {
        let index = position + 1;
        info!("Processing website {index}/{total}: {url}");

        let entry = match fetch_article(client, url, selectors).await {
            Ok(content) => {
                let file_name = content_file_name(index);
                tokio::fs::write(output_dir.join(&file_name), content).await?;
                info!("Saved content to {file_name}");
                succeeded += 1;
                summary_entry(index, url, Some(&file_name))
            }
            Err(e) => {
                warn!("Failed to extract content from {url}: {e}");
                summary_entry(index, url, None)
            }
        };
        summary.write_all(entry.as_bytes()).await?;
    }
    summary.flush().await?;

    let report = CrawlReport {
        output_dir,
        summary_path,
        total,
        succeeded,
        failed: total - succeeded,
    };
    info!(
        "Crawl finished: {} of {} articles saved",
        report.succeeded, report.total
    );
    Ok(report)
}

/// Runs the whole crawl stage for one category.
///
/// The browser is closed once the listing walk ends, whatever its outcome. A
/// failed walk is logged and treated as an empty category. Returns `Ok(None)`
/// when no article links were found, in which case nothing is written.
pub async fn crawl_category<B>(
    browser: &mut B,
    client: &reqwest::Client,
    category_url: &str,
    config: &CrawlerConfig,
) -> Result<Option<CrawlReport>, CrawlError>
where
    B: ListingBrowser + ?Sized,
{
    let walk = collect_article_links(&mut *browser, category_url, config).await;
    browser.close().await;

    let links = match walk {
        Ok(links) => links,
        Err(e) => {
            error!("An error occurred while processing the category page: {e}");
            Vec::new()
        }
    };

    if links.is_empty() {
        warn!("No articles found in the category");
        return Ok(None);
    }
    info!("Found {} articles in total", links.len());

    crawl_articles(client, &links, &config.output_root, &config.article)
        .await
        .map(Some)
}
