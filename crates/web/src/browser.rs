//! # Listing Browser
//!
//! The crawler only needs a handful of page interactions on listing pages:
//! load a URL, wait for an element, read attributes and follow a link. They
//! are expressed by the [`ListingBrowser`] trait so the pagination walk does
//! not care what drives the page.
//!
//! [`HttpListingBrowser`] is the bundled implementation. It fetches each page
//! with a plain HTTP GET and evaluates selectors against the returned HTML,
//! which is enough for server-rendered listings. It does not run JavaScript,
//! so content that a listing builds in the browser is never seen.

use crate::CrawlError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Page interactions used by the pagination walk.
#[async_trait]
pub trait ListingBrowser: Send {
    /// Loads `url` as the current page.
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlError>;

    /// Waits until an element matching `selector` is present on the current page.
    ///
    /// Implementations that render pages may poll. [`HttpListingBrowser`] runs
    /// no scripts and checks the fetched HTML once.
    async fn wait_for(&mut self, selector: &str) -> Result<(), CrawlError>;

    /// Returns `attribute` of every element matching `selector`, in document
    /// order. `href` values are resolved to absolute URLs.
    fn query_attribute(&self, selector: &str, attribute: &str) -> Result<Vec<String>, CrawlError>;

    /// Clicks the first element matching `selector`.
    ///
    /// Returns `Ok(false)` when there is nothing to click.
    async fn click(&mut self, selector: &str) -> Result<bool, CrawlError>;

    /// URL of the current page, if one has been loaded.
    fn current_url(&self) -> Option<&str>;

    /// Releases the browser. Further calls behave as if no page was loaded.
    async fn close(&mut self);
}

/// Builds the HTTP client used for crawling.
///
/// Certificate validation is disabled: the target site serves an incomplete
/// certificate chain.
pub fn build_http_client(timeout: Option<Duration>) -> Result<reqwest::Client, CrawlError> {
    let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(true);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(CrawlError::ClientBuild)
}

struct LoadedPage {
    url: Url,
    html: String,
}

/// A [`ListingBrowser`] backed by HTTP requests and static HTML parsing.
///
/// No JavaScript is executed. `wait_for` succeeds only when the element is in
/// the HTML the server returned, and fails at once otherwise.
pub struct HttpListingBrowser {
    client: reqwest::Client,
    page: Option<LoadedPage>,
}

impl std::fmt::Debug for HttpListingBrowser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpListingBrowser")
            .field("current_url", &self.current_url())
            .finish()
    }
}

impl HttpListingBrowser {
    /// Creates a browser whose page loads give up after `render_timeout`.
    pub fn new(render_timeout: Duration) -> Result<Self, CrawlError> {
        Ok(Self::with_client(build_http_client(Some(render_timeout))?))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client, page: None }
    }

    fn page(&self) -> Result<&LoadedPage, CrawlError> {
        self.page.as_ref().ok_or(CrawlError::NoPageLoaded)
    }

    fn resolve(&self, base: &Url, href: &str) -> Result<String, CrawlError> {
        base.join(href)
            .map(String::from)
            .map_err(|e| CrawlError::InvalidUrl {
                url: href.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl ListingBrowser for HttpListingBrowser {
    async fn navigate(&mut self, url: &str) -> Result<(), CrawlError> {
        debug!("Loading page: {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let final_url = response.url().clone();
        let html = response.text().await?;
        self.page = Some(LoadedPage {
            url: final_url,
            html,
        });
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str) -> Result<(), CrawlError> {
        let page = self.page()?;
        if newsqa_html::has_element(&page.html, selector)? {
            Ok(())
        } else {
            Err(CrawlError::ElementNotFound(selector.to_string()))
        }
    }

    fn query_attribute(&self, selector: &str, attribute: &str) -> Result<Vec<String>, CrawlError> {
        let page = self.page()?;
        let values = newsqa_html::select_attribute(&page.html, selector, attribute)?;
        if attribute != "href" {
            return Ok(values);
        }
        values
            .iter()
            .map(|href| self.resolve(&page.url, href))
            .collect()
    }

    async fn click(&mut self, selector: &str) -> Result<bool, CrawlError> {
        let target = {
            let page = self.page()?;
            match newsqa_html::select_attribute(&page.html, selector, "href")?.first() {
                Some(href) => self.resolve(&page.url, href)?,
                None => return Ok(false),
            }
        };
        self.navigate(&target).await?;
        Ok(true)
    }

    fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|page| page.url.as_str())
    }

    async fn close(&mut self) {
        debug!("Closing listing browser");
        self.page = None;
    }
}
