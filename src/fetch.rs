//! Page fetcher: GET a result link and reduce it to bounded plain text.

use std::future::Future;
use std::time::Duration;

use crate::error::DocsError;
use crate::extract::{html_to_text, truncate_chars};
use crate::search::USER_AGENT;

/// Per-page cap on extracted characters
pub const MAX_PAGE_CHARS: usize = 15_000;

/// Retrieves a URL and returns its extracted text
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, DocsError>> + Send;
}

/// Configuration for [`HttpPageFetcher`]
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout per page. Kept well below the search timeout since several
    /// pages are fetched per lookup.
    pub timeout: Duration,
    /// Maximum characters kept from a single page
    pub max_chars: usize,
    /// Redirect hops followed before giving up
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_chars: MAX_PAGE_CHARS,
            max_redirects: 10,
        }
    }
}

/// [`PageFetcher`] backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: reqwest::Client,
    max_chars: usize,
}

impl HttpPageFetcher {
    pub fn new(config: FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            max_chars: config.max_chars,
        })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}

impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, DocsError> {
        let parsed = url::Url::parse(url)
            .map_err(|e| fetch_failed(url, format!("invalid URL '{url}': {e}")))?;

        log::debug!("Fetching {url}");

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| fetch_failed(url, e))?
            .error_for_status()
            .map_err(|e| fetch_failed(url, e))?;

        // Charset from Content-Type wins; UTF-8 otherwise
        let body = response
            .text_with_charset("utf-8")
            .await
            .map_err(|e| fetch_failed(url, e))?;

        let text = html_to_text(&body);
        Ok(truncate_chars(&text, self.max_chars).to_string())
    }
}

fn fetch_failed(url: &str, cause: impl std::fmt::Display) -> DocsError {
    let err = DocsError::FetchFailed(cause.to_string());
    log::debug!("Error fetching {url}: {err}");
    err
}
