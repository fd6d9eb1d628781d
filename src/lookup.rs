//! `get_doc`: site-scoped search, best-effort page fetch, bounded excerpt.
//!
//! ## Pipeline
//!
//! 1. Resolve `library` through the [`Catalog`]; unknown identifiers fail
//!    before any network call.
//! 2. Search `site:<domain> <query>`. A search failure ends the request.
//! 3. Fetch every hit in provider order. Links that fail are skipped; the
//!    request only fails when no link produced text.
//! 4. Join the collected texts with a space and cap the total length.
//!
//! Panics anywhere in the pipeline are caught in [`DocLookup::get_doc`] and
//! reported as [`DocsError::Internal`].

use futures::FutureExt;
use futures::future::join_all;
use std::any::Any;
use std::panic::AssertUnwindSafe;

use crate::catalog::Catalog;
use crate::error::{DocsError, Envelope};
use crate::extract::truncate_chars;
use crate::fetch::PageFetcher;
use crate::search::{DEFAULT_NUM_RESULTS, SearchHit, SearchProvider};

/// Cap on the combined excerpt returned to the caller
pub const MAX_OUTPUT_CHARS: usize = 10_000;

/// Tunables for [`DocLookup`]
#[derive(Debug, Clone)]
pub struct LookupConfig {
    /// Results requested from the search provider
    pub num_results: usize,
    /// Cap on the joined excerpt
    pub max_output_chars: usize,
    /// Pages fetched at once. 1 fetches strictly one after another.
    pub fetch_concurrency: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            num_results: DEFAULT_NUM_RESULTS,
            max_output_chars: MAX_OUTPUT_CHARS,
            fetch_concurrency: 1,
        }
    }
}

/// Documentation lookup tool
#[derive(Debug, Clone)]
pub struct DocLookup<S, F> {
    catalog: Catalog,
    search: S,
    fetcher: F,
    config: LookupConfig,
}

impl<S, F> DocLookup<S, F>
where
    S: SearchProvider + Sync,
    F: PageFetcher + Sync,
{
    pub fn new(catalog: Catalog, search: S, fetcher: F) -> Self {
        Self {
            catalog,
            search,
            fetcher,
            config: LookupConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: LookupConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn search_provider(&self) -> &S {
        &self.search
    }

    pub fn page_fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Build `site:<domain> <query>` for a catalogued library
    pub fn scoped_query(&self, query: &str, library: &str) -> Result<String, DocsError> {
        let domain = self
            .catalog
            .domain(library)
            .ok_or_else(|| DocsError::unsupported_library(self.catalog.libraries()))?;
        Ok(format!("site:{domain} {query}"))
    }

    /// Run the lookup and wrap the outcome in an [`Envelope`].
    ///
    /// Never panics: a panic inside the pipeline becomes an internal error.
    pub async fn get_doc(&self, query: &str, library: &str) -> Envelope<String> {
        let outcome = AssertUnwindSafe(self.lookup(query, library))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(DocsError::Internal(panic_message(&*panic))));

        if let Err(ref err) = outcome {
            log::warn!("get_doc(library={library}) failed: {err}");
        }
        outcome.into()
    }

    /// The lookup pipeline with errors as values
    pub async fn lookup(&self, query: &str, library: &str) -> Result<String, DocsError> {
        let site_query = self.scoped_query(query, library)?;

        let hits = self.search.search(&site_query, self.config.num_results).await?;
        if hits.is_empty() {
            return Err(DocsError::NoResults);
        }

        let pages = self.fetch_all(&hits).await;
        if pages.is_empty() {
            return Err(DocsError::NoContent);
        }

        log::info!(
            "Collected content from {}/{} results for '{site_query}'",
            pages.len(),
            hits.len()
        );

        let combined = pages.join(" ");
        Ok(truncate_chars(&combined, self.config.max_output_chars).to_string())
    }

    /// Fetch every hit, keeping successful non-empty pages in hit order
    async fn fetch_all(&self, hits: &[SearchHit]) -> Vec<String> {
        let batch = self.config.fetch_concurrency.max(1);
        let mut pages = Vec::with_capacity(hits.len());

        for chunk in hits.chunks(batch) {
            let fetched = join_all(chunk.iter().map(|hit| self.fetch_hit(hit))).await;
            pages.extend(fetched.into_iter().flatten());
        }

        pages
    }

    async fn fetch_hit(&self, hit: &SearchHit) -> Option<String> {
        match hit.url() {
            Some(link) => self.fetch_one(link).await,
            None => {
                log::warn!("Skipping result without a link");
                None
            }
        }
    }

    async fn fetch_one(&self, link: &str) -> Option<String> {
        match self.fetcher.fetch(link).await {
            Ok(text) if !text.is_empty() => Some(text),
            Ok(_) => {
                log::warn!("Skipping {link}: no text extracted");
                None
            }
            Err(err) => {
                log::warn!("Skipping {link}: {err}");
                None
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
