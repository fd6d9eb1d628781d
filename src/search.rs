//! Serper search client.
//!
//! One authenticated POST per query; the provider's `organic` list is returned
//! in provider order. A null or missing `organic` is an empty list, and
//! malformed entries become hits without a link. Request and decoding
//! failures become [`DocsError::SearchFailed`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use std::future::Future;
use std::time::Duration;

use crate::error::DocsError;

/// Serper Google search endpoint
pub const SERPER_URL: &str = "https://google.serper.dev/search";

/// User agent sent with every outbound request
pub const USER_AGENT: &str = "docs-app/1.0";

/// Number of results requested when the caller does not say otherwise
pub const DEFAULT_NUM_RESULTS: usize = 5;

/// One organic search result. Only `link` drives the pipeline; the rest is
/// provider metadata and tolerates nulls or unexpected types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "string_or_none")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,
}

impl SearchHit {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            ..Self::default()
        }
    }

    /// The result link, if the provider sent a non-empty one
    pub fn url(&self) -> Option<&str> {
        self.link.as_deref().filter(|link| !link.is_empty())
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Option<Vec<Value>>,
}

impl SerperResponse {
    /// Entries that are not objects become link-less hits so positions hold
    fn into_hits(self) -> Vec<SearchHit> {
        self.organic
            .unwrap_or_default()
            .into_iter()
            .map(|entry| serde_json::from_value(entry).unwrap_or_default())
            .collect()
    }
}

/// Source of search results for a site-scoped query
pub trait SearchProvider {
    fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> impl Future<Output = Result<Vec<SearchHit>, DocsError>> + Send;
}

/// Configuration for [`SerperClient`]
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Endpoint the query is POSTed to
    pub endpoint: String,
    /// `X-API-KEY` header value. Searches fail until one is provided.
    pub api_key: Option<String>,
    /// Timeout for the whole request
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: SERPER_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Search client for the Serper API
#[derive(Debug, Clone)]
pub struct SerperClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl SerperClient {
    pub fn new(config: SearchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl SearchProvider for SerperClient {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>, DocsError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(search_failed("SERPER_API_KEY is not set"));
        };

        log::info!("Searching: {query}");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .json(&json!({ "q": query, "num": num_results }))
            .send()
            .await
            .map_err(search_failed)?
            .error_for_status()
            .map_err(search_failed)?;

        let data: SerperResponse = response.json().await.map_err(search_failed)?;
        let hits = data.into_hits();

        log::debug!("Search returned {} organic results", hits.len());
        Ok(hits)
    }
}

fn search_failed(cause: impl std::fmt::Display) -> DocsError {
    let err = DocsError::SearchFailed(cause.to_string());
    log::error!("{err}");
    err
}
