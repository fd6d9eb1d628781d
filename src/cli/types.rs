use clap::builder::TypedValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::fetch::{FetchConfig, HttpPageFetcher, MAX_PAGE_CHARS};
use crate::lookup::{DocLookup, LookupConfig, MAX_OUTPUT_CHARS};
use crate::search::{DEFAULT_NUM_RESULTS, SERPER_URL, SearchConfig, SerperClient};

/// Documentation lookup MCP server
///
/// Serves a single `get_doc` tool over stdio. Each call searches one
/// catalogued documentation site through the Serper API, fetches the top
/// result pages and returns their combined plain text.
///
/// Built-in libraries:
/// - flutter: docs.flutter.dev
/// - stackoverflow: stackoverflow.com
#[derive(Parser, Debug)]
#[command(name = "docs-lookup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Serper API key used for every search
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    pub serper_api_key: Option<String>,

    /// Search endpoint
    #[arg(long, value_name = "URL", env = "SERPER_URL", default_value = SERPER_URL)]
    pub serper_url: String,

    /// Load the library catalog from a JSON file
    ///
    /// JSON format:
    /// ```json
    /// {
    ///   "libraries": {
    ///     "flutter": "docs.flutter.dev",
    ///     "stackoverflow": "stackoverflow.com"
    ///   }
    /// }
    /// ```
    ///
    /// Defaults to ~/.config/docs-lookup/catalog.json when present,
    /// otherwise the built-in catalog.
    #[arg(long, value_name = "PATH", env = "DOCS_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// List catalogued libraries and exit
    #[arg(long)]
    pub list_libraries: bool,

    /// Number of search results to fetch per lookup
    #[arg(long, value_name = "COUNT", default_value_t = DEFAULT_NUM_RESULTS,
          value_parser = clap::value_parser!(u16).range(1..=100).map(usize::from))]
    pub num_results: usize,

    /// Search request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value = "120")]
    pub search_timeout: u64,

    /// Per-page fetch timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value = "30")]
    pub fetch_timeout: u64,

    /// Maximum characters kept from each fetched page
    #[arg(long, value_name = "CHARS", default_value_t = MAX_PAGE_CHARS)]
    pub max_page_chars: usize,

    /// Maximum characters in the combined excerpt
    #[arg(long, value_name = "CHARS", default_value_t = MAX_OUTPUT_CHARS)]
    pub max_output_chars: usize,

    /// Pages fetched at once (1 = strictly sequential)
    #[arg(long, value_name = "COUNT", default_value = "1",
          value_parser = clap::value_parser!(u16).range(1..=32).map(usize::from))]
    pub fetch_concurrency: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single lookup and print the response envelope as JSON
    Lookup {
        /// Catalogued library to search
        #[arg(long, short)]
        library: String,

        /// Search query
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

impl Cli {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            endpoint: self.serper_url.clone(),
            api_key: self.serper_api_key.clone(),
            timeout: Duration::from_secs(self.search_timeout),
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.fetch_timeout),
            max_chars: self.max_page_chars,
            ..FetchConfig::default()
        }
    }

    pub fn lookup_config(&self) -> LookupConfig {
        LookupConfig {
            num_results: self.num_results,
            max_output_chars: self.max_output_chars,
            fetch_concurrency: self.fetch_concurrency,
        }
    }

    /// Build the lookup tool with HTTP-backed search and fetch
    pub fn build_lookup(
        &self,
        catalog: Catalog,
    ) -> anyhow::Result<DocLookup<SerperClient, HttpPageFetcher>> {
        let search = SerperClient::new(self.search_config())?;
        let fetcher = HttpPageFetcher::new(self.fetch_config())?;
        Ok(DocLookup::new(catalog, search, fetcher).with_config(self.lookup_config()))
    }
}
