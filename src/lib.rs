//! Documentation lookup over MCP.
//!
//! `get_doc(query, library)` searches a catalogued documentation site through
//! the Serper API, fetches the top result pages, reduces them to plain text and
//! returns a bounded excerpt wrapped in an [`Envelope`](error::Envelope).
//!
//! ```no_run
//! use docs_lookup::catalog::Catalog;
//! use docs_lookup::fetch::{FetchConfig, HttpPageFetcher};
//! use docs_lookup::lookup::DocLookup;
//! use docs_lookup::search::{SearchConfig, SerperClient};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let search = SerperClient::new(SearchConfig {
//!     api_key: std::env::var("SERPER_API_KEY").ok(),
//!     ..SearchConfig::default()
//! })?;
//! let fetcher = HttpPageFetcher::new(FetchConfig::default())?;
//! let lookup = DocLookup::new(Catalog::builtin(), search, fetcher);
//!
//! let envelope = lookup.get_doc("gesture detector", "flutter").await;
//! println!("{}", serde_json::to_string_pretty(&envelope)?);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod lookup;
pub mod search;
pub mod stdio;

pub use catalog::Catalog;
pub use error::{DocsError, Envelope, ErrorObject};
pub use lookup::DocLookup;
