//! Error taxonomy and the response envelope returned by `get_doc`.
//!
//! Every failure the lookup pipeline can produce maps to one [`DocsError`]
//! variant with a stable JSON-RPC style code. [`Envelope`] is the only shape
//! that crosses the tool boundary: exactly one of `result` / `error` is set.

use serde::{Deserialize, Serialize};

/// Unsupported `library` argument.
pub const INVALID_PARAMS: i32 = -32602;
/// Search provider unreachable, non-2xx, or unparsable.
pub const SEARCH_FAILED: i32 = -32000;
/// A single page could not be fetched.
pub const FETCH_FAILED: i32 = -32001;
/// Search succeeded with zero organic results.
pub const NO_RESULTS: i32 = -32004;
/// Every result link failed to produce text.
pub const NO_CONTENT: i32 = -32005;
/// Fault caught at the tool boundary.
pub const INTERNAL_ERROR: i32 = -32603;

/// Failures of the documentation lookup pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocsError {
    #[error("{0}")]
    InvalidParams(String),

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Failed to fetch URL: {0}")]
    FetchFailed(String),

    #[error("No results found")]
    NoResults,

    #[error("Could not fetch any content")]
    NoContent,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocsError {
    /// Build the error for a library identifier missing from the catalog
    pub fn unsupported_library<'a>(choices: impl IntoIterator<Item = &'a str>) -> Self {
        let choices: Vec<&str> = choices.into_iter().collect();
        Self::InvalidParams(format!(
            "Unsupported library. Choose from: {}",
            choices.join(", ")
        ))
    }

    /// Stable numeric code reported to the host
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidParams(_) => INVALID_PARAMS,
            Self::SearchFailed(_) => SEARCH_FAILED,
            Self::FetchFailed(_) => FETCH_FAILED,
            Self::NoResults => NO_RESULTS,
            Self::NoContent => NO_CONTENT,
            Self::Internal(_) => INTERNAL_ERROR,
        }
    }
}

/// Error record carried inside an [`Envelope`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
}

impl From<&DocsError> for ErrorObject {
    fn from(err: &DocsError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// JSON-RPC 2.0 shaped response wrapper.
///
/// `id` is always null; the transport owns request correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub jsonrpc: String,
    pub result: Option<T>,
    pub error: Option<ErrorObject>,
    pub id: Option<serde_json::Value>,
}

impl<T> Envelope<T> {
    pub fn success(result: T) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id: None,
        }
    }

    pub fn failure(err: &DocsError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(err.into()),
            id: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> From<Result<T, DocsError>> for Envelope<T> {
    fn from(result: Result<T, DocsError>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(err) => Self::failure(&err),
        }
    }
}
