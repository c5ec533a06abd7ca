//! Error types for the search crate.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while feeding the search engine.
///
/// Malformed records never show up here: every coercion in the hydrator has a
/// deterministic fallback, so bad upstream data only degrades ranking.
#[derive(Debug, Error)]
pub enum SearchError {
    /// An injected catalog source rejected the request
    #[error("{source_kind} source failed: {reason}")]
    SourceFetchFailed {
        /// Which source failed
        source_kind: SourceKind,
        /// Human-readable failure reason
        reason: String,
    },

    /// A catalog source did not answer within the configured timeout
    #[error("{source_kind} source timed out after {elapsed_ms}ms")]
    SourceTimeout {
        /// Which source timed out
        source_kind: SourceKind,
        /// Timeout that elapsed
        elapsed_ms: u64,
    },

    /// A catalog document could not be parsed
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The two upstream catalog sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Menu-item provider
    Menu,
    /// Restaurant provider
    Restaurants,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Menu => write!(f, "menu"),
            SourceKind::Restaurants => write!(f, "restaurants"),
        }
    }
}

impl SearchError {
    /// Create a fetch failure for a source.
    pub fn fetch_failed(source_kind: SourceKind, reason: impl Into<String>) -> Self {
        Self::SourceFetchFailed {
            source_kind,
            reason: reason.into(),
        }
    }
}
