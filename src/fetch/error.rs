//! Page fetch error types
//!
//! Every failure a [`PageFetcher`](super::PageFetcher) can report. The
//! selection engine treats all of them the same way: the page view is left
//! untouched and the error is surfaced to the caller.
//!
//! # Error Types
//!
//! - **`Http`**: transport failure from the HTTP client (connect, timeout, TLS)
//! - **`Status`**: the server answered with a non-success status
//! - **`Decode`**: the response body was not the expected page JSON
//! - **`OversizedPage`**: the source returned more records than requested
//! - **`InvalidRequest`**: page index or page size out of range
//! - **`Unavailable`**: any other transport-level failure

use thiserror::Error;

/// Errors produced while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport error from the HTTP client
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// Response body could not be decoded
    #[error("Error while decoding page: {0}")]
    Decode(#[from] serde_json::Error),

    /// Source returned more records than the page size allows
    #[error("Source returned {returned} records for a page of {page_size}")]
    OversizedPage { returned: usize, page_size: usize },

    /// Page index or size out of range
    #[error("Invalid page request: {0}")]
    InvalidRequest(String),

    /// Source could not be reached
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

impl FetchError {
    /// Whether retrying the same request may succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Unavailable(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) | Self::OversizedPage { .. } | Self::InvalidRequest(_) => false,
        }
    }
}

/// Result type for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
