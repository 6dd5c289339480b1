//! Pagesel - cross-page selection over paginated remote collections
//!
//! This library keeps a selection of records that is independent of the page
//! currently loaded from a remote source, reconciles it against whatever page
//! is shown, and can bulk-select the first N records of the whole collection
//! by walking forward through pages.
//!
//! # Layout
//!
//! - `record`: opaque records identified by a stable id
//! - `fetch`: the `PageFetcher` boundary (HTTP and in-memory implementations)
//! - `selection`: the global, page-independent selection set
//! - `page`: the currently materialized page
//! - `reconcile`: selection ⇄ current page
//! - `bulk`: "select first N" walk
//! - `session`: the command surface tying it all together
//!
//! # Example
//!
//! ```
//! use pagesel::fetch::MockFetcher;
//! use pagesel::session::BrowseSession;
//!
//! let mut session = BrowseSession::open(MockFetcher::with_sequential_ids(30), 12).unwrap();
//! session.bulk_select(20).unwrap();
//! session.navigate_to_page(2).unwrap();
//! assert_eq!(session.current_selection().len(), 8);
//! assert_eq!(session.selected_count(), 20);
//! ```

use thiserror::Error;

pub mod bulk;
pub mod cli;
pub mod commands;
pub mod config;
pub mod fetch;
pub mod logger;
pub mod output;
pub mod page;
pub mod reconcile;
pub mod record;
pub mod selection;
pub mod session;

#[cfg(test)]
pub mod testing;

pub use record::{Record, RecordId};
pub use selection::SelectionSet;
pub use session::{BrowseSession, SessionError};

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum PageselError {
    /// Session error
    #[error("{0}")]
    Session(#[from] session::SessionError),
    /// Fetch error outside a session (e.g. building the HTTP client)
    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
