//! Command implementations
//!
//! Each command is a module with an execute function that takes the resolved
//! configuration and runs against a page fetcher. Commands are generic over
//! the fetcher and the output writer so they can be driven by tests.

pub mod browse;
pub mod config;
pub mod page;
pub mod select;

// Re-export execute functions for convenience
pub use browse::execute as browse;
pub use config::execute as config;
pub use page::execute as page;
pub use select::execute as select;

use crate::PageselError;
use crate::config::PageselConfig;
use crate::fetch::HttpFetcher;
use std::time::Duration;

/// Build the HTTP fetcher described by `config`
///
/// # Errors
///
/// Returns `PageselError::Fetch` if the HTTP client cannot be created.
pub fn build_fetcher(config: &PageselConfig) -> Result<HttpFetcher, PageselError> {
    Ok(
        HttpFetcher::new(config.base_url.clone(), Duration::from_secs(config.timeout_secs))?
            .with_fields(config.columns.clone())
            .with_max_retries(config.max_retries),
    )
}
