//! Remote page fetching
//!
//! The selection engine never talks to the network itself. It consumes a
//! [`PageFetcher`], which turns a 1-based page index and a page size into one
//! page of records plus the collection's current total. Retries, backoff and
//! timeouts live behind this trait.
//!
//! - [`http::HttpFetcher`]: blocking HTTP client for JSON collection APIs
//! - [`mock::MockFetcher`]: in-memory collection with scripted failures

pub mod error;
pub mod http;
pub mod mock;

pub use error::{FetchError, Result};
pub use http::HttpFetcher;
pub use mock::MockFetcher;

use crate::record::Record;

/// One page of the remote collection as returned by a fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Records of the page in collection order
    pub records: Vec<Record>,

    /// Size of the whole collection as the source sees it right now
    pub total_records: usize,
}

impl FetchedPage {
    /// Reject pages that break the `records.len() <= page_size` contract
    ///
    /// # Errors
    ///
    /// Returns `FetchError::OversizedPage` if the source returned too many records.
    pub fn check_size(&self, page_size: usize) -> Result<()> {
        if self.records.len() > page_size {
            return Err(FetchError::OversizedPage {
                returned: self.records.len(),
                page_size,
            });
        }
        Ok(())
    }
}

/// Source of pages for the selection engine
///
/// Implementations must return at most `page_size` records and report the
/// source's current total. A failed call must not have side effects visible
/// to the caller.
pub trait PageFetcher {
    /// Fetch page `page_index` (1-based) of `page_size` records
    ///
    /// # Errors
    ///
    /// Returns `FetchError` on transport, status or decoding failure.
    fn fetch_page(&self, page_index: usize, page_size: usize) -> Result<FetchedPage>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch_page(&self, page_index: usize, page_size: usize) -> Result<FetchedPage> {
        (**self).fetch_page(page_index, page_size)
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    fn fetch_page(&self, page_index: usize, page_size: usize) -> Result<FetchedPage> {
        (**self).fetch_page(page_index, page_size)
    }
}
