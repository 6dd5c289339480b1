//! Page view state
//!
//! The currently materialized page. A [`PageView`] is replaced wholesale
//! on every successful fetch and never patched in place, so a half-applied
//! page can't be observed.

use crate::fetch::FetchedPage;
use crate::record::{Record, RecordId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// The page currently shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    /// 1-based page index
    pub page_index: usize,

    /// Records per page used for the fetch
    pub page_size: usize,

    /// Records of the page in collection order (`len() <= page_size`)
    pub records: Vec<Record>,

    /// Collection size reported by the most recent fetch
    pub total_records: usize,

    /// When this page was fetched (`None` until the first fetch)
    pub fetched_at: Option<DateTime<Utc>>,
}

impl PageView {
    /// Placeholder view before anything was fetched
    #[must_use]
    pub const fn empty(page_size: usize) -> Self {
        Self {
            page_index: 1,
            page_size,
            records: Vec::new(),
            total_records: 0,
            fetched_at: None,
        }
    }

    /// Build the view for a fetched page
    #[must_use]
    pub fn from_fetched(page_index: usize, page_size: usize, page: FetchedPage) -> Self {
        Self {
            page_index,
            page_size,
            records: page.records,
            total_records: page.total_records,
            fetched_at: Some(Utc::now()),
        }
    }

    /// Whether a page has been fetched
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.fetched_at.is_some()
    }

    /// Ids present on this page
    #[must_use]
    pub fn record_ids(&self) -> HashSet<RecordId> {
        self.records.iter().map(|record| record.id.clone()).collect()
    }

    /// Number of pages in the collection at the current page size
    #[must_use]
    pub const fn page_count(&self) -> usize {
        page_count(self.total_records, self.page_size)
    }
}

/// Pages needed to hold `total_records` at `page_size`
#[must_use]
pub const fn page_count(total_records: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_records.div_ceil(page_size)
    }
}

/// Ticket for an issued page request
///
/// Tokens increase monotonically per session; only the response to the
/// most recently issued ticket may replace the page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Monotonic request token
    pub token: u64,

    /// Requested page (1-based)
    pub page_index: usize,

    /// Requested page size
    pub page_size: usize,
}
