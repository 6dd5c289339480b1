//! Mock page fetcher for testing
//!
//! Serves pages from an in-memory collection so the selection engine can be
//! exercised deterministically, without any network.

use super::error::{FetchError, Result};
use super::{FetchedPage, PageFetcher};
use crate::record::Record;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

/// In-memory fetcher with scripted failures
///
/// Every call is recorded as `(page_index, page_size)` so tests can assert
/// how many pages a walk actually touched.
#[derive(Debug, Default)]
pub struct MockFetcher {
    records: RefCell<Vec<Record>>,
    reported_total: Cell<Option<usize>>,
    failing_pages: RefCell<HashSet<usize>>,
    fail_after: Cell<Option<usize>>,
    calls: RefCell<Vec<(usize, usize)>>,
}

impl MockFetcher {
    /// Create a fetcher serving the given records in order
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    /// Create a fetcher over records with ids `1..=count`
    #[must_use]
    pub fn with_sequential_ids(count: u32) -> Self {
        Self::new(
            (1..=count)
                .map(|i| Record::new(i).with_field("title", format!("Record {i}")))
                .collect(),
        )
    }

    /// Fail every request for `page_index`
    pub fn fail_on_page(&self, page_index: usize) {
        self.failing_pages.borrow_mut().insert(page_index);
    }

    /// Fail every request once `calls` requests have been served
    pub fn fail_after_calls(&self, calls: usize) {
        self.fail_after.set(Some(calls));
    }

    /// Remove all scripted failures
    pub fn clear_failures(&self) {
        self.failing_pages.borrow_mut().clear();
        self.fail_after.set(None);
    }

    /// Report `total` instead of the real collection length
    ///
    /// Simulates a source whose count disagrees with its data.
    pub fn report_total(&self, total: Option<usize>) {
        self.reported_total.set(total);
    }

    /// Swap the served collection
    pub fn replace_records(&self, records: Vec<Record>) {
        *self.records.borrow_mut() = records;
    }

    /// Requests served so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<(usize, usize)> {
        self.calls.borrow().clone()
    }

    /// Number of requests served so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl PageFetcher for MockFetcher {
    fn fetch_page(&self, page_index: usize, page_size: usize) -> Result<FetchedPage> {
        let previous_calls = self.call_count();
        self.calls.borrow_mut().push((page_index, page_size));

        if page_index == 0 || page_size == 0 {
            return Err(FetchError::InvalidRequest(format!(
                "page {page_index} of size {page_size}"
            )));
        }
        if self.failing_pages.borrow().contains(&page_index) {
            return Err(FetchError::Unavailable(format!("page {page_index} unavailable")));
        }
        if self.fail_after.get().is_some_and(|limit| previous_calls >= limit) {
            return Err(FetchError::Unavailable("connection reset".into()));
        }

        let records = self.records.borrow();
        let start = (page_index - 1).saturating_mul(page_size).min(records.len());
        let end = start.saturating_add(page_size).min(records.len());

        Ok(FetchedPage {
            records: records[start..end].to_vec(),
            total_records: self.reported_total.get().unwrap_or(records.len()),
        })
    }
}
