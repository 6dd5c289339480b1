//! Bulk selection - "select the first N records"
//!
//! Grows the selection by walking the collection in natural order
//! (page 1 row 1, page 1 row 2, ..., page 2 row 1, ...) and adding records
//! that are not selected yet, until one of these holds:
//!
//! - `target` new records were added by this walk
//! - every record of the collection was scanned (latest reported total)
//! - the source returned an empty page
//! - a fetch failed
//!
//! Pages are fetched strictly one after another because each stopping
//! decision depends on the previous response. Additions are buffered and
//! committed with a single `upsert_many`, so nothing of a walk is visible
//! before it ends. If a fetch fails, the additions gathered from the pages
//! that were fully received are still committed and the error reports how
//! many that were.
//!
//! "First N" uses the page size active at call time. Changing the page size
//! between walks shifts which records a later walk reaches first.

use crate::fetch::{FetchError, FetchedPage, PageFetcher};
use crate::record::{Record, RecordId};
use crate::selection::SelectionSet;
use std::collections::HashSet;
use thiserror::Error;

/// Errors from bulk selection
#[derive(Debug, Error)]
pub enum BulkError {
    /// Target is not a number
    #[error("Invalid bulk-select target: '{0}'")]
    InvalidTarget(String),

    /// A fetch failed mid-walk; `added` selections were committed before it
    #[error("Bulk select aborted after {added} new selection(s) on page {failed_page}: {source}")]
    Aborted {
        added: usize,
        failed_page: usize,
        #[source]
        source: FetchError,
    },
}

/// Parse user input into a bulk-select target
///
/// Negative numbers are accepted and mean "select nothing". Fractions are
/// rounded down.
///
/// # Errors
///
/// Returns `BulkError::InvalidTarget` for non-numeric, NaN or infinite input.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_target(input: &str) -> Result<usize, BulkError> {
    let trimmed = input.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(if n <= 0 {
            0
        } else {
            usize::try_from(n).unwrap_or(usize::MAX)
        });
    }

    match trimmed.parse::<f64>() {
        Ok(x) if x.is_finite() => {
            if x <= 0.0 {
                Ok(0)
            } else {
                Ok(x.floor() as usize)
            }
        }
        _ => Err(BulkError::InvalidTarget(input.to_string())),
    }
}

/// Summary of a completed walk
#[derive(Debug, Default)]
pub struct BulkOutcome {
    /// Requested number of new selections
    pub target: usize,

    /// New selections actually committed
    pub added: usize,

    /// Pages fetched by the walk
    pub pages_scanned: usize,

    /// Records inspected before the walk stopped
    pub records_scanned: usize,

    /// The collection ran out before `target` was reached
    pub exhausted: bool,

    /// The page the caller asked to keep, if the walk fetched it
    pub retained_page: Option<FetchedPage>,

    /// Reloading the displayed page after the walk failed; the selection
    /// changes are committed regardless
    pub refresh_error: Option<FetchError>,
}

/// Walks the collection to add the first unselected records
pub struct BulkSelector<'f, F: PageFetcher + ?Sized> {
    fetcher: &'f F,
    page_size: usize,
    retain_page: Option<usize>,
}

impl<'f, F: PageFetcher + ?Sized> BulkSelector<'f, F> {
    /// Create a selector walking pages of `page_size`
    #[must_use]
    pub const fn new(fetcher: &'f F, page_size: usize) -> Self {
        Self {
            fetcher,
            page_size,
            retain_page: None,
        }
    }

    /// Keep the response for `page_index` if the walk fetches it
    #[must_use]
    pub const fn retain_page(mut self, page_index: Option<usize>) -> Self {
        self.retain_page = page_index;
        self
    }

    /// Add up to `target` previously unselected records to `selection`
    ///
    /// # Errors
    ///
    /// Returns `BulkError::Aborted` if a page fetch fails. Additions from
    /// pages received before the failure are committed.
    pub fn run(&self, selection: &mut SelectionSet, target: usize) -> Result<BulkOutcome, BulkError> {
        let mut outcome = BulkOutcome {
            target,
            ..BulkOutcome::default()
        };
        if target == 0 || self.page_size == 0 {
            log::debug!("Bulk select with target {target} is a no-op");
            return Ok(outcome);
        }

        let mut batch: Vec<Record> = Vec::new();
        let mut batched: HashSet<RecordId> = HashSet::new();
        let mut total_records: Option<usize> = None;
        let mut records_fetched = 0usize;
        let mut page_index = 1usize;

        while batch.len() < target {
            if let Some(total) = total_records
                && records_fetched >= total
            {
                outcome.exhausted = true;
                break;
            }

            let page = match self.fetch(page_index) {
                Ok(page) => page,
                Err(source) => {
                    let added = batch.len();
                    selection.upsert_many(batch);
                    log::warn!("Bulk select aborted on page {page_index} after {added} addition(s)");
                    return Err(BulkError::Aborted {
                        added,
                        failed_page: page_index,
                        source,
                    });
                }
            };

            outcome.pages_scanned += 1;
            total_records = Some(page.total_records);
            records_fetched += page.records.len();

            if page.records.is_empty() {
                outcome.exhausted = true;
                break;
            }

            for record in &page.records {
                if batch.len() >= target {
                    break;
                }
                outcome.records_scanned += 1;
                if !selection.contains(&record.id) && batched.insert(record.id.clone()) {
                    batch.push(record.clone());
                }
            }

            log::debug!(
                "Bulk select page {page_index}: {}/{target} gathered, {records_fetched}/{} fetched",
                batch.len(),
                page.total_records
            );

            if self.retain_page == Some(page_index) {
                outcome.retained_page = Some(page);
            }
            page_index += 1;
        }

        outcome.added = batch.len();
        selection.upsert_many(batch);
        log::info!(
            "Bulk select added {} of {target} requested record(s) over {} page(s)",
            outcome.added,
            outcome.pages_scanned
        );
        Ok(outcome)
    }

    fn fetch(&self, page_index: usize) -> Result<FetchedPage, FetchError> {
        let page = self.fetcher.fetch_page(page_index, self.page_size)?;
        page.check_size(self.page_size)?;
        Ok(page)
    }
}
