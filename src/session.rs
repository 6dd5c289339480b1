//! Selection session
//!
//! [`BrowseSession`] owns the global [`SelectionSet`], the current
//! [`PageView`] and the [`PageFetcher`], and exposes the only entry points
//! that mutate them:
//!
//! - [`navigate_to_page`](BrowseSession::navigate_to_page)
//! - [`apply_user_toggle`](BrowseSession::apply_user_toggle)
//! - [`bulk_select`](BrowseSession::bulk_select)
//! - [`reset`](BrowseSession::reset)
//!
//! Any driver (terminal UI, test harness, script) works through these
//! commands and reads state back through [`snapshot`](BrowseSession::snapshot).
//!
//! # Request ordering
//!
//! Every page request gets a ticket with a monotonically increasing token.
//! Only the response to the latest ticket may replace the page view; an
//! older response is discarded with [`SessionError::StaleResponseDiscarded`].
//! Drivers that fetch on their own (for example from a worker) use
//! [`begin_navigation`](BrowseSession::begin_navigation) and
//! [`complete_navigation`](BrowseSession::complete_navigation); the
//! synchronous commands do both in one step.
//!
//! ```text
//! navigate_to_page(n)
//!     ↓
//! begin_navigation → ticket #k
//!     ↓
//! fetch_page(n, size)
//!     ↓
//! complete_navigation(ticket #k)
//!     ├─ k superseded  → discard
//!     ├─ fetch failed  → page view untouched, error surfaced
//!     └─ ok            → page view replaced, checked rows re-derived
//! ```

use crate::bulk::{self, BulkError, BulkOutcome, BulkSelector};
use crate::fetch::{self, FetchError, FetchedPage, PageFetcher};
use crate::page::{PageRequest, PageView};
use crate::reconcile;
use crate::record::Record;
use crate::selection::SelectionSet;

/// Session result type
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur during a selection session
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Bulk(#[from] BulkError),

    #[error("Discarded response to request {token}; request {latest} supersedes it")]
    StaleResponseDiscarded { token: u64, latest: u64 },

    #[error("Page {requested} is out of range (1..={page_count})")]
    InvalidPage { requested: usize, page_count: usize },

    #[error("Page size must be greater than zero, got {0}")]
    InvalidPageSize(usize),
}

impl SessionError {
    /// Whether this is the internal stale-response condition
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self, Self::StaleResponseDiscarded { .. })
    }
}

/// Read-only view of the session for rendering
#[derive(Debug)]
pub struct SessionSnapshot<'a> {
    /// The loaded page
    pub page: &'a PageView,

    /// Records of the page that are selected, in page order
    pub checked: Vec<Record>,

    /// Size of the global selection
    pub selected_count: usize,
}

impl SessionSnapshot<'_> {
    /// Whether the row at `offset` on the page is checked
    #[must_use]
    pub fn is_checked(&self, offset: usize) -> bool {
        self.page
            .records
            .get(offset)
            .is_some_and(|record| self.checked.iter().any(|c| c.id == record.id))
    }
}

/// Session-scoped selection state over a paginated remote collection
pub struct BrowseSession<F: PageFetcher> {
    fetcher: F,
    selection: SelectionSet,
    page: PageView,
    page_size: usize,
    latest_token: u64,
}

impl<F: PageFetcher> BrowseSession<F> {
    /// Create a session without fetching anything
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPageSize` if `page_size` is zero.
    pub fn new(fetcher: F, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(SessionError::InvalidPageSize(page_size));
        }
        Ok(Self {
            fetcher,
            selection: SelectionSet::new(),
            page: PageView::empty(page_size),
            page_size,
            latest_token: 0,
        })
    }

    /// Create a session and load the first page
    ///
    /// # Errors
    ///
    /// Returns an error if `page_size` is zero or the first fetch fails.
    pub fn open(fetcher: F, page_size: usize) -> Result<Self> {
        let mut session = Self::new(fetcher, page_size)?;
        session.navigate_to_page(1)?;
        Ok(session)
    }

    /// The page fetcher
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The loaded page
    #[must_use]
    pub const fn page_view(&self) -> &PageView {
        &self.page
    }

    /// Page size used for the next fetch
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages as of the last fetch
    #[must_use]
    pub const fn page_count(&self) -> usize {
        crate::page::page_count(self.page.total_records, self.page_size)
    }

    /// Global selection (read-only)
    #[must_use]
    pub const fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Selected records in insertion order
    #[must_use]
    pub fn selected_records(&self) -> &[Record] {
        self.selection.values()
    }

    /// Running count of selected records
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selection.size()
    }

    /// Records of the loaded page that are selected, in page order
    #[must_use]
    pub fn current_selection(&self) -> Vec<Record> {
        reconcile::derive_current_selection(&self.page, &self.selection)
    }

    /// Everything a view needs to render the session
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            page: &self.page,
            checked: self.current_selection(),
            selected_count: self.selection.size(),
        }
    }

    /// End the session, keeping the selection
    #[must_use]
    pub fn into_selection(self) -> SelectionSet {
        self.selection
    }

    /// Issue a ticket for `page_index`, superseding all earlier tickets
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPage` for page 0, or for a page past the
    /// end when the collection size is known.
    pub fn begin_navigation(&mut self, page_index: usize) -> Result<PageRequest> {
        let page_count = self.page_count();
        let past_end = self.page.is_loaded() && page_count > 0 && page_index > page_count;
        if page_index == 0 || past_end {
            return Err(SessionError::InvalidPage {
                requested: page_index,
                page_count,
            });
        }

        self.latest_token += 1;
        log::debug!("Request #{} for page {page_index}", self.latest_token);
        Ok(PageRequest {
            token: self.latest_token,
            page_index,
            page_size: self.page_size,
        })
    }

    /// Apply the response to a ticket
    ///
    /// # Errors
    ///
    /// - `StaleResponseDiscarded` if a newer ticket was issued meanwhile
    /// - `Fetch` if the fetch failed or returned an oversized page; the page
    ///   view is left untouched
    pub fn complete_navigation(
        &mut self,
        request: PageRequest,
        result: fetch::Result<FetchedPage>,
    ) -> Result<()> {
        if request.token != self.latest_token {
            log::debug!(
                "Discarding response #{} for page {}; latest is #{}",
                request.token,
                request.page_index,
                self.latest_token
            );
            return Err(SessionError::StaleResponseDiscarded {
                token: request.token,
                latest: self.latest_token,
            });
        }

        let page = result.inspect_err(|e| {
            log::error!("Fetching page {} failed: {e}", request.page_index);
        })?;
        page.check_size(request.page_size)?;

        self.page = PageView::from_fetched(request.page_index, request.page_size, page);
        log::debug!(
            "Page {}/{} loaded: {} record(s), {} checked",
            self.page.page_index,
            self.page.page_count(),
            self.page.records.len(),
            self.current_selection().len()
        );
        Ok(())
    }

    /// Load `page_index` and make it the current page
    ///
    /// # Errors
    ///
    /// Returns `InvalidPage` for an out-of-range index or `Fetch` if the
    /// fetch fails. On error the page view is unchanged.
    pub fn navigate_to_page(&mut self, page_index: usize) -> Result<()> {
        let request = self.begin_navigation(page_index)?;
        let result = self.fetcher.fetch_page(request.page_index, request.page_size);
        self.complete_navigation(request, result)
    }

    /// Move to the next page
    ///
    /// # Errors
    ///
    /// Returns `InvalidPage` on the last page, or a fetch error.
    pub fn next_page(&mut self) -> Result<()> {
        self.navigate_to_page(self.page.page_index + 1)
    }

    /// Move to the previous page
    ///
    /// # Errors
    ///
    /// Returns `InvalidPage` on the first page, or a fetch error.
    pub fn previous_page(&mut self) -> Result<()> {
        self.navigate_to_page(self.page.page_index.saturating_sub(1))
    }

    /// Refetch the current page
    ///
    /// # Errors
    ///
    /// Returns a fetch error; the page view is unchanged on failure.
    pub fn refresh(&mut self) -> Result<()> {
        self.navigate_to_page(self.page.page_index)
    }

    /// Change the page size and return to the first page
    ///
    /// The selection is untouched. The new size applies to later fetches even
    /// if reloading the first page fails.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPageSize` for zero, or a fetch error.
    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(SessionError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.navigate_to_page(1)
    }

    /// Rewrite the current page's share of the selection
    ///
    /// `new_checked` is the full set of checked rows the view reports for the
    /// current page. Selections on other pages are never affected.
    pub fn apply_user_toggle(&mut self, new_checked: &[Record]) {
        reconcile::apply_user_toggle(&self.page, &mut self.selection, new_checked);
    }

    /// Flip the rows at `positions` (0-based) on the current page
    ///
    /// Returns the page's checked rows after the change.
    pub fn toggle_positions(&mut self, positions: &[usize]) -> Vec<Record> {
        let checked = reconcile::toggled_subset(&self.page, &self.selection, positions);
        self.apply_user_toggle(&checked);
        checked
    }

    /// Check every row of the current page
    pub fn check_page(&mut self) {
        let all = self.page.records.clone();
        self.apply_user_toggle(&all);
    }

    /// Uncheck every row of the current page
    pub fn uncheck_page(&mut self) {
        self.apply_user_toggle(&[]);
    }

    /// Select the first `target` not-yet-selected records of the collection
    ///
    /// Supersedes any outstanding page ticket. Once the walk has finished the
    /// current page is refreshed, reusing the walk's own response for it when
    /// available, so the displayed checkmarks reflect the new selection and
    /// the latest data. A failed refresh leaves the old page in place and is
    /// reported in [`BulkOutcome::refresh_error`].
    ///
    /// # Errors
    ///
    /// Returns `Bulk(Aborted)` if a fetch fails mid-walk; selections from
    /// pages received before the failure are kept.
    pub fn bulk_select(&mut self, target: usize) -> Result<BulkOutcome> {
        self.latest_token += 1;

        let retain = (self.page.is_loaded() && self.page.page_size == self.page_size)
            .then_some(self.page.page_index);
        let mut outcome = BulkSelector::new(&self.fetcher, self.page_size)
            .retain_page(retain)
            .run(&mut self.selection, target)?;

        if target == 0 || !self.page.is_loaded() {
            return Ok(outcome);
        }

        match outcome.retained_page.take() {
            Some(page) if page.check_size(self.page_size).is_ok() => {
                self.page = PageView::from_fetched(self.page.page_index, self.page_size, page);
            }
            _ => {
                if let Err(e) = self.reload_current_page() {
                    log::warn!("Could not refresh page {} after bulk select: {e}", self.page.page_index);
                    outcome.refresh_error = Some(e);
                }
            }
        }
        Ok(outcome)
    }

    /// Refetch the displayed page under a fresh ticket
    fn reload_current_page(&mut self) -> fetch::Result<()> {
        self.latest_token += 1;
        let page_index = self.page.page_index;
        let page = self.fetcher.fetch_page(page_index, self.page_size)?;
        page.check_size(self.page_size)?;
        self.page = PageView::from_fetched(page_index, self.page_size, page);
        Ok(())
    }

    /// Parse `input` as a target and bulk-select
    ///
    /// # Errors
    ///
    /// Returns `Bulk(InvalidTarget)` for non-numeric input, otherwise as
    /// [`bulk_select`](Self::bulk_select).
    pub fn bulk_select_input(&mut self, input: &str) -> Result<BulkOutcome> {
        let target = bulk::parse_target(input)?;
        self.bulk_select(target)
    }

    /// Drop every selection
    pub fn reset(&mut self) {
        let cleared = self.selection.size();
        self.selection.clear();
        log::info!("Selection reset ({cleared} record(s) cleared)");
    }
}
