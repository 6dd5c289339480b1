//! Reconciliation between the global selection and the loaded page
//!
//! Two directions:
//!
//! - **Selection → View**: [`derive_current_selection`] filters the page to
//!   the records that are globally selected, in page order.
//! - **View → Selection**: [`apply_user_toggle`] takes the checked rows the
//!   view reports for the current page and rewrites that page's share of the
//!   selection. This is the only path by which direct user interaction
//!   mutates the selection.
//!
//! The current-page selection is always recomputed from scratch, never
//! diffed incrementally.

use crate::page::PageView;
use crate::record::Record;
use crate::selection::SelectionSet;
use std::collections::HashSet;

/// Records of `page` that are globally selected, in page order
#[must_use]
pub fn derive_current_selection(page: &PageView, selection: &SelectionSet) -> Vec<Record> {
    page.records
        .iter()
        .filter(|record| selection.contains(&record.id))
        .cloned()
        .collect()
}

/// Apply the checked subset the view reports for the current page
///
/// Records in `new_checked` that are not on `page` are ignored: a page
/// toggle can only speak for the page's own ids.
pub fn apply_user_toggle(page: &PageView, selection: &mut SelectionSet, new_checked: &[Record]) {
    let page_ids = page.record_ids();
    let (on_page, off_page): (Vec<Record>, Vec<Record>) = new_checked
        .iter()
        .cloned()
        .partition(|record| page_ids.contains(&record.id));

    if !off_page.is_empty() {
        log::warn!(
            "Ignoring {} checked record(s) not present on page {}",
            off_page.len(),
            page.page_index
        );
    }

    selection.replace_page_membership(&page_ids, &on_page);
    log::debug!(
        "Page {} toggle: {} checked, {} selected overall",
        page.page_index,
        on_page.len(),
        selection.size()
    );
}

/// Checked subset after flipping the rows at `positions` (0-based)
///
/// Positions beyond the page are skipped. Flipping the same position twice
/// in one call cancels out.
#[must_use]
pub fn toggled_subset(page: &PageView, selection: &SelectionSet, positions: &[usize]) -> Vec<Record> {
    let mut flipped: HashSet<usize> = HashSet::new();
    for &pos in positions {
        if pos < page.records.len() && !flipped.insert(pos) {
            flipped.remove(&pos);
        }
    }

    page.records
        .iter()
        .enumerate()
        .filter(|(pos, record)| selection.contains(&record.id) != flipped.contains(pos))
        .map(|(_, record)| record.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordId;
    use crate::testing::{self, ids as record_ids};

    fn page(index: usize, ids: &[i64]) -> PageView {
        testing::page(index, 12, ids, 30)
    }

    fn ids_of(records: &[Record]) -> HashSet<RecordId> {
        records.iter().map(|record| record.id.clone()).collect()
    }

    #[test]
    fn test_derive_preserves_page_order() {
        let view = page(1, &[5, 6, 7, 8]);
        let mut selection = SelectionSet::new();
        selection.upsert_many([Record::new(8), Record::new(6), Record::new(99)]);

        let checked = derive_current_selection(&view, &selection);
        assert_eq!(record_ids(&checked), vec![RecordId::Int(6), RecordId::Int(8)]);
    }

    #[test]
    fn test_page_scoped_toggle() {
        let view = page(1, &[1, 2, 3]);
        let mut selection = SelectionSet::new();
        selection.upsert_many([Record::new(1), Record::new(100)]);

        apply_user_toggle(&view, &mut selection, &[Record::new(2)]);

        assert_eq!(
            ids_of(selection.values()),
            ids_of(&[Record::new(2), Record::new(100)])
        );
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let view = page(1, &[1, 2, 3]);
        let mut selection = SelectionSet::new();
        selection.upsert_many([Record::new(42)]);

        apply_user_toggle(&view, &mut selection, &[Record::new(1), Record::new(3)]);
        let once: Vec<RecordId> = selection.ids().cloned().collect();
        apply_user_toggle(&view, &mut selection, &[Record::new(1), Record::new(3)]);
        let twice: Vec<RecordId> = selection.ids().cloned().collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_toggle_ignores_off_page_records() {
        let view = page(1, &[1, 2]);
        let mut selection = SelectionSet::new();

        apply_user_toggle(&view, &mut selection, &[Record::new(1), Record::new(77)]);
        assert_eq!(record_ids(selection.values()), vec![RecordId::Int(1)]);
    }

    #[test]
    fn test_toggled_subset_flips_positions() {
        let view = page(1, &[1, 2, 3, 4]);
        let mut selection = SelectionSet::new();
        selection.upsert_many([Record::new(1), Record::new(3)]);

        let subset = toggled_subset(&view, &selection, &[0, 1, 9]);
        assert_eq!(record_ids(&subset), vec![RecordId::Int(2), RecordId::Int(3)]);
    }

    #[test]
    fn test_toggled_subset_double_flip_cancels() {
        let view = page(1, &[1, 2]);
        let selection = SelectionSet::new();

        let subset = toggled_subset(&view, &selection, &[1, 1]);
        assert!(subset.is_empty());
    }
}
