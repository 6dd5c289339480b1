//! Global selection set
//!
//! Holds every selected record keyed by id, independent of which page is
//! currently loaded. Iteration follows insertion order; overwriting an
//! existing id keeps its original position and replaces the stored value
//! with the last-seen one.

use crate::record::{Record, RecordId};
use std::collections::{HashMap, HashSet};

/// Page-independent set of selected records
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    entries: Vec<Record>,
    index: HashMap<RecordId, usize>,
}

impl SelectionSet {
    /// Create an empty selection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is selected
    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.index.contains_key(id)
    }

    /// Number of distinct selected records
    #[must_use]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Selected records in insertion order
    #[must_use]
    pub fn values(&self) -> &[Record] {
        &self.entries
    }

    /// Ids of the selected records in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.entries.iter().map(|record| &record.id)
    }

    /// Insert each record, overwriting any stored value with the same id
    pub fn upsert_many<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Record>,
    {
        for record in records {
            if let Some(&pos) = self.index.get(&record.id) {
                self.entries[pos] = record;
            } else {
                self.index.insert(record.id.clone(), self.entries.len());
                self.entries.push(record);
            }
        }
    }

    /// Remove each id if present
    pub fn remove_many(&mut self, ids: &HashSet<RecordId>) {
        if ids.iter().all(|id| !self.index.contains_key(id)) {
            return;
        }
        self.entries.retain(|record| !ids.contains(&record.id));
        self.rebuild_index();
    }

    /// Replace the contribution of one page to the selection
    ///
    /// Every id of `page_ids` missing from `new_page_selection` is removed,
    /// then every record of `new_page_selection` is upserted. `page_ids`
    /// must be exactly the ids of the page the toggle happened on; ids from
    /// other pages are never touched.
    pub fn replace_page_membership(
        &mut self,
        page_ids: &HashSet<RecordId>,
        new_page_selection: &[Record],
    ) {
        let keep: HashSet<&RecordId> = new_page_selection.iter().map(|r| &r.id).collect();
        let unchecked: HashSet<RecordId> = page_ids
            .iter()
            .filter(|id| !keep.contains(id))
            .cloned()
            .collect();

        self.remove_many(&unchecked);
        self.upsert_many(new_page_selection.iter().cloned());
    }

    /// Drop every selection
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, record)| (record.id.clone(), pos))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id_set(ids: &[i64]) -> HashSet<RecordId> {
        ids.iter().map(|&id| RecordId::Int(id)).collect()
    }

    fn selected_ids(set: &SelectionSet) -> Vec<RecordId> {
        set.ids().cloned().collect()
    }

    #[test]
    fn test_new_set_is_empty() {
        let set = SelectionSet::new();
        assert!(set.is_empty());
        assert_eq!(set.size(), 0);
        assert!(!set.contains(&RecordId::Int(1)));
    }

    #[test]
    fn test_upsert_many_keeps_insertion_order() {
        let mut set = SelectionSet::new();
        set.upsert_many([Record::new(3), Record::new(1), Record::new(2)]);
        assert_eq!(
            selected_ids(&set),
            vec![RecordId::Int(3), RecordId::Int(1), RecordId::Int(2)]
        );
    }

    #[test]
    fn test_upsert_many_overwrites_value_in_place() {
        let mut set = SelectionSet::new();
        set.upsert_many([Record::new(1).with_field("title", "old"), Record::new(2)]);
        set.upsert_many([Record::new(1).with_field("title", "new")]);

        assert_eq!(set.size(), 2);
        assert_eq!(set.values()[0].field_text("title"), "new");
        assert_eq!(set.values()[1].id, RecordId::Int(2));
    }

    #[test]
    fn test_upsert_many_is_idempotent() {
        let mut set = SelectionSet::new();
        let records = vec![Record::new(1), Record::new(2)];
        set.upsert_many(records.clone());
        set.upsert_many(records);
        assert_eq!(set.size(), 2);
    }

    #[test]
    fn test_remove_many_ignores_absent_ids() {
        let mut set = SelectionSet::new();
        set.upsert_many([Record::new(1), Record::new(2), Record::new(3)]);

        set.remove_many(&id_set(&[2, 99]));
        assert_eq!(selected_ids(&set), vec![RecordId::Int(1), RecordId::Int(3)]);
        assert!(set.contains(&RecordId::Int(3)));

        set.remove_many(&id_set(&[2]));
        assert_eq!(set.size(), 2);
    }

    #[test]
    fn test_index_stays_consistent_after_removal() {
        let mut set = SelectionSet::new();
        set.upsert_many([Record::new(1), Record::new(2), Record::new(3)]);
        set.remove_many(&id_set(&[1]));
        set.upsert_many([Record::new(3).with_field("title", "updated")]);

        assert_eq!(set.size(), 2);
        assert_eq!(set.values()[1].field_text("title"), "updated");
    }

    #[test]
    fn test_replace_page_membership_scoped_to_page() {
        let mut set = SelectionSet::new();
        // a = 1 on the page, x = 100 off the page
        set.upsert_many([Record::new(1), Record::new(100)]);

        set.replace_page_membership(&id_set(&[1, 2, 3]), &[Record::new(2)]);

        let mut ids = selected_ids(&set);
        ids.sort();
        assert_eq!(ids, vec![RecordId::Int(2), RecordId::Int(100)]);
    }

    #[test]
    fn test_replace_page_membership_with_empty_selection() {
        let mut set = SelectionSet::new();
        set.upsert_many([Record::new(1), Record::new(2), Record::new(50)]);

        set.replace_page_membership(&id_set(&[1, 2]), &[]);
        assert_eq!(selected_ids(&set), vec![RecordId::Int(50)]);
    }

    #[test]
    fn test_clear() {
        let mut set = SelectionSet::new();
        set.upsert_many([Record::new(1), Record::new(2)]);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(&RecordId::Int(1)));
    }
}
