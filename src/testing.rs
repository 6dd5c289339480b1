//! Testing utilities for pagesel
//!
//! Fixture builders for records, pages and source response bodies.
//!
//! Only available when compiled with `cfg(test)`.

use crate::fetch::FetchedPage;
use crate::page::PageView;
use crate::record::{Record, RecordId};

/// Records with the given ids and a `title` field of `"Record {id}"`
#[must_use]
pub fn records(ids: &[i64]) -> Vec<Record> {
    ids.iter()
        .map(|&id| Record::new(id).with_field("title", format!("Record {id}")))
        .collect()
}

/// A loaded page holding `ids`, out of `total_records`
#[must_use]
pub fn page(page_index: usize, page_size: usize, ids: &[i64], total_records: usize) -> PageView {
    PageView::from_fetched(
        page_index,
        page_size,
        FetchedPage {
            records: records(ids),
            total_records,
        },
    )
}

/// Ids of `records`, in order
#[must_use]
pub fn ids(records: &[Record]) -> Vec<RecordId> {
    records.iter().map(|record| record.id.clone()).collect()
}

/// A response body in the shape the HTTP source returns
#[must_use]
pub fn page_body(records: &[Record], total: usize) -> String {
    serde_json::json!({
        "pagination": { "total": total, "limit": records.len() },
        "data": records,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_fixture() {
        let view = page(2, 3, &[4, 5, 6], 9);
        assert_eq!(view.page_index, 2);
        assert_eq!(ids(&view.records), vec![RecordId::Int(4), RecordId::Int(5), RecordId::Int(6)]);
        assert_eq!(view.records[0].field_text("title"), "Record 4");
    }
}
