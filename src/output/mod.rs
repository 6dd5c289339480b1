//! Output formatting for CLI display
//!
//! This module renders pages with their checkmarks and writes selections
//! as plain text, JSON or CSV.

use crate::PageselError;
use crate::bulk::BulkOutcome;
use crate::config::OutputFormat;
use crate::record::Record;
use crate::session::SessionSnapshot;
use chrono::Local;
use colored::Colorize;
use std::io::Write;

/// Widest a table cell may get before it is shortened
const CELL_WIDTH: usize = 32;

/// Shorten `text` to `width` characters, marking the cut with `…`
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= width {
        return single_line;
    }
    let mut shortened: String = single_line.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

/// One-line status for the current page
#[must_use]
pub fn page_header(snapshot: &SessionSnapshot<'_>) -> String {
    let page = snapshot.page;
    let mut header = format!(
        "Page {}/{} · {} record(s) · {} selected",
        page.page_index,
        page.page_count().max(1),
        page.total_records,
        snapshot.selected_count
    );
    if let Some(fetched_at) = page.fetched_at {
        let local = fetched_at.with_timezone(&Local);
        header.push_str(&format!(" · fetched {}", local.format("%H:%M:%S")));
    }
    header
}

/// Render the current page with checkmarks and row numbers
#[must_use]
pub fn render_page(snapshot: &SessionSnapshot<'_>, columns: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&page_header(snapshot).bold().to_string());
    out.push('\n');

    if snapshot.page.records.is_empty() {
        out.push_str("  (no records)\n");
        return out;
    }

    for (offset, record) in snapshot.page.records.iter().enumerate() {
        let mark = if snapshot.is_checked(offset) {
            "[x]".green().to_string()
        } else {
            "[ ]".to_string()
        };
        let cells: Vec<String> = columns
            .iter()
            .map(|column| truncate(&record.field_text(column), CELL_WIDTH))
            .collect();
        out.push_str(&format!(
            "{mark} {:>3}. {} {}\n",
            offset + 1,
            record.id.to_string().dimmed(),
            cells.join(" | ")
        ));
    }
    out
}

/// Human-readable summary of a bulk selection
#[must_use]
pub fn bulk_summary(outcome: &BulkOutcome, selected_count: usize) -> String {
    let mut summary = format!(
        "Selected {} new record(s) of {} requested ({} page(s) scanned, {selected_count} selected overall)",
        outcome.added, outcome.target, outcome.pages_scanned
    );
    if outcome.exhausted && outcome.added < outcome.target {
        summary.push_str("; the collection has no more unselected records");
    }
    summary
}

/// Write `records` in `format`
///
/// Plain output lists the id followed by the given columns, JSON writes the
/// full records, CSV writes an `id` column plus the given columns.
///
/// # Errors
///
/// Returns `PageselError` if writing or serialization fails.
pub fn write_records<W: Write>(
    mut writer: W,
    records: &[Record],
    columns: &[String],
    format: OutputFormat,
    quiet: bool,
) -> Result<(), PageselError> {
    match format {
        OutputFormat::Plain => {
            for record in records {
                if quiet {
                    writeln!(writer, "{}", record.id)?;
                } else {
                    let cells: Vec<String> = columns
                        .iter()
                        .map(|column| truncate(&record.field_text(column), CELL_WIDTH))
                        .collect();
                    writeln!(writer, "  - {} {}", record.id, cells.join(" | "))?;
                }
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, records)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            let mut header = vec!["id".to_string()];
            header.extend(columns.iter().filter(|c| *c != "id").cloned());
            csv_writer.write_record(&header)?;
            for record in records {
                csv_writer.write_record(header.iter().map(|column| record.field_text(column)))?;
            }
            csv_writer.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchedPage;
    use crate::page::PageView;

    fn records() -> Vec<Record> {
        vec![
            Record::new(1)
                .with_field("title", "Water Lilies")
                .with_field("date_start", 1906),
            Record::new(2).with_field("title", "The Bedroom, \"Arles\""),
        ]
    }

    fn columns() -> Vec<String> {
        vec!["title".into(), "date_start".into()]
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("line\nbreak", 20), "line break");
    }

    #[test]
    fn test_render_page_marks_checked_rows() {
        colored::control::set_override(false);
        let page = PageView::from_fetched(
            1,
            12,
            FetchedPage {
                records: records(),
                total_records: 2,
            },
        );
        let snapshot = SessionSnapshot {
            page: &page,
            checked: vec![Record::new(2)],
            selected_count: 1,
        };

        let rendered = render_page(&snapshot, &columns());
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("Page 1/1 · 2 record(s) · 1 selected · fetched "));
        assert!(lines[1].starts_with("[ ]   1. 1 Water Lilies | 1906"));
        assert!(lines[2].starts_with("[x]   2. 2 The Bedroom"));
    }

    #[test]
    fn test_header_shows_fetch_time() {
        let fetched_at = chrono::Utc::now();
        let mut page = PageView::empty(12);
        let snapshot = SessionSnapshot {
            page: &page,
            checked: Vec::new(),
            selected_count: 0,
        };
        assert_eq!(page_header(&snapshot), "Page 1/1 · 0 record(s) · 0 selected");

        page.fetched_at = Some(fetched_at);
        let snapshot = SessionSnapshot {
            page: &page,
            checked: Vec::new(),
            selected_count: 0,
        };
        let expected = fetched_at.with_timezone(&Local).format("%H:%M:%S").to_string();
        assert!(page_header(&snapshot).ends_with(&format!("fetched {expected}")));
    }

    #[test]
    fn test_write_plain_quiet_lists_ids() {
        let mut buf = Vec::new();
        write_records(&mut buf, &records(), &columns(), OutputFormat::Plain, true).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1\n2\n");
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_records(&mut buf, &records(), &columns(), OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[1]["title"], "The Bedroom, \"Arles\"");
    }

    #[test]
    fn test_write_csv_quotes_fields() {
        let mut buf = Vec::new();
        write_records(&mut buf, &records(), &columns(), OutputFormat::Csv, false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,title,date_start");
        assert_eq!(lines[1], "1,Water Lilies,1906");
        assert_eq!(lines[2], "2,\"The Bedroom, \"\"Arles\"\"\",");
    }

    #[test]
    fn test_bulk_summary_mentions_exhaustion() {
        let outcome = BulkOutcome {
            target: 100,
            added: 30,
            pages_scanned: 3,
            records_scanned: 30,
            exhausted: true,
            retained_page: None,
            refresh_error: None,
        };
        let summary = bulk_summary(&outcome, 30);
        assert!(summary.starts_with("Selected 30 new record(s) of 100 requested"));
        assert!(summary.contains("no more unselected records"));
    }
}
