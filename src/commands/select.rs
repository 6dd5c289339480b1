//! Select command - bulk-select the first N records and print them

use crate::{
    PageselError, bulk, config::PageselConfig, fetch::PageFetcher, output, session::BrowseSession,
};
use std::io::Write;

type Result<T> = std::result::Result<T, PageselError>;

/// Execute the select command
///
/// The summary goes to stderr so stdout only carries the records.
///
/// # Errors
/// Returns an error if the target is not a number, a fetch fails mid-walk,
/// or the records cannot be written. On a mid-walk failure the records
/// selected before it are still printed.
pub fn execute<F: PageFetcher, W: Write>(
    fetcher: F,
    config: &PageselConfig,
    count: &str,
    writer: W,
) -> Result<()> {
    let target = bulk::parse_target(count).map_err(crate::SessionError::from)?;
    let mut session = BrowseSession::new(fetcher, config.page_size)?;

    let result = session.bulk_select(target);
    if let Ok(outcome) = &result
        && !config.quiet
    {
        eprintln!("{}", output::bulk_summary(outcome, session.selected_count()));
    }

    output::write_records(
        writer,
        session.selected_records(),
        &config.columns,
        config.format,
        config.quiet,
    )?;
    result?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::fetch::MockFetcher;

    fn quiet_config() -> PageselConfig {
        PageselConfig {
            page_size: 12,
            quiet: true,
            format: OutputFormat::Plain,
            ..PageselConfig::default()
        }
    }

    #[test]
    fn test_select_prints_first_n() {
        let mut buf = Vec::new();
        execute(MockFetcher::with_sequential_ids(30), &quiet_config(), "14", &mut buf).unwrap();
        let ids: Vec<String> = String::from_utf8(buf)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        assert_eq!(ids.len(), 14);
        assert_eq!(ids.first().map(String::as_str), Some("1"));
        assert_eq!(ids.last().map(String::as_str), Some("14"));
    }

    #[test]
    fn test_select_rejects_non_numeric() {
        let fetcher = MockFetcher::with_sequential_ids(30);
        let mut buf = Vec::new();
        let err = execute(&fetcher, &quiet_config(), "twelve", &mut buf).unwrap_err();
        assert!(err.to_string().contains("Invalid bulk-select target"));
        assert_eq!(fetcher.call_count(), 0);
    }

    #[test]
    fn test_select_failure_still_prints_committed() {
        let fetcher = MockFetcher::with_sequential_ids(30);
        fetcher.fail_on_page(2);
        let mut buf = Vec::new();
        let err = execute(&fetcher, &quiet_config(), "20", &mut buf).unwrap_err();
        assert!(err.to_string().contains("aborted after 12"));
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 12);
    }
}
