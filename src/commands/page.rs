//! Page command - print one page of the collection

use crate::{PageselError, config::PageselConfig, config::OutputFormat, fetch::PageFetcher, output, session::BrowseSession};
use std::io::Write;

type Result<T> = std::result::Result<T, PageselError>;

/// Execute the page command
///
/// # Errors
/// Returns an error if the page cannot be fetched or written
pub fn execute<F: PageFetcher, W: Write>(
    fetcher: F,
    config: &PageselConfig,
    index: usize,
    mut writer: W,
) -> Result<()> {
    let mut session = BrowseSession::new(fetcher, config.page_size)?;
    session.navigate_to_page(index)?;

    match config.format {
        OutputFormat::Plain if !config.quiet => {
            write!(writer, "{}", output::render_page(&session.snapshot(), &config.columns))?;
        }
        format => {
            output::write_records(
                writer,
                &session.page_view().records,
                &config.columns,
                format,
                config.quiet,
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;

    #[test]
    fn test_page_quiet_prints_ids() {
        let config = PageselConfig {
            page_size: 4,
            quiet: true,
            ..PageselConfig::default()
        };
        let mut buf = Vec::new();
        execute(MockFetcher::with_sequential_ids(10), &config, 2, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "5\n6\n7\n8\n");
    }

    #[test]
    fn test_page_fetch_error_surfaces() {
        let fetcher = MockFetcher::with_sequential_ids(10);
        fetcher.fail_on_page(1);
        let mut buf = Vec::new();
        let err = execute(&fetcher, &PageselConfig::default(), 1, &mut buf).unwrap_err();
        assert!(matches!(err, PageselError::Session(_)));
        assert!(buf.is_empty());
    }
}
