//! Browse command - interactive page-by-page selection
//!
//! A line-driven session over a [`BrowseSession`]. Each input line is one
//! command; failures are reported and the session carries on.
//!
//! ```text
//! n / p            next / previous page
//! g <page>         go to page
//! t <row> [row..]  toggle rows on this page (1-based)
//! a / u            check / uncheck every row on this page
//! s <N>            select the first N unselected records of the collection
//! z <size>         change the page size (returns to page 1)
//! r                reset the selection
//! l                list the selection
//! w                write the selection in the configured format
//! h                help
//! q                quit and print the selection
//! ```

use crate::{
    PageselError,
    config::PageselConfig,
    fetch::PageFetcher,
    output,
    session::{BrowseSession, SessionError},
};
use colored::Colorize;
use std::io::{BufRead, Write};

type Result<T> = std::result::Result<T, PageselError>;

const HELP: &str = "\
  n / p            next / previous page
  g <page>         go to page
  t <row> [row..]  toggle rows on this page (1-based)
  a / u            check / uncheck every row on this page
  s <N>            select the first N unselected records
  z <size>         change the page size
  r                reset the selection
  l                list the selection
  w                write the selection
  h                this help
  q                quit";

/// One parsed line of browse input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    Goto(usize),
    Toggle(Vec<usize>),
    CheckPage,
    UncheckPage,
    BulkSelect(String),
    PageSize(usize),
    Reset,
    List,
    Write,
    Help,
    Quit,
}

/// Parse one input line
///
/// Row numbers are 1-based on input and converted to 0-based positions.
///
/// # Errors
/// Returns a message describing why the line is not a command
pub fn parse_command(line: &str) -> std::result::Result<BrowseCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("Empty command".into());
    };
    let args: Vec<&str> = parts.collect();

    let number = |arg: Option<&&str>, what: &str| -> std::result::Result<usize, String> {
        arg.ok_or_else(|| format!("Missing {what}"))?
            .parse::<usize>()
            .map_err(|_| format!("Invalid {what}"))
    };

    match verb {
        "n" | "next" => Ok(BrowseCommand::Next),
        "p" | "prev" => Ok(BrowseCommand::Previous),
        "g" | "goto" => Ok(BrowseCommand::Goto(number(args.first(), "page number")?)),
        "t" | "toggle" => {
            if args.is_empty() {
                return Err("Missing row number".into());
            }
            let rows = args
                .iter()
                .map(|arg| match arg.parse::<usize>() {
                    Ok(row) if row > 0 => Ok(row - 1),
                    _ => Err(format!("Invalid row number '{arg}'")),
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(BrowseCommand::Toggle(rows))
        }
        "a" | "all" => Ok(BrowseCommand::CheckPage),
        "u" | "none" => Ok(BrowseCommand::UncheckPage),
        "s" | "select" => args
            .first()
            .map(|arg| BrowseCommand::BulkSelect((*arg).to_string()))
            .ok_or_else(|| "Missing number of records".to_string()),
        "z" | "size" => Ok(BrowseCommand::PageSize(number(args.first(), "page size")?)),
        "r" | "reset" => Ok(BrowseCommand::Reset),
        "l" | "list" => Ok(BrowseCommand::List),
        "w" | "write" => Ok(BrowseCommand::Write),
        "h" | "help" | "?" => Ok(BrowseCommand::Help),
        "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
        other => Err(format!("Unknown command '{other}' (h for help)")),
    }
}

/// Execute the browse command on stdin/stdout
///
/// # Errors
/// Returns an error if the first page cannot be loaded or the terminal
/// cannot be read or written
pub fn execute<F: PageFetcher>(fetcher: F, config: &PageselConfig, start_page: usize) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(fetcher, config, start_page, stdin.lock(), stdout.lock()).map(|_| ())
}

/// Run a browse session reading commands from `input`
///
/// Returns the session once input ends or `q` is entered.
///
/// # Errors
/// Returns an error if the first page cannot be loaded or I/O fails
pub fn run<F, R, W>(
    fetcher: F,
    config: &PageselConfig,
    start_page: usize,
    input: R,
    mut out: W,
) -> Result<BrowseSession<F>>
where
    F: PageFetcher,
    R: BufRead,
    W: Write,
{
    let mut session = BrowseSession::open(fetcher, config.page_size)?;
    if start_page != 1 {
        report(&mut out, session.navigate_to_page(start_page))?;
    }
    show_page(&mut out, &session, config)?;

    let mut lines = input.lines();
    loop {
        if !config.quiet {
            write!(out, "> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(out, "{}", message.yellow())?;
                continue;
            }
        };

        match command {
            BrowseCommand::Quit => break,
            BrowseCommand::Help => writeln!(out, "{HELP}")?,
            BrowseCommand::Next => {
                report(&mut out, session.next_page())?;
                show_page(&mut out, &session, config)?;
            }
            BrowseCommand::Previous => {
                report(&mut out, session.previous_page())?;
                show_page(&mut out, &session, config)?;
            }
            BrowseCommand::Goto(page) => {
                report(&mut out, session.navigate_to_page(page))?;
                show_page(&mut out, &session, config)?;
            }
            BrowseCommand::Toggle(rows) => {
                session.toggle_positions(&rows);
                show_page(&mut out, &session, config)?;
            }
            BrowseCommand::CheckPage => {
                session.check_page();
                show_page(&mut out, &session, config)?;
            }
            BrowseCommand::UncheckPage => {
                session.uncheck_page();
                show_page(&mut out, &session, config)?;
            }
            BrowseCommand::BulkSelect(target) => {
                match session.bulk_select_input(&target) {
                    Ok(outcome) => {
                        writeln!(out, "{}", output::bulk_summary(&outcome, session.selected_count()))?;
                        if let Some(e) = &outcome.refresh_error {
                            let message = format!(
                                "Could not refresh page {}: {e}",
                                session.page_view().page_index
                            );
                            writeln!(out, "{}", message.red())?;
                        }
                    }
                    Err(e) => report(&mut out, Err(e))?,
                }
                show_page(&mut out, &session, config)?;
            }
            BrowseCommand::PageSize(size) => {
                report(&mut out, session.set_page_size(size))?;
                show_page(&mut out, &session, config)?;
            }
            BrowseCommand::Reset => {
                session.reset();
                show_page(&mut out, &session, config)?;
            }
            BrowseCommand::List => {
                output::write_records(
                    &mut out,
                    session.selected_records(),
                    &config.columns,
                    crate::config::OutputFormat::Plain,
                    false,
                )?;
                writeln!(out, "{} selected", session.selected_count())?;
            }
            BrowseCommand::Write => {
                output::write_records(
                    &mut out,
                    session.selected_records(),
                    &config.columns,
                    config.format,
                    config.quiet,
                )?;
            }
        }
    }

    if !config.quiet {
        writeln!(out, "\n=== Selected Records ({}) ===", session.selected_count())?;
    }
    output::write_records(
        &mut out,
        session.selected_records(),
        &config.columns,
        config.format,
        config.quiet,
    )?;
    Ok(session)
}

/// Print a recoverable session error; stale responses are not user-visible
fn report<W: Write>(out: &mut W, result: std::result::Result<(), SessionError>) -> Result<()> {
    match result {
        Ok(()) => {}
        Err(e) if e.is_stale() => log::debug!("{e}"),
        Err(e) => writeln!(out, "{}", e.to_string().red())?,
    }
    Ok(())
}

fn show_page<F: PageFetcher, W: Write>(
    out: &mut W,
    session: &BrowseSession<F>,
    config: &PageselConfig,
) -> Result<()> {
    if !config.quiet {
        write!(out, "{}", output::render_page(&session.snapshot(), &config.columns))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::fetch::MockFetcher;
    use crate::record::RecordId;

    fn config() -> PageselConfig {
        PageselConfig {
            page_size: 12,
            quiet: true,
            format: OutputFormat::Plain,
            columns: vec!["title".into()],
            ..PageselConfig::default()
        }
    }

    fn run_script<'f>(fetcher: &'f MockFetcher, script: &str) -> (BrowseSession<&'f MockFetcher>, String) {
        let mut out = Vec::new();
        let session = run(fetcher, &config(), 1, script.as_bytes(), &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("n"), Ok(BrowseCommand::Next));
        assert_eq!(parse_command("g 3"), Ok(BrowseCommand::Goto(3)));
        assert_eq!(parse_command("t 1 3"), Ok(BrowseCommand::Toggle(vec![0, 2])));
        assert_eq!(
            parse_command("s 20"),
            Ok(BrowseCommand::BulkSelect("20".into()))
        );
        assert_eq!(parse_command("z 24"), Ok(BrowseCommand::PageSize(24)));
        assert_eq!(parse_command("quit"), Ok(BrowseCommand::Quit));
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(parse_command("").is_err());
        assert!(parse_command("g").is_err());
        assert!(parse_command("g x").is_err());
        assert!(parse_command("t 0").is_err());
        assert!(parse_command("t").is_err());
        assert!(parse_command("s").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn test_selection_persists_across_pages() {
        let fetcher = MockFetcher::with_sequential_ids(30);
        let (session, _) = run_script(&fetcher, "t 2\nn\nt 1\np\nq\n");

        let ids: Vec<RecordId> = session.current_selection().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RecordId::Int(2)]);
        assert_eq!(session.selected_count(), 2);
    }

    #[test]
    fn test_bulk_and_reset_script() {
        let fetcher = MockFetcher::with_sequential_ids(30);
        let (session, out) = run_script(&fetcher, "s 20\ng 2\nr\n");

        assert_eq!(session.selected_count(), 0);
        assert_eq!(session.page_view().page_index, 2);
        assert!(session.current_selection().is_empty());
        assert!(out.contains("Selected 20 new record(s)"));
    }

    #[test]
    fn test_failed_refresh_after_bulk_is_shown() {
        let fetcher = MockFetcher::with_sequential_ids(30);
        // open, goto and the walk succeed; the refresh of page 3 fails
        fetcher.fail_after_calls(3);
        let (session, out) = run_script(&fetcher, "g 3\ns 5\nq\n");

        assert!(out.contains("Selected 5 new record(s)"));
        assert!(out.contains("Could not refresh page 3"));
        assert_eq!(session.selected_count(), 5);
        assert_eq!(session.page_view().page_index, 3);
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let fetcher = MockFetcher::with_sequential_ids(30);
        fetcher.fail_on_page(2);
        let (session, out) = run_script(&fetcher, "n\ns lots\ng 9\nt 1\nq\n");

        assert!(out.contains("Source unavailable"));
        assert!(out.contains("Invalid bulk-select target"));
        assert!(out.contains("out of range"));
        assert_eq!(session.page_view().page_index, 1);
        assert_eq!(session.selected_count(), 1);
    }

    #[test]
    fn test_quit_prints_selection() {
        let fetcher = MockFetcher::with_sequential_ids(30);
        let (_, out) = run_script(&fetcher, "t 1 3\nq\n");
        assert!(out.ends_with("1\n3\n"));
    }
}
