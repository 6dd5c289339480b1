//! Pagesel CLI application entry point
//!
//! Browse a paginated remote collection one page at a time while keeping a
//! selection that survives page changes.
//!
//! # Features
//!
//! - **Browse Mode**: Interactive session with next/previous/goto, row toggles
//!   and "select first N" (default command)
//! - **Page**: Print a single page for scripting
//! - **Select**: Select the first N records of the collection and print them
//! - **Quiet Mode**: Suppress informational output for scripting
//!
//! # Usage
//!
//! ```bash
//! # Browse interactively (default command)
//! pagesel
//! pagesel browse --page 3
//!
//! # Print page 2 as JSON
//! pagesel page 2 --format json
//!
//! # Select the first 20 records and write them as CSV
//! pagesel select 20 --format csv
//!
//! # Change the default page size
//! pagesel config set page_size=24
//! ```
//!
//! # Configuration
//!
//! On first run, pagesel will prompt for initial setup. Configuration is stored in
//! the user's config directory (`~/.config/pagesel/config.toml` on Linux).

use pagesel::{
    PageselError,
    cli::{Cli, Commands},
    commands,
    config::PageselConfig,
    logger,
};

type Result<T> = std::result::Result<T, PageselError>;

/// Main entry point for the pagesel application
///
/// Parses command-line arguments, loads configuration, and dispatches to the
/// appropriate command handler.
///
/// # Errors
///
/// Returns `PageselError` if configuration loading fails, the HTTP client
/// cannot be built, or any command handler returns an error.
fn main() -> Result<()> {
    let cli = Cli::parse_args();
    let command = cli.get_command();

    let stored = PageselConfig::load_or_setup()?;

    // Overrides apply to this run only, never to the saved file
    if let Commands::Config { command } = &command {
        let quiet = cli.quiet || stored.quiet;
        logger::init_logger(cli.verbose, quiet);
        return commands::config(stored, command, quiet);
    }

    let config = cli.apply_overrides(stored);
    config.validate()?;
    logger::init_logger(cli.verbose, config.quiet);
    log::debug!("Using {} with {} records per page", config.base_url, config.page_size);

    let fetcher = commands::build_fetcher(&config)?;
    let stdout = std::io::stdout();

    match command {
        Commands::Browse { page } => commands::browse(fetcher, &config, page)?,
        Commands::Page { index } => commands::page(fetcher, &config, index, stdout.lock())?,
        Commands::Select { count } => commands::select(fetcher, &config, &count, stdout.lock())?,
        Commands::Config { .. } => {}
    }

    Ok(())
}
