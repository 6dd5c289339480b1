//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for pagesel using the `clap` crate.
//!
//! # Commands
//!
//! - **browse**: Interactive page-by-page selection session (default)
//! - **page**: Print a single page
//! - **select**: Select the first N records of the collection and print them
//! - **config**: Get and set configuration values
//!
//! # Design Features
//!
//! - Global `--quiet` flag for scripting-friendly output
//! - Global overrides for page size, endpoint and output format
//! - Command aliases (e.g., `b` for `browse`, `s` for `select`)

use crate::config::{OutputFormat, PageselConfig};
use clap::{Parser, Subcommand, ValueEnum};

/// Output format flag
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable table
    Plain,
    /// JSON array of records
    Json,
    /// CSV with a header row
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => Self::Plain,
            FormatArg::Json => Self::Json,
            FormatArg::Csv => Self::Csv,
        }
    }
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., page_size=24)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., base_url)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Print the path of the configuration file
    Path,
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "pagesel")]
#[command(about = "Browse a paginated collection and select records across pages", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Print debug logging to stderr
    #[arg(short = 'v', long = "verbose", global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Records per page (overrides config)
    #[arg(long = "page-size", value_name = "N", global = true)]
    pub page_size: Option<usize>,

    /// Collection endpoint (overrides config)
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Output format (overrides config)
    #[arg(long = "format", value_enum, global = true)]
    pub format: Option<FormatArg>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Interactive selection session (default)
    #[command(visible_alias = "b")]
    Browse {
        /// Page to start on
        #[arg(short = 'p', long = "page", default_value_t = 1)]
        page: usize,
    },

    /// Print one page of the collection
    #[command(visible_alias = "p")]
    Page {
        /// Page number (1-based)
        #[arg(value_name = "PAGE", default_value_t = 1)]
        index: usize,
    },

    /// Select the first N records of the collection and print them
    #[command(visible_alias = "s")]
    Select {
        /// Number of records to select
        #[arg(value_name = "N", allow_hyphen_values = true)]
        count: String,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to Browse if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Browse { page: 1 })
    }

    /// Apply global flag overrides on top of the loaded configuration
    #[must_use]
    pub fn apply_overrides(&self, mut config: PageselConfig) -> PageselConfig {
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }
        if let Some(base_url) = &self.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(format) = self.format {
            config.format = format.into();
        }
        config.quiet = self.quiet || config.quiet;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_browse() {
        let cli = Cli::try_parse_from(["pagesel"]).unwrap();
        assert!(matches!(cli.get_command(), Commands::Browse { page: 1 }));
    }

    #[test]
    fn test_select_accepts_negative_count() {
        let cli = Cli::try_parse_from(["pagesel", "select", "-5"]).unwrap();
        match cli.get_command() {
            Commands::Select { count } => assert_eq!(count, "-5"),
            other => panic!("Expected Select, got {other:?}"),
        }
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::try_parse_from(["pagesel", "p", "3"]).unwrap();
        assert!(matches!(cli.get_command(), Commands::Page { index: 3 }));

        let cli = Cli::try_parse_from(["pagesel", "b", "--page", "2"]).unwrap();
        assert!(matches!(cli.get_command(), Commands::Browse { page: 2 }));
    }

    #[test]
    fn test_overrides_apply_on_config() {
        let cli = Cli::try_parse_from([
            "pagesel",
            "--page-size",
            "5",
            "--format",
            "csv",
            "-q",
            "page",
        ])
        .unwrap();
        let config = cli.apply_overrides(PageselConfig::default());
        assert_eq!(config.page_size, 5);
        assert_eq!(config.format, OutputFormat::Csv);
        assert!(config.quiet);
    }

    #[test]
    fn test_quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["pagesel", "-q", "-v"]).is_err());
    }
}
