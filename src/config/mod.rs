//! Configuration module for pagesel
//!
//! Manages the collection endpoint, paging and output settings.
//! Configuration is stored in the user's config directory and can be
//! overridden per key with `PAGESEL_<KEY>` environment variables.

mod setup;

pub use setup::first_time_setup;

use crate::fetch::http::DEFAULT_BASE_URL;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Keys accepted by `config set` / `config get`
pub const KEYS: &[&str] = &[
    "base_url",
    "page_size",
    "timeout_secs",
    "max_retries",
    "columns",
    "quiet",
    "format",
];

/// Output format for selections and pages
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Plain,
    /// JSON array of records
    Json,
    /// CSV with a header row
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Json => "json",
            Self::Csv => "csv",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(ConfigError::Message(format!(
                "Invalid format '{other}'. Use plain, json or csv"
            ))),
        }
    }
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PageselConfig {
    /// Collection endpoint
    pub base_url: String,

    /// Records per page
    pub page_size: usize,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries after a failed request
    pub max_retries: usize,

    /// Record fields shown in tables and requested from the source
    pub columns: Vec<String>,

    /// Suppress informational output by default
    pub quiet: bool,

    /// Default output format
    pub format: OutputFormat,
}

impl Default for PageselConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 12,
            timeout_secs: 30,
            max_retries: 3,
            columns: [
                "title",
                "place_of_origin",
                "artist_display",
                "inscriptions",
                "date_start",
                "date_end",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            quiet: false,
            format: OutputFormat::Plain,
        }
    }
}

impl PageselConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("pagesel").join("config.toml"))
    }

    /// Load configuration from `path` with environment overrides applied
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or holds invalid values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix("PAGESEL")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("columns"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created or the
    /// file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Load configuration, running first-time setup if config doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if loading or creating the configuration fails.
    pub fn load_or_setup() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            first_time_setup()
        }
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero page size or timeout, or an empty base URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Message("page_size must be greater than zero".into()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Message("timeout_secs must be greater than zero".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Message("base_url must not be empty".into()));
        }
        Ok(())
    }

    /// Set one key from its string form
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key or an unparsable value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let mut updated = self.clone();
        match key {
            "base_url" => updated.base_url = value.to_string(),
            "page_size" => updated.page_size = parse_value(key, value)?,
            "timeout_secs" => updated.timeout_secs = parse_value(key, value)?,
            "max_retries" => updated.max_retries = parse_value(key, value)?,
            "columns" => {
                updated.columns = value
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect();
            }
            "quiet" => updated.quiet = parse_value(key, value)?,
            "format" => updated.format = value.parse()?,
            _ => return Err(unknown_key(key)),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Get one key in its string form
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        Ok(match key {
            "base_url" => self.base_url.clone(),
            "page_size" => self.page_size.to_string(),
            "timeout_secs" => self.timeout_secs.to_string(),
            "max_retries" => self.max_retries.to_string(),
            "columns" => self.columns.join(","),
            "quiet" => self.quiet.to_string(),
            "format" => self.format.to_string(),
            _ => return Err(unknown_key(key)),
        })
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Message(format!("Invalid value for {key}: '{value}'")))
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::Message(format!(
        "Unknown configuration key: '{key}'. Available keys: {}",
        KEYS.join(", ")
    ))
}
