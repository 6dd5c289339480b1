//! Interactive setup wizard for first-time configuration
//!
//! This module handles the interactive prompts for creating an initial
//! configuration when pagesel is run for the first time.

use super::PageselConfig;
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::io::IsTerminal;

/// Interactive first-time setup - prompts for the collection endpoint and page size
///
/// Guides the user through creating their configuration:
/// 1. Prompts for the collection URL (default: Art Institute of Chicago artworks)
/// 2. Prompts for the page size (default: 12)
/// 3. Creates and saves the configuration
///
/// When stdin is not a terminal the defaults are saved without prompting.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - User input cannot be read
/// - The entered page size is zero
/// - The configuration cannot be saved
pub fn first_time_setup() -> Result<PageselConfig, ConfigError> {
    let mut config = PageselConfig::default();

    if !std::io::stdin().is_terminal() {
        config.save()?;
        return Ok(config);
    }

    println!("Welcome to pagesel! Let's point it at a collection.\n");

    config.base_url = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Collection URL")
        .default(config.base_url.clone())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    config.page_size = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Records per page")
        .default(config.page_size)
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    config.validate()?;
    config.save()?;

    println!("\nConfiguration saved successfully!");
    Ok(config)
}
