//! Config command - read and write configuration values

use crate::{PageselError, cli::ConfigCommands, config::PageselConfig};

type Result<T> = std::result::Result<T, PageselError>;

/// Execute the config command against the stored configuration
///
/// # Errors
/// Returns an error for malformed `key=value` input, unknown keys, invalid
/// values, or if the configuration cannot be saved
pub fn execute(mut config: PageselConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            let (key, value) = setting.split_once('=').ok_or_else(|| {
                PageselError::InvalidInput("Invalid format. Use: pagesel config set key=value".into())
            })?;
            let key = key.trim();
            config.set(key, value)?;
            config.save()?;
            if !quiet {
                println!("Set {key} = {}", config.get(key)?);
            }
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get(key)?);
        }
        ConfigCommands::Path => {
            println!("{}", PageselConfig::config_path()?.display());
        }
    }
    Ok(())
}
