//! Logging setup for the command-line binary
//!
//! The library only emits through the `log` facade; the binary decides what
//! reaches stderr.

use std::io::Write;

/// Initialize `env_logger` for the CLI
///
/// - quiet: errors only
/// - verbose: debug output from this crate, info from dependencies
/// - otherwise: warnings and errors
///
/// A set `RUST_LOG` takes over completely. Calling this again after a
/// logger is installed does nothing.
pub fn init_logger(verbose: bool, quiet: bool) {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = env_logger::try_init();
        return;
    }

    let default_level = if quiet {
        log::LevelFilter::Error
    } else if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level).format(|buf, record| {
        if record.level() <= log::Level::Warn {
            writeln!(buf, "[{}] {}", record.level(), record.args())
        } else {
            writeln!(buf, "{}", record.args())
        }
    });

    if verbose {
        builder.filter_module("pagesel", log::LevelFilter::Debug);
        builder.filter_module("reqwest", log::LevelFilter::Info);
        builder.filter_module("hyper", log::LevelFilter::Info);
    }

    // A second init (e.g. from tests) is harmless
    let _ = builder.try_init();
}
