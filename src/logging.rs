//! Logging infrastructure for dupecat.
//!
//! This module provides logging through the `log` facade and the `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `DUPECAT_LOG` environment variable (env_logger filter syntax)
//! 2. `RUST_LOG` environment variable
//! 3. CLI flags: `--quiet` (error only) or `--verbose` (info/debug/trace)
//! 4. Default: warn level
//!
//! Logs go to stderr; command output goes to stdout.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupecat::logging::init_logging;
//!
//! // -vv on the command line
//! init_logging(2, false);
//! log::debug!("visible");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "DUPECAT_LOG";

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool) {
    let mut builder = Builder::new();

    let source = if let Ok(filters) = env::var(LOG_ENV) {
        builder.parse_filters(&filters);
        LOG_ENV
    } else if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse_filters(&filters);
        "RUST_LOG"
    } else {
        builder.filter_level(determine_level(verbose, quiet));
        "command line"
    };

    configure_format(&mut builder, verbose);

    if builder.try_init().is_ok() {
        log::debug!(
            "Logging initialized from {} at {}",
            source,
            current_level_name()
        );
    }
}

/// Map CLI flags to a level filter.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Compact `LEVEL message` lines; module path added from `-vv` up.
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let level = record.level();
        let level_style = buf.default_level_style(level);

        if verbose >= 2 {
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} [{}] {}",
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        }
    });
}

/// Get the current log level as a string.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
