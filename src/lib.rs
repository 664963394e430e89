//! dupecat - file catalog with duplicate detection
//!
//! Files under a set of roots are cataloged into a flat CSV record store
//! (path, size, BLAKE3 prefix digest). The catalog is then searched by name
//! tokens or mined for duplicates, by content or by shared long tokens, with
//! an interactive confirm-and-delete loop.

pub mod actions;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod search;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;

/// Run the application with parsed arguments on stdin/stdout.
///
/// # Errors
///
/// Returns any fatal error from configuration or the subcommand.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    // Highlight markers stay on when piped; review tooling reads them.
    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load(cli.config.as_deref()).context("Unable to load configuration")?;

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    commands::dispatch(&cli.command, &config, &mut input, &mut out)
}
