//! Command-line interface definitions for dupecat.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Every subcommand takes the catalog file as its first positional argument.
//!
//! # Example
//!
//! ```bash
//! # Catalog two directories
//! dupecat scan files.db ~/Downloads ~/Pictures
//!
//! # Find records whose names contain both tokens
//! dupecat term-search files.db bar 1786396036
//!
//! # Interactively remove duplicates, moving them to the trash
//! dupecat duplicates files.db --trash
//!
//! # Verbose mode for debugging
//! dupecat -v stats files.db
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::search::SearchMode;

/// File catalog with duplicate detection and token search.
///
/// dupecat records path, size and a BLAKE3 digest of every file under the
/// given roots in a CSV catalog, then finds duplicates by content or by
/// shared name tokens.
#[derive(Debug, Parser)]
#[command(name = "dupecat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (TOML) layered over the platform default
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Catalog files under one or more roots
    #[command(visible_alias = "scan-dir")]
    Scan(ScanArgs),
    /// Search records by name tokens
    #[command(visible_alias = "ts")]
    TermSearch(TermSearchArgs),
    /// Search records related to a file by its name tokens
    #[command(visible_alias = "fs")]
    FileSearch(FileSearchArgs),
    /// Review duplicate candidates and delete selected files
    #[command(visible_alias = "d")]
    Duplicates(DuplicatesArgs),
    /// Print catalog statistics
    #[command(visible_alias = "s")]
    Stats(StatsArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Catalog file; created if missing
    #[arg(value_name = "DB")]
    pub db: PathBuf,

    /// Directories to scan, in order
    #[arg(value_name = "ROOT", required = true)]
    pub roots: Vec<String>,

    /// Number of leading bytes hashed per file (e.g., 64KiB, 1MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub sample_size: Option<u64>,
}

/// Arguments for the term-search subcommand.
#[derive(Debug, Args)]
pub struct TermSearchArgs {
    /// Catalog file
    #[arg(value_name = "DB")]
    pub db: PathBuf,

    /// Tokens that must all match
    #[arg(value_name = "TERM", required = true)]
    pub terms: Vec<String>,

    /// Token matching mode
    #[arg(short, long, value_enum)]
    pub mode: Option<SearchMode>,

    /// Maximum number of results shown
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

/// Arguments for the file-search subcommand.
#[derive(Debug, Args)]
pub struct FileSearchArgs {
    /// Catalog file
    #[arg(value_name = "DB")]
    pub db: PathBuf,

    /// File whose name tokens are searched
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Maximum number of results shown
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

/// Arguments for the duplicates subcommand.
#[derive(Debug, Args)]
pub struct DuplicatesArgs {
    /// Catalog file
    #[arg(value_name = "DB")]
    pub db: PathBuf,

    /// Minimum length of a shared name token to form a group
    #[arg(long, value_name = "N")]
    pub search_min_length: Option<usize>,

    /// Move deleted files to the system trash instead of removing them
    #[arg(long)]
    pub trash: bool,

    /// Maximum number of members listed per group
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
}

/// Arguments for the stats subcommand.
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Catalog file
    #[arg(value_name = "DB")]
    pub db: PathBuf,

    /// Minimum token length counted in the length distribution
    #[arg(long, value_name = "N")]
    pub search_min_length: Option<usize>,
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupecat::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MiB").unwrap(), 1_048_576);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
