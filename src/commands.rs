//! Subcommand implementations.
//!
//! Each command is generic over its output sink (and input source for
//! `duplicates`) so the whole flow can be driven from tests with in-memory
//! buffers. [`dispatch`] maps parsed arguments plus configuration onto them.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use crate::actions::DeleteMode;
use crate::catalog::Catalog;
use crate::cli::Commands;
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::write_search_outcome;
use crate::scanner::{DiskFileSystem, FileSystem, Hasher};
use crate::search::SearchMode;

/// Load the catalog (or start empty), scan `roots`, print one line per
/// root and write the catalog back.
///
/// # Errors
///
/// Fails on an unreadable catalog, a root that cannot be enumerated, or a
/// failed write. Nothing is written in the first two cases.
pub fn scan<F, S, W>(catalog: &Catalog<F>, roots: &[S], out: &mut W) -> Result<ExitCode>
where
    F: FileSystem,
    S: AsRef<str>,
    W: Write,
{
    load_or_init(catalog)?;

    let reports = catalog.scan(roots).context("Error scanning directories")?;
    for report in &reports {
        writeln!(out, "{report}")?;
    }

    catalog
        .write()
        .with_context(|| format!("Error writing DB {}", catalog.db_path().display()))?;

    let failed: usize = reports.iter().map(|r| r.failed).sum();
    Ok(if failed > 0 {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    })
}

/// Search the catalog by tokens and print the matches.
///
/// # Errors
///
/// Fails if the catalog cannot be loaded.
pub fn term_search<F, S, W>(
    catalog: &Catalog<F>,
    mode: SearchMode,
    terms: &[S],
    limit: usize,
    out: &mut W,
) -> Result<ExitCode>
where
    F: FileSystem,
    S: AsRef<str>,
    W: Write,
{
    load(catalog)?;
    let outcome = catalog.search(mode, terms, limit)?;
    write_search_outcome(out, &outcome)?;
    Ok(ExitCode::Success)
}

/// Search the catalog by the name tokens of `file`.
///
/// # Errors
///
/// Fails if the catalog cannot be loaded.
pub fn file_search<F, W>(catalog: &Catalog<F>, file: &str, limit: usize, out: &mut W) -> Result<ExitCode>
where
    F: FileSystem,
    W: Write,
{
    load(catalog)?;
    let outcome = catalog.search_by_file(file, limit)?;
    write_search_outcome(out, &outcome)?;
    Ok(ExitCode::Success)
}

/// Interactively resolve duplicates and write the catalog back.
///
/// # Errors
///
/// Fails if the catalog cannot be loaded or written, or output fails.
pub fn duplicates<F, R, W>(
    catalog: &Catalog<F>,
    min_term_length: usize,
    display_limit: usize,
    input: &mut R,
    out: &mut W,
) -> Result<ExitCode>
where
    F: FileSystem,
    R: BufRead,
    W: Write,
{
    load(catalog)?;

    let report = catalog.resolve_duplicates(min_term_length, display_limit, input, out)?;
    if report.groups_reviewed == 0 {
        writeln!(out, "No duplicates found.")?;
    }

    catalog
        .write()
        .with_context(|| format!("Error writing DB {}", catalog.db_path().display()))?;

    Ok(if report.failed.is_empty() {
        ExitCode::Success
    } else {
        ExitCode::PartialSuccess
    })
}

/// Print catalog statistics.
///
/// # Errors
///
/// Fails if the catalog cannot be loaded.
pub fn stats<F, W>(catalog: &Catalog<F>, min_term_length: usize, out: &mut W) -> Result<ExitCode>
where
    F: FileSystem,
    W: Write,
{
    load(catalog)?;
    let stats = catalog.stats(min_term_length)?;
    write!(out, "{stats}")?;
    Ok(ExitCode::Success)
}

/// Run a parsed subcommand against the disk.
///
/// Command-line values win over `config`.
///
/// # Errors
///
/// Propagates the command's error.
pub fn dispatch<R, W>(command: &Commands, config: &Config, input: &mut R, out: &mut W) -> Result<ExitCode>
where
    R: BufRead,
    W: Write,
{
    let disk = DiskFileSystem::new(config.delete_mode);
    let hasher = Hasher::new(config.sample_size);

    match command {
        Commands::Scan(args) => {
            let hasher = Hasher::new(args.sample_size.unwrap_or(config.sample_size));
            let catalog = Catalog::with_fs(&args.db, disk, hasher);
            scan(&catalog, &args.roots, out)
        }
        Commands::TermSearch(args) => {
            let catalog = Catalog::with_fs(&args.db, disk, hasher);
            term_search(
                &catalog,
                args.mode.unwrap_or(config.search_mode),
                &args.terms,
                args.limit.unwrap_or(config.display_limit),
                out,
            )
        }
        Commands::FileSearch(args) => {
            let catalog = Catalog::with_fs(&args.db, disk, hasher);
            file_search(
                &catalog,
                &args.file,
                args.limit.unwrap_or(config.display_limit),
                out,
            )
        }
        Commands::Duplicates(args) => {
            let mode = if args.trash {
                DeleteMode::Trash
            } else {
                config.delete_mode
            };
            let catalog = Catalog::with_fs(&args.db, DiskFileSystem::new(mode), hasher);
            duplicates(
                &catalog,
                args.search_min_length.unwrap_or(config.search_min_length),
                args.limit.unwrap_or(config.display_limit),
                input,
                out,
            )
        }
        Commands::Stats(args) => {
            let catalog = Catalog::with_fs(&args.db, disk, hasher);
            stats(
                &catalog,
                args.search_min_length.unwrap_or(config.search_min_length),
                out,
            )
        }
    }
}

fn load<F: FileSystem>(catalog: &Catalog<F>) -> Result<()> {
    let report = catalog
        .load()
        .with_context(|| format!("Unable to read DB file '{}'", catalog.db_path().display()))?;
    log_malformed(report.malformed.len());
    Ok(())
}

fn load_or_init<F: FileSystem>(catalog: &Catalog<F>) -> Result<()> {
    let report = catalog
        .load_or_init()
        .with_context(|| format!("Unable to read DB file '{}'", catalog.db_path().display()))?;
    log_malformed(report.malformed.len());
    Ok(())
}

fn log_malformed(count: usize) {
    if count > 0 {
        log::warn!("Skipped {} malformed catalog rows", count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Catalog) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("foo-756381984.txt"), b"same").unwrap();
        fs::write(root.join("bar-1786396036.txt"), b"same").unwrap();
        fs::write(root.join("quix-1786396036.txt"), b"other").unwrap();
        let catalog = Catalog::open(dir.path().join("files.db"));
        (dir, catalog)
    }

    fn root_of(dir: &TempDir) -> String {
        dir.path().join("root").to_str().unwrap().to_string()
    }

    #[test]
    fn test_scan_writes_catalog_and_reports() {
        let (dir, catalog) = setup();
        let mut out = Vec::new();

        let code = scan(&catalog, &[root_of(&dir)], &mut out).unwrap();

        assert_eq!(code, ExitCode::Success);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("3 found files, 0 skipped, 3 created, 0 deleted"));
        let written = fs::read_to_string(dir.path().join("files.db")).unwrap();
        assert_eq!(written.lines().count(), 3);
    }

    #[test]
    fn test_search_requires_existing_catalog() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::open(dir.path().join("missing.db"));
        let mut out = Vec::new();
        let err = term_search(&catalog, SearchMode::Fuzzy, &["x"], 100, &mut out).unwrap_err();
        assert!(err.to_string().contains("Unable to read DB file"));
    }

    #[test]
    fn test_stats_after_scan() {
        let (dir, catalog) = setup();
        scan(&catalog, &[root_of(&dir)], &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        stats(&catalog, 10, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Total records: 3\n"));
        assert!(text.contains("Hashes with multiple records: 1\n"));
        assert!(text.contains("Search terms with length 10: 1\n"));
    }

    #[test]
    fn test_duplicates_without_groups() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("only.txt"), b"x").unwrap();
        let catalog = Catalog::open(dir.path().join("files.db"));
        scan(&catalog, &[root.to_str().unwrap()], &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        let code = duplicates(&catalog, 15, 100, &mut &b""[..], &mut out).unwrap();
        assert_eq!(code, ExitCode::Success);
        assert_eq!(String::from_utf8(out).unwrap(), "No duplicates found.\n");
    }
}
