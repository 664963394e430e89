//! Interactive confirm-and-delete loop over candidate groups.
//!
//! For every group the member paths still in the index are listed with
//! 1-based indices and the user is asked for a comma separated selection.
//! Groups that lost members to earlier deletions are skipped once fewer
//! than two remain. Each valid index removes
//! the record from the index and then deletes the file. Bad tokens, failed
//! deletions and unreadable input are reported and skipped; nothing here
//! aborts the remaining groups.
//!
//! The input source blocks until a line arrives. End of input reads as a
//! blank line, which deletes nothing.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use super::groups::CandidateGroup;
use crate::catalog::RecordIndex;
use crate::output::write_listing;
use crate::scanner::FileSystem;

/// Prompt shown after each group listing.
pub const DELETE_PROMPT: &str = "Delete any files? (comma separated list of numbers)";

/// A selection token that could not be applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Not a number.
    #[error("Invalid number: {0}, skipping...")]
    InvalidNumber(String),
    /// Outside `1..=len`.
    #[error("Invalid index: {index}, skipping...")]
    OutOfRange { index: usize, len: usize },
}

/// Parse a comma separated list of 1-based indices into 0-based positions.
///
/// Blank tokens (as in `1,,2` or a trailing comma) are ignored.
#[must_use]
pub fn parse_selection(line: &str, group_len: usize) -> Vec<Result<usize, SelectionError>> {
    line.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let index: usize = token
                .parse()
                .map_err(|_| SelectionError::InvalidNumber(token.to_string()))?;
            if index == 0 || index > group_len {
                return Err(SelectionError::OutOfRange {
                    index,
                    len: group_len,
                });
            }
            Ok(index - 1)
        })
        .collect()
}

/// Options for a resolution pass.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Maximum number of members listed per group.
    pub display_limit: usize,
}

/// What happened during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Groups presented to the user.
    pub groups_reviewed: usize,
    /// Paths whose records were removed and files deleted.
    pub deleted: Vec<String>,
    /// Paths whose records were removed but whose file deletion failed.
    pub failed: Vec<(String, String)>,
    /// Selection tokens that were rejected.
    pub invalid_selections: usize,
}

impl ResolutionReport {
    /// Fold another pass into this report.
    pub fn merge(&mut self, other: ResolutionReport) {
        self.groups_reviewed += other.groups_reviewed;
        self.deleted.extend(other.deleted);
        self.failed.extend(other.failed);
        self.invalid_selections += other.invalid_selections;
    }
}

/// Walk the groups, prompting for deletions and applying them.
///
/// # Errors
///
/// Only errors writing to `out` are returned; everything else is reported
/// to `out` and skipped.
pub fn resolve_groups<F, R, W>(
    index: &mut RecordIndex,
    fs: &F,
    groups: &[CandidateGroup],
    input: &mut R,
    out: &mut W,
    options: ResolveOptions,
) -> io::Result<ResolutionReport>
where
    F: FileSystem + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut report = ResolutionReport::default();

    for (position, group) in groups.iter().enumerate() {
        // Members deleted in an earlier group are gone from the index
        let members: Vec<(&str, u64)> = group
            .paths
            .iter()
            .filter_map(|path| index.get(path).map(|record| (path.as_str(), record.size)))
            .collect();
        let shrunk = members.len() < group.len();
        if members.is_empty() || (shrunk && members.len() < 2) {
            log::debug!(
                "Skipping group {} of {}: {} live members left",
                position + 1,
                groups.len(),
                members.len()
            );
            continue;
        }
        let paths: Vec<String> = members.iter().map(|(path, _)| (*path).to_string()).collect();

        report.groups_reviewed += 1;

        writeln!(
            out,
            "Duplicates found: {} ({} / {}) - {}",
            members.len(),
            position + 1,
            groups.len(),
            group.strategy
        )?;

        write_listing(out, members, &group.terms, options.display_limit)?;

        writeln!(out, "{DELETE_PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if let Err(e) = input.read_line(&mut line) {
            log::warn!("Unable to read selection: {}", e);
            writeln!(out, "Error reading selection: {}", e)?;
            writeln!(out)?;
            continue;
        }

        if line.trim().is_empty() {
            continue;
        }

        for selection in parse_selection(&line, paths.len()) {
            match selection {
                Ok(slot) => delete_member(index, fs, &paths[slot], out, &mut report)?,
                Err(e) => {
                    report.invalid_selections += 1;
                    writeln!(out, "{e}")?;
                }
            }
        }

        writeln!(out)?;
    }

    Ok(report)
}

fn delete_member<F, W>(
    index: &mut RecordIndex,
    fs: &F,
    path: &str,
    out: &mut W,
    report: &mut ResolutionReport,
) -> io::Result<()>
where
    F: FileSystem + ?Sized,
    W: Write,
{
    if index.remove(path).is_none() {
        writeln!(out, "Already removed: {path}, skipping...")?;
        return Ok(());
    }

    writeln!(out, "Deleting {path}")?;

    match fs.remove_file(path) {
        Ok(()) => report.deleted.push(path.to_string()),
        Err(e) => {
            log::warn!("Unable to delete file {}: {}", path, e);
            writeln!(out, "Unable to delete file: {path}, err: {e}")?;
            report.failed.push((path.to_string(), e.to_string()));
        }
    }
    Ok(())
}
