//! Numbered, highlighted record listings.
//!
//! Each line reads `[i] <path> (<size>)` with a 1-based index. Listings stop
//! at the display limit and end with `... (truncated)` when entries remain.

use std::io::{self, Write};

use bytesize::ByteSize;

use super::highlight::highlight;
use crate::search::{SearchHits, SearchOutcome};

/// Marker printed after a capped listing.
pub const TRUNCATED_MARKER: &str = "... (truncated)";

/// Write up to `limit` numbered entries of `(path, size)`.
///
/// Returns the number of lines written, excluding the truncation marker.
///
/// # Errors
///
/// Returns any I/O error from the sink.
pub fn write_listing<'a, W, I, S>(
    out: &mut W,
    entries: I,
    tokens: &[S],
    limit: usize,
) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, u64)>,
    S: AsRef<str>,
{
    let mut written = 0;
    for (path, size) in entries {
        if written == limit {
            writeln!(out, "{TRUNCATED_MARKER}")?;
            break;
        }
        written += 1;
        writeln!(
            out,
            "[{}] {} ({})",
            written,
            highlight(path, tokens),
            ByteSize(size)
        )?;
    }
    Ok(written)
}

/// Write matching records of a search.
///
/// # Errors
///
/// Returns any I/O error from the sink.
pub fn write_hits<W: Write>(out: &mut W, hits: &SearchHits) -> io::Result<()> {
    let entries = hits.records.iter().map(|r| (r.path.as_str(), r.size));
    write_listing(out, entries, &hits.tokens, usize::MAX)?;
    if hits.is_truncated() {
        writeln!(out, "{TRUNCATED_MARKER}")?;
    }
    Ok(())
}

/// Write the human-readable form of a search outcome.
///
/// # Errors
///
/// Returns any I/O error from the sink.
pub fn write_search_outcome<W: Write>(out: &mut W, outcome: &SearchOutcome) -> io::Result<()> {
    match outcome {
        SearchOutcome::Matches(hits) => write_hits(out, hits),
        SearchOutcome::NoMatchForToken(token) => {
            writeln!(out, "No results found for term '{}'", token)
        }
        SearchOutcome::NoResults => writeln!(out, "No results found."),
    }
}
