//! Path helpers shared by the catalog and the search engine.
//!
//! # Search terms
//!
//! A record's search terms are derived from its base name only: the name is
//! normalized to NFC, split on [`TERM_DELIMITER`], trimmed and lowercased.
//! The extension stays attached to the last token, so `bar-1786396036.txt`
//! yields `["bar", "1786396036.txt"]`.
//!
//! macOS hands out NFD-decomposed names while Linux and Windows typically use
//! NFC, so the same visual name would otherwise produce different tokens:
//!
//! ```
//! use dupecat::scanner::path_utils::search_terms;
//!
//! let nfc = "/music/café-live.mp3";
//! let nfd = "/music/cafe\u{0301}-live.mp3";
//! assert_eq!(search_terms(nfc), search_terms(nfd));
//! ```
//!
//! # Root membership
//!
//! [`is_within_root`] compares paths component by component, so a root of
//! `/data/photo` does not claim `/data/photos/a.jpg`.

use std::borrow::Cow;
use std::path::Path;
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

/// Delimiter used to split a base name into search terms.
pub const TERM_DELIMITER: char = '-';

/// Normalize a string to NFC, borrowing when it is already normalized.
#[must_use]
pub fn normalize_nfc(s: &str) -> Cow<'_, str> {
    match is_nfc_quick(s.chars()) {
        IsNormalized::Yes => Cow::Borrowed(s),
        _ => Cow::Owned(s.nfc().collect()),
    }
}

/// Base name of a path as text, or the whole input when it has none.
#[must_use]
pub fn base_name(path: &str) -> Cow<'_, str> {
    Path::new(path)
        .file_name()
        .map_or(Cow::Borrowed(path), |name| name.to_string_lossy())
}

/// Derive the ordered search terms for a file path.
///
/// Empty tokens (from `a--b` or a leading `-`) are dropped.
#[must_use]
pub fn search_terms(path: &str) -> Vec<String> {
    let name = base_name(path);
    let name = normalize_nfc(&name);

    name.split(TERM_DELIMITER)
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Normalize user-supplied query tokens the same way record terms are built.
#[must_use]
pub fn normalize_query<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| normalize_nfc(token.as_ref().trim()).to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Check whether `path` lies under `root`, comparing whole path components.
#[must_use]
pub fn is_within_root(path: &str, root: &str) -> bool {
    Path::new(path).starts_with(Path::new(root))
}
