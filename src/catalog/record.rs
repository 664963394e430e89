//! Catalog record definition.

use crate::scanner::path_utils::search_terms;

/// One cataloged file.
///
/// `size`, `hash` and `search_terms` are captured once. Rescanning a known
/// path never refreshes them, even if the file changed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// File path, also the record's unique key.
    pub path: String,
    /// Size in bytes at catalog time.
    pub size: u64,
    /// Hex digest of the file's leading bytes.
    pub hash: String,
    /// Lowercase base-name tokens; derived from `path`, never persisted.
    pub search_terms: Vec<String>,
}

impl Record {
    /// Build a record, deriving its search terms from the path.
    #[must_use]
    pub fn new(path: impl Into<String>, size: u64, hash: impl Into<String>) -> Self {
        let path = path.into();
        let search_terms = search_terms(&path);
        Self {
            path,
            size,
            hash: hash.into(),
            search_terms,
        }
    }
}
