//! Candidate duplicate groups.
//!
//! # Overview
//!
//! Groups are built from a read-only view of the index and returned as an
//! owned snapshot, so deleting records while walking the groups never
//! invalidates the iteration. Two independent strategies exist:
//!
//! 1. **Size and hash**: every hash bucket with two or more records is split
//!    by size; each `(hash, size)` partition becomes a group. A partition can
//!    hold a single record when same-hash files differ in size.
//! 2. **Search term**: every term bucket with two or more records whose term
//!    is at least `min_term_length` characters long becomes a group.
//!
//! Groups come out ordered by key and members ordered by path.
//!
//! # Example
//!
//! ```
//! use dupecat::catalog::{Record, RecordIndex};
//! use dupecat::duplicates::{group_by_size_and_hash, GroupStrategy};
//!
//! let mut index = RecordIndex::new();
//! index.insert(Record::new("/a/x.bin", 10, "h")).unwrap();
//! index.insert(Record::new("/b/y.bin", 10, "h")).unwrap();
//!
//! let groups = group_by_size_and_hash(&index);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].strategy, GroupStrategy::SizeAndHash);
//! assert_eq!(groups[0].paths, vec!["/a/x.bin", "/b/y.bin"]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::RecordIndex;

/// Default minimum term length for search-term grouping.
pub const DEFAULT_MIN_TERM_LENGTH: usize = 15;

/// Strategy that produced a candidate group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStrategy {
    /// Same content digest and same size.
    SizeAndHash,
    /// Shared long base-name token.
    SearchTerm,
}

impl fmt::Display for GroupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupStrategy::SizeAndHash => write!(f, "Size and hash"),
            GroupStrategy::SearchTerm => write!(f, "Search term"),
        }
    }
}

/// A set of record paths suspected to be duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateGroup {
    /// Strategy that produced the group.
    pub strategy: GroupStrategy,
    /// Member paths ordered by path.
    pub paths: Vec<String>,
    /// Tokens to highlight when listing the group.
    pub terms: Vec<String>,
}

impl CandidateGroup {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Group records sharing both hash and size.
#[must_use]
pub fn group_by_size_and_hash(index: &RecordIndex) -> Vec<CandidateGroup> {
    let mut groups = Vec::new();

    for bucket in index.by_hash().values() {
        if bucket.len() < 2 {
            continue;
        }

        let mut by_size: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        for path in bucket {
            if let Some(record) = index.get(path) {
                by_size.entry(record.size).or_default().push(path.clone());
            }
        }

        // Bucket iteration is already path-ordered, so each partition is too
        groups.extend(by_size.into_values().map(|paths| CandidateGroup {
            strategy: GroupStrategy::SizeAndHash,
            paths,
            terms: Vec::new(),
        }));
    }

    log::debug!("Found {} size+hash candidate groups", groups.len());
    groups
}

/// Group records sharing a search term of at least `min_term_length` chars.
#[must_use]
pub fn group_by_search_term(index: &RecordIndex, min_term_length: usize) -> Vec<CandidateGroup> {
    let groups: Vec<CandidateGroup> = index
        .by_term()
        .iter()
        .filter(|(term, bucket)| bucket.len() >= 2 && term.chars().count() >= min_term_length)
        .map(|(term, bucket)| CandidateGroup {
            strategy: GroupStrategy::SearchTerm,
            paths: bucket.iter().cloned().collect(),
            terms: vec![term.clone()],
        })
        .collect();

    log::debug!(
        "Found {} search-term candidate groups (min length {})",
        groups.len(),
        min_term_length
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Record;

    fn index() -> RecordIndex {
        let mut index = RecordIndex::new();
        for (path, size, hash) in [
            ("p1", 756_381_984, "H"),
            ("p2", 1_786_396_036, "H2"),
            ("p3", 756_381_984, "H"),
            ("p4", 123, "H3"),
        ] {
            index.insert(Record::new(path, size, hash)).unwrap();
        }
        index
    }

    #[test]
    fn test_size_and_hash_single_group() {
        let groups = group_by_size_and_hash(&index());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].paths, vec!["p1", "p3"]);
        assert_eq!(groups[0].strategy, GroupStrategy::SizeAndHash);
        assert!(groups[0].terms.is_empty());
    }

    #[test]
    fn test_same_hash_different_size_partitions() {
        let mut index = index();
        index.insert(Record::new("p5", 9, "H")).unwrap();

        let groups = group_by_size_and_hash(&index);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].paths, vec!["p5"]);
        assert_eq!(groups[1].paths, vec!["p1", "p3"]);
    }

    #[test]
    fn test_no_groups_when_hashes_unique() {
        let mut index = RecordIndex::new();
        index.insert(Record::new("a", 1, "x")).unwrap();
        index.insert(Record::new("b", 1, "y")).unwrap();
        assert!(group_by_size_and_hash(&index).is_empty());
    }

    #[test]
    fn test_search_term_groups_respect_min_length() {
        let mut index = RecordIndex::new();
        index
            .insert(Record::new("bar-1786396036.txt", 1, "a"))
            .unwrap();
        index
            .insert(Record::new("bambam/quix-1786396036.txt", 2, "b"))
            .unwrap();
        index.insert(Record::new("bambam/bar", 3, "c")).unwrap();

        assert!(group_by_search_term(&index, DEFAULT_MIN_TERM_LENGTH).is_empty());

        let groups = group_by_search_term(&index, 10);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].strategy, GroupStrategy::SearchTerm);
        assert_eq!(groups[0].terms, vec!["1786396036.txt"]);
        assert_eq!(
            groups[0].paths,
            vec!["bambam/quix-1786396036.txt", "bar-1786396036.txt"]
        );
    }

    #[test]
    fn test_search_term_group_needs_two_records() {
        let mut index = RecordIndex::new();
        index
            .insert(Record::new("x/averyveryverylongname.txt", 1, "a"))
            .unwrap();
        assert!(group_by_search_term(&index, 5).is_empty());
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(GroupStrategy::SizeAndHash.to_string(), "Size and hash");
        assert_eq!(GroupStrategy::SearchTerm.to_string(), "Search term");
    }
}
