//! In-memory multi-index over catalog records.
//!
//! # Overview
//!
//! [`RecordIndex`] owns the primary `path -> Record` map plus three secondary
//! indices (by size, by hash, by search term). The secondary indices are pure
//! denormalizations of the primary map, and the only way to change them is
//! through [`RecordIndex::insert`] and [`RecordIndex::remove`], which update
//! all four maps together. Empty buckets are dropped on removal so bucket
//! counts always reflect live records.
//!
//! Buckets are ordered (`BTreeMap`/`BTreeSet`) so enumeration of groups and
//! members is reproducible from run to run.
//!
//! # Example
//!
//! ```
//! use dupecat::catalog::{Record, RecordIndex};
//!
//! let mut index = RecordIndex::new();
//! index.insert(Record::new("/a/foo-1.txt", 10, "h1")).unwrap();
//! index.insert(Record::new("/b/foo-2.txt", 10, "h1")).unwrap();
//!
//! assert_eq!(index.by_size()[&10].len(), 2);
//! assert_eq!(index.by_term()["foo"].len(), 2);
//!
//! index.remove("/a/foo-1.txt");
//! assert_eq!(index.by_hash()["h1"].len(), 1);
//! assert!(index.is_consistent());
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use thiserror::Error;

use super::Record;
use crate::scanner::path_utils::is_within_root;

/// Paths sharing one index key.
pub type Bucket = BTreeSet<String>;

/// Errors from index mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// A record with this path is already indexed; remove it first.
    #[error("record already present: {0}")]
    AlreadyPresent(String),
}

/// Primary record map with size, hash and search-term indices.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    records: HashMap<String, Record>,
    by_size: BTreeMap<u64, Bucket>,
    by_hash: BTreeMap<String, Bucket>,
    by_term: BTreeMap<String, Bucket>,
}

impl RecordIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record and all of its index entries.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::AlreadyPresent`] if the path is already indexed;
    /// the index is left untouched in that case.
    pub fn insert(&mut self, record: Record) -> Result<(), IndexError> {
        if self.records.contains_key(&record.path) {
            return Err(IndexError::AlreadyPresent(record.path));
        }

        self.by_size
            .entry(record.size)
            .or_default()
            .insert(record.path.clone());
        self.by_hash
            .entry(record.hash.clone())
            .or_default()
            .insert(record.path.clone());
        for term in &record.search_terms {
            self.by_term
                .entry(term.clone())
                .or_default()
                .insert(record.path.clone());
        }

        self.records.insert(record.path.clone(), record);
        Ok(())
    }

    /// Remove a record and all of its index entries.
    ///
    /// Returns the removed record, or `None` if the path was not indexed.
    pub fn remove(&mut self, path: &str) -> Option<Record> {
        let record = self.records.remove(path)?;

        detach(&mut self.by_size, &record.size, path);
        detach(&mut self.by_hash, &record.hash, path);
        for term in &record.search_terms {
            detach(&mut self.by_term, term, path);
        }

        Some(record)
    }

    /// Look up a record by path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Record> {
        self.records.get(path)
    }

    /// Whether a record exists for this path.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.records.contains_key(path)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records in unspecified order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// All records ordered by path.
    #[must_use]
    pub fn sorted_records(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.records.values().collect();
        records.sort_by(|a, b| a.path.cmp(&b.path));
        records
    }

    /// Paths of all records that live under `root`.
    #[must_use]
    pub fn paths_under(&self, root: &str) -> Vec<String> {
        self.records
            .keys()
            .filter(|path| is_within_root(path, root))
            .cloned()
            .collect()
    }

    /// Size index.
    #[must_use]
    pub fn by_size(&self) -> &BTreeMap<u64, Bucket> {
        &self.by_size
    }

    /// Hash index.
    #[must_use]
    pub fn by_hash(&self) -> &BTreeMap<String, Bucket> {
        &self.by_hash
    }

    /// Search-term index.
    #[must_use]
    pub fn by_term(&self) -> &BTreeMap<String, Bucket> {
        &self.by_term
    }

    /// Check that the secondary indices exactly mirror the primary map.
    ///
    /// Every record must appear in the buckets implied by its fields, and
    /// every bucket entry must point at a record with that key.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let records_indexed = self.records.values().all(|r| {
            self.by_size.get(&r.size).is_some_and(|b| b.contains(&r.path))
                && self.by_hash.get(&r.hash).is_some_and(|b| b.contains(&r.path))
                && r.search_terms
                    .iter()
                    .all(|t| self.by_term.get(t).is_some_and(|b| b.contains(&r.path)))
        });

        let sizes_valid = self.by_size.iter().all(|(size, bucket)| {
            !bucket.is_empty()
                && bucket
                    .iter()
                    .all(|p| self.records.get(p).is_some_and(|r| r.size == *size))
        });
        let hashes_valid = self.by_hash.iter().all(|(hash, bucket)| {
            !bucket.is_empty()
                && bucket
                    .iter()
                    .all(|p| self.records.get(p).is_some_and(|r| &r.hash == hash))
        });
        let terms_valid = self.by_term.iter().all(|(term, bucket)| {
            !bucket.is_empty()
                && bucket.iter().all(|p| {
                    self.records
                        .get(p)
                        .is_some_and(|r| r.search_terms.contains(term))
                })
        });

        records_indexed && sizes_valid && hashes_valid && terms_valid
    }
}

fn detach<K: Ord>(index: &mut BTreeMap<K, Bucket>, key: &K, path: &str) {
    if let Some(bucket) = index.get_mut(key) {
        bucket.remove(path);
        if bucket.is_empty() {
            index.remove(key);
        }
    }
}
