//! Catalog statistics.

use std::collections::BTreeMap;
use std::fmt;

use super::RecordIndex;

/// Width of a search-term length bucket in the histogram.
pub const TERM_LENGTH_BUCKET: usize = 5;

/// Counts over the catalog's records and indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub total_records: usize,
    pub unique_sizes: usize,
    pub unique_hashes: usize,
    pub unique_terms: usize,
    /// Sizes shared by at least two records.
    pub sizes_with_multiple: usize,
    /// Hashes shared by at least two records.
    pub hashes_with_multiple: usize,
    /// Bucket start (`len / 5 * 5`) to number of shared terms of that length.
    ///
    /// Only terms at least `min_term_length` characters long that appear in
    /// two or more records are counted.
    pub term_length_histogram: BTreeMap<usize, usize>,
}

impl CatalogStats {
    /// Compute statistics for an index.
    #[must_use]
    pub fn compute(index: &RecordIndex, min_term_length: usize) -> Self {
        let mut term_length_histogram = BTreeMap::new();
        for (term, bucket) in index.by_term() {
            let length = term.chars().count();
            if bucket.len() < 2 || length < min_term_length {
                continue;
            }
            let start = length / TERM_LENGTH_BUCKET * TERM_LENGTH_BUCKET;
            *term_length_histogram.entry(start).or_insert(0) += 1;
        }

        Self {
            total_records: index.len(),
            unique_sizes: index.by_size().len(),
            unique_hashes: index.by_hash().len(),
            unique_terms: index.by_term().len(),
            sizes_with_multiple: index.by_size().values().filter(|b| b.len() > 1).count(),
            hashes_with_multiple: index.by_hash().values().filter(|b| b.len() > 1).count(),
            term_length_histogram,
        }
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total records: {}", self.total_records)?;
        writeln!(f, "Total unique sizes: {}", self.unique_sizes)?;
        writeln!(f, "Total unique search terms: {}", self.unique_terms)?;
        writeln!(f, "Total unique hashes: {}", self.unique_hashes)?;
        writeln!(f, "Sizes with multiple records: {}", self.sizes_with_multiple)?;
        writeln!(f, "Hashes with multiple records: {}", self.hashes_with_multiple)?;
        writeln!(f)?;
        writeln!(f, "Search term length distribution:")?;
        for (length, count) in &self.term_length_histogram {
            writeln!(f, "Search terms with length {}: {}", length, count)?;
        }
        Ok(())
    }
}
