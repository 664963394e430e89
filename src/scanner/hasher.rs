//! BLAKE3 prefix hasher.
//!
//! # Overview
//! A record's digest covers at most the first [`DEFAULT_SAMPLE_SIZE`] bytes of
//! the file (or the whole file when it is smaller). Two large files that only
//! differ after the sample share a digest; the size check during grouping
//! narrows that down but does not eliminate it.

use super::{FileSystem, HashError};

/// Default number of leading bytes fed into the digest (1 MiB).
pub const DEFAULT_SAMPLE_SIZE: u64 = 1024 * 1024;

/// Computes fixed-size content digests from a bounded byte prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hasher {
    sample_size: u64,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SIZE)
    }
}

impl Hasher {
    /// Create a hasher with the given prefix cap in bytes.
    #[must_use]
    pub fn new(sample_size: u64) -> Self {
        Self { sample_size }
    }

    /// The configured prefix cap.
    #[must_use]
    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    /// Number of bytes to read from a file of `size` bytes.
    #[must_use]
    pub fn sample_len(&self, size: u64) -> u64 {
        size.min(self.sample_size)
    }

    /// Digest a byte sample as lowercase hex.
    #[must_use]
    pub fn digest(&self, sample: &[u8]) -> String {
        blake3::hash(sample).to_hex().to_string()
    }

    /// Stat, read and digest a file through the file-system collaborator.
    ///
    /// Returns the file size together with its digest.
    ///
    /// # Errors
    ///
    /// Propagates any [`HashError`] from the collaborator.
    pub fn hash_file<F: FileSystem + ?Sized>(
        &self,
        fs: &F,
        path: &str,
    ) -> Result<(u64, String), HashError> {
        let size = fs.file_size(path)?;
        let sample = fs.read_prefix(path, self.sample_len(size))?;
        log::trace!("Hashed {} bytes of {}", sample.len(), path);
        Ok((size, self.digest(&sample)))
    }
}
