//! Scanner module: the file-system collaborator behind the catalog.
//!
//! The catalog never touches the disk directly. Enumeration, stat, prefix
//! reads and deletions all go through the [`FileSystem`] trait, which keeps
//! the reconciliation logic testable against in-memory fakes.
//!
//! # Architecture
//!
//! - [`walker`]: [`DiskFileSystem`], the walkdir-backed implementation
//! - [`hasher`]: BLAKE3 digests over a bounded file prefix
//! - [`path_utils`]: search-term derivation and root membership
//!
//! # Example
//!
//! ```no_run
//! use dupecat::scanner::{DiskFileSystem, FileSystem, Hasher};
//!
//! let disk = DiskFileSystem::default();
//! let hasher = Hasher::default();
//! for path in disk.list_files("/home/user/Downloads").unwrap() {
//!     match hasher.hash_file(&disk, &path) {
//!         Ok((size, hash)) => println!("{path}: {size} bytes, {hash}"),
//!         Err(e) => eprintln!("Warning: {e}"),
//!     }
//! }
//! ```

pub mod hasher;
pub mod path_utils;
pub mod walker;

use std::path::PathBuf;

use crate::actions::DeleteError;

pub use hasher::{Hasher, DEFAULT_SAMPLE_SIZE};
pub use walker::DiskFileSystem;

/// Side-effecting file operations consumed by the catalog.
///
/// Paths are plain strings because they double as the catalog's primary key.
pub trait FileSystem {
    /// All non-directory paths reachable under `root`.
    ///
    /// # Errors
    ///
    /// A [`ScanError`] here aborts the whole scan.
    fn list_files(&self, root: &str) -> Result<Vec<String>, ScanError>;

    /// Current size of the file in bytes.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be stat'ed.
    fn file_size(&self, path: &str) -> Result<u64, HashError>;

    /// The first `len` bytes of the file, or fewer if it is shorter.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or read.
    fn read_prefix(&self, path: &str, len: u64) -> Result<Vec<u8>, HashError>;

    /// Remove the file.
    ///
    /// # Errors
    ///
    /// Fails if the file is absent or cannot be removed.
    fn remove_file(&self, path: &str) -> Result<(), DeleteError>;
}

/// Errors that abort a scan of a root.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing the root.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while enumerating the root.
    #[error("unable to collect files in root {path}: {source}")]
    Io {
        /// Root being enumerated
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Errors for a single file while cataloging it.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file vanished between enumeration and stat.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("unable to hash file {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    pub(crate) fn from_io(path: &str, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(PathBuf::from(path)),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(PathBuf::from(path)),
            _ => Self::Io {
                path: PathBuf::from(path),
                source,
            },
        }
    }
}
