//! Disk-backed [`FileSystem`] implementation using walkdir.
//!
//! # Overview
//!
//! Roots are walked sequentially and fully; there is no parallelism or
//! incremental state. Only regular files (and other non-directory entries)
//! are returned. Symbolic links are not followed, and links to directories
//! are skipped.
//!
//! Error policy while walking:
//! - the root itself is missing: empty listing, so every record under it is
//!   reconciled away by the catalog
//! - any other error on the root: fatal [`ScanError`]
//! - errors below the root: logged, entry skipped
//! - non-UTF-8 paths: logged, entry skipped
//!
//! # Example
//!
//! ```no_run
//! use dupecat::scanner::{DiskFileSystem, FileSystem};
//!
//! let disk = DiskFileSystem::default();
//! let files = disk.list_files("/home/user/Downloads").unwrap();
//! println!("{} files", files.len());
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileSystem, HashError, ScanError};
use crate::actions::{delete_file, DeleteError, DeleteMode};

/// File-system collaborator backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFileSystem {
    delete_mode: DeleteMode,
}

impl DiskFileSystem {
    /// Create a disk file system that deletes with the given mode.
    #[must_use]
    pub fn new(delete_mode: DeleteMode) -> Self {
        Self { delete_mode }
    }

    /// Deletion mode used by [`FileSystem::remove_file`].
    #[must_use]
    pub fn delete_mode(&self) -> DeleteMode {
        self.delete_mode
    }
}

impl FileSystem for DiskFileSystem {
    fn list_files(&self, root: &str) -> Result<Vec<String>, ScanError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return root_error(root, err),
                Err(err) => {
                    log::warn!("Skipping unreadable entry under {}: {}", root, err);
                    continue;
                }
            };

            if entry.file_type().is_dir() || links_to_dir(&entry) {
                continue;
            }

            match entry.into_path().into_os_string().into_string() {
                Ok(path) => files.push(path),
                Err(raw) => {
                    log::warn!(
                        "Skipping non UTF-8 path: {}",
                        Path::new(&raw).to_string_lossy()
                    );
                }
            }
        }

        log::debug!("Enumerated {} files under {}", files.len(), root);
        Ok(files)
    }

    fn file_size(&self, path: &str) -> Result<u64, HashError> {
        std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| HashError::from_io(path, e))
    }

    fn read_prefix(&self, path: &str, len: u64) -> Result<Vec<u8>, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let capacity = usize::try_from(len).unwrap_or(usize::MAX);
        let mut buffer = Vec::with_capacity(capacity.min(super::DEFAULT_SAMPLE_SIZE as usize));
        file.take(len)
            .read_to_end(&mut buffer)
            .map_err(|e| HashError::from_io(path, e))?;
        Ok(buffer)
    }

    fn remove_file(&self, path: &str) -> Result<(), DeleteError> {
        delete_file(Path::new(path), self.delete_mode).map(|_| ())
    }
}

/// A symlink whose target is a directory. Broken links are kept.
fn links_to_dir(entry: &walkdir::DirEntry) -> bool {
    entry.path_is_symlink()
        && std::fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false)
}

/// Map a walk error on the root itself.
fn root_error(root: &str, err: walkdir::Error) -> Result<Vec<String>, ScanError> {
    let kind = err.io_error().map(io::Error::kind);
    match kind {
        Some(io::ErrorKind::NotFound) => {
            log::warn!("Root {} does not exist, treating it as empty", root);
            Ok(Vec::new())
        }
        Some(io::ErrorKind::PermissionDenied) => {
            Err(ScanError::PermissionDenied(PathBuf::from(root)))
        }
        _ => Err(ScanError::Io {
            path: PathBuf::from(root),
            source: err
                .into_io_error()
                .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop")),
        }),
    }
}
