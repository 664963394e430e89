//! The record store: catalog file, in-memory index and reconciliation.
//!
//! # Overview
//!
//! A [`Catalog`] ties together the backing CSV file, a [`FileSystem`]
//! collaborator, a [`Hasher`] and a [`RecordIndex`] behind a reader-writer
//! lock. Every public operation holds the lock for its whole duration:
//!
//! | Operation | Lock |
//! |-----------|------|
//! | [`load`](Catalog::load), [`scan`](Catalog::scan), [`resolve_duplicates`](Catalog::resolve_duplicates) | exclusive |
//! | [`write`](Catalog::write), [`stats`](Catalog::stats), [`search`](Catalog::search) | shared |
//!
//! # Reconciliation
//!
//! Scanning a root adds records for unknown files, leaves known paths alone
//! (their size and hash are never refreshed), and removes records under the
//! root whose files were not enumerated this time.
//!
//! # Example
//!
//! ```no_run
//! use dupecat::catalog::Catalog;
//!
//! let catalog = Catalog::open("files.db");
//! catalog.load_or_init()?;
//! for report in catalog.scan(&["/home/user/Downloads"])? {
//!     println!("{report}");
//! }
//! catalog.write()?;
//! # Ok::<(), dupecat::catalog::CatalogError>(())
//! ```

pub mod codec;
pub mod index;
pub mod record;
pub mod stats;

use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

pub use codec::{CodecError, MalformedRow};
pub use index::{Bucket, IndexError, RecordIndex};
pub use record::Record;
pub use stats::CatalogStats;

use crate::duplicates::{
    group_by_search_term, group_by_size_and_hash, resolve_groups, ResolutionReport,
    ResolveOptions,
};
use crate::scanner::{DiskFileSystem, FileSystem, Hasher, ScanError};
use crate::search::{self, SearchMode, SearchOutcome};

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be opened or read.
    #[error("unable to read catalog '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The catalog file is not valid CSV.
    #[error("unable to parse catalog '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// The catalog file could not be written.
    #[error("unable to write catalog '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Records could not be encoded.
    #[error("unable to encode catalog '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Enumerating a scan root failed.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Writing to the output sink failed.
    #[error("output error: {0}")]
    Output(#[from] io::Error),

    /// A previous operation panicked while holding the index lock.
    #[error("catalog lock poisoned")]
    LockPoisoned,
}

/// Outcome of loading the catalog file.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Records added to the index.
    pub loaded: usize,
    /// Rows skipped during load.
    pub malformed: Vec<MalformedRow>,
}

/// Per-root outcome of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub root: String,
    /// Files enumerated under the root.
    pub found: usize,
    /// Enumerated files already in the catalog.
    pub skipped: usize,
    /// New records added.
    pub created: usize,
    /// Records removed because their file was not enumerated.
    pub deleted: usize,
    /// Files that could not be stat'ed or hashed.
    pub failed: usize,
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "root: {}, {} found files, {} skipped, {} created, {} deleted",
            self.root, self.found, self.skipped, self.created, self.deleted
        )?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}

/// Catalog file plus its live index.
pub struct Catalog<F: FileSystem = DiskFileSystem> {
    db_path: PathBuf,
    fs: F,
    hasher: Hasher,
    index: RwLock<RecordIndex>,
}

impl Catalog<DiskFileSystem> {
    /// Catalog backed by the local disk with default settings.
    pub fn open(db_path: impl Into<PathBuf>) -> Self {
        Self::with_fs(db_path, DiskFileSystem::default(), Hasher::default())
    }
}

impl<F: FileSystem> Catalog<F> {
    /// Catalog with an explicit file-system collaborator and hasher.
    pub fn with_fs(db_path: impl Into<PathBuf>, fs: F, hasher: Hasher) -> Self {
        Self {
            db_path: db_path.into(),
            fs,
            hasher,
            index: RwLock::new(RecordIndex::new()),
        }
    }

    /// Path of the backing catalog file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// The file-system collaborator.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    fn read_index(&self) -> Result<RwLockReadGuard<'_, RecordIndex>, CatalogError> {
        self.index.read().map_err(|_| CatalogError::LockPoisoned)
    }

    fn write_index(&self) -> Result<RwLockWriteGuard<'_, RecordIndex>, CatalogError> {
        self.index.write().map_err(|_| CatalogError::LockPoisoned)
    }

    /// Replace the index with the contents of the catalog file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, read or parsed as CSV. Malformed
    /// rows are not errors; they are returned in the report.
    pub fn load(&self) -> Result<LoadReport, CatalogError> {
        let file = File::open(&self.db_path).map_err(|source| CatalogError::Read {
            path: self.db_path.clone(),
            source,
        })?;
        self.load_from_reader(BufReader::new(file))
    }

    /// Like [`load`](Self::load), but a missing catalog file yields an empty
    /// catalog.
    ///
    /// # Errors
    ///
    /// Any failure other than the file not existing.
    pub fn load_or_init(&self) -> Result<LoadReport, CatalogError> {
        match File::open(&self.db_path) {
            Ok(file) => self.load_from_reader(BufReader::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "Catalog {} does not exist, starting empty",
                    self.db_path.display()
                );
                *self.write_index()? = RecordIndex::new();
                Ok(LoadReport::default())
            }
            Err(source) => Err(CatalogError::Read {
                path: self.db_path.clone(),
                source,
            }),
        }
    }

    /// Replace the index with rows decoded from `reader`.
    ///
    /// # Errors
    ///
    /// Fails if `reader` is not readable as CSV.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<LoadReport, CatalogError> {
        let mut index = self.write_index()?;

        let decoded = codec::decode(reader).map_err(|source| CatalogError::Parse {
            path: self.db_path.clone(),
            source,
        })?;

        let mut fresh = RecordIndex::new();
        let mut report = LoadReport {
            loaded: 0,
            malformed: decoded.malformed,
        };

        for row in decoded.rows {
            let record = Record::new(row.path, row.size, row.hash);
            let fields = vec![
                record.path.clone(),
                record.size.to_string(),
                record.hash.clone(),
            ];
            match fresh.insert(record) {
                Ok(()) => report.loaded += 1,
                Err(e) => report.malformed.push(MalformedRow {
                    line: None,
                    fields,
                    reason: e.to_string(),
                }),
            }
        }

        for row in &report.malformed {
            log::warn!("Skipping catalog row in {}: {}", self.db_path.display(), row);
        }
        log::info!(
            "Loaded {} records from {}",
            report.loaded,
            self.db_path.display()
        );

        *index = fresh;
        Ok(report)
    }

    /// Reconcile the index with the files under each root, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first root whose enumeration fails. Records changed for
    /// earlier roots stay in the index.
    pub fn scan<S: AsRef<str>>(&self, roots: &[S]) -> Result<Vec<ScanReport>, CatalogError> {
        let mut index = self.write_index()?;
        roots
            .iter()
            .map(|root| {
                scan_root(&mut index, &self.fs, &self.hasher, root.as_ref())
                    .map_err(CatalogError::from)
            })
            .collect()
    }

    /// Rewrite the catalog file with the current records, ordered by path.
    ///
    /// Records go to a temporary sibling file that is synced and then
    /// renamed over the catalog.
    ///
    /// # Errors
    ///
    /// Fails if the temporary file cannot be written or renamed.
    pub fn write(&self) -> Result<(), CatalogError> {
        let index = self.read_index()?;
        let tmp_path = self.tmp_path();

        let result = self.write_to(&tmp_path, &index).and_then(|()| {
            fs::rename(&tmp_path, &self.db_path).map_err(|source| CatalogError::Write {
                path: self.db_path.clone(),
                source,
            })
        });

        if result.is_err() {
            if let Err(e) = fs::remove_file(&tmp_path) {
                log::debug!("Unable to clean up {}: {}", tmp_path.display(), e);
            }
        } else {
            log::info!("Wrote {} records to {}", index.len(), self.db_path.display());
        }
        result
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .db_path
            .file_name()
            .map_or_else(|| "catalog".into(), |n| n.to_string_lossy());
        self.db_path
            .with_file_name(format!(".{}.{}.tmp", name, std::process::id()))
    }

    fn write_to(&self, tmp_path: &Path, index: &RecordIndex) -> Result<(), CatalogError> {
        let write_err = |source: io::Error| CatalogError::Write {
            path: tmp_path.to_path_buf(),
            source,
        };

        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let file = File::create(tmp_path).map_err(write_err)?;
        let mut writer = BufWriter::new(file);
        codec::encode(&mut writer, index.sorted_records()).map_err(|source| {
            CatalogError::Encode {
                path: self.db_path.clone(),
                source,
            }
        })?;
        let file = writer
            .into_inner()
            .map_err(|e| write_err(e.into_error()))?;
        file.sync_all().map_err(write_err)
    }

    /// Statistics over the current records.
    ///
    /// # Errors
    ///
    /// Only [`CatalogError::LockPoisoned`].
    pub fn stats(&self, min_term_length: usize) -> Result<CatalogStats, CatalogError> {
        let index = self.read_index()?;
        Ok(CatalogStats::compute(&index, min_term_length))
    }

    /// Search by query tokens.
    ///
    /// # Errors
    ///
    /// Only [`CatalogError::LockPoisoned`].
    pub fn search<S: AsRef<str>>(
        &self,
        mode: SearchMode,
        query: &[S],
        limit: usize,
    ) -> Result<SearchOutcome, CatalogError> {
        let index = self.read_index()?;
        Ok(search::search(&index, mode, query, limit))
    }

    /// Search by the name tokens of `path`.
    ///
    /// # Errors
    ///
    /// Only [`CatalogError::LockPoisoned`].
    pub fn search_by_file(&self, path: &str, limit: usize) -> Result<SearchOutcome, CatalogError> {
        let index = self.read_index()?;
        Ok(search::search_by_file(&index, path, limit))
    }

    /// Run both duplicate passes interactively.
    ///
    /// The size and hash pass runs first; search-term groups are computed
    /// afterwards from what is left.
    ///
    /// # Errors
    ///
    /// Fails only if writing to `out` fails.
    pub fn resolve_duplicates<R, W>(
        &self,
        min_term_length: usize,
        display_limit: usize,
        input: &mut R,
        out: &mut W,
    ) -> Result<ResolutionReport, CatalogError>
    where
        R: BufRead,
        W: Write,
    {
        let mut index = self.write_index()?;
        let options = ResolveOptions { display_limit };

        let groups = group_by_size_and_hash(&index);
        let mut report = resolve_groups(&mut index, &self.fs, &groups, input, out, options)?;

        let groups = group_by_search_term(&index, min_term_length);
        report.merge(resolve_groups(
            &mut index, &self.fs, &groups, input, out, options,
        )?);

        log::info!(
            "Reviewed {} groups, deleted {} files, {} failures",
            report.groups_reviewed,
            report.deleted.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Number of records.
    ///
    /// # Errors
    ///
    /// Only [`CatalogError::LockPoisoned`].
    pub fn len(&self) -> Result<usize, CatalogError> {
        Ok(self.read_index()?.len())
    }

    /// Whether the catalog has no records.
    ///
    /// # Errors
    ///
    /// Only [`CatalogError::LockPoisoned`].
    pub fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.read_index()?.is_empty())
    }

    /// A copy of the record at `path`.
    ///
    /// # Errors
    ///
    /// Only [`CatalogError::LockPoisoned`].
    pub fn get(&self, path: &str) -> Result<Option<Record>, CatalogError> {
        Ok(self.read_index()?.get(path).cloned())
    }

    /// Whether the secondary indices agree with the records.
    ///
    /// # Errors
    ///
    /// Only [`CatalogError::LockPoisoned`].
    pub fn is_consistent(&self) -> Result<bool, CatalogError> {
        Ok(self.read_index()?.is_consistent())
    }
}

/// Reconcile one root against the index.
fn scan_root<F: FileSystem + ?Sized>(
    index: &mut RecordIndex,
    fs: &F,
    hasher: &Hasher,
    root: &str,
) -> Result<ScanReport, ScanError> {
    log::info!("Scanning {}", root);
    let files = fs.list_files(root)?;

    let mut report = ScanReport {
        root: root.to_string(),
        found: files.len(),
        ..Default::default()
    };

    for path in &files {
        if index.contains(path) {
            report.skipped += 1;
            continue;
        }

        let (size, hash) = match hasher.hash_file(fs, path) {
            Ok(digest) => digest,
            Err(e) => {
                log::warn!("Skipping {}: {}", path, e);
                report.failed += 1;
                continue;
            }
        };

        match index.insert(Record::new(path.as_str(), size, hash)) {
            Ok(()) => report.created += 1,
            Err(e) => {
                log::warn!("Skipping {}: {}", path, e);
                report.failed += 1;
            }
        }
    }

    let present: HashSet<&str> = files.iter().map(String::as_str).collect();
    for path in index.paths_under(root) {
        if !present.contains(path.as_str()) {
            log::debug!("Removing vanished file {}", path);
            index.remove(&path);
            report.deleted += 1;
        }
    }

    log::info!("{}", report);
    Ok(report)
}
