//! Record persistence.
//!
//! A `RecordStore` is a row-oriented table of `ItemRecord`s keyed by
//! identifier. Two instances exist per output directory: the run file,
//! overwritten every run, and the master file, which accumulates every run
//! deduplicated by identifier. Both are rewritten as a whole through a
//! temp-file-and-rename so a crash never leaves a half-written table.

pub mod csv_store;
pub mod merge;

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

pub use csv_store::CsvRecordStore;
pub use merge::{MergeOutcome, merge_into_master, write_run_and_merge};

use crate::page_extractor::schema::ItemRecord;

/// Record store failures. Fatal to the run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} has no `{column}` column")]
    MissingColumn { path: PathBuf, column: &'static str },

    /// Row holds data but no identifier; rewriting the table would lose it
    #[error("row {row} of {path} has no identifier")]
    UnkeyedRow { path: PathBuf, row: u64 },

    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Row-oriented table of records keyed by identifier
pub trait RecordStore {
    /// All rows in file order; empty if the table does not exist yet
    fn load(&self) -> Result<Vec<ItemRecord>, StoreError>;

    /// Replace the whole table with `records`, atomically
    fn replace_all(&self, records: &[ItemRecord]) -> Result<(), StoreError>;
}

/// Write `content` to `path` through a temp file in the same directory.
///
/// The rename is atomic at OS level; readers see either the old file or the
/// new one.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent_dir).map_err(|e| StoreError::io(parent_dir, e))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(|e| StoreError::io(path, e))?;
    temp_file
        .write_all(content)
        .and_then(|()| temp_file.flush())
        .map_err(|e| StoreError::io(path, e))?;

    temp_file.persist(path).map_err(|source| StoreError::Persist {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
