//! Run/master merge
//!
//! The run file receives the batch as-is. The master file keeps its prior
//! rows in order and gains, at the end, every batch row whose identifier it
//! did not already hold. Read-modify-write of the entire file: a single,
//! non-concurrent run per master file is assumed.

use std::collections::HashSet;

use super::{RecordStore, StoreError};
use crate::page_extractor::schema::ItemRecord;

/// Row counts after persisting one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Rows written to the run file
    pub run_rows: usize,
    /// Rows newly appended to master
    pub appended: usize,
    /// Rows in master after the merge
    pub master_rows: usize,
}

/// Fold `batch` into `master`. Returns `(appended, master_rows)`.
///
/// Master is only rewritten when something changed: new rows were appended
/// or duplicate rows already present in the file were collapsed.
pub fn merge_into_master<S: RecordStore>(
    master: &S,
    batch: &[ItemRecord],
) -> Result<(usize, usize), StoreError> {
    let existing = master.load()?;
    let existing_len = existing.len();

    let mut seen: HashSet<String> = HashSet::with_capacity(existing_len + batch.len());
    let mut merged: Vec<ItemRecord> = Vec::with_capacity(existing_len + batch.len());

    for record in existing {
        if seen.insert(record.identifier.as_str().to_string()) {
            merged.push(record);
        }
    }
    let collapsed = existing_len - merged.len();
    if collapsed > 0 {
        log::warn!("Master store held {collapsed} duplicate rows; keeping first occurrences");
    }

    let before = merged.len();
    for record in batch {
        if seen.insert(record.identifier.as_str().to_string()) {
            merged.push(record.clone());
        }
    }
    let appended = merged.len() - before;

    if appended > 0 || collapsed > 0 {
        master.replace_all(&merged)?;
    }

    log::info!(
        "Master store: {appended} new rows appended, {} rows total",
        merged.len()
    );
    Ok((appended, merged.len()))
}

/// Overwrite the run store with `batch`, then fold it into master.
pub fn write_run_and_merge<R: RecordStore, M: RecordStore>(
    run: &R,
    master: &M,
    batch: &[ItemRecord],
) -> Result<MergeOutcome, StoreError> {
    run.replace_all(batch)?;
    log::info!("Run store: {} rows written", batch.len());

    let (appended, master_rows) = merge_into_master(master, batch)?;

    Ok(MergeOutcome {
        run_rows: batch.len(),
        appended,
        master_rows,
    })
}
