//! CSV binding of the record store
//!
//! Files are UTF-8 with a leading byte-order mark so spreadsheet tools pick
//! the right encoding for non-ASCII titles and names. The mark is tolerated
//! but not required on read. Short rows are padded with empty fields; a row
//! with data but no identifier fails the load rather than being dropped, so
//! a later rewrite never loses it.

use std::path::{Path, PathBuf};

use super::{RecordStore, StoreError, atomic_write};
use crate::page_extractor::schema::{Identifier, ItemRecord, RECORD_COLUMNS};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Position of each known column in a file's header row.
///
/// Columns are matched by name, so reordered or partial headers still load.
/// Fields missing from the header or from a short row read as empty.
struct ColumnMap([Option<usize>; RECORD_COLUMNS.len()]);

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut positions = [None; RECORD_COLUMNS.len()];
        for (slot, name) in positions.iter_mut().zip(RECORD_COLUMNS) {
            *slot = headers.iter().position(|h| h.trim() == name);
        }
        Self(positions)
    }

    fn identifier(&self) -> Option<usize> {
        self.0[0]
    }

    fn field(&self, row: &csv::StringRecord, column: usize) -> String {
        self.0[column]
            .and_then(|i| row.get(i))
            .unwrap_or_default()
            .to_string()
    }

    /// `None` when the row has no usable identifier
    fn record(&self, row: &csv::StringRecord) -> Option<ItemRecord> {
        let identifier = Identifier::new(self.field(row, 0))?;
        let mut record = ItemRecord::new(identifier);
        record.title = self.field(row, 1);
        record.license_code = self.field(row, 2);
        record.host_name = self.field(row, 3);
        record.host_profile_ref = self.field(row, 4);
        record.host_rating = self.field(row, 5);
        record.host_listing_count = self.field(row, 6);
        record.host_joined_date = self.field(row, 7);
        Some(record)
    }
}

/// A record table stored as one CSV file
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for CsvRecordStore {
    fn load(&self) -> Result<Vec<ItemRecord>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} does not exist yet, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let content = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content);

        let headers = reader
            .headers()
            .map_err(|e| StoreError::csv(&self.path, e))?
            .clone();
        let columns = ColumnMap::from_headers(&headers);
        if columns.identifier().is_none() && !headers.is_empty() {
            return Err(StoreError::MissingColumn {
                path: self.path.clone(),
                column: RECORD_COLUMNS[0],
            });
        }

        let mut records = Vec::new();
        let mut row = csv::StringRecord::new();
        loop {
            match reader.read_record(&mut row) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => return Err(StoreError::csv(&self.path, e)),
            }
            if row.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            match columns.record(&row) {
                Some(record) => records.push(record),
                None => {
                    let line = row.position().map_or(0, csv::Position::line);
                    return Err(StoreError::UnkeyedRow {
                        path: self.path.clone(),
                        row: line,
                    });
                }
            }
        }

        log::debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn replace_all(&self, records: &[ItemRecord]) -> Result<(), StoreError> {
        let mut buffer = UTF8_BOM.to_vec();
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut buffer);

            writer
                .write_record(RECORD_COLUMNS)
                .map_err(|e| StoreError::csv(&self.path, e))?;
            for record in records {
                writer
                    .serialize(record)
                    .map_err(|e| StoreError::csv(&self.path, e))?;
            }
            writer
                .flush()
                .map_err(|e| StoreError::io(&self.path, e))?;
        }

        atomic_write(&self.path, &buffer)?;
        log::debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}
