//! In-memory dataset accumulator
//!
//! Rows accumulate in memory in insertion order and the whole table is
//! rewritten to disk after every append. Full-rewrite flushing is O(n) per
//! day and O(n²) over a run; it is acceptable at one row per calendar day
//! and keeps the on-disk file consistent after each completed day.

use csv::{Reader, Writer};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{OutputError, OutputResult};
use crate::{PriceRecord, COLUMNS};

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// Append-only table of [`PriceRecord`] rows with a fixed column set.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<PriceRecord>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names, in on-disk order.
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Number of rows currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows in insertion order.
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Append one row, preserving insertion order.
    ///
    /// Field values are taken as-is; only the column set itself is fixed.
    pub fn append(&mut self, record: PriceRecord) {
        self.records.push(record);
    }

    /// Rewrite the dataset file at `path` from the in-memory table.
    ///
    /// The file is replaced wholesale on every call, header row included,
    /// so the on-disk table always mirrors memory after a completed day.
    pub fn flush<P: AsRef<Path>>(&self, path: P) -> OutputResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("failed to create directory: {e}")))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("failed to create file: {e}")))?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = Writer::from_writer(buf_writer);

        for record in &self.records {
            writer
                .serialize(record)
                .map_err(|e| OutputError::CsvError(format!("failed to write row: {e}")))?;
        }

        // An empty table still gets its header row.
        if self.records.is_empty() {
            writer
                .write_record(COLUMNS)
                .map_err(|e| OutputError::CsvError(format!("failed to write header: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("failed to flush: {e}")))?;

        debug!(rows = self.records.len(), path = %path.display(), "dataset flushed");
        Ok(())
    }

    /// Read the dataset file at `path`, then reset to an empty table.
    ///
    /// The read result is discarded and the run always starts from an empty
    /// table, so rows persisted by earlier runs are overwritten by the next
    /// flush. A missing or unreadable file is the normal fresh-start path.
    pub fn load_existing<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();

        match Reader::from_path(path) {
            Ok(mut reader) => {
                let rows = reader
                    .deserialize::<PriceRecord>()
                    .filter_map(Result::ok)
                    .count();
                info!(
                    rows,
                    path = %path.display(),
                    "existing dataset read; starting from an empty table"
                );
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "no existing dataset loaded");
            }
        }

        self.records.clear();
    }

    /// Rows with fully identical field sets removed, first occurrence kept.
    ///
    /// The caller receives the deduplicated copy; the dataset itself is left
    /// untouched and the copy is never persisted.
    pub fn dedupe(&self) -> Vec<PriceRecord> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter(|record| seen.insert((*record).clone()))
            .cloned()
            .collect()
    }
}

/// Read all rows of a dataset file.
pub fn read_rows<P: AsRef<Path>>(path: P) -> OutputResult<Vec<PriceRecord>> {
    let mut reader = Reader::from_path(path.as_ref())
        .map_err(|e| OutputError::IoError(format!("failed to open dataset: {e}")))?;
    let mut rows = Vec::new();
    for result in reader.deserialize::<PriceRecord>() {
        rows.push(result.map_err(|e| OutputError::CsvError(format!("failed to read row: {e}")))?);
    }
    Ok(rows)
}
