//! Append-only CSV sink.

use crate::GenerationLogRecord;
use atelier_error::{StorageError, StorageErrorKind};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// CSV log of successful generations.
///
/// The header row is written only when the file is new or empty. Appends
/// hold a lock for the whole write, so rows from concurrent workflows
/// sharing one `GenerationLog` never interleave.
#[derive(Debug)]
pub struct GenerationLog {
    path: PathBuf,
    writer_lock: Mutex<()>,
}

impl GenerationLog {
    /// Log backed by the file at `path`. Nothing is touched until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer_lock: Mutex::new(()),
        }
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file with a header when needed.
    #[instrument(skip(self, record), fields(path = %self.path.display()))]
    pub fn append(&self, record: &GenerationLogRecord) -> Result<(), StorageError> {
        let _guard = self.writer_lock.lock();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error)?;
        let is_empty = file.metadata().map_err(io_error)?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_empty)
            .from_writer(file);
        writer.serialize(record).map_err(csv_error)?;
        writer.flush().map_err(io_error)?;

        debug!(header_written = is_empty, "Appended generation record");
        Ok(())
    }

    /// Read every record in insertion order. A missing file is an empty log.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn records(&self) -> Result<Vec<GenerationLogRecord>, StorageError> {
        let _guard = self.writer_lock.lock();

        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path).map_err(csv_error)?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<GenerationLogRecord>, _>>()
            .map_err(csv_error)?;

        debug!(count = records.len(), "Read generation log");
        Ok(records)
    }
}

#[track_caller]
fn io_error(e: std::io::Error) -> StorageError {
    StorageError::new(StorageErrorKind::Io(e.to_string()))
}

#[track_caller]
fn csv_error(e: csv::Error) -> StorageError {
    StorageError::new(StorageErrorKind::Csv(e.to_string()))
}
