//! Append-only audit store backends.
//!
//! The [`AuditStore`] contract is small on purpose: one append per record,
//! id allocation inside the store. Physical placement of the records (a
//! table in the host store, a log file, memory for tests) is a backend
//! concern; what every backend must guarantee is that records are never
//! updated or deleted and that `event_id`s are unique and strictly
//! increasing under concurrent appends.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use crate::error::AuditError;
use crate::record::AuditRecord;

/// Append-only persistence for audit records.
///
/// Appends are invoked synchronously from inside the writer's transaction;
/// a failed append must propagate so the enclosing transaction aborts
/// rather than committing without its audit record.
pub trait AuditStore: Send + Sync {
    /// Persist one record, assigning and returning its `event_id`.
    ///
    /// The id carried by the incoming record is ignored; the store
    /// allocates a fresh one from its shared counter.
    fn append(&self, record: AuditRecord) -> Result<u64, AuditError>;
}

/// In-memory store.
///
/// Reference backend for embedding hosts and tests: an atomic counter for
/// id allocation plus a vector of committed records behind a lock.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    next_id: AtomicU64,
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    /// Create an empty store. The first allocated `event_id` is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records appended so far, in append order.
    ///
    /// A poisoned lock still holds every record appended before the
    /// panic; queries read through it rather than reporting an empty
    /// store. Appends keep refusing a poisoned lock.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records for one relation, identified by its table identifier.
    pub fn records_for_table(&self, table_identifier: u32) -> Vec<AuditRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.table_identifier == table_identifier)
            .cloned()
            .collect()
    }

    /// Number of records appended so far.
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when no record has been appended.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditStore for MemoryAuditStore {
    fn append(&self, mut record: AuditRecord) -> Result<u64, AuditError> {
        let event_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        record.event_id = event_id;

        let mut records = self
            .records
            .write()
            .map_err(|e| AuditError::StorageError(format!("record lock poisoned: {e}")))?;
        records.push(record);
        Ok(event_id)
    }
}

/// File-backed store writing one JSON record per line.
pub struct FileAuditStore {
    path: PathBuf,
    next_id: AtomicU64,
    file: Mutex<File>,
}

impl FileAuditStore {
    /// Open (or create) the log file at `path`, resuming the id sequence
    /// after the highest id already present.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        let last_id = Self::last_event_id(&path)?;
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            next_id: AtomicU64::new(last_id),
            file: Mutex::new(file),
        })
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record back from the log file, in append order.
    pub fn read_all(&self) -> Result<Vec<AuditRecord>, AuditError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }

    fn last_event_id(path: &Path) -> Result<u64, AuditError> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut last = 0u64;
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: AuditRecord = serde_json::from_str(&line)?;
            last = last.max(record.event_id);
        }
        Ok(last)
    }
}

impl AuditStore for FileAuditStore {
    fn append(&self, mut record: AuditRecord) -> Result<u64, AuditError> {
        let event_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        record.event_id = event_id;
        let json = serde_json::to_string(&record)?;

        let mut file = self
            .file
            .lock()
            .map_err(|e| AuditError::StorageError(format!("file lock poisoned: {e}")))?;
        writeln!(file, "{json}")?;
        file.flush()?;

        tracing::debug!(event_id, path = %self.path.display(), "audit record appended");
        Ok(event_id)
    }
}
