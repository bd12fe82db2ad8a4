//! Record Store
//!
//! CRUD over a directory of `<id>.txt` files.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::counter::SequenceAllocator;
use crate::error::{Result, TodoError};

use super::{Record, RECORD_EXTENSION};

/// Manages the record directory
///
/// ## Concurrency:
/// - `write_lock` serializes create/update/delete within the process, so an
///   id is allocated and its file written before the next mutation starts
/// - Reads take no lock; a record removed mid-listing is skipped
/// - No cross-process locking
pub struct RecordStore {
    /// Directory where record files live
    data_dir: PathBuf,

    /// Id source for new records
    allocator: Arc<SequenceAllocator>,

    /// Serializes mutations
    write_lock: Mutex<()>,
}

impl RecordStore {
    /// Create a store over `data_dir`
    ///
    /// Call [`RecordStore::initialize`] before any CRUD operation.
    pub fn new(data_dir: impl Into<PathBuf>, allocator: Arc<SequenceAllocator>) -> Self {
        Self {
            data_dir: data_dir.into(),
            allocator,
            write_lock: Mutex::new(()),
        }
    }

    /// Ensure the record directory exists
    pub fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Create a record with a freshly allocated id
    ///
    /// The id is allocated (and the counter persisted) before the record
    /// file is written. The text goes to a temp file that is linked into
    /// place only once complete, so a failed write leaves no record behind.
    /// An existing file under the new id is never overwritten.
    pub fn create(&self, text: &str) -> Result<Record> {
        let _write_guard = self.write_lock.lock();

        let id = self.allocator.allocate_next()?;
        let path = self.record_path(&id);

        let staged = self.stage(text)?;
        staged.persist_noclobber(&path).map_err(|e| match e.error.kind() {
            ErrorKind::AlreadyExists => TodoError::Storage(format!(
                "record file already exists for allocated id {}",
                id
            )),
            _ => TodoError::Io(e.error),
        })?;

        tracing::debug!(id = %id, bytes = text.len(), "Created record");
        Ok(Record::new(id, text))
    }

    /// Read a single record
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD.
    pub fn read_one(&self, id: &str) -> Result<Record> {
        let path = self.checked_path(id)?;

        match fs::read(&path) {
            Ok(bytes) => Ok(Record::new(id, String::from_utf8_lossy(&bytes))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(TodoError::NotFound(id.to_string())),
            Err(e) => Err(TodoError::Io(e)),
        }
    }

    /// Read every record in the directory, sorted by id
    ///
    /// Entries that are not `*.txt` files are ignored. An empty directory
    /// yields an empty vector.
    pub fn read_all(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();

        for id in self.list_ids()? {
            match self.read_one(&id) {
                Ok(record) => records.push(record),
                // Removed between listing and reading
                Err(TodoError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    /// Replace the text of an existing record
    ///
    /// Fails with `NotFound` and leaves the directory untouched when the
    /// record does not exist. The new text replaces the old one by rename,
    /// so a failed write keeps the previous text. The counter is never
    /// consulted.
    pub fn update(&self, id: &str, text: &str) -> Result<Record> {
        let path = self.checked_path(id)?;
        let _write_guard = self.write_lock.lock();

        // A missing record stays missing
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(TodoError::NotFound(id.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TodoError::NotFound(id.to_string()))
            }
            Err(e) => return Err(TodoError::Io(e)),
        }

        let staged = self.stage(text)?;
        staged.persist(&path).map_err(|e| TodoError::Io(e.error))?;

        tracing::debug!(id = %id, bytes = text.len(), "Updated record");
        Ok(Record::new(id, text))
    }

    /// Remove a record
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.checked_path(id)?;
        let _write_guard = self.write_lock.lock();

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(id = %id, "Deleted record");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(TodoError::NotFound(id.to_string())),
            Err(e) => Err(TodoError::Io(e)),
        }
    }

    /// Number of records in the directory
    pub fn len(&self) -> Result<usize> {
        Ok(self.list_ids()?.len())
    }

    /// True when the directory holds no records
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Get the record directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the allocator used for new ids
    pub fn allocator(&self) -> &Arc<SequenceAllocator> {
        &self.allocator
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Write `text` to a temp file inside the record directory
    ///
    /// The temp name ends in `.tmp`, so listings never mistake it for a
    /// record. It is removed on drop unless persisted.
    fn stage(&self, text: &str) -> Result<NamedTempFile> {
        let mut staged = tempfile::Builder::new()
            .prefix(".staged-")
            .suffix(".tmp")
            .tempfile_in(&self.data_dir)?;
        staged.write_all(text.as_bytes())?;
        staged.as_file().sync_all()?;
        Ok(staged)
    }

    /// Path of the file backing `id`
    fn record_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    /// Path for a caller-supplied id
    ///
    /// Ids are opaque, but one that cannot be a plain filename can never
    /// name a record in this directory.
    fn checked_path(&self, id: &str) -> Result<PathBuf> {
        if id.is_empty() || id == "." || id == ".." || id.contains(&['/', '\\', '\0'][..]) {
            return Err(TodoError::NotFound(id.to_string()));
        }
        Ok(self.record_path(id))
    }

    /// Ids of all record files, in directory listing order
    fn list_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type()?.is_file() {
                continue;
            }

            match Self::parse_record_id(&path) {
                Some(id) => ids.push(id),
                None => tracing::trace!(path = %path.display(), "Skipping non-record entry"),
            }
        }

        Ok(ids)
    }

    /// Parse record id from filename
    /// "00042.txt" → Some("00042")
    fn parse_record_id(path: &Path) -> Option<String> {
        if path.extension()? != RECORD_EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        Some(stem.to_string())
    }
}
