//! Persisted calculation history.
//!
//! The history is an ordered, newest-first sequence of entries backed by a
//! single JSON document. The whole document is loaded once at open and
//! rewritten in full on every mutation; there is exactly one writer (the
//! active session), so last-writer-wins is sufficient.

use crate::types::{HistoryEntry, NewEntry};
use crate::{Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the history document inside the data directory
pub const HISTORY_FILE: &str = "history.json";

/// Owned, encapsulated calculation history with a single in-memory copy
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Open the history at the given path, loading any persisted entries
    ///
    /// A missing file is first-run: empty history. A file that cannot be
    /// read or parsed logs a warning and degrades to empty history; it is
    /// never a fatal error.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self { path, entries }
    }

    /// Append a new entry to the front of the history and persist
    ///
    /// Assigns a fresh timestamp-based id, unique within this store even
    /// for same-millisecond appends. Returns the assigned id.
    pub fn append(&mut self, new: NewEntry) -> Result<i64> {
        let id = self.next_id();
        let entry = HistoryEntry {
            id,
            medication: new.medication,
            prescribed_value: new.prescribed_value,
            prescribed_unit: new.prescribed_unit,
            available_value: new.available_value,
            available_unit: new.available_unit,
            form: new.form,
            result: new.result,
            alert: new.alert,
        };

        self.entries.insert(0, entry);
        self.persist()?;

        tracing::debug!("Appended history entry {}", id);
        Ok(id)
    }

    /// Remove the entry with the given id and persist
    ///
    /// No match is a no-op, not an error; the document is still rewritten.
    /// Returns whether an entry was removed. Idempotent.
    pub fn remove(&mut self, id: i64) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() < before;

        self.persist()?;

        if removed {
            tracing::debug!("Removed history entry {}", id);
        } else {
            tracing::debug!("No history entry with id {}, nothing removed", id);
        }
        Ok(removed)
    }

    /// Read-only snapshot of the history, newest-to-oldest
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Next unique, monotonically distinguishable id
    ///
    /// Timestamp-based (ms since epoch), bumped past the newest existing id
    /// so two appends within the same millisecond stay distinguishable.
    fn next_id(&self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        let newest = self.entries.iter().map(|e| e.id).max().unwrap_or(0);
        now.max(newest + 1)
    }

    /// Rewrite the full history document atomically
    ///
    /// Same pattern as config/state saves elsewhere: write to a locked temp
    /// file in the same directory, sync, rename over the original.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "history path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&self.entries)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Persisted {} history entries to {:?}", self.entries.len(), self.path);
        Ok(())
    }
}

/// Load history entries from a file with shared locking
fn load_entries(path: &Path) -> Vec<HistoryEntry> {
    if !path.exists() {
        tracing::info!("No history file found at {:?}, starting empty", path);
        return Vec::new();
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open history file {:?}: {}. Starting empty.", path, e);
            return Vec::new();
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock history file {:?}: {}. Starting empty.", path, e);
        return Vec::new();
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("Failed to read history file {:?}: {}. Starting empty.", path, e);
        return Vec::new();
    }

    let _ = file.unlock();

    match serde_json::from_str::<Vec<HistoryEntry>>(&contents) {
        Ok(entries) => {
            tracing::debug!("Loaded {} history entries from {:?}", entries.len(), path);
            entries
        }
        Err(e) => {
            tracing::warn!("Failed to parse history file {:?}: {}. Starting empty.", path, e);
            Vec::new()
        }
    }
}
