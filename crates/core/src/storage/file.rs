//! JSON-file backed store for native clients

use crate::{KeyValueStore, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Durable store persisting all keys as one JSON object on disk.
///
/// There is no in-memory cache: each call reads the file again, and writes
/// replace it through a uniquely named temporary file in the same directory
/// and a rename. Concurrent writers resolve as last-writer-wins on the whole
/// file; every write that reports success was the complete file at some point.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Entries to start a write from; a corrupt file is discarded
    fn entries_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries() {
            Err(StorageError::Corrupt { message }) => {
                warn!(path = %self.path.display(), "Discarding corrupt storage file: {message}");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::unavailable(e.to_string()))?;
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| StorageError::from(e.error))?;

        debug!(path = %self.path.display(), keys = entries.len(), "Wrote storage file");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_write()?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}
