//! File-backed store.
//!
//! All keys live in one JSON document (`{"key": "value", ...}`). Each write
//! re-reads the document, replaces one entry and writes it back through a
//! temporary file followed by a rename, so a crash never leaves a half-written
//! document behind. Every write uses its own temporary file, so concurrent
//! writers never publish each other's partial output.
//!
//! Reads are lenient: a file that cannot be read reports every key as absent.
//! Writes are not: if the existing document cannot be read, the write fails
//! instead of replacing the other records with an empty document.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{KeyValueStore, StorageError};

/// Persistent [`KeyValueStore`] backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> BTreeMap<String, String> {
        self.load_document().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to read state file");
            BTreeMap::new()
        })
    }

    /// Read the document. A missing or malformed document is empty; any other
    /// read failure is an error.
    fn load_document(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "State file is malformed, starting empty");
            BTreeMap::new()
        }))
    }

    fn temp_path(&self) -> PathBuf {
        static WRITES: AtomicU64 = AtomicU64::new(0);
        let seq = WRITES.fetch_add(1, Ordering::Relaxed);
        let name = self
            .path
            .file_name()
            .map_or_else(|| "state".to_owned(), |name| name.to_string_lossy().into_owned());
        self.path
            .with_file_name(format!(".{name}.{}.{seq}.tmp", std::process::id()))
    }

    fn write_document(&self, document: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        let written = std::fs::write(&tmp, serde_json::to_vec_pretty(document)?)
            .and_then(|()| std::fs::rename(&tmp, &self.path));
        if written.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        written.map_err(StorageError::from)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_document().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut document = self.load_document()?;
        document.insert(key.to_owned(), value.to_owned());
        self.write_document(&document)
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        let mut document = self.load_document()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}
