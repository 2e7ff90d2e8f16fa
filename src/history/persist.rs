//! Durable storage for the history blob
//!
//! The history is persisted as a single JSON document under a named key,
//! the way a browser keeps one entry in local storage. `FileStorage` maps
//! the key to `<dir>/<key>.json`; `MemoryStorage` keeps it in process.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Default key for the recent-analyses blob
pub const DEFAULT_STORAGE_KEY: &str = "recentAnalyses";

/// Key-value slot holding the serialized history
pub trait HistoryStorage: Send + Sync {
    /// Read the blob, `None` if nothing has been stored yet
    fn read(&self) -> io::Result<Option<String>>;

    /// Replace the blob
    fn write(&self, blob: &str) -> io::Result<()>;
}

/// File-backed storage: one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage for `key` inside `dir`
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStorage for FileStorage {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, blob: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, blob)
    }
}

/// In-process storage; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with a blob
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// Current blob, for inspection
    pub fn snapshot(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl HistoryStorage for MemoryStorage {
    fn read(&self) -> io::Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        Ok(slot.clone())
    }

    fn write(&self, blob: &str) -> io::Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        *slot = Some(blob.to_string());
        Ok(())
    }
}
