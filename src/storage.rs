// Persisted key/value state
//
// Mirrors browser local storage: flat string keys and values, read at
// startup, written on every user action. Write failures never break the
// page; they are logged and the in-memory value is kept.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stored theme preference (`"dark"` or `"light"`)
pub const KEY_THEME: &str = "theme";

/// Selected palette id (legacy: numeric index)
pub const KEY_SELECTED_PALETTE: &str = "selected-palette";

/// Development catalog palette index
pub const KEY_DEV_CURRENT_PALETTE: &str = "dev-current-palette";

/// `"true"` forces developer palette controls on
pub const KEY_DEV_PALETTES_ENABLED: &str = "dev-palettes-enabled";

/// File name of the storage file inside the state directory
pub const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage file is not a JSON object of strings: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key/value storage
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Volatile storage, used in tests and when no state directory is usable
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Storage backed by a JSON object file, rewritten on every change
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or lazily create) `storage.json` inside `dir`
    ///
    /// A missing file is an empty store. A corrupt file is an error so the
    /// caller can decide whether to start fresh.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        let path = dir.join(STORAGE_FILE);
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text).map_err(io_err)
    }

    fn flush_or_warn(&self, key: &str) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, key, "Failed to persist storage");
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush_or_warn(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new().with(KEY_THEME, "light");
        assert_eq!(storage.get(KEY_THEME).as_deref(), Some("light"));

        storage.set(KEY_THEME, "dark");
        assert_eq!(storage.get(KEY_THEME).as_deref(), Some("dark"));
        assert_eq!(storage.get(KEY_SELECTED_PALETTE), None);
    }

    #[test]
    fn test_file_storage_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();

        let mut storage = FileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get(KEY_SELECTED_PALETTE), None);
        storage.set(KEY_SELECTED_PALETTE, "forest");
        storage.set(KEY_THEME, "light");

        let reopened = FileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get(KEY_SELECTED_PALETTE).as_deref(), Some("forest"));
        assert_eq!(reopened.get(KEY_THEME).as_deref(), Some("light"));
    }

    #[test]
    fn test_file_storage_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let mut storage = FileStorage::open(&nested).unwrap();
        storage.set(KEY_THEME, "dark");
        assert!(nested.join(STORAGE_FILE).exists());
    }

    #[test]
    fn test_file_storage_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STORAGE_FILE), "[1, 2, 3]").unwrap();
        assert!(matches!(
            FileStorage::open(dir.path()),
            Err(StorageError::Json(_))
        ));
    }
}
