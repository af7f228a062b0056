//! Key/value string stores backing [`Preferences`](super::Preferences).
//!
//! Values are opaque strings here; decoding and defaulting happen in the
//! preferences layer.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::data_dir;
use crate::error::{Result, StorageError};

/// Browser-localStorage-like string store.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store, used by tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// TOML-file store. Every `set` writes the whole table back to disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `<data_dir>/preferences.toml`.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self> {
        Ok(Self::open_at(data_dir()?.join("preferences.toml")))
    }

    /// Open a store at `path`. A missing file is an empty store; an unreadable
    /// or malformed file is treated as empty too.
    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring malformed preference file");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable preference file");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.values).map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, content).map_err(|e| StorageError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("A"), None);
        store.set("A", "true").unwrap();
        assert_eq!(store.get("A").as_deref(), Some("true"));
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");

        let mut store = FileStore::open_at(&path);
        store.set("PALETTE_TYPE_KEY", "\"darkMode\"").unwrap();
        store.set("SHOW_HINTS_KEY", "false").unwrap();

        let reopened = FileStore::open_at(&path);
        assert_eq!(reopened.get("PALETTE_TYPE_KEY").as_deref(), Some("\"darkMode\""));
        assert_eq!(reopened.get("SHOW_HINTS_KEY").as_deref(), Some("false"));
    }

    #[test]
    fn file_store_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");

        let mut store = FileStore::open_at(&path);
        assert_eq!(store.path(), path.as_path());
        store.set("SHOW_HINTS_KEY", "true").unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let store = FileStore::open_at(&path);
        assert_eq!(store.get("SHOW_HINTS_KEY"), None);
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open_at(dir.path().join("missing").join("preferences.toml"));
        assert!(store.set("SHOW_HINTS_KEY", "true").is_err());
    }
}
