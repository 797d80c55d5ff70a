//! Local durable key-value storage.
//!
//! A small string-to-string map persisted as a JSON file, used as the
//! fallback for history and to keep user preferences.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::Result;

/// Key holding the serialized history list (JSON array).
pub const HISTORY_KEY: &str = "calculator-history";
/// Key holding the theme preference (`"dark"` or `"light"`).
pub const THEME_KEY: &str = "calculator-theme";
/// Key holding the sound preference (`"true"` or `"false"`).
pub const SOUND_KEY: &str = "calculator-sound";

#[derive(Debug)]
pub struct LocalStorage {
    path: Option<PathBuf>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl LocalStorage {
    /// Open storage backed by the file at `path`, creating it lazily on
    /// first write. An unreadable or corrupt file starts out empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Ignoring corrupt storage file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read storage file");
                BTreeMap::new()
            }
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened local storage");

        Self {
            path: Some(path),
            entries: Mutex::new(entries),
        }
    }

    /// Storage that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// `<data dir>/calcdesk/storage.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("calcdesk").join("storage.json"))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<()> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.into());
        self.save(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock();
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write-then-rename; the file is never observed half-written.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(entries)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_get_set_remove() {
        let storage = LocalStorage::in_memory();
        assert_eq!(storage.get(THEME_KEY), None);

        storage.set(THEME_KEY, "dark").unwrap();
        assert_eq!(storage.get(THEME_KEY).as_deref(), Some("dark"));

        storage.remove(THEME_KEY).unwrap();
        assert_eq!(storage.get(THEME_KEY), None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = LocalStorage::open(&path);
        storage.set(SOUND_KEY, "false").unwrap();
        drop(storage);

        let reopened = LocalStorage::open(&path);
        assert_eq!(reopened.get(SOUND_KEY).as_deref(), Some("false"));
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{ not json").unwrap();

        let storage = LocalStorage::open(&path);
        assert_eq!(storage.get(HISTORY_KEY), None);

        storage.set(HISTORY_KEY, "[]").unwrap();
        assert_eq!(LocalStorage::open(&path).get(HISTORY_KEY).as_deref(), Some("[]"));
    }
}
