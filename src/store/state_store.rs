//! Persistence for the dashboard's key/value state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::error::{DashboardError, Result};

/// Persisted state keys. Each key is stored as `<key>.json`.
pub mod keys {
    pub const THEME: &str = "theme";
    pub const SEARCH_COUNTER: &str = "searchCounter";
    pub const CUSTOM_CONTEXTS: &str = "aiCustomContexts";
    pub const CUSTOM_PORTALS: &str = "customInsurancePortals";
    pub const FAVORITES: &str = "matrixFavorites_v2";
    pub const TASKS: &str = "taskMatrixTasks_v3";
}

/// Key/value store for dashboard state.
///
/// Files live in `~/.config/customer-matrix/state/` unless overridden:
/// - `theme.json`, `searchCounter.json`
/// - `aiCustomContexts.json`, `customInsurancePortals.json`
/// - `matrixFavorites_v2.json`, `taskMatrixTasks_v3.json`
#[derive(Debug, Clone)]
pub struct StateStore {
    state_dir: PathBuf,
}

impl StateStore {
    /// Create a store rooted at `state_dir`, ensuring the directory exists
    pub fn new(state_dir: impl Into<PathBuf>) -> Result<Self> {
        let state_dir = state_dir.into();
        fs::create_dir_all(&state_dir).map_err(|e| {
            DashboardError::Storage(format!(
                "Failed to create state directory {}: {}",
                state_dir.display(),
                e
            ))
        })?;
        Ok(Self { state_dir })
    }

    /// Open the store configured for this session
    pub fn open(config: &AppConfig) -> Result<Self> {
        Self::new(config.state_dir.clone())
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.state_dir.join(format!("{}.json", key))
    }

    /// Load a value. `Ok(None)` when the key was never written.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        let value = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            DashboardError::Storage(format!("Failed to parse {}: {}", key, e))
        })?;
        Ok(Some(value))
    }

    /// Load a value, falling back to the default when missing or unreadable
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable state");
                T::default()
            }
        }
    }

    /// Atomically write a value (temp file, sync, rename)
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.key_path(key);
        let temp_path = path.with_extension("json.tmp");

        let file = File::create(&temp_path)
            .map_err(|e| DashboardError::Storage(format!("Failed to create temp file: {}", e)))?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
        writer
            .get_ref()
            .sync_all()
            .map_err(|e| DashboardError::Storage(format!("Failed to sync: {}", e)))?;

        fs::rename(&temp_path, &path)
            .map_err(|e| DashboardError::Storage(format!("Failed to rename: {}", e)))?;

        tracing::debug!(key, "Saved state");
        Ok(())
    }

    /// Remove a key. Missing keys are not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Test helper: replace a key's file with a non-empty directory so every
/// later `save` of that key fails at the rename step.
#[cfg(test)]
pub(crate) fn block_key(store: &StateStore, key: &str) {
    let path = store.key_path(key);
    if path.is_file() {
        fs::remove_file(&path).unwrap();
    }
    fs::create_dir_all(path.join("occupied")).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    fn store() -> (TempDir, StateStore) {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path().join("state")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_missing_key_loads_none() {
        let (_dir, store) = store();
        let value: Option<Sample> = store.load("nothing").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let (_dir, store) = store();
        let sample = Sample {
            name: "a".into(),
            count: 3,
        };
        store.save("sample", &sample).unwrap();

        assert!(store.state_dir().join("sample.json").exists());
        assert!(!store.state_dir().join("sample.json.tmp").exists());
        assert_eq!(store.load::<Sample>("sample").unwrap(), Some(sample));
    }

    #[test]
    fn test_corrupt_value_falls_back_to_default() {
        let (_dir, store) = store();
        fs::write(store.state_dir().join("sample.json"), "{not json").unwrap();

        assert!(store.load::<Sample>("sample").is_err());
        assert_eq!(store.load_or_default::<Sample>("sample"), Sample::default());
    }

    #[test]
    fn test_blocked_key_fails_to_save() {
        let (_dir, store) = store();
        store.save(keys::THEME, &"light").unwrap();
        block_key(&store, keys::THEME);
        assert!(store.save(keys::THEME, &"dark").is_err());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = store();
        store.save(keys::THEME, &"dark").unwrap();
        store.remove(keys::THEME).unwrap();
        store.remove(keys::THEME).unwrap();
        assert!(store.load::<String>(keys::THEME).unwrap().is_none());
    }
}
