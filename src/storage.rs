//! Durable key-value storage for the style store.
//!
//! Values are JSON text. [`FileStorage`] keeps one `<key>.json` file per key
//! in the application config directory; [`MemoryStorage`] keeps them in
//! process. Reads and writes through [`load_from_storage`] and
//! [`save_to_storage`] never fail: problems are logged and defaults used.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::constants::{APP_DIR, CONFIG_DIR_ENV};

/// Minimal string key-value store.
pub trait Storage {
    /// Reads the value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed storage, one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage in the default location (see [`FileStorage::default_dir`]).
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_dir()?))
    }

    /// Gets the storage directory.
    ///
    /// `LAZYQR_CONFIG_DIR` wins when set; otherwise the platform config dir:
    /// - Linux: `~/.config/LazyQR/`
    /// - macOS: `~/Library/Application Support/LazyQR/`
    /// - Windows: `%APPDATA%\LazyQR\`
    pub fn default_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_DIR);

        Ok(config_dir)
    }

    /// Directory the files live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            anyhow::bail!("Invalid storage key '{key}'");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .context(format!("Failed to read storage file: {}", path.display()))?;
        Ok(Some(content))
    }

    /// Uses temp file + rename pattern for atomic writes.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;

        fs::create_dir_all(&self.dir).context(format!(
            "Failed to create storage directory: {}",
            self.dir.display()
        ))?;

        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, value).context(format!(
            "Failed to write temp storage file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &path).context(format!(
            "Failed to rename temp storage file to: {}",
            path.display()
        ))?;

        Ok(())
    }
}

/// In-process storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory storage lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and deserializes `key`, falling back to `default`.
///
/// Absent keys, unreadable storage and unparsable values all yield `default`;
/// the latter two are logged.
pub fn load_from_storage<T, S>(storage: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    match storage.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring corrupt stored value for '{}': {}", key, e);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            tracing::warn!("Failed to read '{}' from storage: {:#}", key, e);
            default
        }
    }
}

/// Serializes and writes `value` under `key`. Failures are logged, not returned.
pub fn save_to_storage<T, S>(storage: &S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let result = serde_json::to_string(value)
        .context(format!("Failed to serialize '{key}'"))
        .and_then(|json| storage.set(key, &json));

    if let Err(e) = result {
        tracing::warn!("Failed to persist '{}': {:#}", key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"));

        assert_eq!(storage.get("qr-download-format").unwrap(), None);

        storage.set("qr-download-format", "\"svg\"").unwrap();
        assert_eq!(
            storage.get("qr-download-format").unwrap().as_deref(),
            Some("\"svg\"")
        );
        assert!(temp_dir.path().join("nested/qr-download-format.json").exists());
        assert!(!temp_dir
            .path()
            .join("nested/qr-download-format.json.tmp")
            .exists());
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        assert!(storage.set("../escape", "1").is_err());
        assert!(storage.get("a/b").is_err());
        assert!(storage.key_path("").is_err());
    }

    #[test]
    fn test_load_from_storage_defaults() {
        let storage = MemoryStorage::with_entries([("broken", "{not json"), ("n", "7")]);

        assert_eq!(load_from_storage(&storage, "missing", 1_u32), 1);
        assert_eq!(load_from_storage(&storage, "broken", 2_u32), 2);
        assert_eq!(load_from_storage(&storage, "n", 3_u32), 7);
    }

    #[test]
    fn test_save_to_storage_writes_json() {
        let storage = MemoryStorage::new();
        save_to_storage(&storage, "qr-accordion-state", "dots");
        assert_eq!(
            storage.get("qr-accordion-state").unwrap().as_deref(),
            Some("\"dots\"")
        );
    }

    #[test]
    fn test_save_to_storage_swallows_io_errors() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "x").unwrap();

        // Directory path is an existing file, so create_dir_all fails.
        let storage = FileStorage::new(&blocker);
        save_to_storage(&storage, "qr-style-config", &42);
        assert_eq!(storage.get("qr-style-config").unwrap(), None);
    }
}
