//! Typed JSON adapter over a storage backend
//!
//! `LocalStorage` is the only way repositories touch persisted data.
//! Reads never fail: a missing, unparsable, or `"undefined"` entry is
//! discarded and the caller's fallback is returned. Writes never fail
//! either: a serialization or backend error is logged and swallowed, so
//! in-memory state stays authoritative even when durability is lost.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::config::Config;
use crate::storage::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::storage::error::StorageResult;

/// Placeholder written by callers that stored "no value"
pub const UNDEFINED_SENTINEL: &str = "undefined";

/// Cloneable handle to a shared storage namespace
#[derive(Clone)]
pub struct LocalStorage {
    backend: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for LocalStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStorage").finish_non_exhaustive()
    }
}

impl LocalStorage {
    /// Wrap an arbitrary backend
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Share an existing backend handle
    pub fn from_shared(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Fresh in-memory namespace
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// File-backed namespace in the configured data directory
    pub fn open(config: &Config) -> StorageResult<Self> {
        Ok(Self::new(FileBackend::open(&config.data_dir)?))
    }

    /// Raw access to the backend
    pub fn backend(&self) -> &dyn StorageBackend {
        self.backend.as_ref()
    }

    /// Read and decode the value under `key`, or return `fallback`
    ///
    /// Corrupt entries are removed from the backend so the next read
    /// starts clean.
    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored value for {}, using default", key);
                return fallback;
            }
            Err(e) => {
                error!("Error reading storage key \"{}\": {}", key, e);
                return fallback;
            }
        };

        if raw == UNDEFINED_SENTINEL {
            warn!("Discarding placeholder value stored under \"{}\"", key);
            self.discard(key);
            return fallback;
        }

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Discarding corrupt value stored under \"{}\": {}", key, e);
                self.discard(key);
                fallback
            }
        }
    }

    /// Encode `value` as JSON and store it under `key`
    ///
    /// Returns whether the value reached the backend. Failures are logged
    /// and otherwise ignored.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match self.try_write(key, value) {
            Ok(()) => {
                debug!("Persisted \"{}\"", key);
                true
            }
            Err(e) => {
                match e.recovery_suggestion() {
                    Some(hint) => error!("Error setting storage key \"{}\": {} ({})", key, e, hint),
                    None => error!("Error setting storage key \"{}\": {}", key, e),
                }
                false
            }
        }
    }

    /// Encode and store, reporting the failure instead of logging it
    pub fn try_write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let text = serde_json::to_string(value)?;
        self.backend.set(key, &text)
    }

    fn discard(&self, key: &str) {
        if let Err(e) = self.backend.remove(key) {
            error!("Failed to remove corrupt storage key \"{}\": {}", key, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::error::StorageError;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_returns_fallback() {
        let storage = LocalStorage::in_memory();
        let value: Vec<String> = storage.read("missing", vec!["x".to_string()]);
        assert_eq!(value, vec!["x".to_string()]);
    }

    #[test]
    fn test_write_then_read() {
        let storage = LocalStorage::in_memory();
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);

        assert!(storage.write("map", &map));
        let loaded: BTreeMap<String, i32> = storage.read("map", BTreeMap::new());
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_corrupt_value_is_discarded() {
        let storage = LocalStorage::in_memory();
        storage.backend().set("nekolinks-links", "{not json").unwrap();

        let value: Vec<u32> = storage.read("nekolinks-links", Vec::new());
        assert!(value.is_empty());
        assert!(storage.backend().get("nekolinks-links").unwrap().is_none());
    }

    #[test]
    fn test_undefined_placeholder_is_discarded() {
        let storage = LocalStorage::in_memory();
        storage
            .backend()
            .set("nekolinks-anime", UNDEFINED_SENTINEL)
            .unwrap();

        let value: Vec<u32> = storage.read("nekolinks-anime", vec![7]);
        assert_eq!(value, vec![7]);
        assert!(storage.backend().get("nekolinks-anime").unwrap().is_none());
    }

    #[test]
    fn test_wrong_shape_is_discarded() {
        let storage = LocalStorage::in_memory();
        storage.backend().set("numbers", r#"{"a": 1}"#).unwrap();

        let value: Vec<u32> = storage.read("numbers", Vec::new());
        assert!(value.is_empty());
        assert!(storage.backend().get("numbers").unwrap().is_none());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let storage = LocalStorage::new(MemoryBackend::with_quota(8));

        assert!(!storage.write("key", &"a value that does not fit"));
        // Nothing was stored
        let value: String = storage.read("key", "fallback".to_string());
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_try_write_reports_quota() {
        let storage = LocalStorage::new(MemoryBackend::with_quota(8));
        let err = storage.try_write("key", &"too long for quota").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_file_backed_corruption_recovery() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(FileBackend::open(temp_dir.path()).unwrap());
        let path = temp_dir.path().join("nekolinks-settings.json");
        std::fs::write(&path, "garbage").unwrap();

        let value: Option<bool> = storage.read("nekolinks-settings", None);
        assert!(value.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_clones_share_namespace() {
        let storage = LocalStorage::in_memory();
        let other = storage.clone();

        storage.write("shared", &42u32);
        assert_eq!(other.read("shared", 0u32), 42);
    }
}
