//! Key-Value Storage Infrastructure
//!
//! Web-storage analogs for the client: a persistent JSON-file-backed store
//! (localStorage) and an ephemeral in-memory store (sessionStorage).
//! Presence of a key is itself meaningful for some entries (logout flags),
//! so the interface exposes `contains` and `keys` alongside `get`/`set`.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use kernel::error::app_error::AppResult;

/// String key-value store interface
///
/// Object-safe so stores can be swapped at runtime (file-backed in the app,
/// in-memory in tests).
pub trait KeyStore: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &str) -> Option<String>;

    /// Set a value, replacing any previous one
    fn set(&self, key: &str, value: &str);

    /// Remove a key if present
    fn remove(&self, key: &str);

    /// Remove every key
    fn clear(&self);

    /// Number of stored keys
    fn len(&self) -> usize;

    /// All stored keys
    fn keys(&self) -> Vec<String>;

    /// Whether the store holds no keys
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a key is present (presence-is-the-signal entries)
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

// ============================================================================
// MemoryStore - ephemeral (sessionStorage analog)
// ============================================================================

/// In-memory store, lost on process exit
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.map
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.map.lock().unwrap().remove(key);
    }

    fn clear(&self) {
        self.map.lock().unwrap().clear();
    }

    fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }

    fn keys(&self) -> Vec<String> {
        self.map.lock().unwrap().keys().cloned().collect()
    }
}

// ============================================================================
// FileStore - persistent (localStorage analog)
// ============================================================================

/// JSON-file-backed store, surviving restarts
///
/// The whole map is rewritten on every mutation; entry counts here are tiny
/// (a serialized user and a handful of flags).
pub struct FileStore {
    path: PathBuf,
    map: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open a store at the given path
    ///
    /// A missing file starts empty. A corrupt file is logged and discarded;
    /// losing stale client state is preferable to refusing to start.
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();

        let map = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Discarding corrupt state file"
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    fn persist(&self, map: &BTreeMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "Failed to create state dir");
                return;
            }
        }

        match serde_json::to_string_pretty(map) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist state");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize state");
            }
        }
    }
}

impl KeyStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.map.lock().unwrap();
        map.insert(key.to_string(), value.to_string());
        self.persist(&map);
    }

    fn remove(&self, key: &str) {
        let mut map = self.map.lock().unwrap();
        if map.remove(key).is_some() {
            self.persist(&map);
        }
    }

    fn clear(&self) {
        let mut map = self.map.lock().unwrap();
        map.clear();
        self.persist(&map);
    }

    fn len(&self) -> usize {
        self.map.lock().unwrap().len()
    }

    fn keys(&self) -> Vec<String> {
        self.map.lock().unwrap().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("academy-store-{}-{}.json", std::process::id(), name))
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("auth:user", "{\"id\":1}");
        assert_eq!(store.get("auth:user").as_deref(), Some("{\"id\":1}"));
        assert!(store.contains("auth:user"));
        assert_eq!(store.len(), 1);

        store.remove("auth:user");
        assert!(store.get("auth:user").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_memory_store_clear() {
        let store = MemoryStore::new();
        store.set("force_logout", "1");
        store.set("logged_out", "1");
        store.clear();
        assert_eq!(store.len(), 0);
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);

        {
            let store = FileStore::open(path.clone()).unwrap();
            store.set("auth:user", "{\"id\":7}");
        }

        let store = FileStore::open(path.clone()).unwrap();
        assert_eq!(store.get("auth:user").as_deref(), Some("{\"id\":7}"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json at all {{{").unwrap();

        let store = FileStore::open(path.clone()).unwrap();
        assert!(store.is_empty());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_remove_and_clear() {
        let path = temp_path("remove");
        let _ = fs::remove_file(&path);

        let store = FileStore::open(path.clone()).unwrap();
        store.set("a", "1");
        store.set("b", "2");
        store.remove("a");
        assert_eq!(store.keys(), vec!["b".to_string()]);

        store.clear();
        assert!(store.is_empty());

        let _ = fs::remove_file(&path);
    }
}
