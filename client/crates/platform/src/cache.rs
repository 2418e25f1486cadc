//! Query Cache
//!
//! Small TTL cache behind the data-fetching layer. Stale entries are
//! evicted on read; the logout sweep clears the cache wholesale.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Default staleness window for cached queries
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30);

struct Entry {
    value: Value,
    stored_at: Instant,
}

/// TTL'd query-result cache keyed by query key (e.g. `/api/user`)
pub struct QueryCache {
    entries: Mutex<HashMap<String, Entry>>,
    stale_after: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER)
    }
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            stale_after,
        }
    }

    /// Get a fresh entry; a stale one is evicted and `None` returned
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.stale_after => {
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a query result
    pub fn set(&self, key: &str, value: Value) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop a single entry
    pub fn invalidate(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
