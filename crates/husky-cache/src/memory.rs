//! In-memory TTL cache.
//!
//! [`MemoryCache`] keeps at most one entry per key. Entries are never evicted
//! proactively: expiry is checked when an entry is read, and an expired entry
//! simply stays in the map until the next `put` for its key replaces it.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::Cache;

/// A cached value with its expiry deadline.
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Process-local [`Cache`] backed by a `RwLock<HashMap>`.
///
/// Not persisted: a restart begins with an empty cache. Reads and writes are
/// individually atomic, but a read followed by a write is not, so two
/// concurrent misses for the same key both write (last write wins).
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V> MemoryCache<V> {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> MemoryCache<V> {
    /// Look up `key` as of `now`. An entry is live while `now < expires_at`.
    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let entries = self.entries.read().unwrap();
        let entry = entries.get(key)?;

        if now < entry.expires_at {
            Some(entry.value.clone())
        } else {
            tracing::debug!(key, "cache entry expired");
            None
        }
    }

    /// Store `value` under `key`, live until `now + ttl`.
    fn put_at(&self, key: &str, value: V, ttl: Duration, now: Instant) {
        let entry = Entry {
            value,
            expires_at: now + ttl,
        };
        self.entries.write().unwrap().insert(key.to_owned(), entry);
    }
}

impl<V: Clone + Send + Sync> Cache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn put(&self, key: &str, value: V, ttl: Duration) {
        self.put_at(key, value, ttl, Instant::now());
    }
}
