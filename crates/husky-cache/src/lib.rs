//! Time-bounded cache abstraction for Husky.
//!
//! Content lists fetched from the provider are kept for a fixed time-to-live
//! so that repeated requests do not hit the provider every time. One trait
//! forms the core API:
//!
//! - [`Cache`]: key-value store where every entry carries its own TTL
//!
//! # Implementations
//!
//! - [`MemoryCache`]: process-local map with lazy expiry (checked on read)
//! - [`NullCache`]: no-op implementation (always misses), used in development
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use husky_cache::{Cache, MemoryCache, NullCache};
//!
//! let cache = MemoryCache::new();
//! cache.put("list-1", vec!["card"], Duration::from_secs(600));
//! assert_eq!(cache.get("list-1"), Some(vec!["card"]));
//!
//! let volatile = NullCache;
//! Cache::<Vec<&str>>::put(&volatile, "list-1", vec!["card"], Duration::from_secs(600));
//! assert_eq!(Cache::<Vec<&str>>::get(&volatile, "list-1"), None);
//! ```

mod memory;
pub use memory::MemoryCache;

use std::time::Duration;

/// A key-value store whose entries expire after a caller-chosen TTL.
///
/// Values are cloned out on read, so callers typically store cheap handles
/// such as `Arc<[T]>`.
pub trait Cache<V>: Send + Sync {
    /// Retrieve a live value.
    ///
    /// Returns `None` when the key is absent or its entry has expired.
    fn get(&self, key: &str) -> Option<V>;

    /// Store a value that stays live for `ttl` from now.
    ///
    /// Replaces any previous entry for the same key, live or not.
    fn put(&self, key: &str, value: V, ttl: Duration);
}

/// No-op [`Cache`] that never stores or retrieves anything.
///
/// Every `get` returns `None`; every `put` is discarded. Use when caching is
/// disabled, so each read goes to the source.
pub struct NullCache;

impl<V> Cache<V> for NullCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn put(&self, _key: &str, _value: V, _ttl: Duration) {}
}
