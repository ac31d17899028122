//! In-process cache backed by a concurrent map
//!
//! Volatile storage for the common path: lookups take a read lock, so a
//! `get` never blocks on a `set` of a different key. Expired entries are
//! left in place and lazily superseded by the next `set`; staleness is a
//! deliberate fallback signal, not garbage to collect.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use super::{CacheEntry, CacheStore};

/// Concurrent in-memory response cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an already-built entry, preserving its original expiry
    ///
    /// Used to promote entries read back from the durable store without
    /// restarting their TTL.
    pub fn insert(&self, key: &str, entry: CacheEntry) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), entry);
    }

    /// Number of entries currently held, expired ones included
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, body: &str, ttl: Duration) {
        self.insert(key, CacheEntry::new(body, ttl));
    }
}
