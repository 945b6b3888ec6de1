//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with TTL expiration and a
//! per-resource key index for invalidation.

use std::collections::HashMap;
use std::time::Duration;

use tracing::warn;

use crate::cache::{CacheEntry, CacheStats, KeyIndex};

// == Cache Store ==
/// Heterogeneous key-value store with absolute per-entry TTL.
///
/// Every value is stored type-erased and read back with the type the caller
/// expects. `get` is the enforcement point for expiry: an expired entry is
/// removed on access and never returned.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Keys grouped by the resource they were cached for
    index: KeyIndex,
    /// Performance statistics
    stats: CacheStats,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL used for entries stored without an explicit one
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            index: KeyIndex::new(),
            stats: CacheStats::new(),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// The entry's creation time is reset. An overwrite through `set` drops
    /// any resource tag the key previously had.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - TTL for the entry (uses default_ttl if None)
    pub fn set<T>(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>)
    where
        T: Send + Sync + 'static,
    {
        let key = key.into();
        self.index.untrack(&key);
        self.insert(key, value, ttl);
    }

    // == Set Tracked ==
    /// Stores a value and records the key under `resource` so it can later be
    /// removed by [`invalidate_resource`](Self::invalidate_resource).
    pub fn set_tracked<T>(
        &mut self,
        resource: &str,
        key: impl Into<String>,
        value: T,
        ttl: Option<Duration>,
    ) where
        T: Send + Sync + 'static,
    {
        let key = key.into();
        self.index.track(resource, &key);
        self.insert(key, value, ttl);
    }

    fn insert<T>(&mut self, key: String, value: T, ttl: Option<Duration>)
    where
        T: Send + Sync + 'static,
    {
        let ttl = ttl.unwrap_or(self.default_ttl);
        self.entries.insert(key, CacheEntry::new(value, ttl));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Returns `None` when the key is missing, when its entry has expired
    /// (the entry is removed), or when the stored value is not a `T`.
    pub fn get<T>(&mut self, key: &str) -> Option<T>
    where
        T: Clone + 'static,
    {
        let Some(entry) = self.entries.get(key) else {
            self.stats.record_miss();
            return None;
        };

        if entry.is_expired() {
            self.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        match entry.value_as::<T>() {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                warn!(key, "Cached value has a different type than requested");
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Returns true iff `get` would return a live value for the key.
    ///
    /// Does not touch statistics and does not extend the entry's TTL.
    pub fn has(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.remove(key);
        if removed {
            self.stats.record_invalidations(1);
        }
        removed
    }

    // == Invalidate Resource ==
    /// Removes every key that was stored under `resource` via
    /// [`set_tracked`](Self::set_tracked). Returns the number removed.
    pub fn invalidate_resource(&mut self, resource: &str) -> usize {
        let mut removed = 0;
        for key in self.index.take_resource(resource) {
            if self.entries.remove(&key).is_some() {
                removed += 1;
            }
        }
        self.stats.record_invalidations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Tracked Keys ==
    /// Returns the keys currently tracked under `resource`.
    pub fn tracked_keys(&self, resource: &str) -> Vec<String> {
        self.index.keys_for(resource)
    }

    // == Clear ==
    /// Removes every entry unconditionally.
    pub fn clear(&mut self) {
        self.stats.record_invalidations(self.entries.len());
        self.entries.clear();
        self.index.clear();
        self.stats.set_total_entries(0);
    }

    // == Clear Expired ==
    /// Removes all expired entries from the cache, leaving live ones intact.
    ///
    /// Returns the number of entries removed.
    pub fn clear_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.index.untrack(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.index.untrack(key);
        self.stats.set_total_entries(self.entries.len());
        removed
    }
}
