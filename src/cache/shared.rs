//! Shared Cache Module
//!
//! Thread-safe handle over a single [`CacheStore`] plus the memoized-fetch
//! wrapper used by the service layer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};

type KeyLocks = HashMap<String, Arc<Mutex<()>>>;

// == Shared Cache ==
/// Cloneable handle to the application's cache.
///
/// One instance is created at startup and handed to every component that
/// needs it; clones share the same underlying store. Tests build their own
/// instance per case.
#[derive(Clone, Debug)]
pub struct SharedCache {
    store: Arc<RwLock<CacheStore>>,
    /// Per-key locks held while a producer for that key is running
    in_flight: Arc<Mutex<KeyLocks>>,
}

impl SharedCache {
    // == Constructor ==
    pub fn new(store: CacheStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self::new(CacheStore::new(default_ttl))
    }

    // == Store Access ==
    pub async fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Clone + 'static,
    {
        self.store.write().await.get(key)
    }

    pub async fn set<T>(&self, key: impl Into<String>, value: T, ttl: Option<Duration>)
    where
        T: Send + Sync + 'static,
    {
        self.store.write().await.set(key, value, ttl);
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.read().await.has(key)
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    pub async fn invalidate_resource(&self, resource: &str) -> usize {
        self.store.write().await.invalidate_resource(resource)
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    pub async fn clear_expired(&self) -> usize {
        self.store.write().await.clear_expired()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn tracked_keys(&self, resource: &str) -> Vec<String> {
        self.store.read().await.tracked_keys(resource)
    }

    // == Cache Or Fetch ==
    /// Returns the live value for `key`, or runs `producer` and caches its
    /// successful result for `ttl`.
    ///
    /// A failed producer leaves the cache untouched and its error is returned
    /// as is. Concurrent misses on the same key are collapsed: only one
    /// producer runs at a time per key, and callers that waited on it read
    /// the freshly cached value instead of fetching again.
    pub async fn cache_or_fetch<T, E, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.fetch_inner(None, key, ttl, producer).await
    }

    /// Same as [`cache_or_fetch`](Self::cache_or_fetch), but the stored key is
    /// tracked under `resource` for later bulk invalidation.
    pub async fn cache_or_fetch_tracked<T, E, F, Fut>(
        &self,
        resource: &str,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.fetch_inner(Some(resource), key, ttl, producer).await
    }

    async fn fetch_inner<T, E, F, Fut>(
        &self,
        resource: Option<&str>,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(key).await {
            debug!(key, "Cache hit");
            return Ok(value);
        }

        let key_lock = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.entry(key.to_string()).or_default().clone()
        };

        let result = {
            let _guard = key_lock.lock().await;

            // Another caller may have filled the key while we waited.
            if let Some(value) = self.get::<T>(key).await {
                debug!(key, "Cache hit after waiting on in-flight fetch");
                Ok(value)
            } else {
                debug!(key, "Cache miss, fetching");
                let fetched = producer().await;
                if let Ok(value) = &fetched {
                    let mut store = self.store.write().await;
                    match resource {
                        Some(resource) => store.set_tracked(resource, key, value.clone(), Some(ttl)),
                        None => store.set(key, value.clone(), Some(ttl)),
                    }
                }
                fetched
            }
        };

        self.release(key, key_lock).await;
        result
    }

    /// Drops the per-key lock from the registry once nobody else holds it.
    async fn release(&self, key: &str, key_lock: Arc<Mutex<()>>) {
        let mut in_flight = self.in_flight.lock().await;
        // One reference in the registry, one here.
        if Arc::strong_count(&key_lock) == 2 {
            in_flight.remove(key);
        }
        drop(key_lock);
    }

    #[cfg(test)]
    async fn in_flight_len(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache() -> SharedCache {
        SharedCache::with_default_ttl(Duration::from_secs(300))
    }

    #[tokio::test]
    async fn test_hit_skips_producer() {
        let cache = cache();

        let first: Result<i32, String> = cache
            .cache_or_fetch("k", Duration::from_millis(1000), || async { Ok(42) })
            .await;
        assert_eq!(first, Ok(42));

        let calls = AtomicUsize::new(0);
        let second: Result<i32, String> = cache
            .cache_or_fetch("k", Duration::from_millis(1000), || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await;

        assert_eq!(second, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_producer_does_not_poison() {
        let cache = cache();

        let result: Result<i32, String> = cache
            .cache_or_fetch("k", Duration::from_secs(1), || async {
                Err("upstream down".to_string())
            })
            .await;

        assert_eq!(result, Err("upstream down".to_string()));
        assert_eq!(cache.get::<i32>("k").await, None);
        assert!(cache.is_empty().await);

        let retried: Result<i32, String> = cache
            .cache_or_fetch("k", Duration::from_secs(1), || async { Ok(5) })
            .await;
        assert_eq!(retried, Ok(5));
    }

    #[tokio::test]
    async fn test_failed_producer_keeps_existing_entries() {
        let cache = cache();
        cache.set("other", 1u8, None).await;

        let _: Result<u8, &str> = cache
            .cache_or_fetch("k", Duration::from_secs(1), || async { Err("boom") })
            .await;

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get::<u8>("other").await, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_after_expiry() {
        let cache = cache();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let _: Result<u32, String> = cache
                .cache_or_fetch("k", Duration::from_millis(1000), || async {
                    Ok(calls.fetch_add(1, Ordering::SeqCst) as u32)
                })
                .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(1001)).await;

        let value: Result<u32, String> = cache
            .cache_or_fetch("k", Duration::from_millis(1000), || async {
                Ok(calls.fetch_add(1, Ordering::SeqCst) as u32)
            })
            .await;
        assert_eq!(value, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .cache_or_fetch("shared", Duration::from_secs(60), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, String>("payload".to_string())
                    })
                    .await
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), Ok("payload".to_string()));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.in_flight_len().await, 0);
    }

    #[tokio::test]
    async fn test_waiter_retries_after_failed_fetch() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        let failing = {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .cache_or_fetch("k", Duration::from_secs(60), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Err::<u32, _>("first attempt failed")
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let waiter = cache
            .cache_or_fetch("k", Duration::from_secs(60), || {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<u32, &str>(9)
                }
            })
            .await;

        assert_eq!(failing.await.unwrap(), Err("first attempt failed"));
        assert_eq!(waiter, Ok(9));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_tracked_fetch_can_be_invalidated() {
        let cache = cache();

        for page in 1..=3u32 {
            let key = crate::cache_key!("listing", page, 10u32);
            let _: Result<u32, String> = cache
                .cache_or_fetch_tracked("listing", &key, Duration::from_secs(60), || async move {
                    Ok(page)
                })
                .await;
        }
        assert_eq!(cache.tracked_keys("listing").await.len(), 3);

        assert_eq!(cache.invalidate_resource("listing").await, 3);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let cache = cache();
        let other = cache.clone();

        cache.set("k", 1u8, None).await;
        assert!(other.has("k").await);

        other.clear().await;
        assert!(!cache.has("k").await);
    }
}
