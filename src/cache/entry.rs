//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with absolute TTL.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Type-erased payload shared by every entry.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

// == Cache Entry ==
/// A single memoized value with its creation time and time-to-live.
///
/// The TTL is absolute from `created_at`: reading an entry never extends it.
#[derive(Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CachedValue,
    /// When the entry was inserted
    pub created_at: Instant,
    /// How long the entry stays live
    pub ttl: Duration,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new<T>(value: T, ttl: Duration) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self {
            value: Arc::new(value),
            created_at: Instant::now(),
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry stays live while `now - created_at <= ttl`, so an entry read
    /// exactly at its TTL boundary is still returned.
    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }

    // == Time To Live ==
    /// Returns how long the entry has left before it expires, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.created_at.elapsed())
    }

    // == Downcast ==
    /// Returns a clone of the value if it was stored as a `T`.
    pub fn value_as<T>(&self) -> Option<T>
    where
        T: Clone + 'static,
    {
        self.value.downcast_ref::<T>().cloned()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("created_at", &self.created_at)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_live_until_ttl_boundary() {
        let entry = CacheEntry::new("value".to_string(), Duration::from_secs(10));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!entry.is_expired(), "Entry should be live at exactly its TTL");

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_remaining() {
        let entry = CacheEntry::new(1u32, Duration::from_secs(10));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(entry.ttl_remaining(), Duration::from_secs(6));

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_expires_after_any_elapsed_time() {
        let entry = CacheEntry {
            value: Arc::new(5u8),
            created_at: Instant::now(),
            ttl: Duration::ZERO,
        };
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired());
    }

    #[test]
    fn test_value_as_matching_type() {
        let entry = CacheEntry::new(vec![1, 2, 3], Duration::from_secs(1));
        assert_eq!(entry.value_as::<Vec<i32>>(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_value_as_wrong_type() {
        let entry = CacheEntry::new(42u64, Duration::from_secs(1));
        assert_eq!(entry.value_as::<String>(), None);
    }
}
