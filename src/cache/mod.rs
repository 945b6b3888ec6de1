//! Cache Module
//!
//! Provides in-memory memoization with per-entry TTL expiration and
//! resource-level invalidation.

mod entry;
mod index;
mod key;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CachedValue};
pub use index::KeyIndex;
pub use key::{create_key, KeySegment, KEY_SEPARATOR};
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::CacheStore;
