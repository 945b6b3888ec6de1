//! Expired Entry Sweep
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// Entries that expire between sweeps are still never served: reads check
/// expiry themselves. The sweep only bounds how long dead entries occupy
/// memory.
///
/// Returns the task handle so it can be aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = SharedCache::with_default_ttl(Duration::from_secs(300));
/// let sweep_handle = spawn_cleanup_task(cache.clone(), Duration::from_secs(600));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting expired entry sweep");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.clear_expired().await;

            if removed > 0 {
                info!(removed, "Sweep removed expired entries");
            } else {
                debug!("Sweep found no expired entries");
            }
        }
    })
}
