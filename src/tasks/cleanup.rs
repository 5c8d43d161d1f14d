//! Cache Maintenance Task
//!
//! Background task that periodically removes expired payloads.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedByteCache;

/// Spawns a background task that periodically cleans up expired payloads.
///
/// Correctness never depends on this task: reads expire entries lazily.
/// It only reclaims memory held by entries nobody asks for anymore.
///
/// # Arguments
/// * `cache` - Shared byte cache
/// * `cleanup_interval_secs` - Interval in seconds between cleanup runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = shared(BoundedByteCache::default());
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 3600);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(cache: SharedByteCache, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            period.as_secs()
        );

        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);

        loop {
            ticker.tick().await;

            let (removed, stats) = {
                let mut cache_guard = cache.write().await;
                let removed = cache_guard.cleanup_expired();
                (removed, cache_guard.get_stats())
            };

            if removed > 0 {
                info!("Cache cleanup: removed {} expired payloads", removed);
                debug!(
                    total_items = stats.base.total_items,
                    total_bytes = stats.total_bytes,
                    "Cache status after cleanup"
                );
            } else {
                debug!("Cache cleanup: no expired payloads found");
            }
        }
    })
}
