//! Garbage Collection Task
//!
//! Background task that periodically sweeps expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::cache::Cache;

/// Spawns a background task that runs a garbage-collection sweep every
/// `interval_secs` seconds.
///
/// A failed sweep is logged and retried on the next tick.
///
/// # Arguments
/// * `cache` - Shared cache engine
/// * `interval_secs` - Interval in seconds between sweeps (must be non-zero)
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_gc_task(cache.clone(), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_gc_task(cache: Arc<Cache>, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting garbage collection task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            match cache.collect_garbage().await {
                Ok(removed) if !removed.is_empty() => {
                    info!("Garbage collection: removed {} expired entries", removed.len());
                }
                Ok(_) => debug!("Garbage collection: no expired entries found"),
                Err(e) => error!("Garbage collection failed: {}", e),
            }
        }
    })
}
