//! Expired-Entry Sweep Task
//!
//! Background task that periodically removes expired cache entries so keys
//! that are never read again do not accumulate.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Shortest period the sweep will run at
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

// == Sweep Task ==
/// Handle to a running sweep. Dropping it stops the sweep.
#[derive(Debug)]
pub struct SweepTask {
    handle: Option<JoinHandle<()>>,
}

impl SweepTask {
    /// Cancels the sweep timer. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Cache sweep stopped");
        }
    }

    /// Returns true once the sweep has been shut down.
    pub fn is_stopped(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawns a background task that sweeps `cache` every `interval`.
///
/// The interval is independent of any entry's TTL. Reads already check
/// expiry, so the sweep only bounds memory. Intervals shorter than
/// [`MIN_SWEEP_INTERVAL`] are raised to it.
///
/// # Example
/// ```ignore
/// let cache = TtlCache::<String>::new(Duration::from_secs(300));
/// let mut sweep = spawn_sweep_task(cache.clone(), Duration::from_secs(600));
/// // Later, during shutdown:
/// sweep.shutdown();
/// ```
pub fn spawn_sweep_task<V>(cache: TtlCache<V>, interval: Duration) -> SweepTask
where
    V: Clone + Send + Sync + 'static,
{
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    let handle = tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    });

    SweepTask {
        handle: Some(handle),
    }
}
