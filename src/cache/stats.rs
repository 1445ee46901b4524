//! Cache Statistics Module
//!
//! Read-only diagnostic snapshot of the cache contents and hit counters.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of the cache at one instant.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of live entries
    pub size: usize,
    /// Keys of the live entries, sorted
    pub keys: Vec<String>,
    /// Reads answered from the cache
    pub hits: u64,
    /// Reads that had to recompute
    pub misses: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
