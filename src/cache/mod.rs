//! Cache Module
//!
//! Provides in-memory caching with per-entry TTL expiration and
//! pattern-based bulk invalidation.

mod entry;
pub mod keys;
mod pattern;
mod stats;
mod store;
mod ttl;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use pattern::KeyPattern;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use ttl::TtlCache;

// == Public Constants ==
/// Default TTL for cached values (5 minutes)
pub const DEFAULT_TTL_SECS: u64 = 5 * 60;

/// Default interval between sweeps of expired entries (10 minutes)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 10 * 60;
