//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A cached value together with the instant after which it is stale.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Monotonic instant at which the entry stops being visible
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` after `now`.
    pub fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now + ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry is visible only while `now < expires_at`, so it is expired
    /// from the exact instant its TTL has fully elapsed.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Checks if the entry has expired against the current clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns remaining time until expiry, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_not_expired_before_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new("value", Duration::from_secs(60), now);

        assert_eq!(entry.value, "value");
        assert!(!entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now + Duration::from_secs(59)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, Duration::from_secs(10), now);

        // Expired exactly when the TTL has elapsed
        assert!(entry.is_expired_at(now + Duration::from_secs(10)));
        assert!(entry.is_expired_at(now + Duration::from_secs(11)));
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let now = Instant::now();
        let entry = CacheEntry::new((), Duration::ZERO, now);
        assert!(entry.is_expired_at(now));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_remaining_counts_down() {
        let entry = CacheEntry::new("v", Duration::from_secs(10), Instant::now());
        assert_eq!(entry.ttl_remaining(), Duration::from_secs(10));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(entry.ttl_remaining(), Duration::from_secs(6));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
        assert!(entry.is_expired());
    }
}
