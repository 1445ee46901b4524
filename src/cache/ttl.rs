//! Shared TTL Cache
//!
//! Cloneable async handle over a [`CacheStore`], adding get-or-compute
//! memoization for expensive fetches such as database reads.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStore, KeyPattern};
use crate::error::Result;
use crate::tasks::{spawn_sweep_task, SweepTask};

// == TTL Cache ==
/// Process-wide cache handle. Clones share the same entries.
///
/// Constructed once by the composition root and passed to whoever needs it;
/// there is no global instance.
#[derive(Debug)]
pub struct TtlCache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<V> TtlCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(default_ttl))),
        }
    }

    // == Get Or Compute ==
    /// Returns the live value for `key`, or runs `compute` once and caches
    /// its result for `ttl` (the default TTL when `None`).
    ///
    /// A failed compute is returned unchanged and leaves the cache as it was.
    /// Concurrent misses on the same key are not coalesced: each caller that
    /// misses runs its own compute, and the last one to finish wins.
    /// A zero TTL always recomputes and never stores.
    ///
    /// # Example
    /// ```
    /// use std::convert::Infallible;
    /// use std::time::Duration;
    ///
    /// use resume_site_cache::cache::{keys, KeyPattern, TtlCache};
    ///
    /// # tokio_test::block_on(async {
    /// let cache: TtlCache<Vec<String>> = TtlCache::new(Duration::from_secs(300));
    ///
    /// let posts = cache
    ///     .get_or_compute(
    ///         &keys::blog_posts(true),
    ///         || async { Ok::<_, Infallible>(vec!["cv-tips".to_string()]) },
    ///         None,
    ///     )
    ///     .await
    ///     .unwrap();
    /// assert_eq!(posts, vec!["cv-tips".to_string()]);
    ///
    /// // After a blog write, drop every cached blog view at once
    /// let removed = cache
    ///     .invalidate_pattern(&KeyPattern::prefix(keys::BLOG_NAMESPACE))
    ///     .await;
    /// assert_eq!(removed, 1);
    /// # });
    /// ```
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        compute: F,
        ttl: Option<Duration>,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        let ttl = match ttl {
            Some(ttl) => ttl,
            None => self.store.read().await.default_ttl(),
        };
        let cacheable = !key.is_empty() && !ttl.is_zero();
        if key.is_empty() {
            warn!("get_or_compute called with an empty key, result will not be cached");
        }

        if cacheable {
            if let Some(value) = self.store.write().await.get(key) {
                debug!(key, "cache hit");
                return Ok(value);
            }
            debug!(key, "cache miss");
        }

        // The lock is not held across the compute
        let value = compute().await?;

        if cacheable {
            if let Err(e) = self
                .store
                .write()
                .await
                .set(key.to_string(), value.clone(), Some(ttl))
            {
                warn!(key, error = %e, "failed to cache computed value");
            }
        }

        Ok(value)
    }

    /// Returns the live value for `key` without computing anything.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) -> Result<()> {
        self.store.write().await.set(key.into(), value, ttl)
    }

    pub async fn invalidate(&self, key: &str) -> bool {
        let removed = self.store.write().await.invalidate(key);
        debug!(key, removed, "cache invalidate");
        removed
    }

    /// Removes every entry whose key matches `pattern`, returning the count.
    pub async fn invalidate_pattern(&self, pattern: &KeyPattern) -> usize {
        let removed = self.store.write().await.invalidate_pattern(pattern);
        debug!(?pattern, removed, "cache pattern invalidate");
        removed
    }

    pub async fn clear(&self) -> usize {
        self.store.write().await.clear()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Physically removes expired entries. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Starts the periodic sweep for this cache.
    pub fn spawn_sweeper(&self, interval: Duration) -> SweepTask {
        spawn_sweep_task(self.clone(), interval)
    }
}
