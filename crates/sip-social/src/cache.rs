//! View cache with point-in-time snapshots
//!
//! The coordinator keeps its batch view behind [`ViewCache`] so optimistic
//! updates can be reverted exactly. [`MokaViewCache`] is the default
//! implementation, backed by a bounded moka cache.

use crate::config::CacheConfig;
use moka::sync::Cache;
use std::hash::Hash;
use std::time::Duration;

/// Captured state of one cache entry, possibly absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<V>(Option<V>);

impl<V> Snapshot<V> {
    /// Whether the entry did not exist when captured
    #[inline]
    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// Captured value
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.0.as_ref()
    }
}

/// Key-value cache supporting snapshot, restore, in-place mutation and invalidation
pub trait ViewCache<K, V>: Send + Sync {
    /// Current value
    fn get(&self, key: &K) -> Option<V>;

    /// Store a value, replacing any previous one
    fn put(&self, key: K, value: V);

    /// Drop the entry
    fn invalidate(&self, key: &K);

    /// Apply `f` to the current value and store the result.
    ///
    /// Returns `false` without calling `f` when there is no entry.
    fn mutate<F>(&self, key: &K, f: F) -> bool
    where
        F: FnOnce(&mut V);

    /// Capture the entry as it is now
    fn snapshot(&self, key: &K) -> Snapshot<V> {
        Snapshot(self.get(key))
    }

    /// Put the entry back exactly as captured; an absent snapshot removes it
    fn restore(&self, key: K, snapshot: Snapshot<V>) {
        match snapshot.0 {
            Some(value) => self.put(key, value),
            None => self.invalidate(&key),
        }
    }
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Bounded in-memory view cache
#[derive(Debug, Clone)]
pub struct MokaViewCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, V>,
}

impl<K, V> MokaViewCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Create cache from configuration
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        match config.time_to_live() {
            Some(ttl) => Self::with_ttl(config.max_capacity, ttl),
            None => Self::new(config.max_capacity),
        }
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }
}

impl<K, V> Default for MokaViewCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl<K, V> ViewCache<K, V> for MokaViewCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    #[inline]
    fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key)
    }

    #[inline]
    fn put(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    #[inline]
    fn invalidate(&self, key: &K) {
        self.inner.invalidate(key);
    }

    fn mutate<F>(&self, key: &K, f: F) -> bool
    where
        F: FnOnce(&mut V),
    {
        let Some(mut value) = self.inner.get(key) else {
            return false;
        };
        f(&mut value);
        self.inner.insert(key.clone(), value);
        true
    }
}
