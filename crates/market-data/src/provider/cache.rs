//! In-memory response cache with TTL using moka
//!
//! Keeps provider calls from repeating within a render cycle and across
//! closely spaced page loads. Only successful results are stored.

use std::hash::Hash;
use std::time::Duration;

use moka::sync::Cache;

/// Upper bound on cached answers per endpoint.
///
/// History keys carry the requested date range, so a long-running process
/// sees a new key every day.
pub const CACHE_CAPACITY: u64 = 32;

/// One endpoint's cache. A zero TTL disables caching.
pub struct ResponseCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    cache: Option<Cache<K, V>>,
    ttl: Duration,
}

impl<K, V> ResponseCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(ttl: Duration) -> Self {
        let cache = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .time_to_live(ttl)
                .max_capacity(CACHE_CAPACITY)
                .build()
        });
        Self { cache, ttl }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.cache.as_ref()?.get(key)
    }

    pub fn insert(&self, key: K, value: V) {
        if let Some(cache) = &self.cache {
            cache.insert(key, value);
        }
    }

    /// Live entries, after pending evictions and expirations are applied.
    pub fn entry_count(&self) -> u64 {
        match &self.cache {
            Some(cache) => {
                cache.run_pending_tasks();
                cache.entry_count()
            }
            None => 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_fresh_entry() {
        let cache = ResponseCache::new(Duration::from_secs(120));
        cache.insert("latest", 20.5);
        assert_eq!(cache.get(&"latest"), Some(20.5));
        assert_eq!(cache.get(&"other"), None);
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = ResponseCache::new(Duration::ZERO);
        cache.insert("latest", 20.5);
        assert_eq!(cache.get(&"latest"), None);
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_expired_entries_are_released() {
        let cache = ResponseCache::new(Duration::from_millis(10));
        for day in 0..365u32 {
            cache.insert(("SF43718", day), day);
        }
        std::thread::sleep(Duration::from_millis(50));

        assert_eq!(cache.get(&("SF43718", 364)), None);
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_entry_count_is_bounded() {
        let cache = ResponseCache::new(Duration::from_secs(600));
        for day in 0..365u32 {
            cache.insert(("SF43718", day), day);
        }
        assert!(cache.entry_count() <= CACHE_CAPACITY);
    }

    #[test]
    fn test_keys_are_independent() {
        let cache = ResponseCache::new(Duration::from_secs(600));
        cache.insert(("SF43718", 1), "a");
        cache.insert(("SF43718", 2), "b");
        assert_eq!(cache.get(&("SF43718", 1)), Some("a"));
        assert_eq!(cache.get(&("SF43718", 2)), Some("b"));
    }
}
