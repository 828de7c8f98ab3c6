use crate::domain::ports::MatchCache;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-process cache with per-entry expiry.
///
/// The map is both the store and the index of live keys, so lookups,
/// expiry and pattern removal all run under the same lock.
#[derive(Debug)]
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> MemoryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        evict_expired(&mut self.entries.write(), Instant::now())
    }

    /// Live keys, expired ones excluded.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .read()
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn evict_expired<V>(entries: &mut HashMap<String, CacheEntry<V>>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| !entry.is_expired(now));
    before - entries.len()
}

impl<V: Clone> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> MatchCache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write();
        // another writer may have replaced the entry in between
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            tracing::debug!(key, "removed expired cache entry");
        }
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    fn set(&self, key: String, value: V, ttl: Option<Duration>) {
        tracing::debug!(key = %key, ?ttl, "creating cache entry");
        let now = Instant::now();
        let expires_at = ttl.map(|ttl| now + ttl);

        let mut entries = self.entries.write();
        let evicted = evict_expired(&mut entries, now);
        if evicted > 0 {
            tracing::debug!(evicted, "evicted expired cache entries");
        }
        entries.insert(key, CacheEntry { value, expires_at });
    }

    fn remove(&self, key: &str) -> bool {
        let removed = self.entries.write().remove(key).is_some();
        if removed {
            tracing::debug!(key, "removed cache entry");
        }
        removed
    }

    fn remove_where(&self, predicate: &dyn Fn(&str) -> bool) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !predicate(key.as_str()));
        before - entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set("a".to_string(), 1, None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_expired_entries_are_not_returned() {
        let cache = MemoryCache::new();
        cache.set("a".to_string(), 1, Some(Duration::ZERO));
        cache.set("b".to_string(), 2, Some(Duration::from_secs(600)));

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.keys(), vec!["b".to_string()]);
    }

    #[test]
    fn test_purge_expired() {
        let cache = MemoryCache::new();
        cache.set("b".to_string(), 2, None);
        cache.set("a".to_string(), 1, Some(Duration::ZERO));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_evicts_expired_entries() {
        let cache = MemoryCache::new();
        for i in 0..1000 {
            cache.set(format!("stale.{i}"), i, Some(Duration::ZERO));
        }
        cache.set("fresh".to_string(), -1, Some(Duration::from_secs(60)));

        assert_eq!(cache.entries.read().len(), 1);
        assert_eq!(cache.get("fresh"), Some(-1));
    }

    #[test]
    fn test_remove_where() {
        let cache = MemoryCache::new();
        cache.set("pair.1.strategy-x".to_string(), 1, None);
        cache.set("pair.2.strategy-x".to_string(), 2, None);
        cache.set("pair.1.strategy-y".to_string(), 3, None);

        let removed = cache.remove_where(&|key: &str| key.ends_with("strategy-x"));

        assert_eq!(removed, 2);
        assert_eq!(cache.get("pair.1.strategy-y"), Some(3));
        assert!(cache.get("pair.1.strategy-x").is_none());
    }

    #[test]
    fn test_remove() {
        let cache = MemoryCache::new();
        cache.set("a".to_string(), 1, None);
        assert!(cache.remove("a"));
        assert!(!cache.remove("a"));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_writers_and_invalidation() {
        let cache = Arc::new(MemoryCache::new());
        let mut handles = Vec::new();

        for task in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                for i in 0..100 {
                    cache.set(format!("{task}.{i}.s{}", i % 2), i, None);
                    cache.remove_where(&|key: &str| key.ends_with(".s1"));
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        cache.remove_where(&|key: &str| key.ends_with(".s1"));
        assert_eq!(cache.len(), 8 * 50);
        assert!(cache.keys().iter().all(|key| key.ends_with(".s0")));
    }
}
