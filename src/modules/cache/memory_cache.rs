use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info};

use super::cache_entry::CacheEntry;

/// Cache statistics for monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries_count: usize,
    pub evictions: u64,
    pub expired_cleanups: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// In-session cache tier shared by all stores.
///
/// Expired entries are treated as absent on read and dropped lazily at that
/// point; `purge_expired` sweeps the rest.
#[derive(Debug)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    cleanups: AtomicU64,
    max_entries: usize,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            cleanups: AtomicU64::new(0),
            max_entries: max_entries.max(1),
        }
    }

    /// Get a cached entry if present and not expired
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let lookup = self.entries.get(key).map(|entry| {
            if entry.is_valid() {
                Some(entry.clone())
            } else {
                None
            }
        });

        match lookup {
            Some(Some(entry)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for key: {}", key);
                Some(entry)
            }
            Some(None) => {
                // The read guard is released above; removing now cannot deadlock the shard.
                self.entries.remove_if(key, |_, entry| !entry.is_valid());
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Removed expired cache entry for key: {}", key);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Cache miss for key: {}", key);
                None
            }
        }
    }

    pub fn insert(&self, key: &str, payload: Value, ttl: Duration) {
        self.insert_entry(CacheEntry::new(key, payload, ttl));
    }

    pub fn insert_entry(&self, entry: CacheEntry) {
        if !self.entries.contains_key(&entry.key) && self.entries.len() >= self.max_entries {
            self.evict_oldest_entries();
        }
        debug!("Cached key: {} with TTL: {:?}", entry.key, entry.ttl);
        self.entries.insert(entry.key.clone(), entry);
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all cached entries
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.cleanups.store(0, Ordering::Relaxed);
        info!("Memory cache cleared");
    }

    /// Drop every expired entry; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_valid());
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            self.cleanups.fetch_add(removed as u64, Ordering::Relaxed);
            debug!("Cleaned up {} expired cache entries", removed);
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries_count: self.entries.len(),
            evictions: self.evictions.load(Ordering::Relaxed),
            expired_cleanups: self.cleanups.load(Ordering::Relaxed),
        }
    }

    /// Make room for one insert: expired entries first, then oldest-first
    /// down to 90% of capacity.
    fn evict_oldest_entries(&self) {
        if self.purge_expired() > 0 && self.entries.len() < self.max_entries {
            return;
        }

        let mut by_age: Vec<(String, tokio::time::Instant)> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().stored_at))
            .collect();
        by_age.sort_by_key(|(_, stored_at)| *stored_at);

        let current_size = by_age.len();
        let target_size = (self.max_entries * 9) / 10;
        let to_evict = current_size.saturating_sub(target_size).max(1);

        for (key, _) in by_age.into_iter().take(to_evict) {
            self.entries.remove(&key);
        }
        self.evictions.fetch_add(to_evict as u64, Ordering::Relaxed);

        debug!(
            "Evicted {} old cache entries (was {}, now {})",
            to_evict,
            current_size,
            self.entries.len()
        );
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test(start_paused = true)]
    async fn hit_then_expire() {
        let cache = MemoryCache::new(10);
        cache.insert("anime:page=1", json!({"items": []}), TTL);

        assert!(cache.get("anime:page=1").is_some());

        tokio::time::advance(TTL).await;
        assert!(cache.get("anime:page=1").is_none());
        assert!(cache.is_empty(), "expired entry is dropped on read");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[tokio::test(start_paused = true)]
    async fn evicts_oldest_when_full() {
        let cache = MemoryCache::new(3);
        for i in 0..3 {
            cache.insert(&format!("k{}", i), json!(i), TTL);
            tokio::time::advance(Duration::from_secs(1)).await;
        }

        cache.insert("k3", json!(3), TTL);

        assert!(cache.get("k0").is_none());
        assert!(cache.get("k3").is_some());
        assert!(cache.len() <= 3);
        assert!(cache.stats().evictions >= 1);
    }

    #[tokio::test(start_paused = true)]
    async fn overwriting_an_existing_key_does_not_evict() {
        let cache = MemoryCache::new(2);
        cache.insert("a", json!(1), TTL);
        cache.insert("b", json!(2), TTL);
        cache.insert("a", json!(3), TTL);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").unwrap().payload, json!(3));
        assert_eq!(cache.stats().evictions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn purge_only_removes_expired() {
        let cache = MemoryCache::new(10);
        cache.insert("short", json!(1), Duration::from_secs(5));
        cache.insert("long", json!(2), TTL);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.get("long").is_some());
    }
}
