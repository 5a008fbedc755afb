use serde_json::Value;
use tracing::{debug, warn};

use super::cache_entry::{CacheEntry, CachePolicy};
use super::durable_cache::DurableCache;
use super::memory_cache::{CacheStats, MemoryCache};

/// Two-tier cache shared by every resource store.
///
/// Reads try memory first, then (for durable policies) the durable tier,
/// promoting durable hits into memory with their original age. Caching is an
/// optimization only: nothing here ever returns an error to the caller.
pub struct CacheLayer {
    memory: MemoryCache,
    durable: Option<DurableCache>,
}

impl CacheLayer {
    pub fn new(memory: MemoryCache, durable: Option<DurableCache>) -> Self {
        Self { memory, durable }
    }

    /// Memory-only layer (no cross-session persistence)
    pub fn in_memory(max_entries: usize) -> Self {
        Self::new(MemoryCache::new(max_entries), None)
    }

    pub fn get(&self, key: &str, policy: CachePolicy) -> Option<CacheEntry> {
        if let Some(entry) = self.memory.get(key) {
            return Some(entry);
        }

        let hit = if policy.durable {
            self.durable
                .as_ref()
                .and_then(|durable| durable.get(key, policy.ttl))
        } else {
            None
        };

        match hit {
            Some(hit) => {
                debug!("Durable cache hit for {} ({:?} old)", key, hit.age);
                let entry = CacheEntry::with_age(key, hit.payload, policy.ttl, hit.age);
                self.memory.insert_entry(entry.clone());
                Some(entry)
            }
            None => None,
        }
    }

    pub fn set(&self, key: &str, payload: Value, policy: CachePolicy) {
        if policy.durable {
            if let Some(durable) = &self.durable {
                if let Err(e) = durable.set(key, &payload) {
                    warn!("Durable cache write failed for {}: {}", key, e);
                }
            }
        }
        self.memory.insert(key, payload, policy.ttl);
    }

    pub fn invalidate(&self, key: &str) {
        self.memory.remove(key);
        if let Some(durable) = &self.durable {
            if let Err(e) = durable.remove(key) {
                warn!("Durable cache eviction failed for {}: {}", key, e);
            }
        }
    }

    pub fn invalidate_all(&self) {
        self.memory.clear();
        if let Some(durable) = &self.durable {
            if let Err(e) = durable.clear() {
                warn!("Durable cache clear failed: {}", e);
            }
        }
    }

    pub fn purge_expired(&self) -> usize {
        self.memory.purge_expired()
    }

    pub fn stats(&self) -> CacheStats {
        self.memory.stats()
    }
}
