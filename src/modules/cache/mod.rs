//! Cache layer: an in-session memory tier plus an optional durable tier.

mod cache_entry;
mod cache_layer;
mod durable_cache;
mod memory_cache;

pub use cache_entry::{CacheEntry, CachePolicy};
pub use cache_layer::CacheLayer;
pub use durable_cache::{DurableCache, DurableHit};
pub use memory_cache::{CacheStats, MemoryCache};
