use serde_json::Value;
use std::time::Duration;
use tokio::time::Instant;

/// Cached payload with TTL support
///
/// The payload is the serialized `ResourcePage`, so one cache can serve
/// stores of every item type.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Value,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(key: impl Into<String>, payload: Value, ttl: Duration) -> Self {
        Self {
            key: key.into(),
            payload,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// Entry restored from an older source, keeping its original age
    pub fn with_age(key: impl Into<String>, payload: Value, ttl: Duration, age: Duration) -> Self {
        let now = Instant::now();
        Self {
            key: key.into(),
            payload,
            stored_at: now.checked_sub(age).unwrap_or(now),
            ttl,
        }
    }

    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// Valid iff `now - stored_at < ttl`
    pub fn is_valid(&self) -> bool {
        self.age() < self.ttl
    }
}

/// How long a resource kind's pages live and whether they outlive the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,
    pub durable: bool,
}

impl CachePolicy {
    pub fn session(ttl: Duration) -> Self {
        Self {
            ttl,
            durable: false,
        }
    }

    pub fn durable(ttl: Duration) -> Self {
        Self { ttl, durable: true }
    }
}
