use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::modules::storage::KeyValueStorage;
use crate::shared::errors::{AppError, AppResult};

const BLOB_SUFFIX: &str = "_cache";
const TIME_SUFFIX: &str = "_cache_time";

/// Entry read back from durable storage
#[derive(Debug, Clone, PartialEq)]
pub struct DurableHit {
    pub payload: Value,
    pub stored_at: DateTime<Utc>,
    pub age: Duration,
}

/// Cross-session cache tier for slow-changing resources.
///
/// Each entry is two storage records: the serialized payload under
/// `{key}_cache` and the store time in epoch milliseconds under
/// `{key}_cache_time`. Expired or unreadable entries are deleted when read.
pub struct DurableCache {
    storage: Arc<dyn KeyValueStorage>,
}

impl DurableCache {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn blob_key(key: &str) -> String {
        format!("{}{}", key, BLOB_SUFFIX)
    }

    pub fn time_key(key: &str) -> String {
        format!("{}{}", key, TIME_SUFFIX)
    }

    /// Read a still-valid entry; every failure reads as a miss
    pub fn get(&self, key: &str, ttl: Duration) -> Option<DurableHit> {
        let (blob, stored_ms) = match self.read_records(key) {
            Ok(Some(records)) => records,
            Ok(None) => return None,
            Err(e) => {
                warn!("Durable cache read failed for {}: {}", key, e);
                self.evict(key);
                return None;
            }
        };

        let Some(stored_at) = Utc.timestamp_millis_opt(stored_ms).single() else {
            warn!("Durable cache timestamp out of range for {}", key);
            self.evict(key);
            return None;
        };

        let age = (Utc::now() - stored_at).to_std().unwrap_or(Duration::ZERO);
        if age >= ttl {
            debug!("Durable cache entry {} expired ({:?} old)", key, age);
            self.evict(key);
            return None;
        }

        match serde_json::from_str::<Value>(&blob) {
            Ok(payload) => Some(DurableHit {
                payload,
                stored_at,
                age,
            }),
            Err(e) => {
                warn!("Corrupted durable cache payload for {}: {}", key, e);
                self.evict(key);
                None
            }
        }
    }

    pub fn set(&self, key: &str, payload: &Value) -> AppResult<()> {
        let blob = serde_json::to_string(payload)?;
        self.storage.set_item(&Self::blob_key(key), &blob)?;
        self.storage
            .set_item(&Self::time_key(key), &Utc::now().timestamp_millis().to_string())?;
        debug!("Persisted durable cache entry {}", key);
        Ok(())
    }

    pub fn remove(&self, key: &str) -> AppResult<()> {
        self.storage.remove_item(&Self::blob_key(key))?;
        self.storage.remove_item(&Self::time_key(key))
    }

    /// Remove every durable cache record, leaving unrelated keys alone
    pub fn clear(&self) -> AppResult<()> {
        for key in self.storage.keys()? {
            if key.ends_with(BLOB_SUFFIX) || key.ends_with(TIME_SUFFIX) {
                self.storage.remove_item(&key)?;
            }
        }
        Ok(())
    }

    fn read_records(&self, key: &str) -> AppResult<Option<(String, i64)>> {
        let blob = self.storage.get_item(&Self::blob_key(key))?;
        let time = self.storage.get_item(&Self::time_key(key))?;

        match (blob, time) {
            (Some(blob), Some(time)) => {
                let stored_ms = time.trim().parse::<i64>().map_err(|e| {
                    AppError::StorageError(format!(
                        "invalid timestamp '{}': {}",
                        time, e
                    ))
                })?;
                Ok(Some((blob, stored_ms)))
            }
            (None, None) => Ok(None),
            _ => {
                // Half-written entry; drop the orphan.
                self.evict(key);
                Ok(None)
            }
        }
    }

    fn evict(&self, key: &str) {
        if let Err(e) = self.remove(key) {
            warn!("Failed to evict durable cache entry {}: {}", key, e);
        }
    }
}
