use log::{info, warn};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::log_warn;
use crate::modules::catalog::CatalogItem;
use crate::modules::saved::domain::{SavedRecord, Sluggable};
use crate::modules::storage::KeyValueStorage;
use crate::shared::errors::{AppError, AppResult};

pub const SAVED_ITEMS_KEY: &str = "savedMovies";

/// Accepts both the record format and a plain list of item snapshots
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCollection<T> {
    Records(Vec<SavedRecord<T>>),
    Snapshots(Vec<T>),
}

/// Persisted set of saved items, unique by slug.
///
/// The whole collection is re-serialized after every change; storage
/// failures are logged and never reach the caller.
pub struct SavedItemsStore<T> {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    records: RwLock<Vec<SavedRecord<T>>>,
}

impl<T: CatalogItem + Sluggable> SavedItemsStore<T> {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, SAVED_ITEMS_KEY)
    }

    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            records: RwLock::new(Vec::new()),
        }
    }

    /// Replace in-memory state with the durable collection.
    ///
    /// A missing or corrupted blob loads as empty. Returns the item count.
    pub async fn load(&self) -> usize {
        let loaded = match self.read_collection() {
            Ok(records) => records,
            Err(e) => {
                log_warn!("Saved items unreadable, starting empty: {}", e);
                Vec::new()
            }
        };

        let count = loaded.len();
        *self.records.write().await = loaded;
        info!("Loaded {} saved item(s)", count);
        count
    }

    /// Save a snapshot of `item`. No-op for duplicates and blank slugs.
    pub async fn add(&self, item: &T) -> bool {
        if item.slug().trim().is_empty() {
            return false;
        }

        let mut records = self.records.write().await;
        if records.iter().any(|record| record.slug == item.slug()) {
            return false;
        }
        records.push(SavedRecord::capture(item));
        self.persist(&records);
        true
    }

    /// Forget `slug`; storage is only written when something was removed
    pub async fn remove(&self, slug: &str) -> bool {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.slug != slug);
        if records.len() == before {
            return false;
        }
        self.persist(&records);
        true
    }

    /// Remove when saved, add otherwise. Returns whether the item is now saved.
    pub async fn toggle(&self, item: &T) -> bool {
        if self.remove(item.slug()).await {
            false
        } else {
            self.add(item).await
        }
    }

    pub async fn is_saved(&self, slug: &str) -> bool {
        self.records
            .read()
            .await
            .iter()
            .any(|record| record.slug == slug)
    }

    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Saved snapshots, oldest first
    pub async fn items(&self) -> Vec<T> {
        self.records
            .read()
            .await
            .iter()
            .map(|record| record.snapshot.clone())
            .collect()
    }

    pub async fn records(&self) -> Vec<SavedRecord<T>> {
        self.records.read().await.clone()
    }

    fn read_collection(&self) -> AppResult<Vec<SavedRecord<T>>> {
        let Some(blob) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };

        let records = match serde_json::from_str::<StoredCollection<T>>(&blob)? {
            StoredCollection::Records(records) => records,
            StoredCollection::Snapshots(items) => {
                items.iter().map(SavedRecord::capture).collect()
            }
        };

        // Keep the first record per slug.
        let mut unique: Vec<SavedRecord<T>> = Vec::with_capacity(records.len());
        for record in records {
            if !unique.iter().any(|known| known.slug == record.slug) {
                unique.push(record);
            }
        }
        Ok(unique)
    }

    fn persist(&self, records: &[SavedRecord<T>]) {
        let result = serde_json::to_string(records)
            .map_err(AppError::from)
            .and_then(|blob| self.storage.set_item(&self.key, &blob));
        if let Err(e) = result {
            warn!("Failed to persist saved items: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::domain::MovieItem;
    use crate::modules::storage::{MemoryStorage, MockKeyValueStorage};

    fn movie(slug: &str) -> MovieItem {
        MovieItem {
            id: format!("id-{}", slug),
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn legacy_snapshot_list_is_upgraded_on_load() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(
                SAVED_ITEMS_KEY,
                r#"[{"_id": "1", "name": "A", "slug": "a"}, {"_id": "1", "name": "A", "slug": "a"}]"#,
            )
            .unwrap();

        let store = SavedItemsStore::<MovieItem>::new(storage);
        assert_eq!(store.load().await, 1);
        assert!(store.is_saved("a").await);
    }

    #[tokio::test]
    async fn blank_slug_is_never_saved() {
        let store = SavedItemsStore::<MovieItem>::new(Arc::new(MemoryStorage::new()));
        assert!(!store.add(&movie("  ")).await);
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn removing_an_absent_slug_does_not_write() {
        let mut storage = MockKeyValueStorage::new();
        storage.expect_set_item().times(0);

        let store = SavedItemsStore::<MovieItem>::new(Arc::new(storage));
        assert!(!store.remove("missing").await);
    }

    #[tokio::test]
    async fn write_failure_keeps_in_memory_state() {
        let mut storage = MockKeyValueStorage::new();
        storage
            .expect_set_item()
            .times(1)
            .returning(|_, _| Err(AppError::StorageError("quota exceeded".to_string())));

        let store = SavedItemsStore::<MovieItem>::new(Arc::new(storage));
        assert!(store.add(&movie("a")).await);
        assert!(store.is_saved("a").await);
    }

    #[tokio::test]
    async fn snapshot_is_decoupled_from_the_original() {
        let store = SavedItemsStore::<MovieItem>::new(Arc::new(MemoryStorage::new()));
        let mut item = movie("a");
        store.add(&item).await;

        item.name = "changed".to_string();
        assert_eq!(store.items().await[0].name, "A");
    }
}
