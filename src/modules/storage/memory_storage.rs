use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStorage;
use crate::shared::errors::{AppError, AppResult};

/// Process-local storage; used in tests and when no storage dir is wanted
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_items<R>(&self, f: impl FnOnce(&mut HashMap<String, String>) -> R) -> AppResult<R> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| AppError::StorageError("memory storage lock poisoned".to_string()))?;
        Ok(f(&mut items))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        self.with_items(|items| items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AppResult<()> {
        self.with_items(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> AppResult<()> {
        self.with_items(|items| {
            items.remove(key);
        })
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        self.with_items(|items| items.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item("a").unwrap(), None);

        storage.set_item("a", "1").unwrap();
        storage.set_item("a", "2").unwrap();
        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("2"));
        assert_eq!(storage.len(), 1);

        storage.remove_item("a").unwrap();
        assert!(storage.is_empty());
    }
}
