use crate::shared::errors::AppResult;

/// Durable string key → string value store (the role `localStorage` plays
/// in a browser).
///
/// There are no transactions: every `set_item` replaces the whole value, so
/// concurrent writers resolve as last-write-wins. Callers treat every error
/// as non-fatal.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStorage: Send + Sync {
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> AppResult<()>;

    fn remove_item(&self, key: &str) -> AppResult<()>;

    fn keys(&self) -> AppResult<Vec<String>>;
}
