use async_trait::async_trait;
use serde_json::Value;

use crate::shared::errors::AppResult;

/// Port for reaching the remote catalog API.
///
/// Implementations return the parsed JSON body of a 2xx response and a
/// `Transport` error for anything else; envelope validation is the caller's job.
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn get_json(&self, url: &str) -> AppResult<Value>;
}
