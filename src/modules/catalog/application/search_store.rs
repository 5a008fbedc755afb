use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::resource_store::{LoadOptions, LoadOutcome, ResourceStore};
use super::store_state::StoreState;
use crate::log_debug;
use crate::modules::cache::CacheLayer;
use crate::modules::catalog::domain::{Filters, MovieItem};
use crate::shared::utils::LogContext;

const HISTORY_LIMIT: usize = 50;
const RECENT_LIMIT: usize = 10;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Keyword search with history and autocomplete.
///
/// Results and suggestions are two independent resource stores, so typing in
/// the search box never blocks on a running results query.
pub struct SearchStore {
    results: ResourceStore<MovieItem>,
    suggestions: ResourceStore<MovieItem>,
    cache: Arc<CacheLayer>,
    keyword: RwLock<String>,
    history: RwLock<VecDeque<String>>,
    suggestion_items: RwLock<Vec<MovieItem>>,
}

impl SearchStore {
    pub fn new(
        results: ResourceStore<MovieItem>,
        suggestions: ResourceStore<MovieItem>,
        cache: Arc<CacheLayer>,
    ) -> Self {
        Self {
            results,
            suggestions,
            cache,
            keyword: RwLock::new(String::new()),
            history: RwLock::new(VecDeque::new()),
            suggestion_items: RwLock::new(Vec::new()),
        }
    }

    pub fn results(&self) -> &ResourceStore<MovieItem> {
        &self.results
    }

    pub async fn current_keyword(&self) -> String {
        self.keyword.read().await.clone()
    }

    /// Search for `keyword` (trimmed). A blank keyword clears the results.
    pub async fn search(&self, keyword: &str, page: u32) -> StoreState<MovieItem> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            self.keyword.write().await.clear();
            self.results.reset().await;
            return self.results.snapshot();
        }

        LogContext::search_operation(keyword, Some(page), None);
        *self.keyword.write().await = keyword.to_string();

        let filters = Filters::new().with("keyword", keyword);
        let outcome = self
            .results
            .try_load(page, LoadOptions::with_filters(filters))
            .await;

        let state = self.results.snapshot();
        if outcome.is_adopted() {
            LogContext::search_operation(keyword, Some(page), Some(state.items.len()));
            self.remember(keyword).await;
        }
        state
    }

    /// Autocomplete entries for `keyword`, at most `limit` of them.
    ///
    /// Failures and blank keywords yield an empty list. While an earlier
    /// suggestion request is still running the current list is returned as is.
    pub async fn suggestions(&self, keyword: &str, limit: usize) -> Vec<MovieItem> {
        let keyword = keyword.trim();
        if keyword.is_empty() || limit == 0 {
            self.clear_suggestions().await;
            return Vec::new();
        }

        let filters = Filters::new()
            .with("keyword", keyword)
            .with("limit", limit.to_string());
        let outcome = self
            .suggestions
            .try_load(1, LoadOptions::with_filters(filters))
            .await;

        if outcome == LoadOutcome::Skipped {
            // An earlier keystroke is still in flight; keep showing its list
            return self.current_suggestions().await;
        }

        let items: Vec<MovieItem> = if outcome.is_adopted() {
            self.suggestions
                .snapshot()
                .items
                .into_iter()
                .take(limit)
                .collect()
        } else {
            log_debug!("No suggestions for '{}': {:?}", keyword, outcome);
            Vec::new()
        };

        *self.suggestion_items.write().await = items.clone();
        items
    }

    pub async fn current_suggestions(&self) -> Vec<MovieItem> {
        self.suggestion_items.read().await.clone()
    }

    pub async fn clear_suggestions(&self) {
        self.suggestion_items.write().await.clear();
    }

    /// Last ten keywords, most recent first
    pub async fn recent_searches(&self) -> Vec<String> {
        self.history
            .read()
            .await
            .iter()
            .rev()
            .take(RECENT_LIMIT)
            .cloned()
            .collect()
    }

    pub async fn history(&self) -> Vec<String> {
        self.history.read().await.iter().cloned().collect()
    }

    pub async fn clear_history(&self) {
        self.history.write().await.clear();
    }

    pub fn clear_cache(&self) {
        self.cache.invalidate_all();
    }

    pub async fn reset(&self) {
        self.keyword.write().await.clear();
        self.results.reset().await;
    }

    async fn remember(&self, keyword: &str) {
        let mut history = self.history.write().await;
        if history.iter().any(|known| known == keyword) {
            return;
        }
        history.push_back(keyword.to_string());
        while history.len() > HISTORY_LIMIT {
            history.pop_front();
        }
    }
}
