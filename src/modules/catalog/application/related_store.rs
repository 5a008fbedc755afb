use tokio::sync::RwLock;

use super::resource_store::{LoadOptions, ResourceStore};
use crate::modules::catalog::domain::{Filters, MovieItem};

pub const DEFAULT_RELATED_LIMIT: usize = 30;

/// Movies sharing a category with the one being viewed.
///
/// The category listing is cached per category, not per movie: switching
/// between two movies of the same category re-filters the held list.
pub struct RelatedMoviesStore {
    store: ResourceStore<MovieItem>,
    category: RwLock<Option<String>>,
}

impl RelatedMoviesStore {
    pub fn new(store: ResourceStore<MovieItem>) -> Self {
        Self {
            store,
            category: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &ResourceStore<MovieItem> {
        &self.store
    }

    pub async fn current_category(&self) -> Option<String> {
        self.category.read().await.clone()
    }

    /// Up to `limit` movies of `category_slug`, excluding `current_movie_id`.
    ///
    /// A failed load yields an empty list; the error stays in the store state.
    pub async fn fetch_related(
        &self,
        category_slug: &str,
        current_movie_id: &str,
        limit: usize,
    ) -> Vec<MovieItem> {
        let held = self.current_category().await.as_deref() == Some(category_slug)
            && self.store.snapshot().has_items()
            && !self.store.is_loading();

        if !held {
            let filters = Filters::new().with("category", category_slug);
            let outcome = self
                .store
                .try_load(1, LoadOptions::with_filters(filters))
                .await;
            if !outcome.is_adopted() {
                return Vec::new();
            }
            *self.category.write().await = Some(category_slug.to_string());
        }

        self.filtered(current_movie_id, limit)
    }

    /// Held movies minus `current_movie_id`, truncated to `limit`
    pub fn filtered(&self, current_movie_id: &str, limit: usize) -> Vec<MovieItem> {
        self.store
            .snapshot()
            .items
            .into_iter()
            .filter(|movie| movie.id != current_movie_id)
            .take(limit)
            .collect()
    }

    pub async fn reset(&self) {
        *self.category.write().await = None;
        self.store.reset().await;
    }
}
