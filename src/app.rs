//! Application wiring: one shared cache, event bus and fetcher behind every store.

use log::{info, warn};
use std::sync::Arc;

use crate::log_info;
use crate::modules::cache::{CacheLayer, CacheStats, DurableCache, MemoryCache};
use crate::modules::catalog::{
    CatalogFetcher, CatalogItem, Category, LoadOptions, MovieItem, RateLimitClient,
    RelatedMoviesStore, ResourceConfig, ResourceStore, SearchStore,
};
use crate::modules::saved::SavedItemsStore;
use crate::modules::storage::{FileStorage, KeyValueStorage};
use crate::modules::watch::WatchStore;
use crate::shared::config::AppConfig;
use crate::shared::domain::ResourceKind;
use crate::shared::errors::AppResult;
use crate::shared::events::{CatalogEvent, EventBus};
use crate::shared::utils::init_logger;
use tokio::sync::broadcast;

pub struct Catalog {
    config: AppConfig,
    events: EventBus,
    cache: Arc<CacheLayer>,
    latest: ResourceStore<MovieItem>,
    anime: ResourceStore<MovieItem>,
    korean: ResourceStore<MovieItem>,
    categories: ResourceStore<Category>,
    search: SearchStore,
    related: RelatedMoviesStore,
    watch: WatchStore,
    saved: SavedItemsStore<MovieItem>,
}

impl Catalog {
    /// Wire every store around `fetcher` and `storage`
    pub fn new(
        config: AppConfig,
        fetcher: Arc<dyn CatalogFetcher>,
        storage: Arc<dyn KeyValueStorage>,
    ) -> AppResult<Self> {
        let events = EventBus::default();
        let cache = Arc::new(CacheLayer::new(
            MemoryCache::new(config.cache_max_entries),
            Some(DurableCache::new(storage.clone())),
        ));

        let builder = StoreBuilder {
            config: &config,
            fetcher: &fetcher,
            cache: &cache,
            events: &events,
        };

        let catalog = Self {
            latest: builder.build(ResourceKind::LatestMovies)?,
            anime: builder.build(ResourceKind::Anime)?,
            korean: builder.build(ResourceKind::KoreanSeries)?,
            categories: builder.build(ResourceKind::Categories)?,
            search: SearchStore::new(
                builder.build(ResourceKind::Search)?,
                builder.build(ResourceKind::SearchSuggestions)?,
                cache.clone(),
            ),
            related: RelatedMoviesStore::new(builder.build(ResourceKind::Related)?),
            watch: WatchStore::new(
                config.api_base_url.clone(),
                config.player_url.clone(),
                fetcher.clone(),
                events.clone(),
            ),
            saved: SavedItemsStore::new(storage),
            config,
            events,
            cache,
        };

        info!("Catalog ready for {}", catalog.config.api_base_url);
        Ok(catalog)
    }

    /// Production wiring: rate-limited HTTP client and file storage
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let fetcher: Arc<dyn CatalogFetcher> = Arc::new(RateLimitClient::from_config(&config)?);
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::new(&config.storage_dir)?);
        Self::new(config, fetcher, storage)
    }

    /// Load `.env`, read the environment, start logging and hydrate saved items
    pub async fn bootstrap() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        init_logger();

        let catalog = Self::from_config(AppConfig::from_env()?)?;
        let saved = catalog.saved.load().await;
        log_info!("Catalog bootstrapped ({} saved item(s))", saved);
        Ok(catalog)
    }

    /// Fetch the first page of every home-screen list concurrently.
    ///
    /// Returns the kinds whose load ended with an error.
    pub async fn warm_up(&self) -> Vec<ResourceKind> {
        let (latest, anime, korean, categories) = futures::join!(
            self.latest.load(1, LoadOptions::default()),
            self.anime.load(1, LoadOptions::default()),
            self.korean.load(1, LoadOptions::default()),
            self.categories.load(1, LoadOptions::default()),
        );

        let failed: Vec<ResourceKind> = [
            (ResourceKind::LatestMovies, latest.error),
            (ResourceKind::Anime, anime.error),
            (ResourceKind::KoreanSeries, korean.error),
            (ResourceKind::Categories, categories.error),
        ]
        .into_iter()
        .filter_map(|(kind, error)| error.map(|_| kind))
        .collect();

        if !failed.is_empty() {
            warn!("Warm-up incomplete, failed: {:?}", failed);
        }
        failed
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    pub fn latest(&self) -> &ResourceStore<MovieItem> {
        &self.latest
    }

    pub fn anime(&self) -> &ResourceStore<MovieItem> {
        &self.anime
    }

    pub fn korean_series(&self) -> &ResourceStore<MovieItem> {
        &self.korean
    }

    pub fn categories(&self) -> &ResourceStore<Category> {
        &self.categories
    }

    pub fn search(&self) -> &SearchStore {
        &self.search
    }

    pub fn related(&self) -> &RelatedMoviesStore {
        &self.related
    }

    pub fn watch(&self) -> &WatchStore {
        &self.watch
    }

    pub fn saved(&self) -> &SavedItemsStore<MovieItem> {
        &self.saved
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop expired in-memory entries; returns how many went
    pub fn purge_expired_cache(&self) -> usize {
        self.cache.purge_expired()
    }
}

struct StoreBuilder<'a> {
    config: &'a AppConfig,
    fetcher: &'a Arc<dyn CatalogFetcher>,
    cache: &'a Arc<CacheLayer>,
    events: &'a EventBus,
}

impl StoreBuilder<'_> {
    fn build<T: CatalogItem>(&self, kind: ResourceKind) -> AppResult<ResourceStore<T>> {
        Ok(ResourceStore::new(
            ResourceConfig::for_kind(kind, self.config)?,
            self.config.api_base_url.clone(),
            self.fetcher.clone(),
            self.cache.clone(),
            self.events.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::catalog::LoadOutcome;
    use crate::modules::storage::MockKeyValueStorage;
    use crate::shared::errors::AppError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio::sync::broadcast::error::TryRecvError;

    struct CategoriesApi;

    #[async_trait]
    impl CatalogFetcher for CategoriesApi {
        async fn get_json(&self, _url: &str) -> AppResult<Value> {
            Ok(json!([{"_id": "1", "name": "Hành Động", "slug": "hanh-dong"}]))
        }
    }

    fn broken_storage() -> MockKeyValueStorage {
        let mut storage = MockKeyValueStorage::new();
        storage
            .expect_get_item()
            .returning(|_| Err(AppError::StorageError("unavailable".to_string())));
        storage
            .expect_set_item()
            .returning(|_, _| Err(AppError::StorageError("quota exceeded".to_string())));
        storage
            .expect_remove_item()
            .returning(|_| Err(AppError::StorageError("unavailable".to_string())));
        storage
    }

    #[tokio::test]
    async fn broken_storage_never_fails_a_categories_load() {
        let catalog = Catalog::new(
            AppConfig::default(),
            Arc::new(CategoriesApi),
            Arc::new(broken_storage()),
        )
        .unwrap();
        let mut events = catalog.subscribe();

        let outcome = catalog
            .categories()
            .try_load(1, LoadOptions::default())
            .await;

        assert_eq!(outcome, LoadOutcome::Fetched);
        let state = catalog.categories().snapshot();
        assert_eq!(state.error, None);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].slug, "hanh-dong");
        assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));

        // The memory tier still holds the page
        let again = catalog
            .categories()
            .try_load(1, LoadOptions::default())
            .await;
        assert_eq!(again, LoadOutcome::Cached);
    }
}
