use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use super::ports::CatalogFetcher;
use super::store_state::{LoadMode, StoreAction, StoreState};
use crate::modules::cache::CacheLayer;
use crate::modules::catalog::domain::{parse_page, Filters, ResourceConfig, ResourcePage};
use crate::shared::domain::ResourceKind;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::events::{CatalogEvent, EventBus};
use crate::shared::utils::{InFlightGuard, LogContext, TimedOperation};

/// Anything a resource store can hold and cache
pub trait CatalogItem: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> CatalogItem for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    /// Background refresh: leave `loading`/`error` alone
    pub silent: bool,
    /// Skip the cache lookup
    pub force_refresh: bool,
    pub filters: Filters,
}

impl LoadOptions {
    pub fn with_filters(filters: Filters) -> Self {
        Self {
            filters,
            ..Default::default()
        }
    }

    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Default::default()
        }
    }
}

/// What a load attempt ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Another fetch was in flight; nothing changed
    Skipped,
    /// Adopted from the cache without a request
    Cached,
    Fetched,
    Failed(AppError),
}

impl LoadOutcome {
    /// Whether the requested page is now in state
    pub fn is_adopted(&self) -> bool {
        matches!(self, LoadOutcome::Cached | LoadOutcome::Fetched)
    }
}

/// Paginated store for one resource kind: fetch, validate, normalize,
/// cache, publish.
///
/// At most one load runs per instance. A second call while one is in flight
/// returns the current snapshot without touching the network.
pub struct ResourceStore<T: CatalogItem> {
    config: ResourceConfig,
    base_url: String,
    fetcher: Arc<dyn CatalogFetcher>,
    cache: Arc<CacheLayer>,
    events: EventBus,
    state: watch::Sender<StoreState<T>>,
    in_flight: AtomicBool,
    filters: RwLock<Filters>,
}

impl<T: CatalogItem> ResourceStore<T> {
    pub fn new(
        config: ResourceConfig,
        base_url: impl Into<String>,
        fetcher: Arc<dyn CatalogFetcher>,
        cache: Arc<CacheLayer>,
        events: EventBus,
    ) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self {
            config,
            base_url: base_url.into(),
            fetcher,
            cache,
            events,
            state,
            in_flight: AtomicBool::new(false),
            filters: RwLock::new(Filters::new()),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.config.kind
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn snapshot(&self) -> StoreState<T> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<T>> {
        self.state.subscribe()
    }

    /// True while a load holds the in-flight guard
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Filters of the most recent load
    pub async fn current_filters(&self) -> Filters {
        self.filters.read().await.clone()
    }

    /// Load `page`, replacing the current items
    pub async fn load(&self, page: u32, options: LoadOptions) -> StoreState<T> {
        self.try_load(page, options).await;
        self.snapshot()
    }

    /// Load `page` and report what happened
    pub async fn try_load(&self, page: u32, options: LoadOptions) -> LoadOutcome {
        self.run(page, options, LoadMode::Replace).await
    }

    /// Load `page` and append its items ("load more")
    pub async fn load_more(&self, page: u32, options: LoadOptions) -> StoreState<T> {
        self.run(page, options, LoadMode::Append).await;
        self.snapshot()
    }

    /// Append the page after the current one, with the current filters.
    ///
    /// Returns false when a load is in flight or there is no next page.
    pub async fn load_next_page(&self) -> bool {
        let pagination = self.snapshot().pagination;
        if self.is_loading() || !pagination.has_next_page() {
            return false;
        }

        let options = LoadOptions::with_filters(self.current_filters().await);
        self.run(pagination.current_page + 1, options, LoadMode::Append)
            .await
            .is_adopted()
    }

    /// Navigate to `page` with the current filters.
    ///
    /// No-op when `page` is already current or a load is in flight; publishes
    /// `PageChanged` once the page is in state.
    pub async fn change_page(&self, page: u32) -> bool {
        if self.is_loading() || page == self.snapshot().pagination.current_page {
            return false;
        }

        let options = LoadOptions::with_filters(self.current_filters().await);
        let adopted = self.run(page, options, LoadMode::Replace).await.is_adopted();
        if adopted {
            self.events
                .publish(CatalogEvent::page_changed(self.config.kind, page));
        }
        adopted
    }

    /// Reload the first page, bypassing the cache
    pub async fn refresh(&self) -> StoreState<T> {
        let options = LoadOptions {
            force_refresh: true,
            filters: self.current_filters().await,
            ..Default::default()
        };
        self.load(1, options).await
    }

    /// Back to the initial state; the cache is left alone
    pub async fn reset(&self) {
        *self.filters.write().await = Filters::new();
        self.dispatch(StoreAction::Reset);
    }

    async fn run(&self, page: u32, options: LoadOptions, mode: LoadMode) -> LoadOutcome {
        let Some(_guard) = InFlightGuard::try_acquire(&self.in_flight) else {
            debug!("{} load for page {} skipped: already in flight", self.config.kind, page);
            return LoadOutcome::Skipped;
        };

        let LoadOptions {
            silent,
            force_refresh,
            filters,
        } = options;

        if page == 0 {
            return self.fail(
                AppError::InvalidInput("page numbers start at 1".to_string()),
                silent,
            );
        }

        *self.filters.write().await = filters.clone();
        let key = self.config.cache_key(page, &filters);

        if !force_refresh {
            if let Some(cached) = self.cached_page(&key) {
                self.dispatch(StoreAction::Loaded {
                    page: cached,
                    mode,
                    silent,
                });
                return LoadOutcome::Cached;
            }
        }

        self.dispatch(StoreAction::FetchStarted { silent });

        match self.fetch_page(page, &filters).await {
            Ok(fetched) => {
                match serde_json::to_value(&fetched) {
                    Ok(payload) => self.cache.set(&key, payload, self.config.cache_policy),
                    Err(e) => warn!("Could not cache {}: {}", key, e),
                }
                self.dispatch(StoreAction::Loaded {
                    page: fetched,
                    mode,
                    silent,
                });
                LoadOutcome::Fetched
            }
            Err(e) => self.fail(e, silent),
        }
    }

    async fn fetch_page(&self, page: u32, filters: &Filters) -> AppResult<ResourcePage<T>> {
        let url = self.config.build_url(&self.base_url, page, filters)?;
        let timer = TimedOperation::new(&format!("fetch {} page {}", self.config.kind, page));
        LogContext::api_call(self.config.kind.as_str(), &url, "started", None);

        let body = self.fetcher.get_json(&url).await?;
        let parsed = parse_page::<T>(body, &self.config, page)?;

        let elapsed = timer.finish_with_info(&format!("{} items", parsed.len()));
        LogContext::api_call(self.config.kind.as_str(), &url, "ok", Some(elapsed));
        Ok(parsed)
    }

    fn cached_page(&self, key: &str) -> Option<ResourcePage<T>> {
        let entry = self.cache.get(key, self.config.cache_policy)?;
        match serde_json::from_value(entry.payload) {
            Ok(page) => {
                debug!("{} served from cache ({:?} old)", key, entry.stored_at.elapsed());
                Some(page)
            }
            Err(e) => {
                warn!("Discarding unreadable cache entry {}: {}", key, e);
                self.cache.invalidate(key);
                None
            }
        }
    }

    fn fail(&self, error: AppError, silent: bool) -> LoadOutcome {
        let message = error.to_string();
        LogContext::error_with_context(&error, &format!("{} load failed", self.config.kind));
        self.dispatch(StoreAction::Failed {
            message: message.clone(),
            silent,
        });
        self.events
            .publish(CatalogEvent::fetch_failed(self.config.kind, message));
        LoadOutcome::Failed(error)
    }

    fn dispatch(&self, action: StoreAction<T>) {
        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = current.apply(action);
        });
    }
}
