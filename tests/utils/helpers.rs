/// Test helpers: a scripted fetcher and store builders
use async_trait::async_trait;
use phim_lib::modules::cache::CacheLayer;
use phim_lib::modules::catalog::{
    CatalogFetcher, CatalogItem, RelatedMoviesStore, ResourceConfig, ResourceStore, SearchStore,
};
use phim_lib::shared::config::AppConfig;
use phim_lib::shared::domain::ResourceKind;
use phim_lib::shared::errors::{AppError, AppResult};
use phim_lib::shared::events::{CatalogEvent, EventBus};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

pub const BASE_URL: &str = "https://phimapi.test";

type Responder = Box<dyn Fn(&str) -> AppResult<Value> + Send + Sync>;

/// Fetcher that answers from a closure and records every URL it was asked for
pub struct FakeFetcher {
    responder: Responder,
    calls: AtomicUsize,
    urls: Mutex<Vec<String>>,
    delay: Duration,
}

impl FakeFetcher {
    pub fn new(responder: impl Fn(&str) -> AppResult<Value> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            urls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn always(body: Value) -> Self {
        Self::new(move |_| Ok(body.clone()))
    }

    pub fn failing(error: AppError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    /// Each response takes `delay` (virtual time under a paused clock)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogFetcher for FakeFetcher {
    async fn get_json(&self, url: &str) -> AppResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.responder)(url)
    }
}

/// The `page` query parameter of a request URL
pub fn page_of(url: &str) -> u32 {
    url.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix("page="))
        .and_then(|page| page.parse().ok())
        .unwrap_or(0)
}

pub struct StoreHarness<T: CatalogItem> {
    pub store: ResourceStore<T>,
    pub fetcher: Arc<FakeFetcher>,
    pub cache: Arc<CacheLayer>,
    pub events: EventBus,
}

pub fn build_store<T: CatalogItem>(
    kind: ResourceKind,
    fetcher: &Arc<FakeFetcher>,
    cache: &Arc<CacheLayer>,
    events: &EventBus,
) -> ResourceStore<T> {
    ResourceStore::new(
        ResourceConfig::for_kind(kind, &AppConfig::default()).unwrap(),
        BASE_URL,
        fetcher.clone(),
        cache.clone(),
        events.clone(),
    )
}

/// A store of `kind` over `fetcher`, with a fresh in-memory cache
pub fn store_with<T: CatalogItem>(kind: ResourceKind, fetcher: FakeFetcher) -> StoreHarness<T> {
    let fetcher = Arc::new(fetcher);
    let cache = Arc::new(CacheLayer::in_memory(100));
    let events = EventBus::default();
    let store = build_store(kind, &fetcher, &cache, &events);

    StoreHarness {
        store,
        fetcher,
        cache,
        events,
    }
}

pub fn search_store(fetcher: FakeFetcher) -> (SearchStore, Arc<FakeFetcher>) {
    let fetcher = Arc::new(fetcher);
    let cache = Arc::new(CacheLayer::in_memory(100));
    let events = EventBus::default();
    let store = SearchStore::new(
        build_store(ResourceKind::Search, &fetcher, &cache, &events),
        build_store(ResourceKind::SearchSuggestions, &fetcher, &cache, &events),
        cache,
    );
    (store, fetcher)
}

pub fn related_store(fetcher: FakeFetcher) -> (RelatedMoviesStore, Arc<FakeFetcher>) {
    let h = store_with(ResourceKind::Related, fetcher);
    (RelatedMoviesStore::new(h.store), h.fetcher)
}

/// Value of `name` in a request URL's query string
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    url.split(['?', '&'])
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))
        .map(|value| urlencoding::decode(value).map(|v| v.into_owned()).unwrap_or_default())
}

/// Everything published so far, without waiting
pub fn drain(rx: &mut broadcast::Receiver<CatalogEvent>) -> Vec<CatalogEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
