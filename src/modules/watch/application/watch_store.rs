use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

use crate::modules::catalog::{CatalogFetcher, LoadOutcome};
use crate::modules::watch::domain::{parse_movie_detail, MovieDetail, Server, WatchSession};
use crate::shared::domain::ResourceKind;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::events::{CatalogEvent, EventBus};
use crate::shared::utils::{InFlightGuard, LogContext, TimedOperation};

/// Observable state of the watch page
#[derive(Debug, Clone, PartialEq)]
pub struct WatchState {
    pub session: WatchSession,
    pub loading: bool,
    /// Last load failure; kept apart from the session, which stays as it was
    pub error: Option<String>,
}

/// Loads a movie's servers into a `WatchSession` and drives episode navigation
pub struct WatchStore {
    base_url: String,
    fetcher: Arc<dyn CatalogFetcher>,
    events: EventBus,
    state: watch::Sender<WatchState>,
    in_flight: AtomicBool,
}

impl WatchStore {
    pub fn new(
        base_url: impl Into<String>,
        player_url: impl Into<String>,
        fetcher: Arc<dyn CatalogFetcher>,
        events: EventBus,
    ) -> Self {
        let (state, _) = watch::channel(WatchState {
            session: WatchSession::new(player_url),
            loading: false,
            error: None,
        });
        Self {
            base_url: base_url.into(),
            fetcher,
            events,
            state,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn snapshot(&self) -> WatchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WatchState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch `/phim/{slug}` and load it at episode `(0, 0)`.
    ///
    /// A failure leaves the previous session in place and records the error.
    pub async fn load_movie(&self, slug: &str) -> LoadOutcome {
        let Some(_guard) = InFlightGuard::try_acquire(&self.in_flight) else {
            debug!("Movie load for {} skipped: already in flight", slug);
            return LoadOutcome::Skipped;
        };

        let slug = slug.trim();
        if slug.is_empty() {
            return self.fail(AppError::InvalidInput("movie slug is empty".to_string()));
        }

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        match self.fetch_movie(slug).await {
            Ok((movie, servers)) => {
                info!(
                    "Loaded {} with {} server(s) for watching",
                    movie.slug,
                    servers.len()
                );
                self.state.send_modify(|state| {
                    state.session.load(movie, servers);
                    state.loading = false;
                });
                self.publish_episode();
                LoadOutcome::Fetched
            }
            Err(e) => self.fail(e),
        }
    }

    pub fn set_current_episode(&self, server_index: usize, episode_index: usize) -> AppResult<()> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| {
            result = state.session.set_current_episode(server_index, episode_index);
            result.is_ok()
        });
        if result.is_ok() {
            self.publish_episode();
        }
        result
    }

    pub fn next_episode(&self) -> bool {
        self.navigate(WatchSession::next_episode)
    }

    pub fn previous_episode(&self) -> bool {
        self.navigate(WatchSession::previous_episode)
    }

    /// Drop the movie, the selection and any recorded error
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.session.reset();
            state.loading = false;
            state.error = None;
        });
    }

    /// TMDB rating of the loaded movie, 0 when none
    pub fn rating(&self) -> f64 {
        self.state
            .borrow()
            .session
            .movie()
            .map_or(0.0, MovieDetail::rating)
    }

    fn navigate(&self, step: fn(&mut WatchSession) -> bool) -> bool {
        let mut moved = false;
        self.state.send_if_modified(|state| {
            moved = step(&mut state.session);
            moved
        });
        if moved {
            self.publish_episode();
        }
        moved
    }

    async fn fetch_movie(&self, slug: &str) -> AppResult<(MovieDetail, Vec<Server>)> {
        let url = format!(
            "{}/phim/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(slug)
        );
        let timer = TimedOperation::new(&format!("fetch movie {}", slug));
        LogContext::api_call(ResourceKind::MovieDetail.as_str(), &url, "started", None);

        let body = self.fetcher.get_json(&url).await?;
        let parsed = parse_movie_detail(body)?;

        LogContext::api_call(
            ResourceKind::MovieDetail.as_str(),
            &url,
            "ok",
            Some(timer.finish()),
        );
        Ok(parsed)
    }

    fn fail(&self, error: AppError) -> LoadOutcome {
        let message = error.to_string();
        LogContext::error_with_context(&error, "movie detail load failed");
        self.state.send_modify(|state| {
            state.loading = false;
            state.error = Some(message.clone());
        });
        self.events
            .publish(CatalogEvent::fetch_failed(ResourceKind::MovieDetail, message));
        LoadOutcome::Failed(error)
    }

    fn publish_episode(&self) {
        let event = {
            let state = self.state.borrow();
            let session = &state.session;
            CatalogEvent::episode_changed(
                session.movie().map(|movie| movie.slug.clone()).unwrap_or_default(),
                session.server_index(),
                session.episode_index(),
                session.stream_url().map(str::to_string),
            )
        };
        self.events.publish(event);
    }
}
