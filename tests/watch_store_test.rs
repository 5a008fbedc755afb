mod utils;

use phim_lib::modules::catalog::LoadOutcome;
use phim_lib::modules::watch::{SessionState, WatchStore};
use phim_lib::shared::errors::AppError;
use phim_lib::shared::events::{CatalogEventKind, EventBus};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use utils::factories::{movie_detail_body, server};
use utils::helpers::{self, FakeFetcher, BASE_URL};

const PLAYER: &str = "https://player.test/";

fn watch_store(fetcher: FakeFetcher) -> (WatchStore, Arc<FakeFetcher>, EventBus) {
    let fetcher = Arc::new(fetcher);
    let events = EventBus::default();
    let store = WatchStore::new(BASE_URL, PLAYER, fetcher.clone(), events.clone());
    (store, fetcher, events)
}

/// Two servers: `vietsub` with two episodes, `thuyet-minh` with one
fn series_fetcher() -> FakeFetcher {
    FakeFetcher::new(|url| {
        if url.ends_with("/phim/ten-phim") {
            Ok(movie_detail_body(
                "ten-phim",
                &[
                    server("Vietsub", &["tap-1", "tap-2"]),
                    server("Thuyết Minh", &["tap-1-tm"]),
                ],
            ))
        } else {
            Ok(json!({"status": false, "msg": "Movie not found", "movie": [], "episodes": []}))
        }
    })
}

#[tokio::test]
async fn load_selects_the_first_episode() {
    let (store, fetcher, events) = watch_store(series_fetcher());
    let mut rx = events.subscribe();

    let outcome = store.load_movie("ten-phim").await;

    assert_eq!(outcome, LoadOutcome::Fetched);
    let state = store.snapshot();
    assert_eq!(state.session.state(), SessionState::Loaded);
    assert_eq!(state.session.position(), (0, 0));
    assert_eq!(
        state.session.stream_url(),
        Some("https://player.test/?url=https%3A%2F%2Fcdn.example%2Ftap-1%2Findex.m3u8")
    );
    assert_eq!(store.rating(), 7.2);
    assert_eq!(fetcher.urls(), vec!["https://phimapi.test/phim/ten-phim".to_string()]);

    let published = helpers::drain(&mut rx);
    assert!(matches!(
        &published[0].kind,
        CatalogEventKind::EpisodeChanged { slug, server_index: 0, episode_index: 0, .. }
            if slug == "ten-phim"
    ));
}

#[tokio::test]
async fn navigation_walks_across_servers() {
    let (store, _, events) = watch_store(series_fetcher());
    store.load_movie("ten-phim").await;
    let mut rx = events.subscribe();

    assert!(store.next_episode());
    assert_eq!(store.snapshot().session.position(), (0, 1));
    assert!(store.next_episode());
    assert_eq!(store.snapshot().session.position(), (1, 0));
    assert!(!store.next_episode(), "last episode of the last server");

    assert!(store.previous_episode());
    assert_eq!(store.snapshot().session.position(), (0, 1));

    assert_eq!(helpers::drain(&mut rx).len(), 3, "one event per move");
}

#[tokio::test]
async fn out_of_range_selection_is_rejected() {
    let (store, _, _) = watch_store(series_fetcher());
    store.load_movie("ten-phim").await;
    assert_ok!(store.set_current_episode(0, 1));

    let err = assert_err!(store.set_current_episode(1, 5));

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(store.snapshot().session.position(), (0, 1));
}

#[tokio::test]
async fn failed_load_keeps_the_previous_session() {
    let (store, _, events) = watch_store(series_fetcher());
    store.load_movie("ten-phim").await;
    store.next_episode();
    let mut rx = events.subscribe();

    let outcome = store.load_movie("khong-ton-tai").await;

    assert_eq!(
        outcome,
        LoadOutcome::Failed(AppError::ApiError("Movie not found".to_string()))
    );
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("API error: Movie not found"));
    assert!(!state.loading);
    assert_eq!(
        state.session.movie().map(|movie| movie.slug.as_str()),
        Some("ten-phim")
    );
    assert_eq!(state.session.position(), (0, 1));

    let published = helpers::drain(&mut rx);
    assert!(matches!(
        published[0].kind,
        CatalogEventKind::FetchFailed { .. }
    ));
}

#[tokio::test]
async fn blank_slug_is_rejected_without_a_request() {
    let (store, fetcher, _) = watch_store(series_fetcher());

    let outcome = store.load_movie("   ").await;

    assert!(matches!(outcome, LoadOutcome::Failed(AppError::InvalidInput(_))));
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn overlapping_loads_fetch_once() {
    let (store, fetcher, _) = watch_store(series_fetcher().with_delay(Duration::from_millis(50)));

    let (first, second) = tokio::join!(store.load_movie("ten-phim"), store.load_movie("ten-phim"));

    assert_eq!(first, LoadOutcome::Fetched);
    assert_eq!(second, LoadOutcome::Skipped);
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn reset_returns_to_empty() {
    let (store, _, _) = watch_store(series_fetcher());
    store.load_movie("ten-phim").await;

    store.reset();

    let state = store.snapshot();
    assert_eq!(state.session.state(), SessionState::Empty);
    assert_eq!(state.session.stream_url(), None);
    assert_eq!(store.rating(), 0.0);
}
