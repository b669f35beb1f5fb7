//! View controller tests against an in-process catalog
//!
//! Covers the browse flows end to end: popular and search on the home
//! screen, detail with its favorite control, favorites resolution and the
//! stale-response guard.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use moviedeck::api::{Catalog, TmdbError};
use moviedeck::controllers::{
    detail::{DETAIL_ERROR, NOT_FOUND_ERROR},
    home::SEARCH_ERROR,
    resolve_favorites, DetailController, FavoritesController, HomeController, LoadingState,
};
use moviedeck::favorites::{Favorites, FavoritesSet, FavoritesStore, SharedFavorites};
use moviedeck::models::{MovieId, MovieRecord};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// Fake Catalog
// =============================================================================

#[derive(Default)]
struct FakeCatalog {
    /// Ids whose detail fetch fails with a network-style error
    failing: HashSet<u64>,
    /// Ids TMDB does not know
    missing: HashSet<u64>,
    search_fails: bool,
    popular_calls: AtomicUsize,
    search_calls: AtomicUsize,
    movie_calls: AtomicUsize,
}

impl FakeCatalog {
    fn failing(ids: &[u64]) -> Self {
        Self {
            failing: ids.iter().copied().collect(),
            ..Default::default()
        }
    }
}

fn record(id: u64) -> MovieRecord {
    let mut movie = MovieRecord::new(id, format!("Movie {}", id));
    movie.release_date = Some("2010-07-15".into());
    movie.vote_average = 7.5;
    movie
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn popular(&self) -> Result<Vec<MovieRecord>> {
        self.popular_calls.fetch_add(1, Ordering::SeqCst);
        Ok((1..=8).map(record).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieRecord>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.search_fails {
            return Err(TmdbError::ServerError(500).into());
        }
        let mut movie = record(78);
        movie.title = format!("{} (result)", query);
        Ok(vec![movie])
    }

    async fn movie(&self, id: MovieId) -> Result<MovieRecord> {
        self.movie_calls.fetch_add(1, Ordering::SeqCst);
        if self.missing.contains(&id.get()) {
            return Err(TmdbError::NotFound.into());
        }
        if self.failing.contains(&id.get()) {
            return Err(anyhow!("connection reset"));
        }
        Ok(record(id.get()))
    }
}

fn store_with(ids: &[u64]) -> SharedFavorites {
    let store = Favorites::in_memory();
    let set: FavoritesSet = ids.iter().copied().map(MovieId::new).collect();
    store.save_favorites(&set).unwrap();
    Arc::new(store)
}

fn card_ids(cards: &[moviedeck::controllers::MovieCard]) -> Vec<u64> {
    cards.iter().map(|c| c.movie.id.get()).collect()
}

// =============================================================================
// Home
// =============================================================================

#[tokio::test]
async fn test_home_popular_then_search() {
    let catalog = FakeCatalog::default();
    let mut home = HomeController::with_seed(store_with(&[3]), 1);

    home.load_popular(&catalog).await;
    assert_eq!(home.status, LoadingState::Idle);
    assert_eq!(home.cards.len(), 8);
    assert!(home.cards[2].is_favorite());
    assert!(!home.cards[0].is_favorite());
    assert_eq!(home.featured.as_ref().map(|m| m.id.get()), Some(2));

    assert!(home.search(&catalog, "blade runner").await);
    assert!(home.is_searching());
    assert_eq!(home.query.as_deref(), Some("blade runner"));
    assert_eq!(card_ids(&home.cards), vec![78]);
    assert!(home.featured.is_none());
}

#[tokio::test]
async fn test_blank_search_makes_no_call() {
    let catalog = FakeCatalog::default();
    let mut home = HomeController::with_seed(store_with(&[]), 0);
    home.load_popular(&catalog).await;

    assert!(!home.search(&catalog, "").await);
    assert!(!home.search(&catalog, " \t ").await);
    assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 0);
    assert_eq!(home.cards.len(), 8);
}

#[tokio::test]
async fn test_failed_search_then_retry() {
    let mut catalog = FakeCatalog {
        search_fails: true,
        ..Default::default()
    };
    let mut home = HomeController::with_seed(store_with(&[]), 0);

    home.search(&catalog, "dune").await;
    assert_eq!(home.status, LoadingState::Error(SEARCH_ERROR.into()));

    catalog.search_fails = false;
    home.retry_with(&catalog).await;
    assert_eq!(home.status, LoadingState::Idle);
    assert_eq!(home.query.as_deref(), Some("dune"));
    assert_eq!(catalog.search_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_stale_search_response_discarded() {
    let catalog = FakeCatalog::default();
    let mut home = HomeController::with_seed(store_with(&[]), 0);

    let first = home.begin_search("alien").unwrap();
    let second = home.begin_search("aliens").unwrap();
    let first_result = first.run(&catalog).await;
    let second_result = second.run(&catalog).await;

    // Completions arrive out of order
    assert!(home.finish(second.ticket, second_result));
    assert!(!home.finish(first.ticket, first_result));
    assert_eq!(home.cards[0].movie.title, "aliens (result)");
}

// =============================================================================
// Detail
// =============================================================================

#[tokio::test]
async fn test_detail_reflects_stored_favorite() {
    let catalog = FakeCatalog::default();
    let store = store_with(&[27205, 155]);
    let mut detail = DetailController::new(store);

    detail.load(&catalog, MovieId::new(27205)).await;
    assert!(detail.is_favorite());
    assert_eq!(detail.movie.as_ref().map(|m| m.id.get()), Some(27205));

    detail.load(&catalog, MovieId::new(99)).await;
    assert!(!detail.is_favorite());
}

#[tokio::test]
async fn test_stale_detail_response_discarded() {
    let catalog = FakeCatalog::default();
    let mut detail = DetailController::new(store_with(&[]));

    let a = detail.open(MovieId::new(1));
    let b = detail.open(MovieId::new(2));
    let a_result = a.run(&catalog).await;
    let b_result = b.run(&catalog).await;

    assert!(!detail.finish(a.ticket, a_result));
    assert!(detail.status.is_loading());
    assert!(detail.finish(b.ticket, b_result));
    assert_eq!(detail.movie.as_ref().map(|m| m.id.get()), Some(2));
}

#[tokio::test]
async fn test_detail_errors() {
    let catalog = FakeCatalog {
        missing: [404].into_iter().collect(),
        failing: [500].into_iter().collect(),
        ..Default::default()
    };
    let mut detail = DetailController::new(store_with(&[]));

    detail.load(&catalog, MovieId::new(404)).await;
    assert_eq!(detail.status, LoadingState::Error(NOT_FOUND_ERROR.into()));

    detail.load(&catalog, MovieId::new(500)).await;
    assert_eq!(detail.status, LoadingState::Error(DETAIL_ERROR.into()));
    assert!(detail.movie.is_none());
}

#[tokio::test]
async fn test_detail_toggle_persists() {
    let catalog = FakeCatalog::default();
    let store = store_with(&[]);
    let mut detail = DetailController::new(store.clone());

    detail.load(&catalog, MovieId::new(550)).await;
    assert_eq!(detail.toggle_favorite().unwrap(), Some(true));
    assert!(store.is_favorite(MovieId::new(550)));

    assert_eq!(detail.toggle_favorite().unwrap(), Some(false));
    assert!(store.get_favorites().is_empty());
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn test_resolve_drops_failed_ids() {
    let catalog = FakeCatalog::failing(&[2]);
    let ids: Vec<MovieId> = [1, 2, 3].into_iter().map(MovieId::new).collect();

    let movies = resolve_favorites(&catalog, &ids).await;
    assert_eq!(movies.iter().map(|m| m.id.get()).collect::<Vec<_>>(), vec![1, 3]);
    assert_eq!(catalog.movie_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_favorites_screen_empty_state() {
    let catalog = FakeCatalog::default();
    let mut favorites = FavoritesController::new(store_with(&[]));

    favorites.load(&catalog).await;
    assert!(favorites.is_empty());
    assert_eq!(catalog.movie_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_favorites_refresh_on_focus_reflects_toggle() {
    let catalog = FakeCatalog::default();
    let store = store_with(&[10, 20]);
    let mut favorites = FavoritesController::new(store.clone());
    let mut detail = DetailController::new(store.clone());

    favorites.load(&catalog).await;
    assert_eq!(card_ids(&favorites.cards), vec![10, 20]);

    // Favorite a third movie from its detail screen, then come back
    detail.load(&catalog, MovieId::new(30)).await;
    detail.toggle_favorite().unwrap();
    detail.close();

    let fetch = favorites.on_focus().unwrap();
    let movies = fetch.run(&catalog).await;
    assert!(favorites.finish(fetch.ticket, movies));
    assert_eq!(card_ids(&favorites.cards), vec![10, 20, 30]);
    assert!(favorites.cards.iter().all(|c| c.is_favorite()));
}

#[tokio::test]
async fn test_unfavorited_card_stays_until_reload() {
    let catalog = FakeCatalog::default();
    let store = store_with(&[5, 6]);
    let mut favorites = FavoritesController::new(store.clone());
    favorites.load(&catalog).await;

    assert_eq!(favorites.toggle_favorite(0).unwrap(), Some(false));
    assert_eq!(favorites.cards.len(), 2);
    assert!(!favorites.cards[0].is_favorite());

    favorites.load(&catalog).await;
    assert_eq!(card_ids(&favorites.cards), vec![6]);
}

#[tokio::test]
async fn test_emptied_favorites_cancel_inflight_fetch() {
    let catalog = FakeCatalog::default();
    let store = store_with(&[1]);
    let mut favorites = FavoritesController::new(store.clone());

    let fetch = favorites.begin().unwrap();
    store.toggle_favorite(MovieId::new(1)).unwrap();
    assert!(favorites.on_focus().is_none());

    let movies = fetch.run(&catalog).await;
    assert!(!favorites.finish(fetch.ticket, movies));
    assert!(favorites.cards.is_empty());
}
