//! Favorites screen: resolves stored ids to full records

use futures::future::join_all;
use std::collections::HashSet;

use super::{LoadingState, MovieCard, RequestTracker, Ticket};
use crate::api::Catalog;
use crate::favorites::{FavoritesError, SharedFavorites};
use crate::models::{MovieId, MovieRecord};

/// Fetch the record of every id concurrently.
///
/// Ids whose fetch fails are dropped so one bad id never blanks the list.
/// The result keeps the order of `ids`.
pub async fn resolve_favorites(catalog: &dyn Catalog, ids: &[MovieId]) -> Vec<MovieRecord> {
    let fetches = ids.iter().map(|&id| async move { (id, catalog.movie(id).await) });
    let results = join_all(fetches).await;

    let mut seen = HashSet::new();
    let mut movies = Vec::with_capacity(results.len());
    for (id, result) in results {
        match result {
            Ok(movie) if movie.id != id => {
                tracing::warn!(requested = %id, got = %movie.id, "Catalog returned another movie");
            }
            Ok(movie) => {
                if seen.insert(movie.id) {
                    movies.push(movie);
                }
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "Skipping favorite that failed to load");
            }
        }
    }
    movies
}

/// An issued favorites fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesFetch {
    pub ticket: Ticket,
    pub ids: Vec<MovieId>,
}

impl FavoritesFetch {
    pub async fn run(&self, catalog: &dyn Catalog) -> Vec<MovieRecord> {
        resolve_favorites(catalog, &self.ids).await
    }
}

/// Favorites screen controller
pub struct FavoritesController {
    favorites: SharedFavorites,
    pub cards: Vec<MovieCard>,
    pub status: LoadingState,
    tracker: RequestTracker,
}

impl FavoritesController {
    pub fn new(favorites: SharedFavorites) -> Self {
        Self {
            favorites,
            cards: Vec::new(),
            status: LoadingState::Idle,
            tracker: RequestTracker::new(),
        }
    }

    /// Read the stored ids and start resolving them.
    /// An empty set shows the empty state at once and needs no fetch.
    pub fn begin(&mut self) -> Option<FavoritesFetch> {
        let ids = self.favorites.get_favorites().to_vec();
        if ids.is_empty() {
            self.tracker.cancel();
            self.cards.clear();
            self.status = LoadingState::Idle;
            return None;
        }

        self.status = LoadingState::Loading(Some(format!("Loading {} favorites...", ids.len())));
        Some(FavoritesFetch {
            ticket: self.tracker.issue(),
            ids,
        })
    }

    /// Apply a completion; returns false if it was stale
    pub fn finish(&mut self, ticket: Ticket, movies: Vec<MovieRecord>) -> bool {
        if !self.tracker.accept(ticket) {
            return false;
        }
        self.cards = MovieCard::mount_all(self.favorites.as_ref(), movies);
        self.status = LoadingState::Idle;
        true
    }

    /// Reload when the screen becomes visible again
    pub fn on_focus(&mut self) -> Option<FavoritesFetch> {
        self.begin()
    }

    /// Toggle the card at `index`. The card stays listed until the next reload.
    pub fn toggle_favorite(&mut self, index: usize) -> Result<Option<bool>, FavoritesError> {
        match self.cards.get_mut(index) {
            Some(card) => card.favorite.activate(self.favorites.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && !self.status.is_loading()
    }

    pub async fn load(&mut self, catalog: &dyn Catalog) {
        if let Some(fetch) = self.begin() {
            let movies = fetch.run(catalog).await;
            self.finish(fetch.ticket, movies);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::{Favorites, FavoritesStore};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Catalog that knows ids 1..=10 except 2
    struct Stub;

    #[async_trait]
    impl Catalog for Stub {
        async fn popular(&self) -> Result<Vec<MovieRecord>> {
            Ok(Vec::new())
        }

        async fn search(&self, _query: &str) -> Result<Vec<MovieRecord>> {
            Ok(Vec::new())
        }

        async fn movie(&self, id: MovieId) -> Result<MovieRecord> {
            match id.get() {
                2 => anyhow::bail!("boom"),
                n if n <= 10 => Ok(MovieRecord::new(n, format!("Movie {}", n))),
                _ => anyhow::bail!("unknown"),
            }
        }
    }

    #[test]
    fn test_resolve_skips_failures_and_keeps_order() {
        let ids = [MovieId::new(3), MovieId::new(2), MovieId::new(1)];
        let movies = tokio_test::block_on(resolve_favorites(&Stub, &ids));
        let got: Vec<u64> = movies.iter().map(|m| m.id.get()).collect();
        assert_eq!(got, vec![3, 1]);
    }

    #[test]
    fn test_empty_set_needs_no_fetch() {
        let mut controller = FavoritesController::new(Arc::new(Favorites::in_memory()));
        assert!(controller.begin().is_none());
        assert!(controller.is_empty());
    }

    #[test]
    fn test_focus_reflects_toggle_elsewhere() {
        let store = Arc::new(Favorites::in_memory());
        let mut controller = FavoritesController::new(store.clone());

        store.toggle_favorite(MovieId::new(5)).unwrap();
        tokio_test::block_on(controller.load(&Stub));
        assert_eq!(controller.cards.len(), 1);

        store.toggle_favorite(MovieId::new(7)).unwrap();
        store.toggle_favorite(MovieId::new(5)).unwrap();
        let fetch = controller.on_focus().unwrap();
        assert_eq!(fetch.ids, vec![MovieId::new(7)]);
    }

    #[test]
    fn test_unfavorite_keeps_card_until_reload() {
        let store = Arc::new(Favorites::in_memory());
        store.toggle_favorite(MovieId::new(4)).unwrap();
        let mut controller = FavoritesController::new(store.clone());
        tokio_test::block_on(controller.load(&Stub));

        assert_eq!(controller.toggle_favorite(0).unwrap(), Some(false));
        assert_eq!(controller.cards.len(), 1);
        assert!(!controller.cards[0].is_favorite());

        assert!(controller.begin().is_none());
        assert!(controller.cards.is_empty());
    }
}
