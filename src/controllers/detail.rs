//! Movie detail screen

use anyhow::Result;

use super::{FavoriteToggle, LoadingState, RequestTracker, Ticket};
use crate::api::{Catalog, TmdbError};
use crate::favorites::{FavoritesError, SharedFavorites};
use crate::models::{MovieId, MovieRecord};

pub const DETAIL_ERROR: &str = "Failed to load movie details. Please try again.";
pub const NOT_FOUND_ERROR: &str = "Movie not found";

/// An issued detail fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailFetch {
    pub ticket: Ticket,
    pub id: MovieId,
}

impl DetailFetch {
    pub async fn run(&self, catalog: &dyn Catalog) -> Result<MovieRecord> {
        catalog.movie(self.id).await
    }
}

/// Detail screen controller
pub struct DetailController {
    favorites: SharedFavorites,
    requested: Option<MovieId>,
    pub movie: Option<MovieRecord>,
    /// Favorite control of the requested movie
    pub favorite: Option<FavoriteToggle>,
    pub status: LoadingState,
    tracker: RequestTracker,
}

impl DetailController {
    pub fn new(favorites: SharedFavorites) -> Self {
        Self {
            favorites,
            requested: None,
            movie: None,
            favorite: None,
            status: LoadingState::Idle,
            tracker: RequestTracker::new(),
        }
    }

    /// Show movie `id`, superseding whatever was loading before
    pub fn open(&mut self, id: MovieId) -> DetailFetch {
        self.requested = Some(id);
        self.movie = None;
        // Membership does not depend on the record, mount right away
        self.favorite = Some(FavoriteToggle::mount(self.favorites.as_ref(), id));
        self.status = LoadingState::Loading(Some("Loading...".into()));
        DetailFetch {
            ticket: self.tracker.issue(),
            id,
        }
    }

    /// Apply a completion; returns false if it was stale
    pub fn finish(&mut self, ticket: Ticket, result: Result<MovieRecord>) -> bool {
        if !self.tracker.accept(ticket) {
            return false;
        }

        match result {
            Ok(movie) if Some(movie.id) == self.requested => {
                if let Some(favorite) = self.favorite.as_mut() {
                    favorite.refresh(self.favorites.as_ref());
                }
                self.movie = Some(movie);
                self.status = LoadingState::Idle;
            }
            Ok(movie) => {
                tracing::warn!(got = %movie.id, requested = ?self.requested, "Detail payload for another movie");
                self.status = LoadingState::Error(DETAIL_ERROR.into());
            }
            Err(e) => {
                let not_found = matches!(e.downcast_ref::<TmdbError>(), Some(TmdbError::NotFound));
                tracing::warn!(error = %e, requested = ?self.requested, "Detail fetch failed");
                self.status = LoadingState::Error(if not_found {
                    NOT_FOUND_ERROR.into()
                } else {
                    DETAIL_ERROR.into()
                });
            }
        }
        true
    }

    /// Re-request the current movie
    pub fn retry(&mut self) -> Option<DetailFetch> {
        self.requested.map(|id| self.open(id))
    }

    /// Leave the screen; late completions are discarded
    pub fn close(&mut self) {
        self.tracker.cancel();
        self.requested = None;
        self.movie = None;
        self.favorite = None;
        self.status = LoadingState::Idle;
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite.map(|f| f.is_favorite()).unwrap_or(false)
    }

    pub fn toggle_favorite(&mut self) -> Result<Option<bool>, FavoritesError> {
        match self.favorite.as_mut() {
            Some(favorite) => favorite.activate(self.favorites.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    pub fn on_focus(&mut self) {
        if let Some(favorite) = self.favorite.as_mut() {
            favorite.refresh(self.favorites.as_ref());
        }
    }

    /// Open and load in one go
    pub async fn load(&mut self, catalog: &dyn Catalog, id: MovieId) {
        let fetch = self.open(id);
        let result = fetch.run(catalog).await;
        self.finish(fetch.ticket, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::{Favorites, FavoritesStore, MemoryStore, FAVORITES_KEY};
    use std::sync::Arc;

    fn controller_with(record: &str) -> DetailController {
        let store = Favorites::new(MemoryStore::with_entry(FAVORITES_KEY, record));
        DetailController::new(Arc::new(store))
    }

    #[test]
    fn test_favorited_flag_from_store() {
        let mut detail = controller_with("[27205,155]");
        let fetch = detail.open(MovieId::new(27205));
        detail.finish(fetch.ticket, Ok(MovieRecord::new(27205, "Inception")));
        assert!(detail.is_favorite());

        let fetch = detail.open(MovieId::new(99));
        detail.finish(fetch.ticket, Ok(MovieRecord::new(99, "Other")));
        assert!(!detail.is_favorite());
    }

    #[test]
    fn test_response_for_previous_movie_is_discarded() {
        let mut detail = controller_with("[]");
        let first = detail.open(MovieId::new(1));
        let second = detail.open(MovieId::new(2));

        assert!(!detail.finish(first.ticket, Ok(MovieRecord::new(1, "First"))));
        assert!(detail.movie.is_none());
        assert!(detail.status.is_loading());

        assert!(detail.finish(second.ticket, Ok(MovieRecord::new(2, "Second"))));
        assert_eq!(detail.movie.as_ref().unwrap().title, "Second");
    }

    #[test]
    fn test_close_discards_late_response() {
        let mut detail = controller_with("[]");
        let fetch = detail.open(MovieId::new(1));
        detail.close();
        assert!(!detail.finish(fetch.ticket, Ok(MovieRecord::new(1, "Late"))));
        assert!(detail.movie.is_none());
    }

    #[test]
    fn test_not_found_message() {
        let mut detail = controller_with("[]");
        let fetch = detail.open(MovieId::new(404));
        detail.finish(fetch.ticket, Err(TmdbError::NotFound.into()));
        assert_eq!(detail.status, LoadingState::Error(NOT_FOUND_ERROR.into()));

        let retry = detail.retry().unwrap();
        assert_eq!(retry.id, MovieId::new(404));
        assert!(detail.status.is_loading());
    }

    #[test]
    fn test_toggle_from_detail() {
        let store = Arc::new(Favorites::in_memory());
        let mut detail = DetailController::new(store.clone());
        detail.open(MovieId::new(550));

        assert_eq!(detail.toggle_favorite().unwrap(), Some(true));
        assert!(store.is_favorite(MovieId::new(550)));
        assert_eq!(detail.toggle_favorite().unwrap(), Some(false));
        assert!(store.get_favorites().is_empty());
    }
}
