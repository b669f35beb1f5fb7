//! Favorite toggle control shared by cards and the detail view
//!
//! A control reads its flag from the store when mounted. When activated it
//! toggles through the store and takes its new flag from the set the toggle
//! returned, so the flag always matches what this control just wrote even if
//! other controls are toggling at the same time.

use serde::Serialize;

use crate::favorites::{FavoritesError, FavoritesStore};
use crate::models::{MovieId, MovieRecord};

/// Favorite flag bound to one movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavoriteToggle {
    id: MovieId,
    favorite: bool,
}

impl FavoriteToggle {
    /// Read membership of `id` from the store
    pub fn mount(store: &dyn FavoritesStore, id: MovieId) -> Self {
        Self {
            id,
            favorite: store.is_favorite(id),
        }
    }

    pub fn id(&self) -> MovieId {
        self.id
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    /// Toggle through the store; returns the new flag.
    /// On a write failure the flag is left untouched.
    pub fn activate(&mut self, store: &dyn FavoritesStore) -> Result<bool, FavoritesError> {
        let updated = store.toggle_favorite(self.id)?;
        self.favorite = updated.contains(self.id);
        Ok(self.favorite)
    }

    /// Re-read the flag, e.g. after the owning view regains focus
    pub fn refresh(&mut self, store: &dyn FavoritesStore) {
        self.favorite = store.is_favorite(self.id);
    }
}

/// A movie in a list together with its favorite control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub movie: MovieRecord,
    pub favorite: FavoriteToggle,
}

impl MovieCard {
    pub fn mount(store: &dyn FavoritesStore, movie: MovieRecord) -> Self {
        let favorite = FavoriteToggle::mount(store, movie.id);
        Self { movie, favorite }
    }

    /// Mount one card per record, reading the store once per card
    pub fn mount_all(store: &dyn FavoritesStore, movies: Vec<MovieRecord>) -> Vec<Self> {
        movies
            .into_iter()
            .map(|movie| Self::mount(store, movie))
            .collect()
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite.is_favorite()
    }
}
