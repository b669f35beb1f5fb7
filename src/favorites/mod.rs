//! Favorites persistence
//!
//! The favorites record is the only shared mutable state in the application:
//! a JSON array of integer movie ids stored under the `"favorites"` key, e.g.
//! `[12345,67890]`. Membership is always derived from a fresh read of the
//! record, never cached, so every view observes the latest persisted state at
//! the moment it checks.
//!
//! Reads are tolerant: an absent key, an empty array, an array of numeric
//! strings and a corrupt record all produce a well-formed [`FavoritesSet`].
//!
//! Toggling is a read-modify-write of the whole record. Within one process the
//! read and write happen under a lock, so toggles of different ids from
//! different tasks never drop each other. Another process writing the same
//! record between our read and our write is silently overwritten (last write
//! wins); there is no cross-process locking.

pub mod storage;

use indexmap::IndexSet;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::models::MovieId;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Storage key of the persisted record
pub const FAVORITES_KEY: &str = "favorites";

/// Shared handle held by every consumer of favorite state
pub type SharedFavorites = Arc<dyn FavoritesStore>;

// =============================================================================
// Errors
// =============================================================================

/// Favorites write error types
#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("Failed to persist favorites: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to encode favorites: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Why a persisted record could not be read as a set
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("record is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("record is not a JSON array")]
    NotAnArray,
}

// =============================================================================
// Favorites Set
// =============================================================================

/// Set of favorited movie ids, in the order they were added
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet(IndexSet<MovieId>);

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = MovieId> + '_ {
        self.0.iter().copied()
    }

    /// Add `id` if absent (appended), remove it if present.
    /// Returns whether `id` is a member afterwards.
    pub fn toggle(&mut self, id: MovieId) -> bool {
        if self.0.shift_remove(&id) {
            false
        } else {
            self.0.insert(id);
            true
        }
    }

    pub fn to_vec(&self) -> Vec<MovieId> {
        self.iter().collect()
    }

    /// Encode as the persisted record: a compact JSON array of integers
    pub fn to_record(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_vec())
    }

    /// Decode a persisted record, normalising every element.
    ///
    /// Elements that do not normalise to an id are dropped; duplicates
    /// collapse onto their first occurrence.
    pub fn from_record(raw: &str) -> Result<Self, RecordError> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        let items = value.as_array().ok_or(RecordError::NotAnArray)?;

        let set: Self = items.iter().filter_map(MovieId::from_json).collect();
        let dropped = items.len() - set.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Ignored invalid or duplicate favorite entries");
        }
        Ok(set)
    }
}

impl FromIterator<MovieId> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = MovieId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FavoritesSet {
    type Item = &'a MovieId;
    type IntoIter = indexmap::set::Iter<'a, MovieId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// =============================================================================
// Store Interface
// =============================================================================

/// Sole authority over which movies are favorited.
///
/// Consumers hold a [`SharedFavorites`] handle and re-read after their own
/// actions or when they regain focus; there is no change notification.
pub trait FavoritesStore: Send + Sync {
    /// Current persisted set; never fails, unreadable state reads as empty
    fn get_favorites(&self) -> FavoritesSet;

    /// Flip membership of `id`, persist the whole set and return it
    fn toggle_favorite(&self, id: MovieId) -> Result<FavoritesSet, FavoritesError>;

    /// Persist `favorites` verbatim, replacing any prior record
    fn save_favorites(&self, favorites: &FavoritesSet) -> Result<(), FavoritesError>;

    /// Fresh membership test
    fn is_favorite(&self, id: MovieId) -> bool {
        self.get_favorites().contains(id)
    }
}

/// Favorites service over any key-value backend
pub struct Favorites<S: KeyValueStore> {
    storage: S,
    // Held across the read and write of a toggle
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> Favorites<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn read_set(&self) -> FavoritesSet {
        let raw = match self.storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FavoritesSet::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read favorites, treating as empty");
                return FavoritesSet::new();
            }
        };

        FavoritesSet::from_record(&raw).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Corrupt favorites record, treating as empty");
            FavoritesSet::new()
        })
    }

    fn write_set(&self, favorites: &FavoritesSet) -> Result<(), FavoritesError> {
        let record = favorites.to_record()?;
        self.storage.set(FAVORITES_KEY, &record)?;
        Ok(())
    }
}

impl Favorites<FileStore> {
    /// File-backed favorites under `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileStore::new(dir))
    }
}

impl Favorites<MemoryStore> {
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: KeyValueStore> FavoritesStore for Favorites<S> {
    fn get_favorites(&self) -> FavoritesSet {
        self.read_set()
    }

    fn toggle_favorite(&self, id: MovieId) -> Result<FavoritesSet, FavoritesError> {
        let _guard = self.write_lock.lock();
        let mut favorites = self.read_set();
        let added = favorites.toggle(id);
        self.write_set(&favorites)?;
        tracing::info!(%id, added, total = favorites.len(), "Toggled favorite");
        Ok(favorites)
    }

    fn save_favorites(&self, favorites: &FavoritesSet) -> Result<(), FavoritesError> {
        let _guard = self.write_lock.lock();
        self.write_set(favorites)
    }
}
