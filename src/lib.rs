//! MovieDeck - browse the TMDB movie catalog from the terminal
//!
//! Popular listing, search and movie details backed by TMDB, plus a list of
//! favorites persisted locally.
//!
//! # Modules
//!
//! - `models` - Movie ids and catalog records
//! - `favorites` - Favorites set, its persisted record and the store service
//! - `api` - Catalog trait and the TMDB client
//! - `controllers` - Per-screen fetch lifecycle with stale-response guarding
//! - `app` - TUI state, navigation and key handling
//! - `ui` - ratatui rendering
//! - `cli` / `commands` - Scriptable subcommands

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controllers;
pub mod favorites;
pub mod logging;
pub mod models;
pub mod ui;

pub use api::{Catalog, TmdbClient, TmdbError};
pub use app::{App, AppState, Completion, Effect};
pub use favorites::{Favorites, FavoritesSet, FavoritesStore, SharedFavorites};
pub use models::{MovieId, MovieRecord};
