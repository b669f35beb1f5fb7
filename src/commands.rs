//! CLI Command Handlers
//!
//! Each handler takes its parsed args, the shared [`Context`] and the
//! [`Output`], and returns an [`ExitCode`].

use crate::api::{TmdbClient, TmdbError};
use crate::cli::{
    parse_movie_id, ExitCode, FavoritesCmd, InfoCmd, MovieEntry, Output, PopularCmd, SearchCmd,
    ToggleCmd, ToggleResponse,
};
use crate::config::{Config, API_KEY_ENV};
use crate::controllers::resolve_favorites;
use crate::favorites::{Favorites, FavoritesStore, SharedFavorites};
use crate::models::MovieRecord;
use crate::ui::theme::heart;
use std::sync::Arc;

// =============================================================================
// Context
// =============================================================================

/// What every command needs: config, and from it the catalog and the store
pub struct Context {
    pub config: Config,
    favorites: SharedFavorites,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let favorites = open_favorites(&config);
        Self { config, favorites }
    }

    pub fn favorites(&self) -> &dyn FavoritesStore {
        self.favorites.as_ref()
    }

    pub fn shared_favorites(&self) -> SharedFavorites {
        self.favorites.clone()
    }

    /// Catalog client, or a message when no API key is configured
    pub fn catalog(&self) -> Result<TmdbClient, String> {
        let key = self.config.api_key().ok_or_else(|| {
            format!(
                "No TMDB API key configured. Set {} or api_key in {}",
                API_KEY_ENV,
                Config::path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "the config file".into())
            )
        })?;
        Ok(TmdbClient::with_base_url(key, self.config.base_url()))
    }
}

/// File-backed favorites in the data dir, in-memory when there is none
pub fn open_favorites(config: &Config) -> SharedFavorites {
    match config.data_dir() {
        Some(dir) => Arc::new(Favorites::open(dir)),
        None => {
            tracing::warn!("No data directory available, favorites will not persist");
            Arc::new(Favorites::in_memory())
        }
    }
}

/// Exit code for a catalog failure
pub fn catalog_exit_code(e: &anyhow::Error) -> ExitCode {
    match e.downcast_ref::<TmdbError>() {
        Some(TmdbError::NotFound) => ExitCode::NotFound,
        Some(TmdbError::EmptyQuery) => ExitCode::InvalidArgs,
        Some(TmdbError::Unauthorized) | Some(TmdbError::InvalidResponse(_)) => ExitCode::Error,
        _ => ExitCode::NetworkError,
    }
}

fn list_lines(movies: &[MovieRecord], store: &dyn FavoritesStore) -> String {
    if movies.is_empty() {
        return "No movies found".to_string();
    }
    let favorites = store.get_favorites();
    movies
        .iter()
        .map(|m| format!("{} {:>8}  {}", heart(favorites.contains(m.id)), m.id, m))
        .collect::<Vec<_>>()
        .join("\n")
}

fn print_movies(movies: &[MovieRecord], ctx: &Context, output: &Output) -> ExitCode {
    let favorites = ctx.favorites().get_favorites();
    let entries: Vec<MovieEntry> = movies
        .iter()
        .map(|movie| MovieEntry {
            movie,
            favorite: favorites.contains(movie.id),
        })
        .collect();

    if let Err(e) = output.print(&entries, || list_lines(movies, ctx.favorites())) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Popular / Search
// =============================================================================

pub async fn popular_cmd(cmd: PopularCmd, ctx: &Context, output: &Output) -> ExitCode {
    let client = match ctx.catalog() {
        Ok(client) => client,
        Err(msg) => return output.error(msg, ExitCode::Error),
    };

    output.info("Fetching popular movies...");
    match client.popular().await {
        Ok(mut movies) => {
            movies.truncate(cmd.limit);
            print_movies(&movies, ctx, output)
        }
        Err(e) => output.error(format!("Failed to fetch movies: {}", e), catalog_exit_code(&e)),
    }
}

pub async fn search_cmd(cmd: SearchCmd, ctx: &Context, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }
    let client = match ctx.catalog() {
        Ok(client) => client,
        Err(msg) => return output.error(msg, ExitCode::Error),
    };

    output.info(format!("Searching for: {}", query));
    match client.search(query).await {
        Ok(mut movies) => {
            movies.truncate(cmd.limit);
            print_movies(&movies, ctx, output)
        }
        Err(e) => output.error(format!("Search failed: {}", e), catalog_exit_code(&e)),
    }
}

// =============================================================================
// Info
// =============================================================================

fn info_text(movie: &MovieRecord, favorite: bool, image_base: &str) -> String {
    let mut lines = vec![movie.to_string()];
    if let Some(tagline) = &movie.tagline {
        lines.push(format!("\"{}\"", tagline));
    }
    let mut meta = Vec::new();
    if let Some(runtime) = movie.runtime_str() {
        meta.push(runtime);
    }
    let genres = movie.genres_str();
    if !genres.is_empty() {
        meta.push(genres);
    }
    if !meta.is_empty() {
        lines.push(meta.join(" | "));
    }
    lines.push(format!(
        "Favorite: {}",
        if favorite { "yes ♥" } else { "no" }
    ));
    if let Some(url) = movie.poster_url(image_base).url() {
        lines.push(format!("Poster: {}", url));
    }
    if !movie.overview.is_empty() {
        lines.push(String::new());
        lines.push(movie.overview.clone());
    }
    lines.join("\n")
}

pub async fn info_cmd(cmd: InfoCmd, ctx: &Context, output: &Output) -> ExitCode {
    let id = match parse_movie_id(&cmd.id) {
        Ok(id) => id,
        Err(msg) => return output.error(msg, ExitCode::InvalidArgs),
    };
    let client = match ctx.catalog() {
        Ok(client) => client,
        Err(msg) => return output.error(msg, ExitCode::Error),
    };

    output.info(format!("Getting info for: {}", id));
    match client.movie(id).await {
        Ok(movie) => {
            let favorite = ctx.favorites().is_favorite(id);
            let entry = MovieEntry {
                movie: &movie,
                favorite,
            };
            let image_base = ctx.config.image_base_url();
            if let Err(e) = output.print(&entry, || info_text(&movie, favorite, image_base)) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => {
            let code = catalog_exit_code(&e);
            let msg = if code == ExitCode::NotFound {
                format!("Movie {} not found", id)
            } else {
                format!("Failed to load movie details: {}", e)
            };
            output.error(msg, code)
        }
    }
}

// =============================================================================
// Favorites
// =============================================================================

pub async fn favorites_cmd(cmd: FavoritesCmd, ctx: &Context, output: &Output) -> ExitCode {
    let ids = ctx.favorites().get_favorites().to_vec();

    if cmd.ids {
        let human = || {
            if ids.is_empty() {
                "No favorites yet".to_string()
            } else {
                ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join("\n")
            }
        };
        if let Err(e) = output.print(&ids, human) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    if ids.is_empty() {
        return print_movies(&[], ctx, output);
    }
    let client = match ctx.catalog() {
        Ok(client) => client,
        Err(msg) => return output.error(msg, ExitCode::Error),
    };

    output.info(format!("Resolving {} favorites...", ids.len()));
    let movies = resolve_favorites(&client, &ids).await;
    if movies.len() < ids.len() {
        output.info(format!(
            "{} favorite(s) could not be loaded",
            ids.len() - movies.len()
        ));
    }
    print_movies(&movies, ctx, output)
}

pub async fn toggle_cmd(cmd: ToggleCmd, ctx: &Context, output: &Output) -> ExitCode {
    let id = match parse_movie_id(&cmd.id) {
        Ok(id) => id,
        Err(msg) => return output.error(msg, ExitCode::InvalidArgs),
    };

    match ctx.favorites().toggle_favorite(id) {
        Ok(set) => {
            let response = ToggleResponse {
                id,
                favorite: set.contains(id),
                favorites: set.to_vec(),
            };
            let human = || {
                if response.favorite {
                    format!("{} Added {} to favorites", heart(true), id)
                } else {
                    format!("{} Removed {} from favorites", heart(false), id)
                }
            };
            if let Err(e) = output.print(&response, human) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Could not save favorites: {}", e), ExitCode::StorageError),
    }
}
