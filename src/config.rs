//! Configuration management for MovieDeck
//!
//! Config is stored at ~/.config/moviedeck/config.toml. Loading is best
//! effort: a missing or unreadable file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::tmdb::DEFAULT_BASE_URL;
use crate::models::IMAGE_BASE_URL;

/// Environment variable overriding the configured API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB v3 API key
    pub api_key: Option<String>,
    /// Catalog API root
    pub base_url: Option<String>,
    /// Prefix for poster/backdrop paths
    pub image_base_url: Option<String>,
    /// Where favorites are stored
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Default config file path (~/.config/moviedeck/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("moviedeck").join("config.toml"))
    }

    /// Load from the default path
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load from `path`, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No config file, using defaults");
                return Self::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
                Self::default()
            }
        }
    }

    /// Load from an explicit path if given, else the default one
    pub fn resolve(path: Option<&Path>) -> Self {
        match path {
            Some(p) => Self::load_from(p),
            None => Self::load(),
        }
    }

    /// API key: `TMDB_API_KEY` first, then the config file
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn image_base_url(&self) -> &str {
        self.image_base_url.as_deref().unwrap_or(IMAGE_BASE_URL)
    }

    /// Favorites directory; `None` when no per-user data dir exists
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|p| p.join("moviedeck")))
    }
}
