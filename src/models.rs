//! Data structures and types for MovieDeck
//!
//! Contains the shared models used across the application:
//! - **Identity**: `MovieId` and its normalisation rules
//! - **Catalog**: `MovieRecord` as projected from TMDB payloads
//! - **Artwork**: image URL construction with placeholder fallback

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Image base path for poster/backdrop artwork
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

// =============================================================================
// Movie Identity
// =============================================================================

/// Integer identifier of a movie in the external catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(u64);

/// Rejected external representation of a movie id
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid movie ID: {0:?}")]
pub struct InvalidMovieId(pub String);

impl MovieId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Normalise a JSON value (persisted record element) to a movie id.
    ///
    /// Accepts non-negative integers, integral floats and numeric strings.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(id) = n.as_u64() {
                    return Some(Self(id));
                }
                let f = n.as_f64()?;
                // u64::MAX as f64 rounds up, hence the strict bound
                if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 {
                    Some(Self(f as u64))
                } else {
                    None
                }
            }
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FromStr for MovieId {
    type Err = InvalidMovieId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidMovieId(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|_| InvalidMovieId(s.to_string()))
    }
}

impl From<u64> for MovieId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<MovieId> for u64 {
    fn from(id: MovieId) -> u64 {
        id.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Catalog Models (TMDB)
// =============================================================================

/// Genre as returned by the detail endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// In-memory projection of catalog data for one movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f32,
    pub vote_count: u32,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<Genre>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genre_ids: Vec<u32>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub adult: bool,
}

impl MovieRecord {
    /// Minimal record, mostly useful for fixtures
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 0.0,
            vote_count: 0,
            release_date: None,
            runtime: None,
            genres: Vec::new(),
            genre_ids: Vec::new(),
            tagline: None,
            status: None,
            original_language: None,
            adult: false,
        }
    }

    /// Release year from a date like "2010-07-15"
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Runtime formatted as "2h 28m"
    pub fn runtime_str(&self) -> Option<String> {
        match self.runtime {
            Some(mins) if mins > 0 => Some(format!("{}h {}m", mins / 60, mins % 60)),
            _ => None,
        }
    }

    /// Comma separated genre names
    pub fn genres_str(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn poster_url(&self, image_base: &str) -> Artwork {
        Artwork::from_path(image_base, self.poster_path.as_deref())
    }

    pub fn backdrop_url(&self, image_base: &str) -> Artwork {
        Artwork::from_path(image_base, self.backdrop_path.as_deref())
    }

    /// Banner artwork: backdrop first, poster otherwise
    pub fn hero_url(&self, image_base: &str) -> Artwork {
        match self.backdrop_url(image_base) {
            Artwork::Placeholder => self.poster_url(image_base),
            url => url,
        }
    }
}

impl fmt::Display for MovieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} - ★ {:.1}", self.title, year_str, self.vote_average)
    }
}

// =============================================================================
// Artwork
// =============================================================================

/// Resolved image location for a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "url")]
pub enum Artwork {
    Url(String),
    /// No path in the catalog payload; render a placeholder instead
    Placeholder,
}

impl Artwork {
    pub fn from_path(image_base: &str, path: Option<&str>) -> Self {
        match path.map(str::trim) {
            Some(p) if !p.is_empty() => Artwork::Url(format!("{}{}", image_base, p)),
            _ => Artwork::Placeholder,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Artwork::Url(url) => Some(url),
            Artwork::Placeholder => None,
        }
    }
}

/// Extract year from a date string like "2022-03-04"
pub(crate) fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}
