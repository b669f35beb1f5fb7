//! TMDB (The Movie Database) API client
//!
//! Provides popular listings, search and metadata for movies.
//! API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{extract_year, Genre, MovieId, MovieRecord};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Upper bound on a single rate-limit backoff
pub const MAX_RETRY_WAIT_SECS: u64 = 30;

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Invalid API key (401)")]
    Unauthorized,

    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request keyed by `api_key`, retrying on rate limits
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut retries = 0;

        loop {
            tracing::debug!(endpoint, attempt = retries + 1, "TMDB request");

            let response = self
                .client
                .get(&url)
                .query(&[("api_key", self.api_key.as_str())])
                .header("Accept", "application/json")
                .send()
                .await
                .map_err(TmdbError::from)?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await.map_err(TmdbError::from)?;
                    let parsed: T = serde_json::from_str(&body).map_err(|e| {
                        TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                    })?;
                    return Ok(parsed);
                }
                StatusCode::UNAUTHORIZED => {
                    return Err(TmdbError::Unauthorized.into());
                }
                StatusCode::NOT_FOUND => {
                    return Err(TmdbError::NotFound.into());
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(TmdbError::RateLimited.into());
                    }

                    let retry_after = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok());
                    let wait_secs = retry_wait_secs(retry_after, retries);

                    tracing::warn!(endpoint, wait_secs, retries, "TMDB rate limited, backing off");
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(TmdbError::ServerError(status.as_u16()).into());
                }
            }
        }
    }

    /// Get popular movies
    pub async fn popular(&self) -> Result<Vec<MovieRecord>> {
        let response: ListResponse = self.get("/movie/popular").await?;
        Ok(response.into_records())
    }

    /// Search for movies by title
    pub async fn search(&self, query: &str) -> Result<Vec<MovieRecord>> {
        if query.trim().is_empty() {
            return Err(TmdbError::EmptyQuery.into());
        }

        let endpoint = format!("/search/movie?query={}", urlencoding::encode(query));
        let response: ListResponse = self.get(&endpoint).await?;
        Ok(response.into_records())
    }

    /// Get movie details by ID
    pub async fn movie(&self, id: MovieId) -> Result<MovieRecord> {
        let endpoint = format!("/movie/{}", id);
        let response: MovieRaw = self.get(&endpoint).await?;
        response
            .into_record()
            .ok_or_else(|| TmdbError::InvalidResponse("Movie payload without id".into()).into())
    }
}

/// Seconds to wait before retrying a 429: `Retry-After` if it parses, else
/// exponential backoff, never more than [`MAX_RETRY_WAIT_SECS`]
fn retry_wait_secs(retry_after: Option<&str>, retries: u32) -> u64 {
    retry_after
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or_else(|| 2u64.saturating_pow(retries))
        .min(MAX_RETRY_WAIT_SECS)
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<MovieRaw>,
}

impl ListResponse {
    fn into_records(self) -> Vec<MovieRecord> {
        self.results
            .into_iter()
            .filter_map(MovieRaw::into_record)
            .collect()
    }
}

/// Shared shape of list entries and the flat detail payload
#[derive(Debug, Deserialize)]
struct MovieRaw {
    id: Option<u64>,
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    release_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    tagline: Option<String>,
    status: Option<String>,
    original_language: Option<String>,
    #[serde(default)]
    adult: bool,
}

impl MovieRaw {
    /// Entries without an id cannot be linked to favorites or details
    fn into_record(self) -> Option<MovieRecord> {
        let id = MovieId::new(self.id?);
        let title = self.title.or(self.original_title).unwrap_or_default();

        // TMDB sends "" for unknown dates
        let release_date = self
            .release_date
            .filter(|d| extract_year(d).is_some());

        Some(MovieRecord {
            id,
            title,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average.unwrap_or(0.0),
            vote_count: self.vote_count.unwrap_or(0),
            release_date,
            runtime: self.runtime,
            genres: self.genres,
            genre_ids: self.genre_ids,
            tagline: self.tagline.filter(|t| !t.is_empty()),
            status: self.status,
            original_language: self.original_language,
            adult: self.adult,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_without_id_are_filtered() {
        let raw = r#"{"results": [{"id": 1, "title": "Kept"}, {"title": "Dropped"}]}"#;
        let response: ListResponse = serde_json::from_str(raw).unwrap();
        let records = response.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Kept");
    }

    #[test]
    fn test_missing_results_is_empty() {
        let response: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_records().is_empty());
    }

    #[test]
    fn test_empty_release_date_is_none() {
        let raw: MovieRaw =
            serde_json::from_str(r#"{"id": 3, "title": "Undated", "release_date": ""}"#).unwrap();
        let record = raw.into_record().unwrap();
        assert_eq!(record.release_date, None);
        assert_eq!(record.year(), None);
    }

    #[test]
    fn test_title_falls_back_to_original_title() {
        let raw: MovieRaw =
            serde_json::from_str(r#"{"id": 4, "original_title": "Le Titre"}"#).unwrap();
        assert_eq!(raw.into_record().unwrap().title, "Le Titre");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TmdbClient::with_base_url("key", "http://localhost:1234/");
        assert_eq!(client.base_url(), "http://localhost:1234");
    }

    #[test]
    fn test_retry_wait_is_capped() {
        assert_eq!(retry_wait_secs(Some("0"), 1), 0);
        assert_eq!(retry_wait_secs(Some(" 5 "), 1), 5);
        assert_eq!(retry_wait_secs(Some("86400"), 1), MAX_RETRY_WAIT_SECS);
        // Unparseable header (e.g. an HTTP date) falls back to backoff
        assert_eq!(retry_wait_secs(Some("Wed, 21 Oct 2015 07:28:00 GMT"), 2), 4);
        assert_eq!(retry_wait_secs(None, 1), 2);
        assert_eq!(retry_wait_secs(None, 40), MAX_RETRY_WAIT_SECS);
    }
}
