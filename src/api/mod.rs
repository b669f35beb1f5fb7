//! API clients for external services
//!
//! - TMDB: popular list, movie search and movie details
//!
//! Controllers talk to the catalog through the [`Catalog`] trait so tests can
//! substitute a fake.

pub mod tmdb;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{MovieId, MovieRecord};

pub use tmdb::{TmdbClient, TmdbError};

/// Read-only movie catalog
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Popular movies for the landing view
    async fn popular(&self) -> Result<Vec<MovieRecord>>;

    /// Movies matching `query`; callers must not pass a blank query
    async fn search(&self, query: &str) -> Result<Vec<MovieRecord>>;

    /// Full record for one movie
    async fn movie(&self, id: MovieId) -> Result<MovieRecord>;
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn popular(&self) -> Result<Vec<MovieRecord>> {
        TmdbClient::popular(self).await
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieRecord>> {
        TmdbClient::search(self, query).await
    }

    async fn movie(&self, id: MovieId) -> Result<MovieRecord> {
        TmdbClient::movie(self, id).await
    }
}
