//! Home screen: popular movies, search and the featured banner

use anyhow::Result;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{LoadingState, MovieCard, RequestTracker, Ticket};
use crate::api::Catalog;
use crate::favorites::{FavoritesError, SharedFavorites};
use crate::models::MovieRecord;

/// Featured movie is drawn from the top of the popular list
const FEATURED_POOL: usize = 5;

pub const POPULAR_ERROR: &str = "Failed to fetch movies. Please try again.";
pub const SEARCH_ERROR: &str = "Search failed. Please try again.";

/// What the home screen asked the catalog for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeRequest {
    Popular,
    Search(String),
}

/// An issued home fetch, ready to run against a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeFetch {
    pub ticket: Ticket,
    pub request: HomeRequest,
}

impl HomeFetch {
    pub async fn run(&self, catalog: &dyn Catalog) -> Result<Vec<MovieRecord>> {
        match &self.request {
            HomeRequest::Popular => catalog.popular().await,
            HomeRequest::Search(query) => catalog.search(query).await,
        }
    }
}

/// Home screen controller
pub struct HomeController {
    favorites: SharedFavorites,
    /// Cards currently listed
    pub cards: Vec<MovieCard>,
    /// Banner movie (popular listing only)
    pub featured: Option<MovieRecord>,
    /// Active search, `None` while showing popular
    pub query: Option<String>,
    pub status: LoadingState,
    last_request: HomeRequest,
    pending: Option<HomeRequest>,
    tracker: RequestTracker,
    seed: u64,
}

impl HomeController {
    pub fn new(favorites: SharedFavorites) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_seed(favorites, seed)
    }

    /// Controller with a fixed featured-movie seed
    pub fn with_seed(favorites: SharedFavorites, seed: u64) -> Self {
        Self {
            favorites,
            cards: Vec::new(),
            featured: None,
            query: None,
            status: LoadingState::Idle,
            last_request: HomeRequest::Popular,
            pending: None,
            tracker: RequestTracker::new(),
            seed,
        }
    }

    fn begin(&mut self, request: HomeRequest) -> HomeFetch {
        let message = match &request {
            HomeRequest::Popular => "Loading popular movies...".to_string(),
            HomeRequest::Search(q) => format!("Searching for \"{}\"...", q),
        };
        self.status = LoadingState::Loading(Some(message));
        self.last_request = request.clone();
        self.pending = Some(request.clone());
        HomeFetch {
            ticket: self.tracker.issue(),
            request,
        }
    }

    pub fn begin_popular(&mut self) -> HomeFetch {
        self.begin(HomeRequest::Popular)
    }

    /// Start a search. A blank query is ignored: no fetch, state unchanged.
    pub fn begin_search(&mut self, query: &str) -> Option<HomeFetch> {
        let query = query.trim();
        if query.is_empty() {
            tracing::debug!("Ignoring blank search");
            return None;
        }
        Some(self.begin(HomeRequest::Search(query.to_string())))
    }

    /// Leave search and go back to the popular listing
    pub fn clear_search(&mut self) -> HomeFetch {
        self.begin_popular()
    }

    /// Re-issue the last request (the error state's retry action)
    pub fn retry(&mut self) -> HomeFetch {
        let request = self.last_request.clone();
        self.begin(request)
    }

    /// Apply a completion; returns false if it was stale
    pub fn finish(&mut self, ticket: Ticket, result: Result<Vec<MovieRecord>>) -> bool {
        if !self.tracker.accept(ticket) {
            return false;
        }
        let Some(request) = self.pending.take() else {
            return false;
        };

        match (request, result) {
            (HomeRequest::Popular, Ok(movies)) => {
                self.featured = pick_featured(&movies, self.seed);
                self.query = None;
                self.set_movies(movies);
            }
            (HomeRequest::Search(query), Ok(movies)) => {
                self.featured = None;
                self.query = Some(query);
                self.set_movies(movies);
            }
            (HomeRequest::Popular, Err(e)) => {
                tracing::warn!(error = %e, "Popular fetch failed");
                self.status = LoadingState::Error(POPULAR_ERROR.into());
            }
            (HomeRequest::Search(query), Err(e)) => {
                tracing::warn!(error = %e, %query, "Search failed");
                self.status = LoadingState::Error(SEARCH_ERROR.into());
            }
        }
        true
    }

    fn set_movies(&mut self, movies: Vec<MovieRecord>) {
        self.cards = MovieCard::mount_all(self.favorites.as_ref(), movies);
        self.status = LoadingState::Idle;
    }

    /// Toggle the favorite on the card at `index`
    pub fn toggle_favorite(&mut self, index: usize) -> Result<Option<bool>, FavoritesError> {
        match self.cards.get_mut(index) {
            Some(card) => card.favorite.activate(self.favorites.as_ref()).map(Some),
            None => Ok(None),
        }
    }

    /// Re-read every card's flag after returning to this screen
    pub fn on_focus(&mut self) {
        for card in &mut self.cards {
            card.favorite.refresh(self.favorites.as_ref());
        }
    }

    pub fn is_searching(&self) -> bool {
        self.query.is_some()
    }

    // -------------------------------------------------------------------------
    // Async conveniences
    // -------------------------------------------------------------------------

    pub async fn load_popular(&mut self, catalog: &dyn Catalog) {
        let fetch = self.begin_popular();
        let result = fetch.run(catalog).await;
        self.finish(fetch.ticket, result);
    }

    /// Run a search; false when the query was blank and nothing was sent
    pub async fn search(&mut self, catalog: &dyn Catalog, query: &str) -> bool {
        let Some(fetch) = self.begin_search(query) else {
            return false;
        };
        let result = fetch.run(catalog).await;
        self.finish(fetch.ticket, result);
        true
    }

    pub async fn retry_with(&mut self, catalog: &dyn Catalog) {
        let fetch = self.retry();
        let result = fetch.run(catalog).await;
        self.finish(fetch.ticket, result);
    }
}

/// Pick the banner movie among the first few results
pub fn pick_featured(movies: &[MovieRecord], seed: u64) -> Option<MovieRecord> {
    let pool = movies.len().min(FEATURED_POOL);
    if pool == 0 {
        return None;
    }
    movies.get((seed % pool as u64) as usize).cloned()
}
