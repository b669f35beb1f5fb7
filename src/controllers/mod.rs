//! View controllers
//!
//! Each screen owns a controller that runs the fetch lifecycle
//! (loading → ready | error), combines catalog records with favorite state and
//! exposes the user actions of that screen. Controllers are UI agnostic: the
//! TUI drives them through `begin_*`/`finish` pairs from spawned tasks, the
//! tests and CLI through the async conveniences.
//!
//! Every fetch is tagged with a [`Ticket`]. Only the most recently issued
//! ticket of a controller is accepted on completion, so a response that
//! arrives after the user moved on (another movie, another search) is dropped
//! instead of being applied to the wrong context.

pub mod detail;
pub mod favorites;
pub mod home;
pub mod toggle;

pub use detail::{DetailController, DetailFetch};
pub use favorites::{resolve_favorites, FavoritesController, FavoritesFetch};
pub use home::{HomeController, HomeFetch, HomeRequest};
pub use toggle::{FavoriteToggle, MovieCard};

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Request Tickets
// =============================================================================

/// Tag carried by an in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Issues tickets and decides which completion is still wanted
#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: u64,
    current: Option<u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding any outstanding one
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        self.current = Some(self.issued);
        Ticket(self.issued)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current == Some(ticket.0)
    }

    /// Consume `ticket` if it is the outstanding one
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if self.is_current(ticket) {
            self.current = None;
            true
        } else {
            tracing::debug!(ticket = ticket.0, current = ?self.current, "Discarding stale completion");
            false
        }
    }

    /// Drop the outstanding ticket (view left)
    pub fn cancel(&mut self) {
        self.current = None;
    }

    pub fn is_pending(&self) -> bool {
        self.current.is_some()
    }
}
