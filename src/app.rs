//! App state and navigation
//!
//! Owns the three screen controllers, the navigation stack and keyboard
//! handling. Key handling never performs I/O itself: it returns an [`Effect`]
//! describing the fetch to run, and the event loop feeds the resulting
//! [`Completion`] back through [`App::apply`].

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::Catalog;
use crate::controllers::{
    DetailController, DetailFetch, FavoritesController, FavoritesFetch, HomeController,
    HomeFetch, LoadingState, MovieCard, Ticket,
};
use crate::favorites::{FavoritesError, SharedFavorites};
use crate::models::{MovieId, MovieRecord, IMAGE_BASE_URL};

// =============================================================================
// App State Enum
// =============================================================================

/// Screen currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Popular movies or search results
    #[default]
    Home,
    /// Single movie
    Detail,
    /// Saved favorites
    Favorites,
}

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Search box focused
    Editing,
}

// =============================================================================
// Effects
// =============================================================================

/// Work requested by a key press, run off the UI loop
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Home(HomeFetch),
    Detail(DetailFetch),
    Favorites(FavoritesFetch),
}

/// Result of an [`Effect`], tagged with the ticket it was issued under
#[derive(Debug)]
pub enum Completion {
    Home(Ticket, Result<Vec<MovieRecord>>),
    Detail(Ticket, Result<MovieRecord>),
    Favorites(Ticket, Vec<MovieRecord>),
}

impl Effect {
    pub async fn run(self, catalog: &dyn Catalog) -> Completion {
        match self {
            Effect::Home(fetch) => Completion::Home(fetch.ticket, fetch.run(catalog).await),
            Effect::Detail(fetch) => Completion::Detail(fetch.ticket, fetch.run(catalog).await),
            Effect::Favorites(fetch) => {
                Completion::Favorites(fetch.ticket, fetch.run(catalog).await)
            }
        }
    }
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub selected: usize,
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.selected + 1 < self.len {
            self.selected += 1;
        }
    }

    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }

    pub fn page_down(&mut self, page_size: usize) {
        if self.len > 0 {
            self.selected = (self.selected + page_size).min(self.len - 1);
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.len.saturating_sub(1);
    }

    /// Update length, clamping the selection
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// First row to draw so the selection stays inside `height` rows
    pub fn window_start(&self, height: usize) -> usize {
        if height == 0 || self.selected < height {
            0
        } else {
            self.selected + 1 - height
        }
    }
}

/// Search box contents. The cursor is a byte offset on a char boundary.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    pub query: String,
    pub cursor: usize,
}

impl SearchInput {
    pub fn insert(&mut self, c: char) {
        self.query.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(c) = self.query[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
            self.query.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.query.len() {
            self.query.remove(self.cursor);
        }
    }

    pub fn cursor_left(&mut self) {
        if let Some(c) = self.query[..self.cursor].chars().next_back() {
            self.cursor -= c.len_utf8();
        }
    }

    pub fn cursor_right(&mut self) {
        if let Some(c) = self.query[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.query.len();
    }

    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
pub struct App {
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    pub running: bool,
    pub input_mode: InputMode,
    /// Transient notice shown as a popup (e.g. a favorite failed to save)
    pub error: Option<String>,
    pub image_base_url: String,

    pub search: SearchInput,
    pub home: HomeController,
    pub home_list: ListState,
    pub detail: DetailController,
    pub favorites: FavoritesController,
    pub favorites_list: ListState,
}

impl App {
    pub fn new(store: SharedFavorites) -> Self {
        Self {
            state: AppState::Home,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,
            error: None,
            image_base_url: IMAGE_BASE_URL.to_string(),

            search: SearchInput::default(),
            home: HomeController::new(store.clone()),
            home_list: ListState::default(),
            detail: DetailController::new(store.clone()),
            favorites: FavoritesController::new(store),
            favorites_list: ListState::default(),
        }
    }

    pub fn with_image_base_url(mut self, url: impl Into<String>) -> Self {
        self.image_base_url = url.into();
        self
    }

    /// Initial fetch: the popular listing
    pub fn start(&mut self) -> Effect {
        Effect::Home(self.home.begin_popular())
    }

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) -> Option<Effect> {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.state = state;
        }
        self.input_mode = InputMode::Normal;
        self.focus()
    }

    /// Go back to previous state. `None` when there was nothing to leave.
    pub fn back(&mut self) -> Option<Option<Effect>> {
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
            return Some(None);
        }

        let prev = self.nav_stack.pop()?;
        if self.state == AppState::Detail {
            self.detail.close();
        }
        self.state = prev;
        Some(self.focus())
    }

    /// Re-sync the screen that just became visible
    fn focus(&mut self) -> Option<Effect> {
        match self.state {
            AppState::Home => {
                self.home.on_focus();
                None
            }
            AppState::Detail => {
                self.detail.on_focus();
                None
            }
            AppState::Favorites => {
                let fetch = self.favorites.on_focus();
                self.favorites_list.set_len(self.favorites.cards.len());
                fetch.map(Effect::Favorites)
            }
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Loading state of the visible screen
    pub fn status(&self) -> &LoadingState {
        match self.state {
            AppState::Home => &self.home.status,
            AppState::Detail => &self.detail.status,
            AppState::Favorites => &self.favorites.status,
        }
    }

    /// Cards of the visible list screen
    pub fn cards(&self) -> &[MovieCard] {
        match self.state {
            AppState::Home => &self.home.cards,
            AppState::Favorites => &self.favorites.cards,
            AppState::Detail => &[],
        }
    }

    fn selected_id(&self) -> Option<MovieId> {
        let index = match self.state {
            AppState::Home => self.home_list.selected,
            AppState::Favorites => self.favorites_list.selected,
            AppState::Detail => return None,
        };
        self.cards().get(index).map(|c| c.movie.id)
    }

    /// Open the detail screen for `id`
    pub fn open_detail(&mut self, id: MovieId) -> Option<Effect> {
        let fetch = self.detail.open(id);
        self.navigate(AppState::Detail);
        Some(Effect::Detail(fetch))
    }

    // -------------------------------------------------------------------------
    // Completions
    // -------------------------------------------------------------------------

    /// Apply a finished fetch; returns false if it was stale
    pub fn apply(&mut self, completion: Completion) -> bool {
        match completion {
            Completion::Home(ticket, result) => {
                let applied = self.home.finish(ticket, result);
                if applied {
                    self.home_list = ListState::new(self.home.cards.len());
                }
                applied
            }
            Completion::Detail(ticket, result) => self.detail.finish(ticket, result),
            Completion::Favorites(ticket, movies) => {
                let applied = self.favorites.finish(ticket, movies);
                if applied {
                    self.favorites_list.set_len(self.favorites.cards.len());
                }
                applied
            }
        }
    }

    fn report_toggle(&mut self, result: Result<Option<bool>, FavoritesError>) {
        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to save favorite");
            self.set_error(format!("Could not save favorite: {}", e));
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returning the fetch it triggered if any
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key)
        } else {
            self.handle_normal_key(key)
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<Effect> {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return self.home.begin_search(&self.search.query).map(Effect::Home);
            }
            KeyCode::Char(c) => self.search.insert(c),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => self.search.cursor_left(),
            KeyCode::Right => self.search.cursor_right(),
            KeyCode::Home => self.search.cursor_home(),
            KeyCode::End => self.search.cursor_end(),
            _ => {}
        }
        None
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Effect> {
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return None;
            }
            KeyCode::Char('/') => {
                if self.state != AppState::Home {
                    self.nav_stack.clear();
                    self.detail.close();
                    self.state = AppState::Home;
                    self.home.on_focus();
                }
                self.input_mode = InputMode::Editing;
                return None;
            }
            KeyCode::Char('F') => {
                return if self.state == AppState::Favorites {
                    None
                } else {
                    self.navigate(AppState::Favorites)
                };
            }
            KeyCode::Char('r') if self.status().is_error() => {
                return self.retry();
            }
            KeyCode::Esc => return self.handle_escape(),
            _ => {}
        }

        match self.state {
            AppState::Home | AppState::Favorites => self.handle_list_key(key),
            AppState::Detail => self.handle_detail_key(key),
        }
    }

    fn handle_escape(&mut self) -> Option<Effect> {
        if let Some(effect) = self.back() {
            return effect;
        }
        // Nothing to go back to: leave search for the popular list
        if self.state == AppState::Home && self.home.is_searching() {
            self.search.clear();
            return Some(Effect::Home(self.home.clear_search()));
        }
        None
    }

    fn retry(&mut self) -> Option<Effect> {
        match self.state {
            AppState::Home => Some(Effect::Home(self.home.retry())),
            AppState::Detail => self.detail.retry().map(Effect::Detail),
            AppState::Favorites => self.favorites.begin().map(Effect::Favorites),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let list = if self.state == AppState::Home {
            &mut self.home_list
        } else {
            &mut self.favorites_list
        };

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => list.up(),
            KeyCode::Down | KeyCode::Char('j') => list.down(),
            KeyCode::PageUp => list.page_up(10),
            KeyCode::PageDown => list.page_down(10),
            KeyCode::Home => list.first(),
            KeyCode::End => list.last(),
            KeyCode::Enter => {
                return self.selected_id().and_then(|id| self.open_detail(id));
            }
            KeyCode::Char('f') => {
                let result = if self.state == AppState::Home {
                    self.home.toggle_favorite(self.home_list.selected)
                } else {
                    self.favorites.toggle_favorite(self.favorites_list.selected)
                };
                self.report_toggle(result);
            }
            _ => {}
        }
        None
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.code == KeyCode::Char('f') {
            let result = self.detail.toggle_favorite();
            self.report_toggle(result);
        }
        None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
