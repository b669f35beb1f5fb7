//! Integration tests for MovieDeck
//!
//! Tests are organized by component:
//! - tmdb_test: TMDB API client tests
//! - favorites_test: Favorites store and persistence tests
//! - controllers_test: View controller and stale-response tests
//! - cli_test: CLI parsing and command handler tests
//! - ui_test: UI rendering tests
//! - e2e_test: End-to-end flow tests (Popular -> Detail -> Favorites -> Search)

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
