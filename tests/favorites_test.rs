//! Favorites store tests
//!
//! Toggle semantics, tolerant reads of legacy and corrupt records, file
//! persistence and concurrent toggles.

use moviedeck::favorites::{
    Favorites, FavoritesSet, FavoritesStore, FileStore, KeyValueStore, MemoryStore, FAVORITES_KEY,
};
use moviedeck::models::MovieId;
use proptest::prelude::*;
use std::sync::Arc;
use std::thread;

fn ids(raw: &[u64]) -> Vec<MovieId> {
    raw.iter().copied().map(MovieId::new).collect()
}

fn seeded(record: &str) -> Favorites<MemoryStore> {
    Favorites::new(MemoryStore::with_entry(FAVORITES_KEY, record))
}

// =============================================================================
// Toggle
// =============================================================================

#[test]
fn test_toggle_adds_to_empty_store() {
    let store = Favorites::in_memory();
    assert!(store.get_favorites().is_empty());

    let set = store.toggle_favorite(MovieId::new(550)).unwrap();
    assert_eq!(set.to_vec(), ids(&[550]));
    assert!(store.is_favorite(MovieId::new(550)));
    assert_eq!(
        store.storage().get(FAVORITES_KEY).unwrap().as_deref(),
        Some("[550]")
    );
}

#[test]
fn test_toggle_twice_removes() {
    let store = Favorites::in_memory();
    store.toggle_favorite(MovieId::new(550)).unwrap();
    let set = store.toggle_favorite(MovieId::new(550)).unwrap();

    assert!(set.is_empty());
    assert!(!store.is_favorite(MovieId::new(550)));
    assert_eq!(store.storage().get(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn test_toggle_appends_in_order() {
    let store = Favorites::in_memory();
    for id in [27205, 155, 550] {
        store.toggle_favorite(MovieId::new(id)).unwrap();
    }
    assert_eq!(store.get_favorites().to_vec(), ids(&[27205, 155, 550]));

    store.toggle_favorite(MovieId::new(155)).unwrap();
    assert_eq!(store.get_favorites().to_vec(), ids(&[27205, 550]));
}

#[test]
fn test_save_replaces_record() {
    let store = seeded("[1,2,3]");
    let set: FavoritesSet = ids(&[9, 8]).into_iter().collect();
    store.save_favorites(&set).unwrap();

    assert_eq!(store.get_favorites(), set);
    assert_eq!(store.storage().get(FAVORITES_KEY).unwrap().as_deref(), Some("[9,8]"));
}

// =============================================================================
// Tolerant Reads
// =============================================================================

#[test]
fn test_corrupt_record_reads_as_empty() {
    assert!(seeded("not-json").get_favorites().is_empty());
    assert!(seeded("null").get_favorites().is_empty());
    assert!(seeded("{\"ids\": [1]}").get_favorites().is_empty());
    assert!(seeded("").get_favorites().is_empty());
}

#[test]
fn test_toggle_over_corrupt_record_starts_fresh() {
    let store = seeded("not-json");
    let set = store.toggle_favorite(MovieId::new(13)).unwrap();
    assert_eq!(set.to_vec(), ids(&[13]));
}

#[test]
fn test_numeric_strings_normalised() {
    let store = seeded(r#"["550","13"]"#);
    assert!(store.is_favorite(MovieId::new(550)));
    assert!(store.is_favorite(MovieId::new(13)));

    // Next write is canonical
    store.toggle_favorite(MovieId::new(7)).unwrap();
    assert_eq!(
        store.storage().get(FAVORITES_KEY).unwrap().as_deref(),
        Some("[550,13,7]")
    );
}

#[test]
fn test_invalid_elements_dropped() {
    let store = seeded(r#"[1, "x", null, -4, 2.5, "3", 1]"#);
    assert_eq!(store.get_favorites().to_vec(), ids(&[1, 3]));
}

// =============================================================================
// File Persistence
// =============================================================================

#[test]
fn test_file_store_persists_compact_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = Favorites::open(dir.path());
    store.toggle_favorite(MovieId::new(550)).unwrap();

    let raw = std::fs::read_to_string(dir.path().join("favorites.json")).unwrap();
    assert_eq!(raw, "[550]");
}

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = Favorites::open(dir.path());
        store.toggle_favorite(MovieId::new(27205)).unwrap();
        store.toggle_favorite(MovieId::new(155)).unwrap();
    }

    let reopened = Favorites::open(dir.path());
    assert_eq!(reopened.get_favorites().to_vec(), ids(&[27205, 155]));
}

#[test]
fn test_file_store_creates_data_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = Favorites::open(&nested);

    assert!(store.get_favorites().is_empty());
    store.toggle_favorite(MovieId::new(1)).unwrap();
    assert!(nested.join("favorites.json").exists());
}

#[test]
fn test_file_store_unwritable_dir_errors() {
    let dir = tempfile::tempdir().unwrap();
    // A file where the data directory should be
    let blocker = dir.path().join("data");
    std::fs::write(&blocker, "x").unwrap();

    let store = Favorites::new(FileStore::new(&blocker));
    assert!(store.toggle_favorite(MovieId::new(1)).is_err());
    assert!(store.get_favorites().is_empty());
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_toggles_lose_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn FavoritesStore> = Arc::new(Favorites::open(dir.path()));

    let handles: Vec<_> = (1..=16u64)
        .map(|id| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.toggle_favorite(MovieId::new(id)).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let set = store.get_favorites();
    assert_eq!(set.len(), 16);
    assert!((1..=16).all(|id| set.contains(MovieId::new(id))));
}

#[test]
fn test_independent_stores_on_one_dir_never_fail_writes() {
    // Stands in for several processes sharing a data dir: no shared lock
    let dir = tempfile::tempdir().unwrap();

    let handles: Vec<_> = (0..8u64)
        .map(|worker| {
            let dir = dir.path().to_path_buf();
            thread::spawn(move || {
                let store = Favorites::open(dir);
                (0..100u64)
                    .filter(|i| store.toggle_favorite(MovieId::new(worker * 1000 + i)).is_err())
                    .count()
            })
        })
        .collect();
    let failures: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(failures, 0);

    // Last write wins, but the record is always whole
    let raw = std::fs::read_to_string(dir.path().join("favorites.json")).unwrap();
    assert!(FavoritesSet::from_record(&raw).is_ok());
    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_toggle_twice_restores_membership(
        existing in proptest::collection::vec(1u64..500, 0..20),
        id in 1u64..500,
    ) {
        let store = Favorites::in_memory();
        let set: FavoritesSet = existing.iter().copied().map(MovieId::new).collect();
        store.save_favorites(&set).unwrap();
        let before = store.is_favorite(MovieId::new(id));

        let after_one = store.toggle_favorite(MovieId::new(id)).unwrap();
        prop_assert_eq!(after_one.contains(MovieId::new(id)), !before);

        store.toggle_favorite(MovieId::new(id)).unwrap();
        prop_assert_eq!(store.is_favorite(MovieId::new(id)), before);
        prop_assert_eq!(store.get_favorites().len(), set.len());
    }

    #[test]
    fn prop_membership_is_odd_toggle_count(
        toggles in proptest::collection::vec(0u64..12, 0..60),
    ) {
        let store = Favorites::in_memory();
        for &id in &toggles {
            store.toggle_favorite(MovieId::new(id)).unwrap();
        }

        let expected: std::collections::HashSet<u64> = (0..12)
            .filter(|id| toggles.iter().filter(|&&t| t == *id).count() % 2 == 1)
            .collect();
        let actual: std::collections::HashSet<u64> =
            store.get_favorites().iter().map(MovieId::get).collect();
        prop_assert_eq!(actual, expected);

        // Reads do not disturb anything
        prop_assert_eq!(store.get_favorites(), store.get_favorites());
    }

    #[test]
    fn prop_save_then_get_roundtrip(raw in proptest::collection::vec(0u64..10_000, 0..30)) {
        let store = Favorites::in_memory();
        let set: FavoritesSet = raw.into_iter().map(MovieId::new).collect();
        store.save_favorites(&set).unwrap();
        prop_assert_eq!(store.get_favorites(), set);
    }

    #[test]
    fn prop_record_roundtrip(raw in proptest::collection::vec(1u64..u64::MAX, 0..30)) {
        let set: FavoritesSet = raw.into_iter().map(MovieId::new).collect();
        let record = set.to_record().unwrap();
        prop_assert_eq!(FavoritesSet::from_record(&record).unwrap(), set);
    }
}
