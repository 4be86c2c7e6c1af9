//! Integration tests for concurrent metrics updates.
//!
//! The store is the only shared mutable state in the engine, so these
//! tests hammer it from multiple threads and check that every
//! interaction lands exactly once.

use std::sync::Arc;

use layover_core::metrics::{InMemoryMetricsStore, Interaction, MetricsStore};
use layover_core::storage::SqliteMetricsStore;

#[test]
fn test_two_concurrent_clicks_both_apply() {
    let store = Arc::new(InMemoryMetricsStore::new());

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || {
                store.record("ramen-row", Interaction::Click, None).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Two applications of the smoothing step, in either order:
    // 0 -> 0.5 -> 0.75. A lost update would leave 0.5.
    let record = store.get("ramen-row").unwrap().unwrap();
    assert_eq!(record.click_through, 0.75);
}

#[test]
fn test_two_concurrent_clicks_both_apply_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteMetricsStore::open(&dir.path().join("m.db")).unwrap());

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || {
                store.record("ramen-row", Interaction::Click, None).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let record = store.get("ramen-row").unwrap().unwrap();
    assert_eq!(record.click_through, 0.75);
    assert_eq!(store.event_count().unwrap(), 2);
}

#[test]
fn test_eight_concurrent_clicks_converge() {
    let store = Arc::new(InMemoryMetricsStore::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            std::thread::spawn(move || {
                store.record("gate-espresso", Interaction::Click, None).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Eight serialized smoothing steps toward 1.0: 1 - 2^-8.
    let record = store.get("gate-espresso").unwrap().unwrap();
    assert!((record.click_through - (1.0 - 0.00390625)).abs() < 1e-12);
}

#[test]
fn test_concurrent_slugs_do_not_cross_talk() {
    let store = Arc::new(InMemoryMetricsStore::new());

    let mut handles = Vec::new();
    for slug in ["noodle-paradise", "sweet-treats"] {
        for _ in 0..4 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                store.record(slug, Interaction::Click, None).unwrap();
                store.record(slug, Interaction::Conversion, Some(0.0)).unwrap();
            }));
        }
    }
    for handle in handles {
        handle.join().unwrap();
    }

    for slug in ["noodle-paradise", "sweet-treats"] {
        let record = store.get(slug).unwrap().unwrap();
        assert!((record.click_through - (1.0 - 0.0625)).abs() < 1e-12);
        assert_eq!(record.conversion, 0.0);
    }
}

#[test]
fn test_unknown_slug_reads_leave_no_trace() {
    let store = InMemoryMetricsStore::new();

    assert!(store.get("never-shown").unwrap().is_none());
    assert!(store.get("never-shown").unwrap().is_none());
    assert!(store.snapshot().unwrap().is_empty());
    assert_eq!(store.summary().unwrap().total_slugs, 0);
}

#[test]
fn test_stores_agree_on_smoothing() {
    let dir = tempfile::tempdir().unwrap();
    let memory = InMemoryMetricsStore::new();
    let sqlite = SqliteMetricsStore::open(&dir.path().join("m.db")).unwrap();

    let script = [
        (Interaction::View, None),
        (Interaction::Click, None),
        (Interaction::Click, Some(0.5)),
        (Interaction::Conversion, Some(0.8)),
        (Interaction::Satisfaction, Some(0.9)),
        (Interaction::TimeSpent, Some(12.0)),
    ];
    for (kind, value) in script {
        memory.record("hawker-hall", kind, value).unwrap();
        sqlite.record("hawker-hall", kind, value).unwrap();
    }

    let a = memory.get("hawker-hall").unwrap().unwrap();
    let b = sqlite.get("hawker-hall").unwrap().unwrap();
    assert_eq!(a.click_through, b.click_through);
    assert_eq!(a.conversion, b.conversion);
    assert_eq!(a.satisfaction, b.satisfaction);
    assert_eq!(a.time_spent, b.time_spent);
    assert_eq!(a.engagement_score(), b.engagement_score());
}

#[test]
fn test_reset_clears_both_backends() {
    let dir = tempfile::tempdir().unwrap();
    let memory = InMemoryMetricsStore::new();
    let sqlite = SqliteMetricsStore::open(&dir.path().join("m.db")).unwrap();

    for store in [&memory as &dyn MetricsStore, &sqlite] {
        store.record("ramen-row", Interaction::Click, None).unwrap();
        store.reset().unwrap();
        assert!(store.get("ramen-row").unwrap().is_none());
        assert!(store.snapshot().unwrap().is_empty());
    }
}
