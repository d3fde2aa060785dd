//! Concurrent Read Tests
//!
//! Tests for single-writer / multi-reader behavior:
//! - Readers never observe an insert applied to some structures but not others
//! - A read view is a stable point-in-time snapshot
//! - Clear empties every structure in one step

use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};
use treeshelf::store::{IndexedStore, StoreConfig};

// =============================================================================
// Helper Functions
// =============================================================================

fn shared_store() -> Arc<IndexedStore<u64, Value>> {
    let config = StoreConfig::new("events")
        .with_secondary("generation")
        .with_compound("generation_seq", "generation", "seq");
    Arc::new(IndexedStore::new(config).unwrap())
}

fn event(generation: i64, seq: i64) -> Value {
    json!({"generation": generation, "seq": seq})
}

// =============================================================================
// Torn Write Tests
// =============================================================================

/// Each insert moves an id from one generation to the next. A reader that
/// sees a different total across a single view has seen a torn write.
#[test]
fn test_readers_never_see_torn_writes() {
    const IDS: u64 = 32;
    const GENERATIONS: i64 = 20;

    let store = shared_store();
    for id in 0..IDS {
        store.insert(id, event(0, id as i64)).unwrap();
    }

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for generation in 1..=GENERATIONS {
                for id in 0..IDS {
                    store.insert(id, event(generation, id as i64)).unwrap();
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..200 {
                    let view = store.read();
                    let index = view.secondary("generation").unwrap();
                    assert_eq!(view.len(), IDS as usize);
                    assert_eq!(index.len(), IDS as usize);

                    let total: usize = (0..=GENERATIONS)
                        .map(|generation| index.equals(&generation.into()).len())
                        .sum();
                    assert_eq!(total, IDS as usize);

                    for (id, entity) in view.iter() {
                        let generation = entity["generation"].as_i64().unwrap();
                        assert!(index.contains(&generation.into(), id));
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(store.query().equals("generation", GENERATIONS).len(), IDS as usize);
}

/// A view taken before a write keeps seeing the old state until dropped.
#[test]
fn test_view_is_point_in_time() {
    let store = shared_store();
    store.insert(1, event(0, 1)).unwrap();

    let view = store.read();
    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || store.insert(2, event(0, 2)).unwrap())
    };

    // The writer blocks on the view's read lock.
    assert_eq!(view.len(), 1);
    assert_eq!(view.secondary("generation").unwrap().len(), 1);
    drop(view);

    writer.join().unwrap();
    assert_eq!(store.size(), 2);
}

/// Bulk inserts and clears interleave with readers; every view still has
/// the primary store and both indexes at the same size.
#[test]
fn test_clear_is_all_or_nothing() {
    const IDS: u64 = 64;
    let store = shared_store();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..25 {
                store.insert_all((0..IDS).map(|id| (id, event(1, id as i64)))).unwrap();
                store.clear();
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..200 {
                    let view = store.read();
                    let size = view.len();
                    let compound = view.compound("generation_seq").unwrap();
                    assert_eq!(compound.len(), size);
                    assert_eq!(view.secondary("generation").unwrap().len(), size);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.size(), 0);
}
