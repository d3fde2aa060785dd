//! Ordered primary store
//!
//! Source of truth for entity data: `BTreeMap<Id, E>` plus the insertion
//! sequence of each entry. Inserting an existing id replaces its entity and
//! moves it to the end of the insertion order.

use std::collections::BTreeMap;
use std::ops::Bound;

/// Ordered id -> entity map that remembers insertion order.
#[derive(Debug, Clone)]
pub struct PrimaryStore<Id, E> {
    /// Id -> (insertion sequence, entity)
    entities: BTreeMap<Id, (u64, E)>,
    /// Insertion sequence -> id, for live entries only
    order: BTreeMap<u64, Id>,
    next_sequence: u64,
}

impl<Id: Ord, E> Default for PrimaryStore<Id, E> {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
            order: BTreeMap::new(),
            next_sequence: 0,
        }
    }
}

impl<Id: Ord + Clone, E: Clone> PrimaryStore<Id, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence number the next `insert` will assign
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Create or replace the mapping for `id`. Returns the replaced entity.
    pub fn insert(&mut self, id: Id, entity: E) -> Option<E> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.order.insert(sequence, id.clone());
        let (old_sequence, old) = self.entities.insert(id, (sequence, entity))?;
        self.order.remove(&old_sequence);
        Some(old)
    }

    /// Entity stored under `id`, if any
    pub fn get(&self, id: &Id) -> Option<&E> {
        self.entities.get(id).map(|(_, entity)| entity)
    }

    /// Number of distinct ids
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.order.clear();
    }

    /// Entities with `lower <= id < upper`, in id order.
    ///
    /// `lower >= upper` yields an empty result.
    pub fn range_by_id(&self, lower: &Id, upper: &Id) -> Vec<&E> {
        if lower >= upper {
            return Vec::new();
        }
        self.entities
            .range::<Id, _>((Bound::Included(lower), Bound::Excluded(upper)))
            .map(|(_, (_, entity))| entity)
            .collect()
    }

    /// All `(id, entity)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&Id, &E)> {
        self.entities.iter().map(|(id, (_, entity))| (id, entity))
    }

    /// All `(id, entity)` pairs in the order they were last inserted
    pub fn iter_insertion_order(&self) -> impl Iterator<Item = (&Id, &E)> {
        self.order
            .values()
            .filter_map(move |id| self.entities.get_key_value(id).map(|(id, (_, entity))| (id, entity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_overwrite() {
        let mut store = PrimaryStore::new();
        assert_eq!(store.insert(1u64, "a"), None);
        assert_eq!(store.insert(2, "b"), None);
        assert_eq!(store.insert(1, "c"), Some("a"));

        assert_eq!(store.get(&1), Some(&"c"));
        assert_eq!(store.get(&3), None);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_range_by_id_half_open() {
        let mut store = PrimaryStore::new();
        for (id, name) in [("alice", 1), ("bob", 2), ("carol", 3), ("dave", 4)] {
            store.insert(id.to_string(), name);
        }

        let hits = store.range_by_id(&"b".to_string(), &"d".to_string());
        assert_eq!(hits, vec![&2, &3]);
        assert!(store.range_by_id(&"d".to_string(), &"b".to_string()).is_empty());
        assert!(store.range_by_id(&"b".to_string(), &"b".to_string()).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut store = PrimaryStore::new();
        store.insert(1u64, 10);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.get(&1), None);
    }

    #[test]
    fn test_iter_in_id_order() {
        let mut store = PrimaryStore::new();
        store.insert(3u64, 'c');
        store.insert(1, 'a');
        store.insert(2, 'b');
        let ids: Vec<_> = store.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_insertion_order_follows_last_write() {
        let mut store = PrimaryStore::new();
        store.insert(9u64, 'x');
        store.insert(1, 'y');
        store.insert(5, 'z');
        store.insert(9, 'w');

        let ids: Vec<_> = store.iter_insertion_order().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 5, 9]);
        assert_eq!(store.get(&9), Some(&'w'));
        assert_eq!(store.next_sequence(), 4);
    }

    #[test]
    fn test_clear_empties_insertion_order() {
        let mut store = PrimaryStore::new();
        store.insert(1u64, 'a');
        store.clear();
        store.insert(2, 'b');
        let ids: Vec<_> = store.iter_insertion_order().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2]);
    }
}
