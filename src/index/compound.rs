//! Two-attribute compound range index
//!
//! Maps `(A, B) -> entity` ordered lexicographically, so "A = a AND B >= b"
//! is a single contiguous scan from `(a, b)` up to `(a, Max)`.
//!
//! A tuple serves one entity: the most recently inserted id among those
//! currently projecting to it. Every holder is kept under its insertion
//! sequence, so when the winner moves to another tuple the previous holder
//! is served again. Replaying the primary store in insertion order yields
//! the same index. Do not use this index to count matches.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::key::{CompositeKey, IndexKey};

/// Entity-valued index over an ordered pair of attributes.
#[derive(Debug, Clone)]
pub struct CompoundIndex<Id, E> {
    /// Index name
    name: String,
    /// First (equality) attribute
    first: String,
    /// Second (range) attribute
    second: String,
    /// Tuple -> insertion sequence -> (id, entity); the last sequence wins
    entries: BTreeMap<CompositeKey, BTreeMap<u64, (Id, E)>>,
    /// Id -> tuple and sequence it currently holds
    owners: BTreeMap<Id, (CompositeKey, u64)>,
}

impl<Id: Ord + Clone, E: Clone> CompoundIndex<Id, E> {
    pub fn new(name: impl Into<String>, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            first: first.into(),
            second: second.into(),
            entries: BTreeMap::new(),
            owners: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute names as `(first, second)`
    pub fn attributes(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }

    /// Record that `id` now projects to `key`.
    ///
    /// `sequence` must increase across calls; the highest sequence at a tuple
    /// is the entity served. The id's previous holding is dropped.
    pub fn on_insert(&mut self, id: Id, sequence: u64, key: CompositeKey, entity: E) {
        if let Some((old_key, old_sequence)) = self.owners.remove(&id) {
            if let Some(holders) = self.entries.get_mut(&old_key) {
                holders.remove(&old_sequence);
                if holders.is_empty() {
                    self.entries.remove(&old_key);
                }
            }
        }

        self.owners.insert(id.clone(), (key.clone(), sequence));
        self.entries
            .entry(key)
            .or_default()
            .insert(sequence, (id, entity));
    }

    /// Entities with `A == first` and `B` at or above `second_lower`.
    ///
    /// Results are ordered by `B`.
    pub fn query_equality_then_range(
        &self,
        first: &IndexKey,
        second_lower: &IndexKey,
        second_lower_inclusive: bool,
    ) -> Vec<E> {
        self.scan(first, second_lower, second_lower_inclusive)
            .map(|(_, entity)| entity.clone())
            .collect()
    }

    /// Same window as `query_equality_then_range`, returning owning ids.
    pub fn ids_equality_then_range(
        &self,
        first: &IndexKey,
        second_lower: &IndexKey,
        second_lower_inclusive: bool,
    ) -> Vec<Id> {
        self.scan(first, second_lower, second_lower_inclusive)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn scan<'a>(
        &'a self,
        first: &'a IndexKey,
        second_lower: &IndexKey,
        second_lower_inclusive: bool,
    ) -> impl Iterator<Item = &'a (Id, E)> + 'a {
        let start = CompositeKey::new(first.clone(), second_lower.clone());
        let end = CompositeKey::new(first.clone(), IndexKey::Max);

        let lower = if second_lower_inclusive {
            Bound::Included(start)
        } else {
            Bound::Excluded(start)
        };

        // Keys with a different first component are directly adjacent in the
        // ordering; stop as soon as one appears.
        self.entries
            .range((lower, Bound::Included(end)))
            .take_while(move |(key, _)| key.first == *first)
            .filter_map(|(_, holders)| holders.last_key_value().map(|(_, value)| value))
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.owners.clear();
    }

    /// Number of distinct tuples
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i64, price: f64) -> CompositeKey {
        CompositeKey::new(IndexKey::from_int(year), IndexKey::from_float(price))
    }

    fn populated() -> CompoundIndex<u64, &'static str> {
        let mut index = CompoundIndex::new("year_price", "year", "price");
        index.on_insert(1, 1, key(2000, 50.0), "cheap-2000");
        index.on_insert(2, 2, key(2000, 150.0), "pricey-2000");
        index.on_insert(3, 3, key(2001, 150.0), "pricey-2001");
        index.on_insert(4, 4, key(1999, 500.0), "pricey-1999");
        index
    }

    #[test]
    fn test_equality_then_range() {
        let index = populated();
        let result = index.query_equality_then_range(&IndexKey::from_int(2000), &IndexKey::from_float(100.0), true);
        assert_eq!(result, vec!["pricey-2000"]);
    }

    #[test]
    fn test_stops_at_next_first_component() {
        let index = populated();
        let result = index.query_equality_then_range(&IndexKey::from_int(2000), &IndexKey::Min, true);
        assert_eq!(result, vec!["cheap-2000", "pricey-2000"]);
        assert_eq!(
            index.ids_equality_then_range(&IndexKey::from_int(1999), &IndexKey::Min, true),
            vec![4]
        );
    }

    #[test]
    fn test_exclusive_lower_bound() {
        let index = populated();
        let inclusive = index.query_equality_then_range(&IndexKey::from_int(2000), &IndexKey::from_float(150.0), true);
        let exclusive = index.query_equality_then_range(&IndexKey::from_int(2000), &IndexKey::from_float(150.0), false);
        assert_eq!(inclusive, vec!["pricey-2000"]);
        assert!(exclusive.is_empty());
    }

    #[test]
    fn test_absent_first_value_is_empty() {
        let index = populated();
        assert!(index
            .query_equality_then_range(&IndexKey::from_int(1850), &IndexKey::Min, true)
            .is_empty());
    }

    #[test]
    fn test_tuple_collision_last_insert_wins() {
        let mut index = populated();
        index.on_insert(9, 10, key(2000, 150.0), "collider");

        let result = index.query_equality_then_range(&IndexKey::from_int(2000), &IndexKey::from_float(100.0), true);
        assert_eq!(result, vec!["collider"]);
        assert_eq!(index.len(), 4);

        // Id 2 moving elsewhere does not disturb the collider
        index.on_insert(2, 11, key(2000, 175.0), "moved-2000");
        let result = index.query_equality_then_range(&IndexKey::from_int(2000), &IndexKey::from_float(100.0), true);
        assert_eq!(result, vec!["collider", "moved-2000"]);
    }

    #[test]
    fn test_previous_holder_served_after_winner_moves() {
        let mut index = populated();
        index.on_insert(9, 10, key(2000, 150.0), "collider");
        index.on_insert(9, 11, key(2001, 10.0), "collider-moved");

        let ids = index.ids_equality_then_range(&IndexKey::from_int(2000), &IndexKey::Min, true);
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_winner_is_highest_sequence_not_highest_id() {
        let mut index = CompoundIndex::new("year_price", "year", "price");
        index.on_insert(9u64, 1, key(2000, 150.0), "first");
        index.on_insert(1, 2, key(2000, 150.0), "last");
        let result = index.query_equality_then_range(&IndexKey::from_int(2000), &IndexKey::Min, true);
        assert_eq!(result, vec!["last"]);
    }

    #[test]
    fn test_overwrite_drops_own_stale_tuple() {
        let mut index = populated();
        index.on_insert(1, 5, key(2001, 10.0), "moved");

        let in_2000 = index.query_equality_then_range(&IndexKey::from_int(2000), &IndexKey::Min, true);
        assert_eq!(in_2000, vec!["pricey-2000"]);
        let in_2001 = index.query_equality_then_range(&IndexKey::from_int(2001), &IndexKey::Min, true);
        assert_eq!(in_2001, vec!["moved", "pricey-2001"]);
    }

    #[test]
    fn test_clear() {
        let mut index = populated();
        index.clear();
        assert!(index.is_empty());
        assert!(index
            .query_equality_then_range(&IndexKey::from_int(2000), &IndexKey::Min, true)
            .is_empty());
    }
}
