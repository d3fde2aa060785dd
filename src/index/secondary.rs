//! Single-attribute secondary index
//!
//! Holds the ordered set of `(value, id)` pairs for one attribute as
//! `BTreeMap<IndexKey, BTreeSet<Id>>`: ordered by value, then by id.
//! A reverse map `id -> value` lets an overwrite remove the stale pair
//! before the new one is added, so every id appears exactly once.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use super::key::{is_empty_range, IndexKey, KeyBound};

/// Ordered `(value, id)` set for a single attribute.
#[derive(Debug, Clone)]
pub struct SecondaryIndex<Id> {
    /// Attribute name
    attribute: String,
    /// Value -> ids sharing that value, ascending
    entries: BTreeMap<IndexKey, BTreeSet<Id>>,
    /// Id -> currently indexed value
    projections: BTreeMap<Id, IndexKey>,
}

impl<Id: Ord + Clone> SecondaryIndex<Id> {
    /// Creates a new empty index for `attribute`
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            entries: BTreeMap::new(),
            projections: BTreeMap::new(),
        }
    }

    /// Get the attribute name.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Index `id` under `key`.
    ///
    /// If `id` was indexed under a different value, that pair is removed first.
    /// Returns the previous value for `id`, if any.
    pub fn on_insert(&mut self, id: Id, key: IndexKey) -> Option<IndexKey> {
        let previous = self.projections.insert(id.clone(), key.clone());

        if let Some(old) = &previous {
            if *old == key {
                return previous;
            }
            self.remove_pair(old, &id);
        }

        self.entries.entry(key).or_default().insert(id);
        previous
    }

    fn remove_pair(&mut self, key: &IndexKey, id: &Id) {
        if let Some(ids) = self.entries.get_mut(key) {
            ids.remove(id);
            if ids.is_empty() {
                self.entries.remove(key);
            }
        }
    }

    /// All ids whose value equals `key`, ascending by id.
    pub fn equals(&self, key: &IndexKey) -> Vec<Id> {
        self.entries
            .get(key)
            .map(|ids| ids.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// All ids whose value lies between `lower` and `upper`.
    ///
    /// Inclusivity is per bound. `Min`/`Max` express open ends.
    /// An inverted range yields an empty result.
    pub fn range(
        &self,
        lower: &IndexKey,
        lower_inclusive: bool,
        upper: &IndexKey,
        upper_inclusive: bool,
    ) -> Vec<Id> {
        let lower = KeyBound {
            key: lower.clone(),
            inclusive: lower_inclusive,
        };
        let upper = KeyBound {
            key: upper.clone(),
            inclusive: upper_inclusive,
        };
        self.scan(&lower, &upper)
    }

    /// Unbounded-above scan: equivalent to `range(lower, inclusive, Max, false)`.
    pub fn tail_from(&self, lower: &IndexKey, lower_inclusive: bool) -> Vec<Id> {
        self.range(lower, lower_inclusive, &IndexKey::Max, false)
    }

    pub(crate) fn scan(&self, lower: &KeyBound, upper: &KeyBound) -> Vec<Id> {
        if is_empty_range(lower, upper) {
            return Vec::new();
        }

        let bounds: (Bound<&IndexKey>, Bound<&IndexKey>) = (lower.as_bound(), upper.as_bound());
        self.entries
            .range::<IndexKey, _>(bounds)
            .flat_map(|(_, ids)| ids.iter().cloned())
            .collect()
    }

    /// Value currently indexed for `id`
    pub fn projection_of(&self, id: &Id) -> Option<&IndexKey> {
        self.projections.get(id)
    }

    /// Returns true if the pair `(key, id)` is present
    pub fn contains(&self, key: &IndexKey, id: &Id) -> bool {
        self.entries.get(key).is_some_and(|ids| ids.contains(id))
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
        self.projections.clear();
    }

    /// Returns the number of `(value, id)` pairs
    pub fn len(&self) -> usize {
        self.projections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projections.is_empty()
    }

    /// Returns the number of distinct values
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}
