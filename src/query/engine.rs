//! Query engine
//!
//! Dispatches each query to the index it names, scans it under one read
//! view, and materializes entities in index order. Secondary-index results
//! are resolved through the primary store; compound results are stored
//! entities already.
//!
//! A query against an unknown index or an absent value returns an empty
//! collection, never an error.

use std::fmt;

use crate::index::IndexKey;
use crate::observability::{log_event, Event, Logger, Severity, Timer};
use crate::store::{Entity, IndexedStore, StoreView};

use super::predicate::Query;

/// Query engine bound to one store
pub struct QueryEngine<'a, Id, E> {
    store: &'a IndexedStore<Id, E>,
}

impl<'a, Id, E> QueryEngine<'a, Id, E>
where
    Id: Ord + Clone + fmt::Debug,
    E: Entity,
{
    pub fn new(store: &'a IndexedStore<Id, E>) -> Self {
        Self { store }
    }

    /// Run `query` and return matching entities in index order.
    pub fn execute(&self, query: &Query) -> Vec<E> {
        let timer = Timer::new();
        let view = self.store.read();

        let rows = match query {
            Query::Compound {
                index,
                first,
                second_lower,
            } => match view.compound(index) {
                Some(compound) => {
                    compound.query_equality_then_range(first, &second_lower.key, second_lower.inclusive)
                }
                None => self.unknown(query),
            },
            _ => match self.scan_ids(&view, query) {
                Some(ids) => view.resolve(&ids),
                None => self.unknown(query),
            },
        };
        drop(view);

        self.record(query, rows.len(), &timer);
        rows
    }

    /// Run `query` and return matching ids in index order.
    pub fn execute_ids(&self, query: &Query) -> Vec<Id> {
        let timer = Timer::new();
        let view = self.store.read();

        let ids = match query {
            Query::Compound {
                index,
                first,
                second_lower,
            } => view
                .compound(index)
                .map(|compound| {
                    compound.ids_equality_then_range(first, &second_lower.key, second_lower.inclusive)
                }),
            _ => self.scan_ids(&view, query),
        };
        drop(view);

        let ids = ids.unwrap_or_else(|| self.unknown(query));
        self.record(query, ids.len(), &timer);
        ids
    }

    /// `None` when the query's attribute has no secondary index
    fn scan_ids(&self, view: &StoreView<'_, Id, E>, query: &Query) -> Option<Vec<Id>> {
        let index = view.secondary(query.target())?;
        let ids = match query {
            Query::Equals { value, .. } => index.equals(value),
            Query::Range { lower, upper, .. } => {
                index.range(&lower.key, lower.inclusive, &upper.key, upper.inclusive)
            }
            Query::TailFrom { lower, .. } => index.tail_from(&lower.key, lower.inclusive),
            Query::Compound { .. } => return None,
        };
        Some(ids)
    }

    fn unknown<T>(&self, query: &Query) -> Vec<T> {
        log_event(
            Event::QueryUnknownIndex,
            Severity::Warn,
            &[
                ("kind", query.kind()),
                ("store", self.store.name()),
                ("target", query.target()),
            ],
        );
        Vec::new()
    }

    fn record(&self, query: &Query, rows: usize, timer: &Timer) {
        self.store.metrics().record_query(rows);
        if Logger::enabled(Severity::Trace) {
            Logger::trace(
                Event::QueryExecuted.as_str(),
                &[
                    ("elapsed_us", &timer.elapsed_us()),
                    ("query", &query.to_string()),
                    ("rows", &rows.to_string()),
                    ("store", self.store.name()),
                ],
            );
        }
    }

    /// `attribute = value`
    pub fn equals(&self, attribute: &str, value: impl Into<IndexKey>) -> Vec<E> {
        self.execute(&Query::equals(attribute, value))
    }

    /// Range with per-bound inclusivity: `range("year", 2000, true, 3000, false)` is `[2000, 3000)`.
    pub fn range(
        &self,
        attribute: &str,
        lower: impl Into<IndexKey>,
        lower_inclusive: bool,
        upper: impl Into<IndexKey>,
        upper_inclusive: bool,
    ) -> Vec<E> {
        self.execute(&Query::between(attribute, lower, lower_inclusive, upper, upper_inclusive))
    }

    /// `attribute >= lower` (or `>` when not inclusive)
    pub fn tail_from(&self, attribute: &str, lower: impl Into<IndexKey>, inclusive: bool) -> Vec<E> {
        self.execute(&Query::tail_from(attribute, lower, inclusive))
    }

    /// `first = value AND second >= lower` over compound index `index`
    pub fn compound(
        &self,
        index: &str,
        first: impl Into<IndexKey>,
        second_lower: impl Into<IndexKey>,
        inclusive: bool,
    ) -> Vec<E> {
        self.execute(&Query::compound(index, first, second_lower, inclusive))
    }

    /// Entities with `lower <= id < upper`, in id order.
    pub fn range_by_id(&self, lower: &Id, upper: &Id) -> Vec<E> {
        let timer = Timer::new();
        let rows: Vec<E> = self
            .store
            .read()
            .range_by_id(lower, upper)
            .into_iter()
            .cloned()
            .collect();

        self.store.metrics().record_query(rows.len());
        if Logger::enabled(Severity::Trace) {
            Logger::trace(
                Event::QueryExecuted.as_str(),
                &[
                    ("elapsed_us", &timer.elapsed_us()),
                    ("query", &format!("{:?} <= id < {:?}", lower, upper)),
                    ("rows", &rows.len().to_string()),
                    ("store", self.store.name()),
                ],
            );
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use serde_json::{json, Value};

    fn store() -> IndexedStore<u64, Value> {
        let config = StoreConfig::new("books")
            .with_secondary("year")
            .with_secondary("price")
            .with_compound("year_price", "year", "price");
        let store = IndexedStore::new(config).unwrap();
        let rows = [
            (1, 1999, 20.0),
            (2, 2000, 50.0),
            (3, 2000, 150.0),
            (4, 2001, 150.0),
            (5, 3000, 75.0),
        ];
        for (id, year, price) in rows {
            store.insert(id, json!({"id": id, "year": year, "price": price})).unwrap();
        }
        store
    }

    fn ids(rows: &[Value]) -> Vec<u64> {
        rows.iter().map(|row| row["id"].as_u64().unwrap()).collect()
    }

    #[test]
    fn test_equals_resolves_entities() {
        let store = store();
        let engine = store.query();
        assert_eq!(ids(&engine.equals("year", 2000)), vec![2, 3]);
        assert!(engine.equals("year", 1850).is_empty());
    }

    #[test]
    fn test_range_and_tail() {
        let store = store();
        let engine = store.query();
        assert_eq!(ids(&engine.range("year", 2000, true, 3000, false)), vec![2, 3, 4]);
        assert_eq!(ids(&engine.tail_from("price", 100.0, true)), vec![3, 4]);
        assert!(engine.range("year", 3000, true, 2000, true).is_empty());
    }

    #[test]
    fn test_compound() {
        let store = store();
        let rows = store.query().compound("year_price", 2000, 100.0, true);
        assert_eq!(ids(&rows), vec![3]);

        let ids = store.query().execute_ids(&Query::compound("year_price", 2000, 0.0, true));
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_unknown_targets_are_empty() {
        let store = store();
        let engine = store.query();
        assert!(engine.equals("author", "Le Guin").is_empty());
        assert!(engine.compound("author_year", 2000, 0.0, true).is_empty());
        assert!(engine.execute_ids(&Query::equals("isbn", "x")).is_empty());
    }

    #[test]
    fn test_range_by_id() {
        let store = store();
        assert_eq!(ids(&store.query().range_by_id(&2, &4)), vec![2, 3]);
        assert!(store.query().range_by_id(&4, &2).is_empty());
    }

    #[test]
    fn test_queries_are_counted() {
        let store = store();
        let engine = store.query();
        engine.equals("year", 2000);
        engine.tail_from("year", 2001, true);
        let snapshot = store.metrics().snapshot();
        assert_eq!(snapshot.queries, 2);
        assert_eq!(snapshot.rows_returned, 4);
    }
}
