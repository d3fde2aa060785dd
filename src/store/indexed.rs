//! Indexed store: primary store plus every derived index, updated as one unit
//!
//! # Atomicity
//!
//! All structures live behind a single `RwLock`. An insert projects every
//! indexed attribute *before* taking the write lock; a projection failure
//! therefore returns with nothing modified. Once the lock is held, the
//! remaining steps cannot fail, so readers see either the whole insert or
//! none of it.
//!
//! Reads take the read lock for the full duration of a query, including the
//! id -> entity resolution, so every result reflects a single point in time.

use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use uuid::Uuid;

use crate::index::{CompositeKey, CompoundIndex, IndexKey, IndexResult, SecondaryIndex};
use crate::observability::{log_event, Event, Logger, ObservationScope, Severity, StoreMetrics};
use crate::query::QueryEngine;

use super::config::StoreConfig;
use super::entity::{project, Entity};
use super::errors::{SnapshotError, SnapshotResult};
use super::primary::PrimaryStore;
use super::snapshot::StoreSnapshot;

/// Everything guarded by the store lock
#[derive(Debug)]
pub(crate) struct StoreState<Id, E> {
    primary: PrimaryStore<Id, E>,
    /// One per `StoreConfig::secondary`, same order
    secondary: Vec<SecondaryIndex<Id>>,
    /// One per `StoreConfig::compound`, same order
    compound: Vec<CompoundIndex<Id, E>>,
}

/// Index keys for one entity, aligned with the config
struct Projection {
    secondary: Vec<IndexKey>,
    compound: Vec<CompositeKey>,
}

impl<Id: Ord + Clone, E: Entity> StoreState<Id, E> {
    fn empty(config: &StoreConfig) -> Self {
        Self {
            primary: PrimaryStore::new(),
            secondary: config
                .secondary
                .iter()
                .map(|attribute| SecondaryIndex::new(attribute.as_str()))
                .collect(),
            compound: config
                .compound
                .iter()
                .map(|def| CompoundIndex::new(&def.name, &def.first, &def.second))
                .collect(),
        }
    }

    /// Apply a fully projected insert. Returns true if `id` already existed.
    fn apply(&mut self, id: Id, entity: E, projection: Projection) -> bool {
        let sequence = self.primary.next_sequence();
        for (index, key) in self.secondary.iter_mut().zip(projection.secondary) {
            index.on_insert(id.clone(), key);
        }
        for (index, key) in self.compound.iter_mut().zip(projection.compound) {
            index.on_insert(id.clone(), sequence, key, entity.clone());
        }
        self.primary.insert(id, entity).is_some()
    }

    fn clear(&mut self) {
        self.primary.clear();
        self.secondary.iter_mut().for_each(SecondaryIndex::clear);
        self.compound.iter_mut().for_each(CompoundIndex::clear);
    }
}

/// Read-only view of the store, held for the duration of one query.
pub struct StoreView<'a, Id, E> {
    guard: RwLockReadGuard<'a, StoreState<Id, E>>,
}

impl<Id: Ord + Clone, E: Clone> StoreView<'_, Id, E> {
    pub fn get(&self, id: &Id) -> Option<&E> {
        self.guard.primary.get(id)
    }

    pub fn len(&self) -> usize {
        self.guard.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.primary.is_empty()
    }

    /// Secondary index on `attribute`, if configured
    pub fn secondary(&self, attribute: &str) -> Option<&SecondaryIndex<Id>> {
        self.guard.secondary.iter().find(|index| index.attribute() == attribute)
    }

    /// Compound index named `name`, if configured
    pub fn compound(&self, name: &str) -> Option<&CompoundIndex<Id, E>> {
        self.guard.compound.iter().find(|index| index.name() == name)
    }

    pub fn range_by_id(&self, lower: &Id, upper: &Id) -> Vec<&E> {
        self.guard.primary.range_by_id(lower, upper)
    }

    /// Resolve ids through the primary store, preserving order.
    pub fn resolve(&self, ids: &[Id]) -> Vec<E> {
        ids.iter().filter_map(|id| self.get(id).cloned()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Id, &E)> {
        self.guard.primary.iter()
    }
}

/// Entry counts per structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub entities: usize,
    /// `(attribute, pairs)` per secondary index
    pub secondary: Vec<(String, usize)>,
    /// `(name, tuples)` per compound index
    pub compound: Vec<(String, usize)>,
}

/// A primary store with always-consistent secondary and compound indexes.
pub struct IndexedStore<Id, E> {
    config: StoreConfig,
    state: RwLock<StoreState<Id, E>>,
    metrics: StoreMetrics,
}

impl<Id, E> IndexedStore<Id, E>
where
    Id: Ord + Clone + fmt::Debug,
    E: Entity,
{
    /// Create an empty store. Fails if `config` does not validate.
    pub fn new(config: StoreConfig) -> IndexResult<Self> {
        config.validate()?;

        let state = StoreState::empty(&config);
        Logger::info(
            Event::StoreCreated.as_str(),
            &[
                ("compound", &config.compound.len().to_string()),
                ("secondary", &config.secondary.len().to_string()),
                ("store", &config.name),
            ],
        );

        Ok(Self {
            config,
            state: RwLock::new(state),
            metrics: StoreMetrics::new(),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn metrics(&self) -> &StoreMetrics {
        &self.metrics
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState<Id, E>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    // Every mutation is computed before the guard is taken, so a poisoned
    // lock never hides a half-applied write.
    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState<Id, E>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn project(&self, entity: &E) -> IndexResult<Projection> {
        let secondary = self
            .config
            .secondary
            .iter()
            .map(|attribute| project(entity, attribute))
            .collect::<IndexResult<Vec<_>>>()?;

        let compound = self
            .config
            .compound
            .iter()
            .map(|def| {
                Ok(CompositeKey::new(
                    project(entity, &def.first)?,
                    project(entity, &def.second)?,
                ))
            })
            .collect::<IndexResult<Vec<_>>>()?;

        Ok(Projection { secondary, compound })
    }

    /// Insert or replace the entity stored under `id`, updating every index.
    ///
    /// A projection failure aborts the insert with no structure modified.
    pub fn insert(&self, id: Id, entity: E) -> IndexResult<()> {
        let projection = match self.project(&entity) {
            Ok(projection) => projection,
            Err(err) => {
                self.metrics.increment_rejected_inserts();
                log_event(
                    Event::InsertRejected,
                    Severity::Fatal,
                    &[
                        ("id", &format!("{:?}", id)),
                        ("reason", err.message()),
                        ("store", &self.config.name),
                    ],
                );
                return Err(err);
            }
        };

        let overwrite = {
            let mut state = self.write_state();
            state.apply(id.clone(), entity, projection)
        };

        self.metrics.record_insert(overwrite);
        if Logger::enabled(Severity::Trace) {
            Logger::trace(
                Event::StoreInsert.as_str(),
                &[
                    ("id", &format!("{:?}", id)),
                    ("overwrite", if overwrite { "true" } else { "false" }),
                    ("store", &self.config.name),
                ],
            );
        }
        Ok(())
    }

    /// Insert pairs in order, stopping at the first rejected entity.
    ///
    /// Each insert is atomic on its own; pairs applied before a failure stay.
    /// Returns the number of pairs applied.
    pub fn insert_all<I>(&self, pairs: I) -> IndexResult<usize>
    where
        I: IntoIterator<Item = (Id, E)>,
    {
        let mut applied = 0;
        for (id, entity) in pairs {
            self.insert(id, entity)?;
            applied += 1;
        }
        Ok(applied)
    }

    /// Entity stored under `id`, or `None`
    pub fn get(&self, id: &Id) -> Option<E> {
        self.read_state().primary.get(id).cloned()
    }

    /// Number of distinct ids stored
    pub fn size(&self) -> usize {
        self.read_state().primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Empty the primary store and every index in one step.
    pub fn clear(&self) {
        let removed = {
            let mut state = self.write_state();
            let removed = state.primary.len();
            state.clear();
            removed
        };

        self.metrics.increment_clears();
        Logger::info(
            Event::StoreClear.as_str(),
            &[("removed", &removed.to_string()), ("store", &self.config.name)],
        );
    }

    /// Re-derive every index from the primary store.
    ///
    /// Entities are replayed in insertion order, so compound tuples keep the
    /// same winner. New indexes are built aside and swapped in only if every
    /// entity projects cleanly.
    pub fn rebuild_indexes(&self) -> IndexResult<()> {
        let scope = ObservationScope::new(Event::IndexRebuild);
        let mut state = self.write_state();

        let mut rebuilt = StoreState::empty(&self.config);
        for (id, entity) in state.primary.iter_insertion_order() {
            let projection = match self.project(entity) {
                Ok(projection) => projection,
                Err(err) => {
                    scope.fail(err.message());
                    return Err(err);
                }
            };
            rebuilt.apply(id.clone(), entity.clone(), projection);
        }

        let entities = rebuilt.primary.len();
        *state = rebuilt;
        drop(state);

        self.metrics.increment_rebuilds();
        scope.complete_with_fields(&[("entities", &entities.to_string()), ("store", &self.config.name)]);
        Ok(())
    }

    /// Take a consistent read view. Writers block until it is dropped.
    pub fn read(&self) -> StoreView<'_, Id, E> {
        StoreView {
            guard: self.read_state(),
        }
    }

    /// Query engine bound to this store
    pub fn query(&self) -> QueryEngine<'_, Id, E> {
        QueryEngine::new(self)
    }

    /// Entry counts for the primary store and every index
    pub fn stats(&self) -> IndexStats {
        let state = self.read_state();
        IndexStats {
            entities: state.primary.len(),
            secondary: state
                .secondary
                .iter()
                .map(|index| (index.attribute().to_string(), index.len()))
                .collect(),
            compound: state
                .compound
                .iter()
                .map(|index| (index.name().to_string(), index.len()))
                .collect(),
        }
    }
}

impl<Id, E> IndexedStore<Id, E>
where
    Id: Ord + Clone + fmt::Debug + Serialize,
    E: Entity + Serialize,
{
    /// Serialize the primary store in insertion order. Indexes are not included.
    pub fn export_snapshot(&self) -> SnapshotResult<StoreSnapshot<Id, E>> {
        let entries: Vec<(Id, E)> = {
            let state = self.read_state();
            state
                .primary
                .iter_insertion_order()
                .map(|(id, entity)| (id.clone(), entity.clone()))
                .collect()
        };

        let snapshot = StoreSnapshot::new(&self.config.name, entries)?;
        Logger::info(
            Event::SnapshotExported.as_str(),
            &[
                ("checksum", &snapshot.checksum),
                ("entities", &snapshot.len().to_string()),
                ("store", &self.config.name),
            ],
        );
        Ok(snapshot)
    }

    /// Build a store from a verified snapshot, re-deriving every index.
    ///
    /// The snapshot must have been exported from a store named like `config`.
    pub fn restore(config: StoreConfig, snapshot: StoreSnapshot<Id, E>) -> SnapshotResult<Self> {
        let checked = if snapshot.store != config.name {
            Err(SnapshotError::StoreMismatch {
                expected: config.name.clone(),
                actual: snapshot.store.clone(),
            })
        } else {
            snapshot.verify()
        };
        if let Err(err) = checked {
            log_event(
                Event::SnapshotRejected,
                Severity::Error,
                &[("reason", &err.to_string()), ("store", &config.name)],
            );
            return Err(err);
        }

        let store = Self::new(config)?;
        let count = snapshot.len();
        store.insert_all(snapshot.entries)?;

        Logger::info(
            Event::SnapshotRestored.as_str(),
            &[("entities", &count.to_string()), ("store", &store.config.name)],
        );
        Ok(store)
    }
}

impl<E: Entity> IndexedStore<String, E> {
    /// Store `entity` under a fresh random UUID and return the id.
    pub fn insert_generated(&self, entity: E) -> IndexResult<String> {
        let id = Uuid::new_v4().to_string();
        self.insert(id.clone(), entity)?;
        Ok(id)
    }
}

impl<Id, E> fmt::Debug for IndexedStore<Id, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
