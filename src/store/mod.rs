//! Store subsystem for treeshelf
//!
//! The primary store owns entity data. `IndexedStore` wraps it together with
//! every configured index behind one lock, so a reader never sees the primary
//! store and an index disagree.
//!
//! # API
//!
//! - `insert(id, entity)` - create or replace, updating every index
//! - `get(id)` / `size()` / `clear()`
//! - `rebuild_indexes()` - re-derive indexes from the primary store
//! - `export_snapshot()` / `restore(config, snapshot)`
//! - `query()` - query engine over a consistent view

mod config;
mod entity;
mod errors;
mod indexed;
mod primary;
mod snapshot;

pub use config::{CompoundDefinition, StoreConfig};
pub use entity::Entity;
pub use errors::{SnapshotError, SnapshotResult};
pub use indexed::{IndexStats, IndexedStore, StoreView};
pub use primary::PrimaryStore;
pub use snapshot::{StoreSnapshot, SNAPSHOT_FORMAT_VERSION};
