//! Index subsystem for treeshelf
//!
//! Indexes are derived state: every entry can be recomputed from the
//! primary store, and the store rebuilds them rather than trusting a copy.
//!
//! # Design Principles
//!
//! - Derived state: indexes mirror the primary store, never the source of truth
//! - In-memory only
//! - Deterministic: BTreeMap iteration order, ties broken by id
//!
//! # Invariants
//!
//! - Secondary: exactly one `(value, id)` pair per stored id
//! - Compound: last insert wins per `(A, B)` tuple
//! - Open bounds use the `Min`/`Max` sentinels, which are never stored

mod compound;
mod errors;
mod key;
mod secondary;

pub use compound::CompoundIndex;
pub use errors::{IndexError, IndexErrorCode, IndexResult, Severity};
pub use key::{is_empty_range, CompositeKey, IndexKey, KeyBound};
pub use secondary::SecondaryIndex;
