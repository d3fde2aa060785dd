//! Query subsystem for treeshelf
//!
//! - `Query` describes one predicate against one index
//! - `QueryEngine` runs it under a single read view and materializes entities
//!
//! Supported shapes:
//! - equality: `attribute = value`
//! - range: `lower <= attribute < upper` with per-bound inclusivity
//! - tail: `attribute >= lower`
//! - compound: `first = value AND second >= lower`

mod engine;
mod predicate;

pub use engine::QueryEngine;
pub use predicate::Query;
