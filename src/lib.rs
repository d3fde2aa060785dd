//! treeshelf - an in-memory, multi-attribute indexed entity store
//!
//! Entities live in a primary store keyed by id. Secondary indexes map one
//! attribute to ids; compound indexes map an attribute pair to entities.
//! All of them update together under a single writer lock.

pub mod index;
pub mod model;
pub mod observability;
pub mod query;
pub mod store;
