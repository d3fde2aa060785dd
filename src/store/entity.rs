//! Attribute projection for stored entities

use crate::index::{IndexError, IndexKey, IndexResult};

/// An immutable record whose attributes can be projected into index keys.
///
/// `attribute` returns `None` when the entity has no value for `name` or the
/// value has no key representation. The store treats that as a fatal
/// projection failure for any indexed attribute.
pub trait Entity: Clone {
    fn attribute(&self, name: &str) -> Option<IndexKey>;
}

/// JSON documents index their top-level scalar fields.
impl Entity for serde_json::Value {
    fn attribute(&self, name: &str) -> Option<IndexKey> {
        self.get(name).and_then(IndexKey::from_json)
    }
}

/// Project `name` from `entity`, rejecting missing values and sentinels.
pub(crate) fn project<E: Entity>(entity: &E, name: &str) -> IndexResult<IndexKey> {
    let key = entity
        .attribute(name)
        .ok_or_else(|| IndexError::projection_failed(name, "attribute missing or not indexable"))?;

    if key.is_sentinel() {
        return Err(IndexError::sentinel_value(name));
    }
    Ok(key)
}
