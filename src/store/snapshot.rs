//! Primary-store snapshots
//!
//! A snapshot holds the primary store only: `(id, entity)` pairs in
//! insertion order, a creation timestamp, and a CRC32 of the serialized
//! entries.
//! Indexes are never persisted; restoring re-derives them from the entries.
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "store": "books",
//!   "created_at": "2026-02-04T11:30:00Z",
//!   "checksum": "crc32:deadbeef",
//!   "entries": [[1, { "title": "..." }]]
//! }
//! ```

use chrono::{DateTime, Utc};
use crc32fast::Hasher;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::errors::{SnapshotError, SnapshotResult};

/// Current snapshot format version
pub const SNAPSHOT_FORMAT_VERSION: u8 = 1;

/// Serialized image of a primary store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot<Id, E> {
    pub format_version: u8,
    /// Name of the store that produced the snapshot
    pub store: String,
    pub created_at: DateTime<Utc>,
    /// CRC32 of the JSON-encoded entries (format: "crc32:xxxxxxxx")
    pub checksum: String,
    /// Oldest insert first; restore replays them in this order
    pub entries: Vec<(Id, E)>,
}

impl<Id: Serialize, E: Serialize> StoreSnapshot<Id, E> {
    pub(crate) fn new(store: impl Into<String>, entries: Vec<(Id, E)>) -> SnapshotResult<Self> {
        let checksum = entries_checksum(&entries)?;
        Ok(Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            store: store.into(),
            created_at: Utc::now(),
            checksum,
            entries,
        })
    }

    /// Check the format version and recompute the checksum.
    pub fn verify(&self) -> SnapshotResult<()> {
        if self.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.format_version));
        }

        let actual = entries_checksum(&self.entries)?;
        if actual != self.checksum {
            return Err(SnapshotError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Serializes the snapshot to pretty-printed JSON.
    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Id: DeserializeOwned, E: DeserializeOwned> StoreSnapshot<Id, E> {
    /// Parse a snapshot. The checksum is not checked until `verify`.
    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn entries_checksum<Id: Serialize, E: Serialize>(entries: &[(Id, E)]) -> SnapshotResult<String> {
    let bytes = serde_json::to_vec(entries)?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(format!("crc32:{:08x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> StoreSnapshot<u64, serde_json::Value> {
        StoreSnapshot::new(
            "books",
            vec![
                (1, json!({"year": 2000, "price": 50.0})),
                (2, json!({"year": 2001, "price": 150.25})),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_new_snapshot_verifies() {
        let snapshot = sample();
        assert_eq!(snapshot.format_version, SNAPSHOT_FORMAT_VERSION);
        assert!(snapshot.checksum.starts_with("crc32:"));
        assert_eq!(snapshot.checksum.len(), "crc32:".len() + 8);
        assert!(snapshot.verify().is_ok());
    }

    #[test]
    fn test_json_round_trip_still_verifies() {
        let snapshot = sample();
        let parsed: StoreSnapshot<u64, serde_json::Value> =
            StoreSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(parsed, snapshot);
        assert!(parsed.verify().is_ok());
    }

    #[test]
    fn test_tampered_entries_detected() {
        let mut snapshot = sample();
        snapshot.entries[0].1 = json!({"year": 1999, "price": 50.0});
        assert!(matches!(
            snapshot.verify(),
            Err(SnapshotError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut snapshot = sample();
        snapshot.format_version = 9;
        assert!(matches!(snapshot.verify(), Err(SnapshotError::UnsupportedVersion(9))));
    }

    #[test]
    fn test_garbage_rejected() {
        let result: SnapshotResult<StoreSnapshot<u64, serde_json::Value>> =
            StoreSnapshot::from_json("{not json");
        assert!(matches!(result, Err(SnapshotError::Codec(_))));
    }
}
