//! Observable store events
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events in treeshelf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Store constructed with a validated config
    StoreCreated,
    /// Store and all indexes emptied
    StoreClear,
    /// All indexes re-derived from the primary store
    IndexRebuild,

    // Writes
    /// Entity inserted or overwritten
    StoreInsert,
    /// Insert aborted before any structure changed
    InsertRejected,

    // Reads
    /// Query executed
    QueryExecuted,
    /// Query named an attribute or compound index that does not exist
    QueryUnknownIndex,

    // Snapshots
    /// Primary store exported
    SnapshotExported,
    /// Store rebuilt from a snapshot
    SnapshotRestored,
    /// Snapshot rejected on checksum or decode
    SnapshotRejected,
}

impl Event {
    /// Returns the event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreCreated => "STORE_CREATED",
            Event::StoreClear => "STORE_CLEAR",
            Event::IndexRebuild => "INDEX_REBUILD",
            Event::StoreInsert => "STORE_INSERT",
            Event::InsertRejected => "INSERT_REJECTED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryUnknownIndex => "QUERY_UNKNOWN_INDEX",
            Event::SnapshotExported => "SNAPSHOT_EXPORTED",
            Event::SnapshotRestored => "SNAPSHOT_RESTORED",
            Event::SnapshotRejected => "SNAPSHOT_REJECTED",
        }
    }

    /// Events that signal a programmer error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::InsertRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake() {
        let events = [
            Event::StoreCreated,
            Event::StoreClear,
            Event::IndexRebuild,
            Event::StoreInsert,
            Event::InsertRejected,
            Event::QueryExecuted,
            Event::QueryUnknownIndex,
            Event::SnapshotExported,
            Event::SnapshotRestored,
            Event::SnapshotRejected,
        ];
        for event in events {
            assert!(event.as_str().chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_only_rejection_is_fatal() {
        assert!(Event::InsertRejected.is_fatal());
        assert!(!Event::StoreInsert.is_fatal());
        assert!(!Event::SnapshotRejected.is_fatal());
    }
}
