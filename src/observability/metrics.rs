//! Store metrics
//!
//! - Counters only, monotonic
//! - Passive: never consulted when answering a query
//! - Relaxed atomics; exactness across threads is not required

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters for one store
#[derive(Debug, Default)]
pub struct StoreMetrics {
    /// Successful inserts (including overwrites)
    inserts: AtomicU64,
    /// Inserts that replaced an existing id
    overwrites: AtomicU64,
    /// Inserts aborted by projection failure
    rejected_inserts: AtomicU64,
    /// Clear operations
    clears: AtomicU64,
    /// Index rebuilds
    rebuilds: AtomicU64,
    /// Queries executed
    queries: AtomicU64,
    /// Total rows returned by queries
    rows_returned: AtomicU64,
}

impl StoreMetrics {
    /// Create a new registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_insert(&self, overwrite: bool) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        if overwrite {
            self.overwrites.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_rejected_inserts(&self) {
        self.rejected_inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_clears(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rebuilds(&self) {
        self.rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one executed query and the number of rows it produced
    pub fn record_query(&self, rows: usize) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.rows_returned.fetch_add(rows as u64, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            overwrites: self.overwrites.load(Ordering::Relaxed),
            rejected_inserts: self.rejected_inserts.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            rebuilds: self.rebuilds.load(Ordering::Relaxed),
            queries: self.queries.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub inserts: u64,
    pub overwrites: u64,
    pub rejected_inserts: u64,
    pub clears: u64,
    pub rebuilds: u64,
    pub queries: u64,
    pub rows_returned: u64,
}

impl MetricsSnapshot {
    /// Render as a JSON object
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
