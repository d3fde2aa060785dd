//! Observability subsystem for treeshelf
//!
//! Provides:
//! - Structured logging (JSON lines)
//! - Passive store metrics
//! - Begin/complete scopes for bulk operations
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on query results
//! 3. No background threads
//! 4. Deterministic output

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsSnapshot, StoreMetrics};
pub use scope::{ObservationScope, Timer};

/// Log a store event with fields
///
/// Fatal events are always logged at FATAL. ERROR and above go to stderr.
pub fn log_event(event: Event, severity: Severity, fields: &[(&str, &str)]) {
    let severity = if event.is_fatal() { Severity::Fatal } else { severity };
    if severity >= Severity::Error {
        Logger::log_stderr(severity, event.as_str(), fields);
    } else {
        Logger::log(severity, event.as_str(), fields);
    }
}
