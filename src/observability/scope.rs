//! ObservationScope for bulk operations
//!
//! - Logs `{EVENT}_BEGIN` on creation
//! - Logs `{EVENT}_COMPLETE` with elapsed time when completed
//! - Logs `{EVENT}_INCOMPLETE` on drop if never completed

use std::cell::Cell;
use std::time::Instant;

use super::events::Event;
use super::logger::Logger;

/// A scope that logs begin/complete around a bulk operation
///
/// ```ignore
/// let scope = ObservationScope::new(Event::IndexRebuild);
/// // ... rebuild ...
/// scope.complete_with_fields(&[("entities", "42")]);
/// ```
pub struct ObservationScope {
    event: Event,
    timer: Timer,
    completed: Cell<bool>,
}

impl ObservationScope {
    /// Create a new observation scope; logs `{event}_BEGIN` at INFO
    pub fn new(event: Event) -> Self {
        Logger::info(&format!("{}_BEGIN", event.as_str()), &[]);
        Self {
            event,
            timer: Timer::new(),
            completed: Cell::new(false),
        }
    }

    /// Mark the scope as successfully completed
    pub fn complete(self) {
        self.complete_with_fields(&[]);
    }

    /// Mark the scope as completed with additional fields
    pub fn complete_with_fields(self, extra_fields: &[(&str, &str)]) {
        self.completed.set(true);
        let elapsed = self.timer.elapsed_us();
        let mut fields = vec![("elapsed_us", elapsed.as_str())];
        fields.extend(extra_fields.iter().copied());
        Logger::info(&format!("{}_COMPLETE", self.event.as_str()), &fields);
    }

    /// Mark the scope as failed; logs `{event}_FAILED` at ERROR
    pub fn fail(self, reason: &str) {
        self.completed.set(true);
        Logger::error(&format!("{}_FAILED", self.event.as_str()), &[("reason", reason)]);
    }

    /// Check if the scope has been completed
    pub fn is_completed(&self) -> bool {
        self.completed.get()
    }
}

impl Drop for ObservationScope {
    fn drop(&mut self) {
        if !self.completed.get() {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.event.as_str()),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed microseconds as a string
    pub fn elapsed_us(&self) -> String {
        self.start.elapsed().as_micros().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
