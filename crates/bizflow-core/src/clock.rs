//! Clock abstraction for event timestamps.

use chrono::{DateTime, Utc};

/// Source of "now" for event and result timestamps.
///
/// Timestamps are always assigned by the bus and the engines, never by the
/// publisher, so tests inject a fixed clock here.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
