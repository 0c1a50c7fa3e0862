//! Clock abstraction for deterministic timestamps.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Every audit and soft-delete timestamp in the system flows through an
/// injected clock so tests can pin time to a fixed instant.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
