//! Time source for record timestamps.
//!
//! Timestamps are truncated to whole milliseconds, the precision of the
//! persisted format, so a record returned from a mutation compares equal to
//! the same record read back from storage.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

/// Source of the current instant for `createdAt` / `updatedAt`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        truncate_millis(Utc::now())
    }
}

/// Drop sub-millisecond precision from `ts`.
pub fn truncate_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(ts)
}
