//! Wall-clock helpers and id generation.
//!
//! History entries and deposit requests use their creation timestamp in unix
//! milliseconds as id and ordering key. Two mutations can land in the same
//! millisecond, so `IdGenerator` keeps ids strictly increasing instead of
//! trusting the clock alone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current unix time in milliseconds.
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Current UTC calendar date, `YYYY-MM-DD`.
#[must_use]
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Current UTC instant, RFC 3339 with millisecond precision.
#[must_use]
pub fn now_rfc3339() -> String {
    chrono::Utc::now()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Monotonic timestamp-shaped id source.
///
/// Ids are `max(now_millis, previous + 1)`: wall-clock when possible,
/// strictly increasing always.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id, unique for this generator instance.
    pub fn next_id(&self) -> u64 {
        loop {
            let last = self.last.load(Ordering::Relaxed);
            let candidate = now_millis().max(last + 1);
            if self
                .last
                .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                return candidate;
            }
        }
    }
}
