//! # Rate Limiter
//!
//! Fixed-window request counter keyed by an `action:identity` string.
//!
//! ## Algorithm
//!
//! - A window is created lazily on the first check for a key and reset once
//!   the current time passes its reset point.
//! - Every check increments the counter before evaluating the limit, so the
//!   request that trips the limit is itself counted.
//!
//! This is abuse mitigation for sensitive operations (login, registration,
//! deposit confirmation), not a correctness mechanism: the ledger stays
//! consistent without it.

use crate::clock::now_millis;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Window length and request budget for one action class.
#[derive(Clone, Copy, Debug)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

/// Outcome of a single check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Requests left in the current window after this one.
    pub remaining: u32,
    /// Unix milliseconds at which the window resets.
    pub reset_at_ms: u64,
}

impl RateLimitResult {
    /// Milliseconds until the window resets, measured from now.
    #[must_use]
    pub fn retry_after_ms(&self) -> u64 {
        self.reset_at_ms.saturating_sub(now_millis())
    }
}

#[derive(Clone, Copy, Debug)]
struct Window {
    count: u32,
    reset_at_ms: u64,
}

/// Fixed-window counter over an in-memory key map.
#[derive(Debug, Default)]
pub struct FixedWindowLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a request against `key` and report whether it is admitted.
    pub fn check(&self, key: &str, config: RateLimitConfig) -> RateLimitResult {
        let now = now_millis();
        let mut windows = self.windows.lock();

        let window = windows.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at_ms: now + config.window.as_millis() as u64,
        });
        if window.reset_at_ms < now {
            window.count = 0;
            window.reset_at_ms = now + config.window.as_millis() as u64;
        }

        window.count += 1;
        RateLimitResult {
            allowed: window.count <= config.max_requests,
            remaining: config.max_requests.saturating_sub(window.count),
            reset_at_ms: window.reset_at_ms,
        }
    }

    /// Drop the window for `key`, forgiving its counted requests.
    pub fn reset(&self, key: &str) {
        self.windows.lock().remove(key);
    }

    /// Remove expired windows to bound memory. Returns how many were swept.
    pub fn sweep(&self) -> usize {
        let now = now_millis();
        let mut windows = self.windows.lock();
        let before = windows.len();
        windows.retain(|_, w| w.reset_at_ms >= now);
        let swept = before - windows.len();
        if swept > 0 {
            debug!(swept, tracked = windows.len(), "Swept expired rate limit windows");
        }
        swept
    }

    /// Number of live windows.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.windows.lock().len()
    }
}

/// Request budgets for the platform's sensitive operations.
pub mod presets {
    use super::RateLimitConfig;
    use std::time::Duration;

    /// Login: 5 attempts per 15 minutes.
    pub const LOGIN: RateLimitConfig = RateLimitConfig {
        window: Duration::from_secs(15 * 60),
        max_requests: 5,
    };

    /// Registration: 3 attempts per hour.
    pub const REGISTER: RateLimitConfig = RateLimitConfig {
        window: Duration::from_secs(60 * 60),
        max_requests: 3,
    };

    /// General API traffic: 100 requests per minute.
    pub const API_GENERAL: RateLimitConfig = RateLimitConfig {
        window: Duration::from_secs(60),
        max_requests: 100,
    };

    /// Sensitive endpoints: 30 requests per minute.
    pub const API_STRICT: RateLimitConfig = RateLimitConfig {
        window: Duration::from_secs(60),
        max_requests: 30,
    };

    /// Password reset: 3 attempts per hour.
    pub const PASSWORD_RESET: RateLimitConfig = RateLimitConfig {
        window: Duration::from_secs(60 * 60),
        max_requests: 3,
    };
}
