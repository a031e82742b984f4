//! # Shared Types Crate
//!
//! This crate contains all domain entities, the shared error taxonomy and the
//! platform configuration used across the workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-crate types are defined here.
//! - **Invalid states unrepresentable**: deposit/redemption lifecycles and
//!   method-specific fields are tagged variants, not loose maps; balances are
//!   unsigned so a negative balance cannot be constructed.
//! - **Wire compatibility**: entities serialize to the same camelCase JSON
//!   shape the platform's flat-file collections already use.

pub mod clock;
pub mod config;
pub mod entities;
pub mod errors;
pub mod rate_limiter;

pub use clock::{now_millis, now_rfc3339, today, IdGenerator};
pub use config::PlatformConfig;
pub use entities::*;
pub use errors::{PlatformError, PlatformResult};
pub use rate_limiter::{FixedWindowLimiter, RateLimitConfig, RateLimitResult};
