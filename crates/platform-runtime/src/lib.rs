//! # Platform Runtime
//!
//! The composition root for the points platform.
//!
//! ## Structure
//!
//! - `service` - the operation set exposed to transport layers, with
//!   authorization and rate gating in front of the workflows
//! - `wiring` - constructs the store, repositories, ledger, workflows and
//!   notifier in dependency order
//! - `telemetry` - tracing subscriber setup for the binary
//!
//! ## Data flow
//!
//! ```text
//! caller intent → rate limiter → authorization → workflow → ledger
//!       → store save → change notification → lazy re-projection
//! ```
//!
//! Transport (HTTP handlers, sockets) and credential checking live outside
//! this workspace; callers arrive here already verified as a
//! [`service::Caller`] with a role.

pub mod service;
pub mod telemetry;
pub mod wiring;

pub use service::{Caller, PlatformService, PlatformStats};
pub use wiring::{open, open_in_memory, Platform};
