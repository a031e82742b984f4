//! # jb-deposits
//!
//! Deposit workflow: the state machine that turns oil drop-off claims into
//! awarded points.
//!
//! ```text
//!             ┌─────────┐  confirm   ┌───────────┐
//!  submit ──→ │ pending │ ─────────→ │ confirmed │  (awards points)
//!             └─────────┘            └───────────┘
//!                  │       reject    ┌───────────┐
//!                  └───────────────→ │ rejected  │  (no balance effect)
//!                                    └───────────┘
//! ```
//!
//! `confirmed` and `rejected` are terminal: re-confirming or re-rejecting
//! fails with an invalid-state error rather than silently no-opping, so
//! duplicate admin clicks and duplicate retries stay observable.

pub mod workflow;

pub use workflow::DepositWorkflow;
