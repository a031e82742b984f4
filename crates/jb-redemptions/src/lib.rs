//! # jb-redemptions
//!
//! Redemption workflow: points are exchanged for goods against a voucher
//! code that the user presents at pickup.
//!
//! ```text
//!             ┌─────────┐  complete  ┌───────────┐
//!  create ──→ │ pending │ ─────────→ │ completed │  (no balance effect)
//!  (debits)   └─────────┘            └───────────┘
//!                  │       cancel    ┌───────────┐
//!                  └───────────────→ │ cancelled │  (refunds totalPoints)
//!                                    └───────────┘
//! ```
//!
//! Points are charged at creation, not at completion: the voucher code is
//! handed to the user immediately as proof of a finished exchange of points
//! for a reservation. Cancellation refunds the full charge with a
//! compensating earn entry. Terminal states are final.

pub mod code;
pub mod workflow;

pub use code::generate_code;
pub use workflow::RedemptionWorkflow;
