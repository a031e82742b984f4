//! Cross-crate integration scenarios.

pub mod concurrency;
pub mod deposit_flows;
pub mod ledger_properties;
pub mod persistence;
