//! # jb-ledger
//!
//! Ledger engine for the points platform.
//!
//! ## Role in System
//!
//! - **Sole mutator** of `points` and `pointHistory`: the deposit and
//!   redemption workflows request balance changes through this engine and
//!   never write wallets directly.
//! - Enforces the non-negative balance invariant: a debit larger than the
//!   current balance fails and changes nothing.
//! - Keeps balance and history in agreement: every successful mutation
//!   appends exactly one entry whose amount equals the balance delta, in the
//!   same committed save.
//! - Publishes a `UsersChanged` invalidation signal after every successful
//!   mutation.

pub mod engine;

pub use engine::LedgerEngine;
