//! # Error Taxonomy
//!
//! One error type shared by the ledger and both workflows so callers can map
//! outcomes onto whatever transport they use (HTTP status codes, RPC codes).
//!
//! Guard failures (`NotFound`, `InvalidState`, `InsufficientBalance`,
//! `Validation`, `Unauthorized`, `RateLimited`) are returned before any state
//! is written. `Persistence` is the only variant that can surface after an
//! in-memory mutation, and the mutating workflow is responsible for
//! compensating so the caller observes "operation failed, nothing changed".

use thiserror::Error;

/// Result alias used across the workspace.
pub type PlatformResult<T> = Result<T, PlatformError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    /// Unknown user, deposit request, voucher code or product.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A transition was attempted from a non-eligible state. Double
    /// invocation of a terminal transition lands here on purpose so
    /// duplicate-click and duplicate-retry bugs stay observable.
    #[error("{entity} {id} is {actual}, expected {expected}")]
    InvalidState {
        entity: &'static str,
        id: String,
        actual: &'static str,
        expected: &'static str,
    },

    /// Debit larger than the current balance.
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: u64, available: u64 },

    /// Malformed input: non-positive amounts, missing method fields,
    /// unknown or closed drop points, empty item lists.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The store rejected a whole-collection save.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// The caller's role does not permit the operation.
    #[error("caller is not allowed to {action}")]
    Unauthorized { action: &'static str },

    /// The fixed-window limiter rejected the request.
    #[error("rate limit exceeded, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },
}

impl PlatformError {
    /// Convenience constructor for lookups keyed by anything displayable.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
