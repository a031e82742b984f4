//! Voucher code generation.

use rand::Rng;

/// A human-shareable voucher code: prefix, dash, fixed number of digits
/// (`JB-042117`). Uniqueness is the caller's concern; on collision a new
/// code is drawn.
#[must_use]
pub fn generate_code(prefix: &str, digits: u32) -> String {
    let bound = 10u64.pow(digits);
    let n = rand::thread_rng().gen_range(0..bound);
    format!("{prefix}-{n:0width$}", width = digits as usize)
}
