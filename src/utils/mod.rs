//! Shared validation helpers and limits.

pub mod validation;

/// Convert a count to f64 with explicit precision loss allowance
#[inline]
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}
