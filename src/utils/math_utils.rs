//! Small numeric conversion helpers
//!
//! The casts are collected here so that the clippy allowances stay in one place.

/// Convert a `usize` into a `f64`.
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}

/// Convert a `f64` into a `usize`.
///
/// Negative values saturate at zero, fractional parts are truncated.
#[must_use]
pub const fn f64_to_usize(value: f64) -> usize {
    #[allow(clippy::cast_possible_truncation)]
    #[allow(clippy::cast_sign_loss)]
    let newval = value as usize;
    newval
}

/// Convert an `i64` into a `f64`.
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let newval = value as f64;
    newval
}
