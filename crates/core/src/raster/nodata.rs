//! No-data comparison
//!
//! Depth samples are `f32` and the sentinel may come back from a weighted
//! sum or a file round trip slightly perturbed, so every comparison against
//! the sentinel goes through a fixed absolute tolerance.

/// Absolute tolerance for every float equality test against the sentinel
pub const NODATA_EPSILON: f64 = 1e-5;

/// Sentinel used when a source carries no explicit no-data value
pub const DEFAULT_NODATA: f32 = -9999.0;

/// Check whether `value` represents no-data for the given sentinel.
///
/// NaN is always treated as no-data.
#[inline]
pub fn is_nodata(value: f32, nodata: f32) -> bool {
    if value.is_nan() {
        return true;
    }
    ((value as f64) - (nodata as f64)).abs() < NODATA_EPSILON
}
