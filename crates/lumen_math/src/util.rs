//! Floating point helpers shared by the geometry and shading code.

/// Values with an absolute value below this are treated as zero.
pub const EPSILON: f64 = 1e-10;

/// Returns true if `x` is within [`EPSILON`] of zero.
#[inline]
pub fn is_zero(x: f64) -> bool {
    x.abs() < EPSILON
}

/// Snaps `x` to exactly `0.0` when it is within [`EPSILON`] of zero.
///
/// Every sign test against zero in the tracer goes through this, so that
/// floating point noise never flips a comparison.
#[inline]
pub fn align_zero(x: f64) -> f64 {
    if is_zero(x) {
        0.0
    } else {
        x
    }
}
