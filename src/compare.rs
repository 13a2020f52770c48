//! Tolerant equality shared by matrix comparison, tests and convergence checks.

use num_traits::ToPrimitive;

use crate::settings::{ToleranceMode, DEFAULT_TOLERANCE};

/// Compare two numbers within [`DEFAULT_TOLERANCE`] (absolute).
///
/// Operands may be of different numeric types; both are widened to `f64`.
///
/// ```
/// use numkit::is_equal;
/// assert!(is_equal(1.0005_f64, 1));
/// assert!(!is_equal(1.01_f32, 1.0_f64));
/// ```
pub fn is_equal<A: ToPrimitive, B: ToPrimitive>(a: A, b: B) -> bool {
    is_equal_with(a, b, DEFAULT_TOLERANCE, ToleranceMode::Absolute)
}

/// Compare two numbers within `eps`.
///
/// In [`ToleranceMode::Relative`] the difference is divided by the larger
/// operand magnitude. Identical values (including two zeros and equal
/// infinities) always compare equal; NaN never does.
///
/// ```
/// use numkit::{is_equal_with, ToleranceMode};
/// assert!(is_equal_with(1000.0, 1001.0, 1e-2, ToleranceMode::Relative));
/// assert!(!is_equal_with(1000.0, 1001.0, 1e-2, ToleranceMode::Absolute));
/// assert!(is_equal_with(0, 0.0, 0.0, ToleranceMode::Relative));
/// ```
pub fn is_equal_with<A: ToPrimitive, B: ToPrimitive>(
    a: A,
    b: B,
    eps: f64,
    mode: ToleranceMode,
) -> bool {
    let (a, b) = match (a.to_f64(), b.to_f64()) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    if a == b {
        return true;
    }
    let diff = (a - b).abs();
    match mode {
        ToleranceMode::Absolute => diff <= eps,
        ToleranceMode::Relative => diff / a.abs().max(b.abs()) <= eps,
    }
}
