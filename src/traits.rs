use core::fmt::Debug;
use num_traits::{Float, Num, NumCast};

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
/// Covers `f32`, `f64`, and all integer types. `Send + Sync` lets the
/// element-wise kernels hand matrices to worker threads.
pub trait Scalar: Copy + PartialEq + PartialOrd + Debug + Num + NumCast + Send + Sync {}

impl<T> Scalar for T where T: Copy + PartialEq + PartialOrd + Debug + Num + NumCast + Send + Sync {}

/// Trait for floating-point matrix elements.
///
/// Required by everything that divides or needs `abs`/`powf`:
/// decompositions, determinants through LU, inversion, the linear and
/// nonlinear solvers, finite differences and interpolation.
pub trait FloatScalar: Scalar + Float + 'static {}

impl<T: Scalar + Float + 'static> FloatScalar for T {}
