//! Scattered-point interpolation on top of the linear solvers.
//!
//! An interpolator assembles a linear system from its sample points once,
//! in [`Interpolator::build`], and afterwards evaluates a closed form in
//! the solved coefficients.
//!
//! ```
//! use numkit::interp::{Interpolator, PlaneInterpolator};
//! use numkit::Matrix;
//!
//! // v = 1 + 2x + 3y through three points.
//! let points = Matrix::<f64>::from_rows(&[[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]).unwrap();
//! let values = Matrix::column_vector(vec![3.0, 4.0, 1.0]);
//! let mut plane = PlaneInterpolator::new(points, values).unwrap();
//! plane.build().unwrap();
//!
//! let v = plane.interpolate(&Matrix::row_vector(vec![0.5, 0.5])).unwrap();
//! assert!((v - 3.5).abs() < 1e-12);
//! ```

mod plane;


pub use plane::PlaneInterpolator;

use crate::error::Result;
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// Build-then-evaluate contract shared by interpolators.
pub trait Interpolator<T: FloatScalar> {
    /// Solve for the coefficients. Must be called before [`interpolate`](Self::interpolate).
    fn build(&mut self) -> Result<()>;

    /// Value at `point`, a `1 x dim()` row vector.
    fn interpolate(&self, point: &Matrix<T>) -> Result<T>;

    /// Number of coordinates per point.
    fn dim(&self) -> usize;
}
