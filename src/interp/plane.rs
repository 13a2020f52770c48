use log::warn;

use super::Interpolator;
use crate::error::{Error, Result};
use crate::matrix::{Axis, Layout, Matrix};
use crate::solver::{LinearSolver, LuSolver};
use crate::traits::FloatScalar;

/// Hyperplane through `d + 1` points in `d` dimensions.
///
/// With `A = [points | 1]` and `b = -values`, [`build`](Interpolator::build)
/// solves `A·c = b`; the value at `x` is then `-c_d - Σ x_j·c_j`.
#[derive(Debug, Clone)]
pub struct PlaneInterpolator<T: FloatScalar> {
    points: Matrix<T>,
    values: Matrix<T>,
    solver: Box<dyn LinearSolver<T>>,
    coefficients: Option<Matrix<T>>,
}

impl<T: FloatScalar> PlaneInterpolator<T> {
    /// `points` is `k x d` (one point per row), `values` is `k x 1`, and
    /// `k` must be `d + 1`. The system is solved with [`LuSolver`] unless
    /// replaced through [`with_solver`](Self::with_solver).
    pub fn new(points: Matrix<T>, values: Matrix<T>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::DegenerateMatrix("no interpolation points".into()));
        }
        if !values.is_column_vector() {
            return Err(Error::NonColumnVector {
                rows: values.rows(),
                cols: values.cols(),
            });
        }
        if values.rows() != points.rows() {
            return Err(Error::NonEqualRowsNum {
                expected: points.rows(),
                got: values.rows(),
            });
        }
        if points.rows() != points.cols() + 1 {
            return Err(Error::IncorrectMatrix(format!(
                "a plane in {} dimensions needs {} points, got {}",
                points.cols(),
                points.cols() + 1,
                points.rows()
            )));
        }
        Ok(Self {
            points,
            values,
            solver: Box::new(LuSolver::new()),
            coefficients: None,
        })
    }

    /// Replace the linear solver. Drops any built coefficients.
    pub fn with_solver(mut self, solver: Box<dyn LinearSolver<T>>) -> Self {
        self.solver = solver;
        self.coefficients = None;
        self
    }

    pub fn solver(&self) -> &dyn LinearSolver<T> {
        self.solver.as_ref()
    }

    /// Solved coefficients `c`, once built.
    pub fn coefficients(&self) -> Option<&Matrix<T>> {
        self.coefficients.as_ref()
    }
}

impl<T: FloatScalar> Interpolator<T> for PlaneInterpolator<T> {
    fn build(&mut self) -> Result<()> {
        let k = self.points.rows();
        let a = Matrix::concatenate(
            &[self.points.clone(), Matrix::filled(k, 1, T::one())],
            Axis::Column,
            Layout::RowMajor,
        )?;
        let b = -&self.values;
        let mut c = Matrix::zeros(k, 1);

        let report = self.solver.solve(&a, &b, &mut c)?;
        if !report.status.is_converged() {
            warn!(
                "plane interpolator: {} solve ended with {:?} (error {:?})",
                self.solver.method(),
                report.status,
                report.error
            );
        }
        self.coefficients = Some(c);
        Ok(())
    }

    fn interpolate(&self, point: &Matrix<T>) -> Result<T> {
        let c = self
            .coefficients
            .as_ref()
            .ok_or_else(|| Error::InvalidValue("interpolator is not built".into()))?;
        if !point.is_row_vector() {
            return Err(Error::NonRowVector {
                rows: point.rows(),
                cols: point.cols(),
            });
        }
        let d = self.dim();
        if point.cols() != d {
            return Err(Error::IncorrectMatrix(format!(
                "point has {} coordinates, interpolator has {d}",
                point.cols()
            )));
        }
        Ok((0..d).fold(-c[(d, 0)], |acc, j| acc - point[(0, j)] * c[(j, 0)]))
    }

    fn dim(&self) -> usize {
        self.points.cols()
    }
}
