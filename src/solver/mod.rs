//! Linear and nonlinear system solvers.
//!
//! # Linear systems `A·x = b`
//!
//! - [`BiCgStab`]: biconjugate gradient stabilized, iterative
//! - [`LuSolver`]: direct, forward/back substitution on the LU factors
//!
//! Both implement [`LinearSolver`], the contract consumed by the nonlinear
//! solvers and the interpolators. A solve returns a [`SolveReport`] whose
//! [`SolveStatus`] tells whether the iteration converged, ran out of
//! iterations, or looked divergent.
//!
//! # Nonlinear systems `F(x) = 0`
//!
//! - [`Secant`]: Newton iteration on a finite-difference Jacobian
//!
//! [`SecantSettings`] owns its inner linear solver as a
//! `Box<dyn LinearSolver<T>>`; cloning the settings clones the solver.

mod bicgstab;
mod lu_solver;
mod secant;

#[cfg(test)]
mod tests;

pub use bicgstab::BiCgStab;
pub use lu_solver::LuSolver;
pub use secant::{NonlinearReport, NonlinearSolver, Secant, SecantSettings};

use core::fmt;

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::settings::Settings;
use crate::traits::FloatScalar;

/// When an iterative solver stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StoppingCriterion {
    /// Stop once the error estimate drops to the target tolerance, or at
    /// the iteration cap.
    #[default]
    Tolerance,
    /// Run exactly the configured number of iterations.
    Iterations,
    /// Non-iterative solve.
    Direct,
}

/// Configuration for a [`LinearSolver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSolverSettings<T> {
    pub criterion: StoppingCriterion,
    /// Iteration cap (tolerance mode) or iteration count (iterations mode).
    pub max_iter: usize,
    /// Target for `max|b - A·x|`.
    pub tolerance: T,
}

impl Default for LinearSolverSettings<f64> {
    fn default() -> Self {
        Self {
            criterion: StoppingCriterion::Tolerance,
            max_iter: 100,
            tolerance: 1e-3,
        }
    }
}

impl Default for LinearSolverSettings<f32> {
    fn default() -> Self {
        Self {
            criterion: StoppingCriterion::Tolerance,
            max_iter: 100,
            tolerance: 1e-3,
        }
    }
}

impl<T: FloatScalar> LinearSolverSettings<T> {
    /// Tolerance-driven settings taking the target tolerance from `settings`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            criterion: StoppingCriterion::Tolerance,
            max_iter: 100,
            tolerance: T::from(settings.target_tolerance()).unwrap(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.criterion == StoppingCriterion::Tolerance
            && (!(self.tolerance > T::zero()) || !self.tolerance.is_finite())
        {
            return Err(Error::InvalidValue(format!(
                "tolerance must be a finite number greater than 0, got {:?}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Terminal state of a linear solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// Error estimate reached the target tolerance (or the solve was direct).
    Converged,
    /// Iteration cap reached; `x` holds the latest iterate.
    IterationCapReached,
    /// Iteration cap reached after the error kept growing for more than
    /// ten consecutive iterations.
    DivergenceSuspected,
    /// A zero inner product stopped the recurrence; `x` holds the latest iterate.
    Breakdown,
}

impl SolveStatus {
    pub fn is_converged(self) -> bool {
        self == SolveStatus::Converged
    }
}

/// Outcome of [`LinearSolver::solve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveReport<T> {
    pub status: SolveStatus,
    /// Completed iterations (0 when the initial guess already satisfied the tolerance).
    pub iterations: usize,
    /// Final `max|b - A·x|`.
    pub error: T,
}

/// Solver for `A·x = b` with square `A` and column vectors `b`, `x`.
///
/// `x` is both the initial guess (for iterative methods) and the output.
/// Implementations validate their arguments before writing to `x`.
pub trait LinearSolver<T: FloatScalar>: fmt::Debug + Send + Sync {
    fn solve(&self, a: &Matrix<T>, b: &Matrix<T>, x: &mut Matrix<T>) -> Result<SolveReport<T>>;

    /// Replace the configuration. Fails with [`Error::InvalidValue`] for a
    /// non-positive tolerance or a criterion the method cannot honour.
    fn setup_solver(&mut self, settings: LinearSolverSettings<T>) -> Result<()>;

    fn settings(&self) -> &LinearSolverSettings<T>;

    /// Short method name, e.g. `"BiCGStab"`.
    fn method(&self) -> &'static str;

    /// Independent copy behind a fresh box.
    fn box_clone(&self) -> Box<dyn LinearSolver<T>>;
}

impl<T: FloatScalar> Clone for Box<dyn LinearSolver<T>> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Shape checks shared by the linear solvers.
pub(crate) fn check_system<T>(a: &Matrix<T>, b: &Matrix<T>, x: &Matrix<T>) -> Result<()> {
    if !a.is_square() {
        return Err(Error::NonSquareMatrix {
            rows: a.rows(),
            cols: a.cols(),
        });
    }
    if a.is_empty() {
        return Err(Error::DegenerateMatrix("system matrix has zero size".into()));
    }
    for (name, v) in [("right-hand side", b), ("solution", x)] {
        if !v.is_column_vector() {
            return Err(Error::NonColumnVector {
                rows: v.rows(),
                cols: v.cols(),
            });
        }
        if v.rows() != a.rows() {
            return Err(Error::IncorrectMatrix(format!(
                "{name} has {} rows, system matrix has {}",
                v.rows(),
                a.rows()
            )));
        }
    }
    Ok(())
}

/// `max|b - A·x|`
pub(crate) fn residual_error<T: FloatScalar>(a: &Matrix<T>, b: &Matrix<T>, x: &Matrix<T>) -> Result<T> {
    Ok(b.try_sub(&a.try_mul(x)?)?.max_abs())
}
