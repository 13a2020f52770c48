use log::debug;

use super::{
    check_system, residual_error, LinearSolver, LinearSolverSettings, SolveReport, SolveStatus,
    StoppingCriterion,
};
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// Direct solver: Doolittle factors, then forward and back substitution.
///
/// No pivoting, so a zero leading minor fails with
/// [`Error::DegenerateMatrix`] even when `A` is invertible. The report's
/// error is the residual `max|b - A·x|` of the computed solution.
///
/// ```
/// use numkit::solver::{LinearSolver, LuSolver};
/// use numkit::Matrix;
///
/// let a = Matrix::<f64>::from_rows(&[[2.0, 1.0], [1.0, 3.0]]).unwrap();
/// let b = Matrix::column_vector(vec![3.0, 5.0]);
/// let mut x = Matrix::column_vector(vec![0.0, 0.0]);
/// LuSolver::new().solve(&a, &b, &mut x).unwrap();
/// assert!((x[(0, 0)] - 0.8).abs() < 1e-12);
/// assert!((x[(1, 0)] - 1.4).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LuSolver<T> {
    settings: LinearSolverSettings<T>,
}

impl<T: FloatScalar> LuSolver<T> {
    pub fn new() -> Self {
        Self {
            settings: LinearSolverSettings {
                criterion: StoppingCriterion::Direct,
                max_iter: 0,
                tolerance: T::zero(),
            },
        }
    }
}

impl<T: FloatScalar> Default for LuSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatScalar> LinearSolver<T> for LuSolver<T> {
    fn solve(&self, a: &Matrix<T>, b: &Matrix<T>, x: &mut Matrix<T>) -> Result<SolveReport<T>> {
        check_system(a, b, x)?;
        let (l, u) = a.decompose_lu()?;
        let n = a.rows();

        if let Some(i) = (0..n).find(|&i| u[(i, i)].abs() <= T::epsilon()) {
            return Err(Error::DegenerateMatrix(format!(
                "zero pivot at ({i}, {i}), system is singular"
            )));
        }

        // L·y = b
        let mut y = vec![T::zero(); n];
        for i in 0..n {
            y[i] = (0..i).fold(b[(i, 0)], |acc, k| acc - l[(i, k)] * y[k]);
        }
        // U·x = y
        let mut sol = vec![T::zero(); n];
        for i in (0..n).rev() {
            let s = (i + 1..n).fold(y[i], |acc, k| acc - u[(i, k)] * sol[k]);
            sol[i] = s / u[(i, i)];
        }
        for (i, value) in sol.into_iter().enumerate() {
            x[(i, 0)] = value;
        }

        let error = residual_error(a, b, x)?;
        debug!("LU: solved {n}x{n} system, residual {error:?}");
        Ok(SolveReport {
            status: SolveStatus::Converged,
            iterations: 0,
            error,
        })
    }

    /// Only [`StoppingCriterion::Direct`] is accepted; tolerance and
    /// iteration cap are kept but unused.
    fn setup_solver(&mut self, settings: LinearSolverSettings<T>) -> Result<()> {
        if settings.criterion != StoppingCriterion::Direct {
            return Err(Error::InvalidValue(format!(
                "LU is a direct solver, got stopping criterion {:?}",
                settings.criterion
            )));
        }
        self.settings = settings;
        Ok(())
    }

    fn settings(&self) -> &LinearSolverSettings<T> {
        &self.settings
    }

    fn method(&self) -> &'static str {
        "LU"
    }

    fn box_clone(&self) -> Box<dyn LinearSolver<T>> {
        Box::new(self.clone())
    }
}
