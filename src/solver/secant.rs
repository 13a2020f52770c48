use core::fmt;

use log::{debug, warn};

use super::{BiCgStab, LinearSolver, StoppingCriterion};
use crate::diff::{clamp_inside, jacobian_into, validate, Bounds, Function, Scheme};
use crate::error::{Error, Result};
use crate::matrix::{Layout, Matrix};
use crate::settings::{Settings, ToleranceMode};
use crate::traits::FloatScalar;

/// Configuration for [`Secant`].
///
/// Owns its inner linear solver; `clone()` deep-copies it, so two settings
/// values never share a solver.
#[derive(Debug, Clone)]
pub struct SecantSettings<T: FloatScalar> {
    /// [`StoppingCriterion::Tolerance`] or [`StoppingCriterion::Iterations`].
    pub criterion: StoppingCriterion,
    /// How the per-function residual is measured.
    pub tolerance_mode: ToleranceMode,
    /// Iteration count under [`StoppingCriterion::Iterations`].
    pub max_iter: usize,
    /// Hard ceiling under [`StoppingCriterion::Tolerance`]; exceeding it
    /// fails with [`Error::TooManyIterations`].
    pub abort_iter: usize,
    pub tolerance: T,
    /// Finite-difference step, also the margin kept from each bound.
    pub step: T,
    pub scheme: Scheme,
    /// Solves `J·Δx = -F(x)` when there is more than one unknown.
    pub linear_solver: Box<dyn LinearSolver<T>>,
}

impl Default for SecantSettings<f64> {
    fn default() -> Self {
        Self {
            criterion: StoppingCriterion::Tolerance,
            tolerance_mode: ToleranceMode::Absolute,
            max_iter: 100,
            abort_iter: 100,
            tolerance: 1e-3,
            step: 1e-6,
            scheme: Scheme::FirstOrder,
            linear_solver: Box::new(BiCgStab::with_tolerance(1e-6)),
        }
    }
}

impl Default for SecantSettings<f32> {
    fn default() -> Self {
        Self {
            criterion: StoppingCriterion::Tolerance,
            tolerance_mode: ToleranceMode::Absolute,
            max_iter: 100,
            abort_iter: 100,
            tolerance: 1e-3,
            step: 1e-3,
            scheme: Scheme::FirstOrder,
            linear_solver: Box::new(BiCgStab::with_tolerance(1e-4)),
        }
    }
}

impl<T: FloatScalar> SecantSettings<T> {
    /// Settings derived from library defaults: the target tolerance drives
    /// convergence, [`Settings::jacobian_step`] the finite differences, and
    /// the inner BiCGStab solve runs a thousand times tighter.
    pub fn from_settings(settings: &Settings) -> Self {
        let tolerance = settings.target_tolerance();
        Self {
            criterion: StoppingCriterion::Tolerance,
            tolerance_mode: ToleranceMode::Absolute,
            max_iter: 100,
            abort_iter: 100,
            tolerance: T::from(tolerance).unwrap(),
            step: T::from(settings.jacobian_step()).unwrap(),
            scheme: Scheme::FirstOrder,
            linear_solver: Box::new(BiCgStab::with_tolerance(T::from(tolerance * 1e-3).unwrap())),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.criterion == StoppingCriterion::Direct {
            return Err(Error::InvalidValue(
                "secant iteration cannot use the direct stopping criterion".into(),
            ));
        }
        if self.criterion == StoppingCriterion::Tolerance
            && (!(self.tolerance > T::zero()) || !self.tolerance.is_finite())
        {
            return Err(Error::InvalidValue(format!(
                "tolerance must be a finite number greater than 0, got {:?}",
                self.tolerance
            )));
        }
        if !(self.step > T::zero()) || !self.step.is_finite() {
            return Err(Error::InvalidValue(format!(
                "step must be a finite number greater than 0, got {:?}",
                self.step
            )));
        }
        Ok(())
    }
}

/// Outcome of a successful nonlinear solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonlinearReport<T> {
    pub iterations: usize,
    /// Largest per-function residual at the returned `x`.
    pub error: T,
}

/// Root finder for square systems `F(x) = 0`.
///
/// `x` is the initial guess on entry and the latest iterate on return,
/// including when the solve fails with [`Error::TooManyIterations`].
pub trait NonlinearSolver<T: FloatScalar>: fmt::Debug + Send + Sync {
    fn solve(
        &self,
        functions: &[Function<T>],
        x: &mut Matrix<T>,
        bounds: Bounds<'_, T>,
    ) -> Result<NonlinearReport<T>>;

    fn setup_solver(&mut self, settings: SecantSettings<T>) -> Result<()>;

    fn settings(&self) -> &SecantSettings<T>;

    fn method(&self) -> &'static str;

    fn box_clone(&self) -> Box<dyn NonlinearSolver<T>>;
}

impl<T: FloatScalar> Clone for Box<dyn NonlinearSolver<T>> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Newton iteration on a finite-difference Jacobian.
///
/// Each iteration recomputes `J` at the current point, solves
/// `J·Δx = -F(x)` (a plain division for one unknown), steps, and clamps the
/// result into `[lower + step, upper - step]`. The starting point is
/// clamped the same way. `Δx` from the previous iteration seeds the next
/// inner solve.
///
/// ```
/// use numkit::diff::{Bounds, Function};
/// use numkit::solver::{NonlinearSolver, Secant};
/// use numkit::Matrix;
///
/// let f: Vec<Function<f64>> = vec![
///     Box::new(|x: &Matrix<f64>| x[(0, 0)] + x[(1, 0)] - 3.0),
///     Box::new(|x: &Matrix<f64>| x[(0, 0)] * x[(1, 0)] - 2.0),
/// ];
/// let mut x = Matrix::column_vector(vec![0.0, 5.0]);
/// let report = Secant::new().solve(&f, &mut x, Bounds::none()).unwrap();
/// assert!(report.error <= 1e-3);
/// assert!((x[(0, 0)] - 1.0).abs() < 1e-2);
/// assert!((x[(1, 0)] - 2.0).abs() < 1e-2);
/// ```
#[derive(Debug, Clone)]
pub struct Secant<T: FloatScalar> {
    settings: SecantSettings<T>,
}

impl<T: FloatScalar> Secant<T>
where
    SecantSettings<T>: Default,
{
    pub fn new() -> Self {
        Self {
            settings: SecantSettings::default(),
        }
    }
}

impl<T: FloatScalar> Default for Secant<T>
where
    SecantSettings<T>: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatScalar> Secant<T> {
    pub fn with_settings(settings: SecantSettings<T>) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    fn residual(&self, before: &[T], after: &[T]) -> T {
        let per_function = before.iter().zip(after).map(|(&prev, &cur)| match self.settings.tolerance_mode {
            ToleranceMode::Absolute => cur.abs(),
            ToleranceMode::Relative if cur == T::zero() => T::zero(),
            ToleranceMode::Relative => ((prev - cur) / cur).abs(),
        });
        per_function.fold(T::zero(), |m, r| m.max(r))
    }
}

fn evaluate<T: FloatScalar>(functions: &[Function<T>], x: &Matrix<T>) -> Vec<T> {
    functions.iter().map(|f| f(x)).collect()
}

impl<T: FloatScalar> NonlinearSolver<T> for Secant<T> {
    fn solve(
        &self,
        functions: &[Function<T>],
        x: &mut Matrix<T>,
        bounds: Bounds<'_, T>,
    ) -> Result<NonlinearReport<T>> {
        let cfg = &self.settings;
        let n = functions.len();
        if n == 0 {
            return Err(Error::DegenerateMatrix("no functions to solve".into()));
        }
        validate(x, cfg.step, &bounds)?;
        if x.rows() != n {
            return Err(Error::IncorrectMatrix(format!(
                "{n} functions need {n} unknowns, got {}",
                x.rows()
            )));
        }

        let mut current = x.clone();
        clamp_inside(&mut current, cfg.step, &bounds);
        let mut values = evaluate(functions, &current);

        let mut jac = Matrix::zeros(n, n);
        let mut dx = Matrix::filled(n, 1, cfg.step);
        let mut iterations = 0usize;

        loop {
            jacobian_into(functions, &current, &mut jac, cfg.scheme, cfg.step, bounds)?;
            let y = Matrix::from_fn(n, 1, Layout::ColumnMajor, |i, _| -values[i]);

            if n > 1 {
                let inner = cfg.linear_solver.solve(&jac, &y, &mut dx)?;
                if !inner.status.is_converged() {
                    debug!(
                        "Secant: inner {} solve ended with {:?} (error {:?})",
                        cfg.linear_solver.method(),
                        inner.status,
                        inner.error
                    );
                }
            } else {
                let slope = jac[(0, 0)];
                if slope == T::zero() {
                    return Err(Error::DegenerateMatrix(format!(
                        "zero derivative at x = {:?}",
                        current[(0, 0)]
                    )));
                }
                dx[(0, 0)] = y[(0, 0)] / slope;
            }

            current = current.try_add(&dx)?;
            clamp_inside(&mut current, cfg.step, &bounds);
            iterations += 1;

            let next = evaluate(functions, &current);
            let error = self.residual(&values, &next);
            values = next;
            debug!("Secant: iteration {iterations}, error {error:?}");

            if cfg.criterion == StoppingCriterion::Tolerance {
                if error <= cfg.tolerance {
                    *x = current;
                    return Ok(NonlinearReport { iterations, error });
                }
                if iterations > cfg.abort_iter {
                    *x = current;
                    warn!("Secant: no convergence after {iterations} iterations (error {error:?})");
                    return Err(Error::TooManyIterations { iterations });
                }
            } else if iterations > cfg.max_iter {
                *x = current;
                return Ok(NonlinearReport { iterations, error });
            }
        }
    }

    fn setup_solver(&mut self, settings: SecantSettings<T>) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    fn settings(&self) -> &SecantSettings<T> {
        &self.settings
    }

    fn method(&self) -> &'static str {
        "Secant"
    }

    fn box_clone(&self) -> Box<dyn NonlinearSolver<T>> {
        Box::new(self.clone())
    }
}
