use log::{debug, warn};

use super::{
    check_system, residual_error, LinearSolver, LinearSolverSettings, SolveReport, SolveStatus,
    StoppingCriterion,
};
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

/// Consecutive error increases after which a solve is flagged as divergent.
const DIVERGENCE_STREAK: usize = 10;

/// Biconjugate gradient stabilized solver for square, possibly
/// non-symmetric systems.
///
/// Every half step is checked against `max|b - A·x|`, so a tolerance-driven
/// solve can stop on the intermediate iterate. An iterate with a zero
/// residual ends the solve as converged under either criterion. Reaching
/// the iteration cap is not an error: `x` holds the latest iterate and the report says
/// [`SolveStatus::IterationCapReached`], or
/// [`SolveStatus::DivergenceSuspected`] if the error grew for more than ten
/// iterations in a row.
///
/// ```
/// use numkit::solver::{BiCgStab, LinearSolver, SolveStatus};
/// use numkit::Matrix;
///
/// let a = Matrix::<f64>::from_rows(&[[4.0, 1.0], [1.0, 3.0]]).unwrap();
/// let b = Matrix::column_vector(vec![1.0, 2.0]);
/// let mut x = Matrix::column_vector(vec![0.0, 0.0]);
///
/// let report = BiCgStab::new().solve(&a, &b, &mut x).unwrap();
/// assert_eq!(report.status, SolveStatus::Converged);
/// assert!((x[(0, 0)] - 1.0 / 11.0).abs() < 1e-3);
/// assert!((x[(1, 0)] - 7.0 / 11.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct BiCgStab<T> {
    settings: LinearSolverSettings<T>,
}

impl<T: FloatScalar> BiCgStab<T>
where
    LinearSolverSettings<T>: Default,
{
    pub fn new() -> Self {
        Self {
            settings: LinearSolverSettings::default(),
        }
    }
}

impl<T: FloatScalar> Default for BiCgStab<T>
where
    LinearSolverSettings<T>: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FloatScalar> BiCgStab<T> {
    pub fn with_settings(settings: LinearSolverSettings<T>) -> Result<Self> {
        check_settings(&settings)?;
        Ok(Self { settings })
    }

    /// Tolerance-driven solver with the default iteration cap. `tolerance`
    /// must already be known positive.
    pub(crate) fn with_tolerance(tolerance: T) -> Self {
        Self {
            settings: LinearSolverSettings {
                criterion: StoppingCriterion::Tolerance,
                max_iter: 100,
                tolerance,
            },
        }
    }
}

fn check_settings<T: FloatScalar>(settings: &LinearSolverSettings<T>) -> Result<()> {
    if settings.criterion == StoppingCriterion::Direct {
        return Err(Error::InvalidValue(
            "BiCGStab is iterative and cannot use the direct stopping criterion".into(),
        ));
    }
    settings.validate()
}

impl<T: FloatScalar> LinearSolver<T> for BiCgStab<T> {
    fn solve(&self, a: &Matrix<T>, b: &Matrix<T>, x: &mut Matrix<T>) -> Result<SolveReport<T>> {
        check_system(a, b, x)?;
        let cfg = &self.settings;
        let by_tolerance = cfg.criterion == StoppingCriterion::Tolerance;
        let done = |e: T| e == T::zero() || (by_tolerance && e <= cfg.tolerance);

        let mut r = b.try_sub(&a.try_mul(x)?)?;
        let mut error = r.max_abs();
        if done(error) {
            debug!("BiCGStab: initial guess within tolerance ({error:?})");
            return Ok(report(SolveStatus::Converged, 0, error));
        }

        let r_hat = r.clone();
        let mut p = Matrix::with_layout(a.rows(), 1, x.layout());
        let mut v = p.clone();
        let (mut rho, mut alpha, mut omega) = (T::one(), T::one(), T::one());
        let mut watch = DivergenceWatch::default();

        for iter in 1..=cfg.max_iter {
            let rho_prev = rho;
            rho = r_hat.dot(&r)?;
            if rho == T::zero() || omega == T::zero() {
                return Ok(breakdown(iter - 1, error));
            }

            let beta = (rho / rho_prev) * (alpha / omega);
            p = r.try_add(&p.try_sub(&v.scale(omega))?.scale(beta))?;
            v = a.try_mul(&p)?;

            let r_hat_v = r_hat.dot(&v)?;
            if r_hat_v == T::zero() {
                return Ok(breakdown(iter - 1, error));
            }
            alpha = rho / r_hat_v;

            let h = x.try_add(&p.scale(alpha))?;
            let half_error = residual_error(a, b, &h)?;
            if done(half_error) {
                *x = h;
                debug!("BiCGStab: converged after {iter} iterations ({half_error:?})");
                return Ok(report(SolveStatus::Converged, iter, half_error));
            }

            let s = r.try_sub(&v.scale(alpha))?;
            let t = a.try_mul(&s)?;
            let tt = t.dot(&t)?;
            if tt == T::zero() {
                *x = h;
                return Ok(breakdown(iter, half_error));
            }
            omega = t.dot(&s)? / tt;

            *x = h.try_add(&s.scale(omega))?;
            let next_error = residual_error(a, b, x)?;

            if watch.observe(error, next_error) {
                warn!(
                    "BiCGStab: residual grew for {} consecutive iterations, \
                     solve is probably diverging ({next_error:?} at iteration {iter})",
                    watch.streak
                );
            }
            error = next_error;

            if done(error) {
                debug!("BiCGStab: converged after {iter} iterations ({error:?})");
                return Ok(report(SolveStatus::Converged, iter, error));
            }
            r = s.try_sub(&t.scale(omega))?;
        }

        let status = if watch.flagged {
            SolveStatus::DivergenceSuspected
        } else {
            SolveStatus::IterationCapReached
        };
        debug!(
            "BiCGStab: stopped after {} iterations with error {error:?} ({status:?})",
            cfg.max_iter
        );
        Ok(report(status, cfg.max_iter, error))
    }

    fn setup_solver(&mut self, settings: LinearSolverSettings<T>) -> Result<()> {
        check_settings(&settings)?;
        self.settings = settings;
        Ok(())
    }

    fn settings(&self) -> &LinearSolverSettings<T> {
        &self.settings
    }

    fn method(&self) -> &'static str {
        "BiCGStab"
    }

    fn box_clone(&self) -> Box<dyn LinearSolver<T>> {
        Box::new(self.clone())
    }
}

/// Counts consecutive residual increases and flags the solve once the run
/// exceeds [`DIVERGENCE_STREAK`].
#[derive(Debug, Default)]
struct DivergenceWatch {
    streak: usize,
    flagged: bool,
}

impl DivergenceWatch {
    /// Record one step. Returns `true` only on the step that first flags.
    fn observe<T: PartialOrd>(&mut self, before: T, after: T) -> bool {
        self.streak = if after > before { self.streak + 1 } else { 0 };
        if self.streak > DIVERGENCE_STREAK && !self.flagged {
            self.flagged = true;
            return true;
        }
        false
    }
}

fn report<T>(status: SolveStatus, iterations: usize, error: T) -> SolveReport<T> {
    SolveReport {
        status,
        iterations,
        error,
    }
}

fn breakdown<T: core::fmt::Debug>(iterations: usize, error: T) -> SolveReport<T> {
    warn!("BiCGStab: zero inner product after {iterations} iterations (error {error:?})");
    report(SolveStatus::Breakdown, iterations, error)
}
