//! Library-wide numeric defaults.
//!
//! Instead of a process-wide mutable singleton, defaults live in a plain
//! [`Settings`] value that callers construct and pass to the places that
//! need it (`LinearSolverSettings::from_settings`, `SecantSettings::from_settings`,
//! [`Settings::diff_step`], ...). Two parts of a program can therefore use
//! different tolerances without racing on shared state.

use crate::error::{Error, Result};

/// Default absolute tolerance for tolerant equality and solver convergence.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// How a residual is turned into an error estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToleranceMode {
    /// `|a - b|`
    #[default]
    Absolute,
    /// `|a - b|` scaled by the larger operand magnitude.
    Relative,
}

/// Numeric defaults: target tolerance and worker-thread count.
///
/// ```
/// use numkit::Settings;
///
/// let mut s = Settings::default();
/// assert_eq!(s.target_tolerance(), 1e-3);
/// s.set_target_tolerance(1e-6).unwrap();
/// assert_eq!(s.target_tolerance(), 1e-6);
/// assert!(s.set_target_tolerance(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    target_tolerance: f64,
    num_threads: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_tolerance: DEFAULT_TOLERANCE,
            num_threads: 0,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set_target_tolerance`](Self::set_target_tolerance).
    pub fn with_target_tolerance(mut self, tolerance: f64) -> Result<Self> {
        self.set_target_tolerance(tolerance)?;
        Ok(self)
    }

    pub fn target_tolerance(&self) -> f64 {
        self.target_tolerance
    }

    /// Set the target tolerance. Must be a finite number greater than zero.
    pub fn set_target_tolerance(&mut self, tolerance: f64) -> Result<()> {
        if !(tolerance > 0.0) || !tolerance.is_finite() {
            return Err(Error::InvalidValue(format!(
                "tolerance must be a finite number greater than 0, got {tolerance}"
            )));
        }
        self.target_tolerance = tolerance;
        Ok(())
    }

    /// Worker-thread count; `0` leaves the choice to the thread pool.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    pub fn set_num_threads(&mut self, num_threads: usize) {
        self.num_threads = num_threads;
    }

    /// Default finite-difference step for a single partial derivative.
    pub fn diff_step(&self) -> f64 {
        0.1 * self.target_tolerance
    }

    /// Default finite-difference step for a Jacobian.
    pub fn jacobian_step(&self) -> f64 {
        1e-3 * self.target_tolerance
    }

    /// Run `op` inside a dedicated rayon pool sized by [`num_threads`](Self::num_threads).
    ///
    /// All data-parallel kernels invoked from `op` use that pool.
    ///
    /// ```
    /// use numkit::{Matrix, Settings};
    ///
    /// let mut s = Settings::default();
    /// s.set_num_threads(2);
    /// let m = s.install(|| Matrix::<f64>::identity(3) * 2.0).unwrap();
    /// assert_eq!(m[(1, 1)], 2.0);
    /// ```
    #[cfg(feature = "parallel")]
    pub fn install<R, OP>(&self, op: OP) -> Result<R>
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?;
        Ok(pool.install(op))
    }
}
