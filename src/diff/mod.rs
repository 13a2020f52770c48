//! Finite-difference differentiation with optional box constraints.
//!
//! - [`partial_derivative`]: `∂f/∂x_i` of a function of a column vector
//! - [`diff`]: derivative of a scalar function of one variable
//! - [`jacobian`] / [`jacobian_into`]: `J[i][j] = ∂F_i/∂x_j` for a list of functions
//!
//! Bounds clamp the evaluation point into `[lower, upper]`. The
//! differentiated coordinate is additionally kept at least `step` away
//! from each bound, so every finite-difference tap stays feasible.

use crate::error::{Error, Result};
use crate::matrix::{kernel, Matrix};
use crate::traits::FloatScalar;

/// Boxed function of a column vector, as consumed by the nonlinear solvers.
pub type Function<T> = Box<dyn Fn(&Matrix<T>) -> T + Send + Sync>;

/// Finite-difference scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    /// `(f(x) - f(x - h)) / h`
    #[default]
    FirstOrder,
    /// `(1.5 f(x + h) - 2 f(x) + 0.5 f(x - h)) / h`
    SecondOrder,
}

impl TryFrom<i32> for Scheme {
    type Error = Error;

    /// `1` is [`Scheme::FirstOrder`], `2` is [`Scheme::SecondOrder`].
    fn try_from(id: i32) -> Result<Self> {
        match id {
            1 => Ok(Scheme::FirstOrder),
            2 => Ok(Scheme::SecondOrder),
            _ => Err(Error::InvalidValue(format!(
                "unknown differentiation scheme {id}"
            ))),
        }
    }
}

/// Optional lower and upper bounds, each a column vector as long as `x`.
#[derive(Debug, Clone, Copy)]
pub struct Bounds<'a, T> {
    pub lower: Option<&'a Matrix<T>>,
    pub upper: Option<&'a Matrix<T>>,
}

impl<T> Default for Bounds<'_, T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<'a, T> Bounds<'a, T> {
    /// No constraints.
    pub fn none() -> Self {
        Self {
            lower: None,
            upper: None,
        }
    }

    pub fn new(lower: &'a Matrix<T>, upper: &'a Matrix<T>) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
        }
    }

    pub fn lower(lower: &'a Matrix<T>) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
        }
    }

    pub fn upper(upper: &'a Matrix<T>) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
        }
    }
}

/// Check `x`, `step` and `bounds` once, before any evaluation.
pub(crate) fn validate<T: FloatScalar>(x: &Matrix<T>, step: T, bounds: &Bounds<'_, T>) -> Result<()> {
    if !x.is_column_vector() {
        return Err(Error::NonColumnVector {
            rows: x.rows(),
            cols: x.cols(),
        });
    }
    if !(step > T::zero()) || !step.is_finite() {
        return Err(Error::InvalidValue(format!(
            "step must be a finite number greater than 0, got {step:?}"
        )));
    }
    for (name, bound) in [("lower", bounds.lower), ("upper", bounds.upper)] {
        let Some(b) = bound else { continue };
        if !b.is_column_vector() || b.rows() != x.rows() {
            return Err(Error::IncorrectMatrix(format!(
                "{name} bound is {}x{}, expected {}x1",
                b.rows(),
                b.cols(),
                x.rows()
            )));
        }
    }
    if let (Some(lo), Some(hi)) = (bounds.lower, bounds.upper) {
        for i in 0..x.rows() {
            let (l, h) = (lo[(i, 0)], hi[(i, 0)]);
            if l > h {
                return Err(Error::InvalidValue(format!(
                    "lower bound {l:?} exceeds upper bound {h:?} at row {i}"
                )));
            }
            if h - l < step + step {
                return Err(Error::InvalidValue(format!(
                    "bounds at row {i} are closer than 2 * step = {:?}",
                    step + step
                )));
            }
        }
    }
    Ok(())
}

/// Clamp every coordinate into `[lower + step, upper - step]`.
pub(crate) fn clamp_inside<T: FloatScalar>(x: &mut Matrix<T>, step: T, bounds: &Bounds<'_, T>) {
    if let Some(lo) = bounds.lower {
        for i in 0..x.rows() {
            x[(i, 0)] = x[(i, 0)].max(lo[(i, 0)] + step);
        }
    }
    if let Some(hi) = bounds.upper {
        for i in 0..x.rows() {
            x[(i, 0)] = x[(i, 0)].min(hi[(i, 0)] - step);
        }
    }
}

/// Unchecked core shared by [`partial_derivative`] and the Jacobian fill.
fn derivative_at<T, F>(
    f: &F,
    x: &Matrix<T>,
    index: usize,
    scheme: Scheme,
    step: T,
    bounds: &Bounds<'_, T>,
) -> T
where
    T: FloatScalar,
    F: Fn(&Matrix<T>) -> T + ?Sized,
{
    let mut current = x.clone();
    if let Some(lo) = bounds.lower {
        for i in 0..current.rows() {
            current[(i, 0)] = current[(i, 0)].max(lo[(i, 0)]);
        }
        current[(index, 0)] = x[(index, 0)].max(lo[(index, 0)] + step);
    }
    if let Some(hi) = bounds.upper {
        for i in 0..current.rows() {
            current[(i, 0)] = current[(i, 0)].min(hi[(i, 0)]);
        }
        current[(index, 0)] = current[(index, 0)].min(hi[(index, 0)] - step);
    }

    let at = current[(index, 0)];
    let mut previous = current.clone();
    previous[(index, 0)] = at - step;

    match scheme {
        Scheme::FirstOrder => (f(&current) - f(&previous)) / step,
        Scheme::SecondOrder => {
            let mut next = current.clone();
            next[(index, 0)] = at + step;
            let two = T::one() + T::one();
            let half = T::one() / two;
            ((T::one() + half) * f(&next) - two * f(&current) + half * f(&previous)) / step
        }
    }
}

/// Partial derivative `∂f/∂x_index` at the column vector `x`.
///
/// Fails with [`Error::NonColumnVector`] if `x` is not a column vector,
/// [`Error::IndexOutOfBounds`] if `index >= x.rows()`, and
/// [`Error::IncorrectMatrix`] / [`Error::InvalidValue`] for malformed bounds
/// (wrong shape, `lower > upper`, or a gap narrower than `2 * step`).
///
/// ```
/// use numkit::diff::{partial_derivative, Bounds, Scheme};
/// use numkit::Matrix;
///
/// let f = |x: &Matrix<f64>| x[(0, 0)].powi(2) + x[(1, 0)].powi(2) - x[(2, 0)] - 6.0;
/// let x = Matrix::column_vector(vec![3.0, 2.0, 4.0]);
/// let d = partial_derivative(f, &x, 0, Scheme::FirstOrder, 1e-4, Bounds::none()).unwrap();
/// assert!((d - 6.0).abs() < 1e-3);
/// ```
pub fn partial_derivative<T, F>(
    f: F,
    x: &Matrix<T>,
    index: usize,
    scheme: Scheme,
    step: T,
    bounds: Bounds<'_, T>,
) -> Result<T>
where
    T: FloatScalar,
    F: Fn(&Matrix<T>) -> T,
{
    validate(x, step, &bounds)?;
    if index >= x.rows() {
        return Err(Error::IndexOutOfBounds {
            row: index,
            col: 0,
            rows: x.rows(),
            cols: x.cols(),
        });
    }
    Ok(derivative_at(&f, x, index, scheme, step, &bounds))
}

/// Derivative of a scalar function of one variable, with optional bounds.
///
/// ```
/// use numkit::diff::{diff, Scheme};
///
/// let d = diff(|x: f64| x * x - 9.0, 3.0, Scheme::FirstOrder, 1e-4, None, None).unwrap();
/// assert!((d - 6.0).abs() < 1e-3);
///
/// // A ramp clamped to [0, 1]: flat to the left, slope 1 inside.
/// let ramp = |x: f64| x.clamp(0.0, 1.0);
/// let free = diff(ramp, -1.0, Scheme::FirstOrder, 1e-4, None, None).unwrap();
/// let bounded = diff(ramp, -1.0, Scheme::FirstOrder, 1e-4, Some(0.0), Some(1.0)).unwrap();
/// assert_eq!(free, 0.0);
/// assert!((bounded - 1.0).abs() < 1e-9);
/// ```
pub fn diff<T, F>(
    f: F,
    x: T,
    scheme: Scheme,
    step: T,
    lower: Option<T>,
    upper: Option<T>,
) -> Result<T>
where
    T: FloatScalar,
    F: Fn(T) -> T,
{
    let args = Matrix::column_vector(vec![x]);
    let lower = lower.map(|v| Matrix::column_vector(vec![v]));
    let upper = upper.map(|v| Matrix::column_vector(vec![v]));
    let bounds = Bounds {
        lower: lower.as_ref(),
        upper: upper.as_ref(),
    };
    partial_derivative(|m: &Matrix<T>| f(m[(0, 0)]), &args, 0, scheme, step, bounds)
}

/// Jacobian of `functions` at `x`: an `m x n` row-major matrix with
/// `m = functions.len()` and `n = x.rows()`.
///
/// ```
/// use numkit::diff::{jacobian, Bounds, Function, Scheme};
/// use numkit::Matrix;
///
/// let f: Vec<Function<f64>> = vec![
///     Box::new(|x: &Matrix<f64>| x[(0, 0)] * x[(1, 0)]),
///     Box::new(|x: &Matrix<f64>| x[(0, 0)] + 3.0 * x[(1, 0)]),
/// ];
/// let x = Matrix::column_vector(vec![2.0, 5.0]);
/// let j = jacobian(&f, &x, Scheme::FirstOrder, 1e-6, Bounds::none()).unwrap();
/// let truth = Matrix::from_rows(&[[5.0, 2.0], [1.0, 3.0]]).unwrap();
/// assert!(j.compare(&truth, 1e-4));
/// ```
pub fn jacobian<T, F>(
    functions: &[F],
    x: &Matrix<T>,
    scheme: Scheme,
    step: T,
    bounds: Bounds<'_, T>,
) -> Result<Matrix<T>>
where
    T: FloatScalar,
    F: Fn(&Matrix<T>) -> T + Sync,
{
    let mut jac = Matrix::zeros(functions.len(), x.rows());
    jacobian_into(functions, x, &mut jac, scheme, step, bounds)?;
    Ok(jac)
}

/// [`jacobian`] writing into an existing `m x n` matrix, filled in its
/// own layout. Each element is an independent partial derivative, so the
/// fill runs data-parallel. `jac` is untouched on error.
pub fn jacobian_into<T, F>(
    functions: &[F],
    x: &Matrix<T>,
    jac: &mut Matrix<T>,
    scheme: Scheme,
    step: T,
    bounds: Bounds<'_, T>,
) -> Result<()>
where
    T: FloatScalar,
    F: Fn(&Matrix<T>) -> T + Sync,
{
    validate(x, step, &bounds)?;
    if jac.rows() != functions.len() || jac.cols() != x.rows() {
        return Err(Error::IncorrectMatrix(format!(
            "jacobian is {}x{}, expected {}x{}",
            jac.rows(),
            jac.cols(),
            functions.len(),
            x.rows()
        )));
    }
    kernel::fill_positions(jac, |i, j| {
        derivative_at(&functions[i], x, j, scheme, step, &bounds)
    });
    Ok(())
}
