use core::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{kernel, Matrix};
use crate::compare::is_equal_with;
use crate::error::{Error, Result};
use crate::settings::ToleranceMode;
use crate::traits::{FloatScalar, Scalar};

impl<T: Scalar> Matrix<T> {
    /// Set every element to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// Overwrite every element with a value drawn from `0.00, 0.01, ..., 0.99`.
    ///
    /// Elements are drawn in row-major logical order, so a seed produces the
    /// same logical matrix in either layout. Integer element types truncate
    /// every draw to zero.
    ///
    /// ```
    /// use numkit::Matrix;
    /// let mut a = Matrix::<f64>::zeros(3, 3);
    /// let mut b = Matrix::<f64>::zeros(3, 3);
    /// a.random_fill(7);
    /// b.random_fill(7);
    /// assert_eq!(a, b);
    /// ```
    pub fn random_fill(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        for i in 0..self.rows {
            for j in 0..self.cols {
                let draw = f64::from(rng.gen_range(0u32..100)) / 100.0;
                self[(i, j)] = T::from(draw).unwrap_or_else(T::zero);
            }
        }
    }

    /// New matrix with `f` applied to each element (same shape and layout).
    pub fn map<F>(&self, f: F) -> Matrix<T>
    where
        F: Fn(T) -> T + Sync + Send,
    {
        let mut out = Matrix::with_layout(self.rows, self.cols, self.layout);
        kernel::fill_positions(&mut out, |i, j| f(self.value(i, j)));
        out
    }

    /// Apply `f` to each element in place.
    pub fn apply<F>(&mut self, f: F)
    where
        F: Fn(T) -> T,
    {
        self.data.iter_mut().for_each(|x| *x = f(*x));
    }

    fn reduce(&self, pick: impl Fn(T, T) -> bool) -> Result<T> {
        let mut it = self.data.iter().copied();
        let first = it
            .next()
            .ok_or_else(|| Error::DegenerateMatrix("empty matrix has no elements".into()))?;
        Ok(it.fold(first, |best, x| if pick(x, best) { x } else { best }))
    }

    /// Largest element. Fails with [`Error::DegenerateMatrix`] when empty.
    pub fn max_element(&self) -> Result<T> {
        self.reduce(|x, best| x > best)
    }

    /// Smallest element. Fails with [`Error::DegenerateMatrix`] when empty.
    pub fn min_element(&self) -> Result<T> {
        self.reduce(|x, best| x < best)
    }

    /// `(Σ|x|^p)^(1/p)` over all elements, evaluated in `f64`.
    ///
    /// ```
    /// use numkit::Matrix;
    /// let m = Matrix::from_rows(&[[2, 3, -1], [1, -4, 5], [2, 1, 8]]).unwrap();
    /// assert!((m.p_norm(2.0) - 11.180339887499).abs() < 1e-9);
    /// ```
    pub fn p_norm(&self, p: f64) -> f64 {
        self.data
            .iter()
            .map(|x| x.to_f64().unwrap_or(f64::NAN).abs().powf(p))
            .sum::<f64>()
            .powf(1.0 / p)
    }

    /// Transposed copy in the same layout as `self`.
    ///
    /// The data is rearranged; this is not a metadata swap.
    ///
    /// ```
    /// use numkit::Matrix;
    /// let m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
    /// let t = m.transpose();
    /// assert_eq!(t, Matrix::from_rows(&[[1, 4], [2, 5], [3, 6]]).unwrap());
    /// ```
    pub fn transpose(&self) -> Matrix<T> {
        let mut out = Matrix::with_layout(self.cols, self.rows, self.layout);
        kernel::fill_positions(&mut out, |i, j| self.value(j, i));
        out
    }

    pub fn transpose_in_place(&mut self) {
        *self = self.transpose();
    }

    /// Layout-independent comparison: equal dimensions and every pair of
    /// elements within `eps` (absolute). Element types may differ.
    ///
    /// ```
    /// use numkit::{Layout, Matrix};
    /// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// let b = Matrix::from_rows(&[[1, 2], [3, 4]]).unwrap().to_layout(Layout::ColumnMajor);
    /// assert!(a.compare(&b, 1e-12));
    /// assert!(!a.compare(&Matrix::<f64>::zeros(2, 2), 1e-12));
    /// ```
    pub fn compare<U: Scalar>(&self, other: &Matrix<U>, eps: f64) -> bool {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        (0..self.rows).all(|i| {
            (0..self.cols).all(|j| {
                is_equal_with(self.value(i, j), other.value(i, j), eps, ToleranceMode::Absolute)
            })
        })
    }
}

impl<T: FloatScalar> Matrix<T> {
    /// Largest absolute value, or zero for an empty matrix.
    pub fn max_abs(&self) -> T {
        self.data.iter().fold(T::zero(), |m, &x| m.max(x.abs()))
    }
}

// ── Display ─────────────────────────────────────────────────────────

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = (0..self.rows)
            .flat_map(|i| (0..self.cols).map(move |j| (i, j)))
            .map(|(i, j)| self.data[self.offset(i, j)].to_string())
            .collect();
        let width = cells.iter().map(String::len).max().unwrap_or(0);

        for (i, row) in cells.chunks(self.cols.max(1)).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{cell:>width$}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
