use super::check_square;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::traits::{FloatScalar, Scalar};

/// Determinant algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeterminantMethod {
    /// Recursive cofactor expansion. Exact for integer-valued input.
    #[default]
    Cofactor,
    /// Product of the diagonal of `U` from [`Matrix::decompose_lu`].
    Lu,
}

impl TryFrom<i32> for DeterminantMethod {
    type Error = Error;

    /// `0` is cofactor expansion, `1` is LU.
    fn try_from(id: i32) -> Result<Self> {
        match id {
            0 => Ok(DeterminantMethod::Cofactor),
            1 => Ok(DeterminantMethod::Lu),
            _ => Err(Error::InvalidValue(format!("unknown determinant method {id}"))),
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// Determinant by cofactor expansion. Works for any element type.
    ///
    /// Expands along the first row still available at each level, over
    /// every available column, skipping terms whose element is exactly
    /// zero. The summation order is fixed, so results are reproducible.
    ///
    /// ```
    /// use numkit::Matrix;
    /// let m = Matrix::from_rows(&[[1, 2, 3], [0, 4, 5], [1, 0, 6]]).unwrap();
    /// assert_eq!(m.det_cofactor().unwrap(), 22);
    /// ```
    pub fn det_cofactor(&self) -> Result<T> {
        let n = check_square(self)?;
        match n {
            1 => Ok(self[(0, 0)]),
            2 => Ok(self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]),
            _ => {
                let mut used_rows = vec![false; n];
                let mut used_cols = vec![false; n];
                Ok(cofactor(self, &mut used_rows, &mut used_cols, n))
            }
        }
    }
}

fn cofactor<T: Scalar>(m: &Matrix<T>, used_rows: &mut [bool], used_cols: &mut [bool], k: usize) -> T {
    if k == 2 {
        let mut rows = (0..used_rows.len()).filter(|&i| !used_rows[i]);
        let mut cols = (0..used_cols.len()).filter(|&j| !used_cols[j]);
        let (r0, r1) = (rows.next().unwrap_or(0), rows.next().unwrap_or(0));
        let (c0, c1) = (cols.next().unwrap_or(0), cols.next().unwrap_or(0));
        return m[(r0, c0)] * m[(r1, c1)] - m[(r0, c1)] * m[(r1, c0)];
    }

    let Some(row) = used_rows.iter().position(|&u| !u) else {
        return T::zero();
    };
    used_rows[row] = true;

    let mut acc = T::zero();
    let mut position = 0;
    for col in 0..used_cols.len() {
        if used_cols[col] {
            continue;
        }
        let a = m[(row, col)];
        if a != T::zero() {
            used_cols[col] = true;
            let term = a * cofactor(m, used_rows, used_cols, k - 1);
            used_cols[col] = false;
            acc = if position % 2 == 0 { acc + term } else { acc - term };
        }
        position += 1;
    }

    used_rows[row] = false;
    acc
}

impl<T: FloatScalar> Matrix<T> {
    /// Determinant with the chosen method.
    ///
    /// Fails with [`Error::NonSquareMatrix`] or, for an empty matrix,
    /// [`Error::DegenerateMatrix`]. [`DeterminantMethod::Lu`] also fails
    /// when the decomposition meets a zero pivot.
    ///
    /// ```
    /// use numkit::{DeterminantMethod, Matrix};
    /// let m = Matrix::<f64>::from_rows(&[
    ///     [2.0, 3.0, -4.0, 2.0, 3.0],
    ///     [6.0, 3.0, 0.0, 0.0, 1.0],
    ///     [7.0, 8.0, 4.0, -5.0, 4.0],
    ///     [2.0, 9.0, 6.0, 0.0, 0.0],
    ///     [-1.0, 0.0, 1.0, 0.0, 4.0],
    /// ]).unwrap();
    /// assert_eq!(m.det(DeterminantMethod::Cofactor).unwrap(), -5870.0);
    /// assert!((m.det(DeterminantMethod::Lu).unwrap() + 5870.0).abs() < 1e-9);
    /// ```
    pub fn det(&self, method: DeterminantMethod) -> Result<T> {
        match method {
            DeterminantMethod::Cofactor => self.det_cofactor(),
            DeterminantMethod::Lu => {
                let n = check_square(self)?;
                match n {
                    1 => Ok(self[(0, 0)]),
                    2 => Ok(self[(0, 0)] * self[(1, 1)] - self[(0, 1)] * self[(1, 0)]),
                    _ => {
                        let (_, u) = self.decompose_lu()?;
                        Ok((0..n).fold(T::one(), |acc, i| acc * u[(i, i)]))
                    }
                }
            }
        }
    }
}
