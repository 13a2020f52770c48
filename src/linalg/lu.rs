use super::check_square;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

impl<T: FloatScalar> Matrix<T> {
    /// Doolittle LU decomposition `self = L * U` without pivoting.
    ///
    /// `L` is unit lower-triangular and `U` upper-triangular, both in
    /// `self`'s layout. Fails with [`Error::NonSquareMatrix`],
    /// [`Error::DegenerateMatrix`] for an empty matrix, or
    /// [`Error::DegenerateMatrix`] when a pivot `U[j][j]` that must be
    /// divided by is numerically zero.
    ///
    /// ```
    /// use numkit::Matrix;
    /// let m = Matrix::from_rows(&[[2.0, -1.0, 1.0], [4.0, 3.0, 1.0], [6.0, -13.0, 6.0]]).unwrap();
    /// let (l, u) = m.decompose_lu().unwrap();
    /// assert_eq!(l, Matrix::from_rows(&[[1.0, 0.0, 0.0], [2.0, 1.0, 0.0], [3.0, -2.0, 1.0]]).unwrap());
    /// assert_eq!(u, Matrix::from_rows(&[[2.0, -1.0, 1.0], [0.0, 5.0, -1.0], [0.0, 0.0, 1.0]]).unwrap());
    /// assert!((&l * &u).compare(&m, 1e-12));
    /// ```
    pub fn decompose_lu(&self) -> Result<(Matrix<T>, Matrix<T>)> {
        let n = check_square(self)?;
        let mut l = Matrix::with_layout(n, n, self.layout());
        let mut u = Matrix::with_layout(n, n, self.layout());
        for i in 0..n {
            l[(i, i)] = T::one();
        }

        for i in 0..n {
            for j in 0..n {
                if i <= j {
                    let s = (0..i).fold(T::zero(), |acc, k| acc + l[(i, k)] * u[(k, j)]);
                    u[(i, j)] = self[(i, j)] - s;
                } else {
                    let pivot = u[(j, j)];
                    if pivot.abs() <= T::epsilon() {
                        return Err(Error::DegenerateMatrix(format!(
                            "zero pivot at ({j}, {j}) in LU decomposition"
                        )));
                    }
                    let s = (0..j).fold(T::zero(), |acc, k| acc + l[(i, k)] * u[(k, j)]);
                    l[(i, j)] = (self[(i, j)] - s) / pivot;
                }
            }
        }
        Ok((l, u))
    }

    /// [`decompose_lu`](Self::decompose_lu) writing into caller-provided
    /// matrices, which keep their own layouts.
    ///
    /// Both must already be `n x n` ([`Error::IncorrectMatrix`] otherwise).
    /// Neither is modified when an error is returned.
    pub fn decompose_lu_into(&self, lower: &mut Matrix<T>, upper: &mut Matrix<T>) -> Result<()> {
        let n = check_square(self)?;
        for (name, m) in [("lower", &*lower), ("upper", &*upper)] {
            if m.rows() != n || m.cols() != n {
                return Err(Error::IncorrectMatrix(format!(
                    "{name} factor is {}x{}, expected {n}x{n}",
                    m.rows(),
                    m.cols()
                )));
            }
        }
        let (l, u) = self.decompose_lu()?;
        *lower = l.to_layout(lower.layout());
        *upper = u.to_layout(upper.layout());
        Ok(())
    }

    /// Both LU factors packed into one matrix: `L + U - I`.
    ///
    /// ```
    /// use numkit::Matrix;
    /// let m = Matrix::from_rows(&[[2.0, -1.0, 1.0], [4.0, 3.0, 1.0], [6.0, -13.0, 6.0]]).unwrap();
    /// let packed = m.decompose_lu_packed().unwrap();
    /// assert_eq!(packed, Matrix::from_rows(&[[2.0, -1.0, 1.0], [2.0, 5.0, -1.0], [3.0, -2.0, 1.0]]).unwrap());
    /// ```
    pub fn decompose_lu_packed(&self) -> Result<Matrix<T>> {
        let (l, u) = self.decompose_lu()?;
        let mut packed = l.try_add(&u)?;
        for i in 0..packed.rows() {
            packed[(i, i)] = packed[(i, i)] - T::one();
        }
        Ok(packed)
    }
}
