use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::traits::FloatScalar;

impl<T: FloatScalar> Matrix<T> {
    /// Inverse via back-substitution against the LU factors.
    ///
    /// With `X = M⁻¹`, `U·X = L⁻¹` and `X·L = U⁻¹`. Working from the last
    /// diagonal entry backwards, each step fills the diagonal element,
    /// then the column above it, then the row left of it. Everything it
    /// reads was filled by an earlier step.
    ///
    /// Fails with [`Error::NonSquareMatrix`] or [`Error::DegenerateMatrix`]
    /// (empty matrix or zero pivot).
    ///
    /// ```
    /// use numkit::Matrix;
    /// let m = Matrix::<f64>::from_rows(&[[4.0, 7.0], [2.0, 6.0]]).unwrap();
    /// let inv = m.inverse().unwrap();
    /// assert!((&m * &inv).compare(&Matrix::<f64>::identity(2), 1e-12));
    /// ```
    pub fn inverse(&self) -> Result<Matrix<T>> {
        let (l, u) = self.decompose_lu()?;
        let n = self.rows();

        if let Some(i) = (0..n).find(|&i| u[(i, i)].abs() <= T::epsilon()) {
            return Err(Error::DegenerateMatrix(format!(
                "zero pivot at ({i}, {i}), matrix is singular"
            )));
        }

        let mut x = Matrix::with_layout(n, n, self.layout());
        for d in (0..n).rev() {
            let s = (d + 1..n).fold(T::zero(), |acc, k| acc + u[(d, k)] * x[(k, d)]);
            x[(d, d)] = (T::one() - s) / u[(d, d)];

            for i in (0..d).rev() {
                let s = (i + 1..n).fold(T::zero(), |acc, k| acc + u[(i, k)] * x[(k, d)]);
                x[(i, d)] = -s / u[(i, i)];
            }

            for j in (0..d).rev() {
                let s = (j + 1..n).fold(T::zero(), |acc, k| acc + x[(d, k)] * l[(k, j)]);
                x[(d, j)] = -s;
            }
        }
        Ok(x)
    }
}
