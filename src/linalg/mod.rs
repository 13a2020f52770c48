//! Decompositions and derived quantities on [`Matrix`](crate::Matrix).
//!
//! - `lu`: Doolittle LU without pivoting (`decompose_lu`, `decompose_lu_into`,
//!   `decompose_lu_packed`)
//! - `det`: determinant by cofactor expansion or from the LU diagonal
//! - `inverse`: inverse by back-substitution against the LU factors
//!
//! No pivoting is performed anywhere. A pivot whose magnitude does not
//! exceed machine epsilon fails with
//! [`Error::DegenerateMatrix`](crate::Error::DegenerateMatrix) instead of
//! reordering rows.

pub(crate) mod det;
pub(crate) mod inverse;
pub(crate) mod lu;


pub use det::DeterminantMethod;

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Square and non-empty, or the matching error.
pub(crate) fn check_square<T>(m: &Matrix<T>) -> Result<usize> {
    if !m.is_square() {
        return Err(Error::NonSquareMatrix {
            rows: m.rows(),
            cols: m.cols(),
        });
    }
    if m.rows() == 0 {
        return Err(Error::DegenerateMatrix("matrix has zero size".into()));
    }
    Ok(m.rows())
}
