use thiserror::Error;

/// Errors raised by matrix construction, linear algebra and the solvers.
///
/// Every fallible operation in the crate validates its arguments before
/// touching any output, so an `Err` never leaves a half-written result
/// behind (the one documented exception is [`Error::TooManyIterations`],
/// where the nonlinear solver writes its last iterate back first).
///
/// ```
/// use numkit::{Error, Matrix};
///
/// let ragged = Matrix::from_rows(&[vec![1.0_f64, 2.0], vec![3.0]]);
/// assert!(matches!(ragged, Err(Error::IncorrectInitializer { row: 1, .. })));
///
/// let m = Matrix::<f64>::zeros(2, 2);
/// assert!(matches!(m.at(2, 0), Err(Error::IndexOutOfBounds { .. })));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Generic precondition violation.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// Row or column index beyond the matrix dimensions.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols} matrix")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Operation requires a square matrix.
    #[error("matrix must be square, got {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    /// Zero-sized matrix or a zero pivot.
    #[error("degenerate matrix: {0}")]
    DegenerateMatrix(String),

    /// Paired arguments disagree on their dimensions.
    #[error("incorrect matrix: {0}")]
    IncorrectMatrix(String),

    #[error("matrices have different row counts: expected {expected}, got {got}")]
    NonEqualRowsNum { expected: usize, got: usize },

    #[error("matrices have different column counts: expected {expected}, got {got}")]
    NonEqualColumnsNum { expected: usize, got: usize },

    #[error("expected a row vector, got a {rows}x{cols} matrix")]
    NonRowVector { rows: usize, cols: usize },

    #[error("expected a column vector, got a {rows}x{cols} matrix")]
    NonColumnVector { rows: usize, cols: usize },

    /// Nested rows of unequal length passed to [`Matrix::from_rows`](crate::Matrix::from_rows).
    #[error("incorrect initializer list: row {row} has {got} elements, expected {expected}")]
    IncorrectInitializer {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// An iterative solver hit its abort ceiling without converging.
    #[error("too many iterations: no convergence after {iterations} iterations")]
    TooManyIterations { iterations: usize },

    #[cfg(feature = "parallel")]
    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),
}

impl Error {
    /// True for the dimension-agreement family: [`Error::IncorrectMatrix`]
    /// and its refinements.
    ///
    /// ```
    /// use numkit::Error;
    /// assert!(Error::NonColumnVector { rows: 1, cols: 3 }.is_incorrect_matrix());
    /// assert!(!Error::InvalidValue("x".into()).is_incorrect_matrix());
    /// ```
    pub fn is_incorrect_matrix(&self) -> bool {
        matches!(
            self,
            Error::IncorrectMatrix(_)
                | Error::NonEqualRowsNum { .. }
                | Error::NonEqualColumnsNum { .. }
                | Error::NonRowVector { .. }
                | Error::NonColumnVector { .. }
        )
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
