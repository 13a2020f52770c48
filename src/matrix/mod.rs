//! Heap-allocated dense matrix with a per-instance storage layout.

mod block;
pub(crate) mod kernel;
mod ops;
mod util;

use core::ops::{Index, IndexMut};

use crate::error::{Error, Result};
use crate::traits::Scalar;

/// Storage order of a [`Matrix`].
///
/// The layout only decides where `(row, col)` lives in the flat storage;
/// every public operation sees the same logical matrix either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Layout {
    /// `row * cols + col`
    #[default]
    RowMajor,
    /// `row + rows * col`
    ColumnMajor,
}

impl Layout {
    /// Linear storage index of `(row, col)` in a `rows x cols` matrix.
    #[inline]
    pub fn index(self, row: usize, col: usize, rows: usize, cols: usize) -> usize {
        match self {
            Layout::RowMajor => row * cols + col,
            Layout::ColumnMajor => row + rows * col,
        }
    }

    /// Inverse of [`index`](Self::index): the `(row, col)` stored at `pos`.
    #[inline]
    pub fn coords(self, pos: usize, rows: usize, cols: usize) -> (usize, usize) {
        match self {
            Layout::RowMajor => (pos / cols, pos % cols),
            Layout::ColumnMajor => (pos % rows, pos / rows),
        }
    }
}

/// Direction used by concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Stack matrices on top of each other (row counts add up).
    Row,
    /// Place matrices side by side (column counts add up).
    Column,
}

/// Dense heap-allocated matrix with a storage layout chosen at runtime.
///
/// Each matrix owns its storage exclusively and copies are deep. The
/// invariant `data.len() == rows * cols` holds at all times.
///
/// Indexing with `m[(row, col)]` panics when out of bounds; [`at`](Self::at)
/// returns an error instead.
///
/// # Examples
///
/// ```
/// use numkit::{Layout, Matrix};
///
/// let a = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
/// assert_eq!(a[(1, 0)], 4);
/// assert_eq!(a.rows(), 2);
/// assert_eq!(a.cols(), 3);
///
/// let b = a.to_layout(Layout::ColumnMajor);
/// assert_eq!(b.as_slice(), &[1, 4, 2, 5, 3, 6]);
/// assert!(a.compare(&b, 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Matrix<T> {
    pub(crate) data: Vec<T>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) layout: Layout,
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw equality: same dimensions and the same storage vector.
///
/// Layout is not consulted, so a row-major and a column-major matrix
/// holding the same logical values generally compare unequal here. Use
/// [`Matrix::compare`] for a layout-independent check.
impl<T: PartialEq> PartialEq for Matrix<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }
}

// ── Constructors ────────────────────────────────────────────────────

impl<T> Matrix<T> {
    /// Empty `0 x 0` row-major matrix.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols: 0,
            layout: Layout::RowMajor,
        }
    }
}

impl<T: Scalar> Matrix<T> {
    /// `rows x cols` row-major matrix of zeros.
    ///
    /// ```
    /// use numkit::Matrix;
    /// let m = Matrix::<f64>::zeros(2, 3);
    /// assert_eq!(m.numel(), 6);
    /// assert_eq!(m[(1, 2)], 0.0);
    /// ```
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::with_layout(rows, cols, Layout::RowMajor)
    }

    /// `rows x cols` matrix of zeros in the given layout.
    pub fn with_layout(rows: usize, cols: usize, layout: Layout) -> Self {
        Self {
            data: vec![T::zero(); rows * cols],
            rows,
            cols,
            layout,
        }
    }

    /// `size x size` matrix of zeros in the given layout.
    pub fn square(size: usize, layout: Layout) -> Self {
        Self::with_layout(size, size, layout)
    }

    /// `rows x cols` row-major matrix with every element set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            rows,
            cols,
            layout: Layout::RowMajor,
        }
    }

    /// `n x n` identity.
    ///
    /// ```
    /// use numkit::Matrix;
    /// let id = Matrix::<i32>::identity(3);
    /// assert_eq!(id[(2, 2)], 1);
    /// assert_eq!(id[(0, 2)], 0);
    /// ```
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = T::one();
        }
        m
    }

    /// Wrap existing storage. `data` is interpreted in `layout` order.
    ///
    /// Fails with [`Error::InvalidValue`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>, layout: Layout) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidValue(format!(
                "storage of length {} does not fit a {}x{} matrix",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self {
            data,
            rows,
            cols,
            layout,
        })
    }

    /// `n x 1` column-major column vector.
    ///
    /// ```
    /// use numkit::{Layout, Matrix};
    /// let v = Matrix::column_vector(vec![1.0, 2.0, 3.0]);
    /// assert!(v.is_column_vector());
    /// assert_eq!(v.layout(), Layout::ColumnMajor);
    /// assert_eq!(v[(2, 0)], 3.0);
    /// ```
    pub fn column_vector(data: Vec<T>) -> Self {
        let rows = data.len();
        Self {
            data,
            rows,
            cols: 1,
            layout: Layout::ColumnMajor,
        }
    }

    /// `1 x n` row-major row vector.
    pub fn row_vector(data: Vec<T>) -> Self {
        let cols = data.len();
        Self {
            data,
            rows: 1,
            cols,
            layout: Layout::RowMajor,
        }
    }

    /// Row-major matrix from nested rows.
    ///
    /// All rows must have the same length, otherwise
    /// [`Error::IncorrectInitializer`] names the first offending row.
    /// An empty outer slice yields the empty matrix.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != ncols {
                return Err(Error::IncorrectInitializer {
                    row: i,
                    expected: ncols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: nrows,
            cols: ncols,
            layout: Layout::RowMajor,
        })
    }

    /// Build a matrix by evaluating `f(row, col)` at every position.
    ///
    /// ```
    /// use numkit::{Layout, Matrix};
    /// let m = Matrix::from_fn(2, 2, Layout::ColumnMajor, |i, j| (10 * i + j) as f64);
    /// assert_eq!(m[(1, 0)], 10.0);
    /// assert_eq!(m.as_slice(), &[0.0, 10.0, 1.0, 11.0]);
    /// ```
    pub fn from_fn<F>(rows: usize, cols: usize, layout: Layout, f: F) -> Self
    where
        F: Fn(usize, usize) -> T + Sync + Send,
    {
        let mut m = Self::with_layout(rows, cols, layout);
        kernel::fill_positions(&mut m, f);
        m
    }
}

// ── Shape and storage ───────────────────────────────────────────────

impl<T> Matrix<T> {
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of elements.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    #[inline]
    pub fn is_row_vector(&self) -> bool {
        self.rows == 1
    }

    #[inline]
    pub fn is_column_vector(&self) -> bool {
        self.cols == 1
    }

    /// Flat storage in [`layout`](Self::layout) order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Storage index of `(row, col)`, no bounds check.
    #[inline]
    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        self.layout.index(row, col, self.rows, self.cols)
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.offset(row, col))
    }

    /// Bounds-checked mutable access.
    pub fn at_mut(&mut self, row: usize, col: usize) -> Result<&mut T> {
        let pos = self.check_bounds(row, col)?;
        Ok(&mut self.data[pos])
    }
}

impl<T: Copy> Matrix<T> {
    /// Bounds-checked read.
    ///
    /// ```
    /// use numkit::{Error, Matrix};
    /// let m = Matrix::filled(2, 2, 7);
    /// assert_eq!(m.at(1, 1), Ok(7));
    /// assert!(matches!(m.at(0, 2), Err(Error::IndexOutOfBounds { .. })));
    /// ```
    pub fn at(&self, row: usize, col: usize) -> Result<T> {
        let pos = self.check_bounds(row, col)?;
        Ok(self.data[pos])
    }

    /// Bounds-checked write.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        *self.at_mut(row, col)? = value;
        Ok(())
    }

    /// Element at `(row, col)` without the panic message of `Index`.
    #[inline]
    pub(crate) fn value(&self, row: usize, col: usize) -> T {
        self.data[self.offset(row, col)]
    }
}

impl<T: Scalar> Matrix<T> {
    /// Copy of `self` stored in `layout`.
    pub fn to_layout(&self, layout: Layout) -> Self {
        if layout == self.layout {
            return self.clone();
        }
        Self::from_fn(self.rows, self.cols, layout, |i, j| self.value(i, j))
    }

    /// Re-lay the storage in place; logical values are unchanged.
    pub fn set_layout(&mut self, layout: Layout) {
        if layout != self.layout {
            *self = self.to_layout(layout);
        }
    }
}

// ── Index ───────────────────────────────────────────────────────────

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.data[self.offset(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        let pos = self.offset(row, col);
        &mut self.data[pos]
    }
}
