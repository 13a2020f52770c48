use super::{kernel, Axis, Layout, Matrix};
use crate::error::{Error, Result};
use crate::traits::Scalar;

impl<T: Scalar> Matrix<T> {
    /// Sub-matrix over inclusive row and column ranges.
    ///
    /// A range may run backwards (`row_begin > row_end`), in which case the
    /// rows (or columns) come out in reverse order. The result keeps
    /// `self`'s layout.
    ///
    /// ```
    /// use numkit::{Layout, Matrix};
    /// let m = Matrix::from_fn(4, 4, Layout::RowMajor, |i, j| (4 * i + j + 1) as i32);
    /// let s = m.slice(1, 0, 2, 1).unwrap();
    /// assert_eq!(s, Matrix::from_rows(&[[7, 6], [3, 2]]).unwrap());
    /// assert!(m.slice(0, 4, 0, 0).is_err());
    /// ```
    pub fn slice(
        &self,
        row_begin: usize,
        row_end: usize,
        col_begin: usize,
        col_end: usize,
    ) -> Result<Matrix<T>> {
        for (row, col) in [(row_begin, col_begin), (row_end, col_end)] {
            if row >= self.rows || col >= self.cols {
                return Err(Error::IndexOutOfBounds {
                    row,
                    col,
                    rows: self.rows,
                    cols: self.cols,
                });
            }
        }

        let source = |begin: usize, end: usize, k: usize| {
            if begin <= end {
                begin + k
            } else {
                begin - k
            }
        };
        let rows = row_begin.abs_diff(row_end) + 1;
        let cols = col_begin.abs_diff(col_end) + 1;

        let mut out = Matrix::with_layout(rows, cols, self.layout);
        kernel::fill_positions(&mut out, |i, j| {
            self.value(source(row_begin, row_end, i), source(col_begin, col_end, j))
        });
        Ok(out)
    }

    /// Concatenate `matrices` along `axis` into a new matrix stored in `layout`.
    ///
    /// Along [`Axis::Row`] all inputs need the same column count
    /// ([`Error::NonEqualColumnsNum`] otherwise); along [`Axis::Column`]
    /// the same row count ([`Error::NonEqualRowsNum`]). Inputs may mix
    /// layouts. An empty list yields an empty matrix.
    ///
    /// ```
    /// use numkit::{Axis, Layout, Matrix};
    /// let a = Matrix::from_rows(&[[1, 2], [3, 4]]).unwrap();
    /// let b = Matrix::row_vector(vec![5, 6]);
    /// let c = Matrix::concatenate(&[a, b], Axis::Row, Layout::ColumnMajor).unwrap();
    /// assert_eq!((c.rows(), c.cols()), (3, 2));
    /// assert_eq!(c[(2, 1)], 6);
    /// ```
    pub fn concatenate(matrices: &[Matrix<T>], axis: Axis, layout: Layout) -> Result<Matrix<T>> {
        let refs: Vec<&Matrix<T>> = matrices.iter().collect();
        concatenate_refs(&refs, axis, layout)
    }

    /// Concatenate `self` followed by `others` along `axis`, storing the
    /// result back into `self` with its current layout.
    ///
    /// `self` is left unchanged if the dimensions disagree.
    pub fn concatenate_in_place(&mut self, others: &[Matrix<T>], axis: Axis) -> Result<()> {
        let mut refs: Vec<&Matrix<T>> = Vec::with_capacity(others.len() + 1);
        refs.push(&*self);
        refs.extend(others.iter());
        let joined = concatenate_refs(&refs, axis, self.layout)?;
        *self = joined;
        Ok(())
    }
}

fn concatenate_refs<T: Scalar>(
    matrices: &[&Matrix<T>],
    axis: Axis,
    layout: Layout,
) -> Result<Matrix<T>> {
    let Some(first) = matrices.first() else {
        return Ok(Matrix::with_layout(0, 0, layout));
    };

    // Along the concatenation axis: prefix sums of the stacked extent.
    let mut offsets = Vec::with_capacity(matrices.len() + 1);
    offsets.push(0usize);
    for m in matrices {
        match axis {
            Axis::Row if m.cols != first.cols => {
                return Err(Error::NonEqualColumnsNum {
                    expected: first.cols,
                    got: m.cols,
                });
            }
            Axis::Column if m.rows != first.rows => {
                return Err(Error::NonEqualRowsNum {
                    expected: first.rows,
                    got: m.rows,
                });
            }
            Axis::Row => offsets.push(offsets[offsets.len() - 1] + m.rows),
            Axis::Column => offsets.push(offsets[offsets.len() - 1] + m.cols),
        }
    }
    let total = offsets[offsets.len() - 1];

    // The source of a stacked index `k` is the last matrix whose offset is
    // <= k; empty inputs share an offset with their successor and are skipped.
    let locate = |k: usize| {
        let src = offsets.partition_point(|&o| o <= k) - 1;
        (src, k - offsets[src])
    };

    let (rows, cols) = match axis {
        Axis::Row => (total, first.cols),
        Axis::Column => (first.rows, total),
    };
    let mut out = Matrix::with_layout(rows, cols, layout);
    kernel::fill_positions(&mut out, |i, j| match axis {
        Axis::Row => {
            let (src, local) = locate(i);
            matrices[src].value(local, j)
        }
        Axis::Column => {
            let (src, local) = locate(j);
            matrices[src].value(i, local)
        }
    });
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Matrix<f64> {
        Matrix::from_rows(&[[2.0, -1.0, 1.0], [4.0, 3.0, 1.0], [6.0, -13.0, 6.0]]).unwrap()
    }

    #[test]
    fn slice_forward_and_reverse() {
        let m = Matrix::from_fn(4, 4, Layout::ColumnMajor, |i, j| (4 * i + j + 1) as i32);
        let fwd = m.slice(1, 2, 1, 3).unwrap();
        assert_eq!(fwd.layout(), Layout::ColumnMajor);
        assert!(fwd.compare(&Matrix::from_rows(&[[6, 7, 8], [10, 11, 12]]).unwrap(), 0.0));

        let rev = m.slice(3, 0, 0, 0).unwrap();
        assert!(rev.compare(&Matrix::column_vector(vec![13, 9, 5, 1]), 0.0));

        let one = m.slice(2, 2, 3, 3).unwrap();
        assert_eq!(one.as_slice(), &[12]);
    }

    #[test]
    fn slice_out_of_bounds() {
        let m = Matrix::<f64>::zeros(2, 2);
        assert!(matches!(m.slice(0, 1, 2, 0), Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn concatenate_rows_and_columns() {
        let m = block();
        let rows_truth = Matrix::from_rows(&[
            [2.0, -1.0, 1.0],
            [4.0, 3.0, 1.0],
            [6.0, -13.0, 6.0],
            [2.0, -1.0, 1.0],
            [4.0, 3.0, 1.0],
            [6.0, -13.0, 6.0],
            [2.0, -1.0, 1.0],
            [4.0, 3.0, 1.0],
            [6.0, -13.0, 6.0],
        ])
        .unwrap();
        let cols_truth = Matrix::from_rows(&[
            [2.0, -1.0, 1.0, 2.0, -1.0, 1.0, 2.0, -1.0, 1.0],
            [4.0, 3.0, 1.0, 4.0, 3.0, 1.0, 4.0, 3.0, 1.0],
            [6.0, -13.0, 6.0, 6.0, -13.0, 6.0, 6.0, -13.0, 6.0],
        ])
        .unwrap();
        let three = [m.clone(), m.clone(), m.clone()];

        let by_rows = Matrix::concatenate(&three, Axis::Row, Layout::RowMajor).unwrap();
        assert!(by_rows.compare(&rows_truth, 1e-4));
        let by_cols = Matrix::concatenate(&three, Axis::Column, Layout::ColumnMajor).unwrap();
        assert!(by_cols.compare(&cols_truth, 1e-4));

        let mut in_place = m.clone();
        in_place
            .concatenate_in_place(&[m.clone(), m.clone()], Axis::Row)
            .unwrap();
        assert!(in_place.compare(&rows_truth, 1e-4));

        let mut in_place = m.clone();
        in_place
            .concatenate_in_place(&[m.clone(), m.clone()], Axis::Column)
            .unwrap();
        assert!(in_place.compare(&cols_truth, 1e-4));
    }

    #[test]
    fn concatenate_skips_empty_inputs() {
        let a = Matrix::from_rows(&[[1, 2]]).unwrap();
        let empty = Matrix::<i32>::zeros(0, 2);
        let b = Matrix::from_rows(&[[3, 4]]).unwrap();
        let c = Matrix::concatenate(&[empty.clone(), a, empty, b], Axis::Row, Layout::RowMajor)
            .unwrap();
        assert_eq!(c, Matrix::from_rows(&[[1, 2], [3, 4]]).unwrap());
    }

    #[test]
    fn concatenate_dimension_mismatch() {
        let a = Matrix::<f64>::zeros(2, 2);
        let b = Matrix::<f64>::zeros(2, 3);
        assert_eq!(
            Matrix::concatenate(&[a.clone(), b.clone()], Axis::Row, Layout::RowMajor),
            Err(Error::NonEqualColumnsNum {
                expected: 2,
                got: 3
            })
        );
        assert!(Matrix::concatenate(&[a.clone(), b.transpose()], Axis::Column, Layout::RowMajor)
            .is_err());

        let mut c = a.clone();
        assert!(c.concatenate_in_place(&[b], Axis::Row).is_err());
        assert_eq!(c, a);
    }

    #[test]
    fn concatenate_nothing() {
        let c = Matrix::<f64>::concatenate(&[], Axis::Row, Layout::ColumnMajor).unwrap();
        assert!(c.is_empty());
    }
}
