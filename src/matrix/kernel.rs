//! Position-indexed element kernels.
//!
//! Every element-wise producer in the crate goes through
//! [`fill_positions`]. It walks the linear storage positions of the
//! *output* matrix, resolves each position to `(row, col)` through the
//! output layout, and writes exactly one element per position. Inputs
//! may use any layout. With the `parallel` feature, large outputs are
//! filled on the rayon pool.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::Matrix;
use crate::traits::Scalar;

/// Smallest output size worth splitting across threads.
#[cfg(feature = "parallel")]
pub(crate) const PARALLEL_MIN_LEN: usize = 4096;

pub(crate) fn fill_positions<T, F>(out: &mut Matrix<T>, f: F)
where
    T: Scalar,
    F: Fn(usize, usize) -> T + Sync + Send,
{
    let (rows, cols, layout) = (out.rows, out.cols, out.layout);
    let write = |(pos, slot): (usize, &mut T)| {
        let (i, j) = layout.coords(pos, rows, cols);
        *slot = f(i, j);
    };

    #[cfg(feature = "parallel")]
    if out.data.len() >= PARALLEL_MIN_LEN {
        out.data.par_iter_mut().enumerate().for_each(write);
        return;
    }

    out.data.iter_mut().enumerate().for_each(write);
}
