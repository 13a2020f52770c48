//! # numkit
//!
//! Dense matrices with a runtime-selectable storage layout, and the
//! numerical algorithms built on them: LU decomposition, determinants,
//! inversion, iterative and direct linear solvers, finite differences,
//! Newton iteration for nonlinear systems, and plane interpolation.
//!
//! ## Quick start
//!
//! ```
//! use numkit::solver::{BiCgStab, LinearSolver};
//! use numkit::{DeterminantMethod, Layout, Matrix};
//!
//! let a = Matrix::<f64>::from_rows(&[
//!     [4.0, 1.0, 0.0],
//!     [1.0, 3.0, 1.0],
//!     [0.0, 1.0, 2.0],
//! ])
//! .unwrap()
//! .to_layout(Layout::ColumnMajor);
//!
//! assert!((a.det(DeterminantMethod::Lu).unwrap() - 18.0).abs() < 1e-12);
//!
//! let b = Matrix::column_vector(vec![1.0, 2.0, 3.0]);
//! let mut x = Matrix::zeros(3, 1);
//! let report = BiCgStab::new().solve(&a, &b, &mut x).unwrap();
//! assert!(report.status.is_converged());
//! assert!((&a * &x).compare(&b, 1e-3));
//! ```
//!
//! ## Modules
//!
//! - [`matrix`]: `Matrix<T>` with row-major or column-major storage chosen
//!   per instance. Arithmetic (fallible `try_*` methods and panicking
//!   operators), slicing, concatenation, transposition, norms. Element-wise
//!   work runs on the rayon pool for large outputs.
//!
//! - [`linalg`]: Doolittle LU without pivoting, determinant by cofactor
//!   expansion or LU, inverse by back-substitution.
//!
//! - [`solver`]: the [`solver::LinearSolver`] contract with BiCGStab and a
//!   direct LU solver, and the [`solver::Secant`] Newton iteration for
//!   `F(x) = 0` with optional box bounds.
//!
//! - [`diff`]: partial derivatives and Jacobians by forward or second-order
//!   finite differences, with bound-aware tap placement.
//!
//! - [`interp`]: interpolators that solve a linear system once and then
//!   evaluate in closed form.
//!
//! - [`compare`]: tolerant equality across numeric types.
//!
//! - [`settings`]: library defaults (target tolerance, worker threads)
//!   passed around as a value.
//!
//! - [`traits`]: element trait hierarchy:
//!   - [`Scalar`]: every matrix element, integers included
//!   - [`FloatScalar`]: real floats, required by decompositions and solvers
//!
//! ## Logging
//!
//! Solvers report through the [`log`](https://docs.rs/log) facade:
//! `debug!` per iteration or solve, `warn!` for suspected divergence and
//! aborted iterations. No logger is installed by the library.
//!
//! ## Cargo features
//!
//! | Feature    | Default | Description |
//! |------------|---------|-------------|
//! | `parallel` | yes     | rayon data-parallel element kernels and `Settings::install` |

pub mod compare;
pub mod diff;
pub mod error;
pub mod interp;
pub mod linalg;
pub mod matrix;
pub mod settings;
pub mod solver;
pub mod traits;

pub use compare::{is_equal, is_equal_with};
pub use error::{Error, Result};
pub use linalg::DeterminantMethod;
pub use matrix::{Axis, Layout, Matrix};
pub use settings::{Settings, ToleranceMode, DEFAULT_TOLERANCE};
pub use traits::{FloatScalar, Scalar};
