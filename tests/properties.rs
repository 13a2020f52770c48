//! Property-based tests for the matrix core using proptest.
//!
//! Covers: transpose involution, layout invariance of arithmetic, LU
//! reconstruction, determinant agreement, inverse round trip, and the
//! direct solver residual.

use numkit::solver::{LinearSolver, LuSolver};
use numkit::{is_equal_with, DeterminantMethod, Layout, Matrix, ToleranceMode};
use proptest::prelude::*;

fn layout(column_major: bool) -> Layout {
    if column_major {
        Layout::ColumnMajor
    } else {
        Layout::RowMajor
    }
}

/// Arbitrary `r x c` matrix with entries in [-100, 100] and either layout.
fn any_matrix(max: usize) -> impl Strategy<Value = Matrix<f64>> {
    (1usize..=max, 1usize..=max).prop_flat_map(|(r, c)| {
        (prop::collection::vec(-100.0f64..100.0, r * c), any::<bool>())
            .prop_map(move |(data, cm)| Matrix::from_vec(r, c, data, layout(cm)).unwrap())
    })
}

/// Strictly diagonally dominant `n x n` matrix: LU needs no pivoting and
/// the matrix is invertible.
fn dominant(max: usize) -> impl Strategy<Value = Matrix<f64>> {
    (1usize..=max).prop_flat_map(|n| {
        (prop::collection::vec(-1.0f64..1.0, n * n), any::<bool>()).prop_map(move |(data, cm)| {
            let mut m = Matrix::from_vec(n, n, data, layout(cm)).unwrap();
            for i in 0..n {
                m[(i, i)] += n as f64 + 1.0;
            }
            m
        })
    })
}

// ── Storage ──────────────────────────────────────────────────────────

proptest! {
    /// Transposing twice restores the matrix, storage included.
    #[test]
    fn transpose_involution(m in any_matrix(8)) {
        let back = m.transpose().transpose();
        prop_assert_eq!(back.layout(), m.layout());
        prop_assert_eq!(back, m);
    }

    /// Sums and products do not depend on the operands' layouts.
    #[test]
    fn arithmetic_ignores_layout(
        (a, b) in (1usize..6, 1usize..6, 1usize..6).prop_flat_map(|(r, k, c)| {
            (
                prop::collection::vec(-10.0f64..10.0, r * k),
                prop::collection::vec(-10.0f64..10.0, k * c),
            )
                .prop_map(move |(x, y)| {
                    (
                        Matrix::from_vec(r, k, x, Layout::RowMajor).unwrap(),
                        Matrix::from_vec(k, c, y, Layout::RowMajor).unwrap(),
                    )
                })
        })
    ) {
        let (ac, bc) = (a.to_layout(Layout::ColumnMajor), b.to_layout(Layout::ColumnMajor));

        let rr = &a * &b;
        prop_assert!(rr.compare(&(&ac * &bc), 0.0));
        prop_assert!(rr.compare(&(&a * &bc), 0.0));
        prop_assert!(rr.compare(&(&ac * &b), 0.0));

        let doubled = &a + &ac;
        prop_assert!(doubled.compare(&a.scale(2.0), 1e-12));
        prop_assert!(a.compare(&ac, 0.0));
    }

    /// Tolerant equality is symmetric in its arguments.
    #[test]
    fn tolerant_equality_is_symmetric(a in -1e6f64..1e6, b in -1e6f64..1e6, eps in 1e-9f64..1.0) {
        for mode in [ToleranceMode::Absolute, ToleranceMode::Relative] {
            prop_assert_eq!(is_equal_with(a, b, eps, mode), is_equal_with(b, a, eps, mode));
        }
    }
}

// ── Decompositions ───────────────────────────────────────────────────

proptest! {
    /// L·U reproduces M, with unit-lower L and upper U.
    #[test]
    fn lu_reconstructs(m in dominant(8)) {
        let (l, u) = m.decompose_lu().unwrap();
        let n = m.rows();
        for i in 0..n {
            prop_assert_eq!(l[(i, i)], 1.0);
            for j in i + 1..n {
                prop_assert_eq!(l[(i, j)], 0.0);
                prop_assert_eq!(u[(j, i)], 0.0);
            }
        }
        prop_assert!((&l * &u).compare(&m, 1e-9));
    }

    /// Cofactor expansion and the LU diagonal give the same determinant.
    #[test]
    fn determinant_methods_agree(m in dominant(6)) {
        let c = m.det(DeterminantMethod::Cofactor).unwrap();
        let l = m.det(DeterminantMethod::Lu).unwrap();
        prop_assert!((c - l).abs() <= 1e-9 * c.abs(), "cofactor {} vs LU {}", c, l);
    }

    /// M·M⁻¹ and M⁻¹·M are the identity.
    #[test]
    fn inverse_round_trip(m in dominant(8)) {
        let inv = m.inverse().unwrap();
        let id = Matrix::<f64>::identity(m.rows());
        prop_assert!((&m * &inv).compare(&id, 1e-4));
        prop_assert!((&inv * &m).compare(&id, 1e-4));
    }

    /// The direct solver leaves a negligible residual.
    #[test]
    fn lu_solver_residual(
        m in dominant(8),
        seed in prop::collection::vec(-5.0f64..5.0, 8),
    ) {
        let n = m.rows();
        let b = Matrix::column_vector(seed[..n].to_vec());
        let mut x = Matrix::zeros(n, 1);
        let report = LuSolver::new().solve(&m, &b, &mut x).unwrap();
        prop_assert!(report.error < 1e-9);
    }
}
