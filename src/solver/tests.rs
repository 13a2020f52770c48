use super::*;
use crate::diff::{Bounds, Function};
use crate::settings::ToleranceMode;

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff {})",
        msg,
        a,
        b,
        (a - b).abs()
    );
}

fn shifted_ones(n: usize) -> Matrix<f64> {
    let mut a = Matrix::filled(n, n, 1.0);
    for i in 0..n {
        a[(i, i)] += 10.0;
    }
    a
}

fn tridiagonal() -> Matrix<f64> {
    Matrix::from_rows(&[[4.0, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]]).unwrap()
}

fn quadratic() -> Vec<Function<f64>> {
    vec![Box::new(|x: &Matrix<f64>| 2.0 * x[(0, 0)] * x[(0, 0)] - x[(0, 0)] - 6.0)]
}

fn three_by_three() -> Vec<Function<f64>> {
    vec![
        Box::new(|x: &Matrix<f64>| x[(0, 0)].powi(2) + x[(1, 0)].powi(2) - x[(2, 0)] - 6.0),
        Box::new(|x: &Matrix<f64>| x[(0, 0)] + x[(1, 0)] * x[(2, 0)] - 2.0),
        Box::new(|x: &Matrix<f64>| x[(0, 0)] + x[(1, 0)] + x[(2, 0)] - 3.0),
    ]
}

// ═══════════════════════════════════════════════════════════════════
// BiCGStab
// ═══════════════════════════════════════════════════════════════════

#[test]
fn bicgstab_shifted_ones() {
    let a = shifted_ones(10);
    let b = Matrix::filled(10, 1, 2.0);
    let mut x = Matrix::zeros(10, 1);
    let report = BiCgStab::new().solve(&a, &b, &mut x).unwrap();

    assert_eq!(report.status, SolveStatus::Converged);
    assert!(report.error <= 1e-3);
    for i in 0..10 {
        assert_near(x[(i, 0)], 0.1, 1e-3, "x");
    }
}

#[test]
fn bicgstab_initial_guess_already_solves() {
    let a = shifted_ones(4);
    let b = Matrix::filled(4, 1, 2.0);
    let mut x = Matrix::filled(4, 1, 2.0 / 14.0);
    let report = BiCgStab::new().solve(&a, &b, &mut x).unwrap();
    assert_eq!(report.status, SolveStatus::Converged);
    assert_eq!(report.iterations, 0);
}

#[test]
fn bicgstab_column_major_guess_keeps_layout() {
    let a = tridiagonal().to_layout(crate::matrix::Layout::ColumnMajor);
    let b = Matrix::column_vector(vec![1.0, 2.0, 3.0]);
    let mut x = Matrix::column_vector(vec![0.0, 0.0, 0.0]);
    let report = BiCgStab::new().solve(&a, &b, &mut x).unwrap();
    assert!(report.status.is_converged());
    assert_eq!(x.layout(), crate::matrix::Layout::ColumnMajor);
    assert!(a.try_mul(&x).unwrap().compare(&b, 1e-3));
}

#[test]
fn bicgstab_fixed_iteration_count() {
    let settings = LinearSolverSettings {
        criterion: StoppingCriterion::Iterations,
        max_iter: 1,
        tolerance: 1e-3,
    };
    let solver = BiCgStab::with_settings(settings).unwrap();
    let b = Matrix::column_vector(vec![1.0, 2.0, 3.0]);
    let mut x = Matrix::zeros(3, 1);
    let report = solver.solve(&tridiagonal(), &b, &mut x).unwrap();
    assert_eq!(report.status, SolveStatus::IterationCapReached);
    assert_eq!(report.iterations, 1);
}

#[test]
fn bicgstab_breakdown_on_zero_matrix() {
    let a = Matrix::<f64>::zeros(3, 3);
    let b = Matrix::filled(3, 1, 1.0);
    let mut x = Matrix::zeros(3, 1);
    let report = BiCgStab::new().solve(&a, &b, &mut x).unwrap();
    assert_eq!(report.status, SolveStatus::Breakdown);
    assert_eq!(report.iterations, 0);
    assert_eq!(x, Matrix::zeros(3, 1));
}

#[test]
fn bicgstab_exact_step_converges_under_fixed_iterations() {
    let settings = LinearSolverSettings {
        criterion: StoppingCriterion::Iterations,
        max_iter: 5,
        tolerance: 1e-3,
    };
    let a = Matrix::from_rows(&[[2.0]]).unwrap();
    let b = Matrix::column_vector(vec![4.0]);
    let mut x = Matrix::zeros(1, 1);
    let report = BiCgStab::with_settings(settings)
        .unwrap()
        .solve(&a, &b, &mut x)
        .unwrap();

    assert_eq!(report.status, SolveStatus::Converged);
    assert_eq!(report.iterations, 1);
    assert_eq!(report.error, 0.0);
    assert_eq!(x[(0, 0)], 2.0);
}

#[test]
fn bicgstab_inconsistent_system_is_flagged_divergent() {
    // first equation reads 0 = 2, the residual can only grow
    let a = Matrix::from_rows(&[[0.0, 0.0], [-2.0, 3.0]]).unwrap();
    let b = Matrix::column_vector(vec![2.0, -2.0]);
    let settings = LinearSolverSettings {
        max_iter: 40,
        ..Default::default()
    };
    let mut x = Matrix::zeros(2, 1);
    let report = BiCgStab::with_settings(settings)
        .unwrap()
        .solve(&a, &b, &mut x)
        .unwrap();

    assert_eq!(report.status, SolveStatus::DivergenceSuspected);
    assert_eq!(report.iterations, 40);
    assert!(!report.status.is_converged());
    assert!(report.error > 2.0);
}

#[test]
fn bicgstab_shape_errors_leave_x_alone() {
    let solver = BiCgStab::<f64>::new();
    let b = Matrix::filled(3, 1, 1.0);
    let mut x = Matrix::filled(3, 1, 7.0);

    assert_eq!(
        solver.solve(&Matrix::zeros(3, 2), &b, &mut x).unwrap_err(),
        Error::NonSquareMatrix { rows: 3, cols: 2 }
    );
    assert_eq!(
        solver
            .solve(&tridiagonal(), &Matrix::filled(1, 3, 1.0), &mut x)
            .unwrap_err(),
        Error::NonColumnVector { rows: 1, cols: 3 }
    );
    let mut short = Matrix::zeros(2, 1);
    assert!(matches!(
        solver.solve(&tridiagonal(), &b, &mut short),
        Err(Error::IncorrectMatrix(_))
    ));
    assert!(matches!(
        solver.solve(&Matrix::new(), &Matrix::new(), &mut Matrix::new()),
        Err(Error::DegenerateMatrix(_))
    ));
    assert_eq!(x, Matrix::filled(3, 1, 7.0));
}

#[test]
fn bicgstab_settings_validation() {
    let mut solver = BiCgStab::<f64>::new();
    let bad_tol = LinearSolverSettings {
        tolerance: 0.0,
        ..Default::default()
    };
    assert!(matches!(solver.setup_solver(bad_tol), Err(Error::InvalidValue(_))));
    let direct = LinearSolverSettings::<f64> {
        criterion: StoppingCriterion::Direct,
        ..Default::default()
    };
    assert!(matches!(BiCgStab::with_settings(direct), Err(Error::InvalidValue(_))));

    // Tolerance is not consulted when counting iterations.
    let counted = LinearSolverSettings {
        criterion: StoppingCriterion::Iterations,
        max_iter: 5,
        tolerance: -1.0,
    };
    solver.setup_solver(counted).unwrap();
    assert_eq!(solver.settings().max_iter, 5);
    assert_eq!(solver.method(), "BiCGStab");
}

#[test]
fn linear_settings_from_library_settings() {
    let s = Settings::default().with_target_tolerance(1e-5).unwrap();
    let ls = LinearSolverSettings::<f64>::from_settings(&s);
    assert_eq!(ls.criterion, StoppingCriterion::Tolerance);
    assert_eq!(ls.tolerance, 1e-5);
    assert_eq!(ls.max_iter, 100);
}

// ═══════════════════════════════════════════════════════════════════
// LU
// ═══════════════════════════════════════════════════════════════════

#[test]
fn lu_solver_matches_bicgstab() {
    let a = shifted_ones(6);
    let b = Matrix::column_vector(vec![1.0, -2.0, 3.0, 0.5, 0.0, 4.0]);
    let mut direct = Matrix::zeros(6, 1);
    let mut iterative = Matrix::zeros(6, 1);

    let report = LuSolver::new().solve(&a, &b, &mut direct).unwrap();
    assert_eq!(report.status, SolveStatus::Converged);
    assert!(report.error < 1e-12);

    BiCgStab::new().solve(&a, &b, &mut iterative).unwrap();
    assert!(direct.compare(&iterative, 1e-3));
}

#[test]
fn lu_solver_singular() {
    let a = Matrix::from_rows(&[[1.0, 2.0], [2.0, 4.0]]).unwrap();
    let b = Matrix::filled(2, 1, 1.0);
    let mut x = Matrix::zeros(2, 1);
    assert!(matches!(
        LuSolver::new().solve(&a, &b, &mut x),
        Err(Error::DegenerateMatrix(_))
    ));
}

#[test]
fn lu_solver_is_direct_only() {
    let mut lu = LuSolver::<f64>::new();
    assert_eq!(lu.settings().criterion, StoppingCriterion::Direct);
    assert!(lu.setup_solver(LinearSolverSettings::default()).is_err());
    assert_eq!(lu.method(), "LU");
}

#[test]
fn boxed_solver_clones_are_independent() {
    let original: Box<dyn LinearSolver<f64>> = Box::new(BiCgStab::new());
    let mut copy = original.clone();
    copy.setup_solver(LinearSolverSettings {
        tolerance: 1e-9,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(original.settings().tolerance, 1e-3);
    assert_eq!(copy.settings().tolerance, 1e-9);
}

// ═══════════════════════════════════════════════════════════════════
// Secant
// ═══════════════════════════════════════════════════════════════════

#[test]
fn secant_three_equations() {
    let f = three_by_three();
    let mut x = Matrix::column_vector(vec![1.0, 1.0, 1.0]);
    let report = Secant::new().solve(&f, &mut x, Bounds::none()).unwrap();

    assert!(report.error <= 1e-3);
    for fi in &f {
        assert!(fi(&x).abs() < 1e-3);
    }
}

#[test]
fn secant_scalar_division() {
    let f = quadratic();
    let mut x = Matrix::column_vector(vec![1.0]);
    let report = Secant::new().solve(&f, &mut x, Bounds::none()).unwrap();
    assert_near(x[(0, 0)], 2.0, 1e-3, "root");
    assert_eq!(report.iterations, 4);
}

#[test]
fn secant_respects_bounds() {
    let f: Vec<Function<f64>> = vec![Box::new(|x: &Matrix<f64>| x[(0, 0)] * x[(0, 0)] - 4.0)];
    let lo = Matrix::column_vector(vec![0.0]);
    let hi = Matrix::column_vector(vec![10.0]);
    let mut x = Matrix::column_vector(vec![-5.0]);
    Secant::new().solve(&f, &mut x, Bounds::new(&lo, &hi)).unwrap();
    // Unbounded, the iteration from -5 would find -2.
    assert_near(x[(0, 0)], 2.0, 1e-3, "positive root");
}

#[test]
fn secant_with_lu_inner_solver() {
    let f: Vec<Function<f64>> = vec![
        Box::new(|x: &Matrix<f64>| x[(0, 0)] + x[(1, 0)] - 3.0),
        Box::new(|x: &Matrix<f64>| x[(0, 0)] * x[(1, 0)] - 2.0),
    ];
    let settings = SecantSettings {
        linear_solver: Box::new(LuSolver::new()),
        ..Default::default()
    };
    let solver = Secant::with_settings(settings).unwrap();
    let mut x = Matrix::column_vector(vec![0.0, 5.0]);
    solver.solve(&f, &mut x, Bounds::none()).unwrap();
    assert_near(x[(0, 0)], 1.0, 1e-2, "x0");
    assert_near(x[(1, 0)], 2.0, 1e-2, "x1");
}

#[test]
fn secant_fixed_iteration_count() {
    let settings = SecantSettings {
        criterion: StoppingCriterion::Iterations,
        max_iter: 3,
        ..Default::default()
    };
    let mut x = Matrix::column_vector(vec![1.0]);
    let report = Secant::with_settings(settings)
        .unwrap()
        .solve(&quadratic(), &mut x, Bounds::none())
        .unwrap();
    assert_eq!(report.iterations, 4);
}

#[test]
fn secant_gives_up_and_keeps_latest_iterate() {
    // The relative residual grows as F(x) approaches zero, so it never
    // drops below the tolerance within two iterations.
    let settings = SecantSettings {
        tolerance_mode: ToleranceMode::Relative,
        abort_iter: 2,
        ..Default::default()
    };
    let mut x = Matrix::column_vector(vec![1.0]);
    let err = Secant::with_settings(settings)
        .unwrap()
        .solve(&quadratic(), &mut x, Bounds::none())
        .unwrap_err();
    assert_eq!(err, Error::TooManyIterations { iterations: 3 });
    assert_near(x[(0, 0)], 2.0, 1e-2, "latest iterate");
}

#[test]
fn secant_argument_errors() {
    let solver = Secant::<f64>::new();
    let f = three_by_three();

    let mut wrong_len = Matrix::column_vector(vec![1.0, 1.0]);
    assert!(matches!(
        solver.solve(&f, &mut wrong_len, Bounds::none()),
        Err(Error::IncorrectMatrix(_))
    ));

    let mut row = Matrix::row_vector(vec![1.0, 1.0, 1.0]);
    assert!(matches!(
        solver.solve(&f, &mut row, Bounds::none()),
        Err(Error::NonColumnVector { .. })
    ));

    let mut x = Matrix::column_vector(vec![1.0]);
    assert!(matches!(
        solver.solve(&[], &mut x, Bounds::none()),
        Err(Error::DegenerateMatrix(_))
    ));

    let flat: Vec<Function<f64>> = vec![Box::new(|_: &Matrix<f64>| 5.0)];
    assert!(matches!(
        solver.solve(&flat, &mut x, Bounds::none()),
        Err(Error::DegenerateMatrix(_))
    ));
}

#[test]
fn secant_settings_validation() {
    let zero_step = SecantSettings::<f64> {
        step: 0.0,
        ..Default::default()
    };
    assert!(matches!(Secant::with_settings(zero_step), Err(Error::InvalidValue(_))));

    let direct = SecantSettings::<f64> {
        criterion: StoppingCriterion::Direct,
        ..Default::default()
    };
    let mut solver = Secant::new();
    assert!(matches!(solver.setup_solver(direct), Err(Error::InvalidValue(_))));
    assert_eq!(solver.method(), "Secant");
}

#[test]
fn secant_settings_deep_copy() {
    let original = SecantSettings::<f64>::default();
    let mut copy = original.clone();
    copy.linear_solver
        .setup_solver(LinearSolverSettings {
            tolerance: 1e-9,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(original.linear_solver.settings().tolerance, 1e-6);
    assert_eq!(copy.linear_solver.settings().tolerance, 1e-9);

    let solver: Box<dyn NonlinearSolver<f64>> = Box::new(Secant::new());
    let cloned = solver.clone();
    assert_eq!(cloned.settings().step, 1e-6);
    assert_eq!(cloned.settings().linear_solver.method(), "BiCGStab");
}

#[test]
fn secant_settings_from_library_settings() {
    let s = SecantSettings::<f64>::from_settings(&Settings::default());
    assert_eq!(s.tolerance, 1e-3);
    assert_near(s.step, 1e-6, 1e-15, "step");
    assert_near(s.linear_solver.settings().tolerance, 1e-6, 1e-15, "inner tolerance");
}

#[test]
fn secant_f32() {
    let f: Vec<Function<f32>> = vec![Box::new(|x: &Matrix<f32>| x[(0, 0)] * x[(0, 0)] - 9.0)];
    let mut x = Matrix::column_vector(vec![1.0_f32]);
    Secant::new().solve(&f, &mut x, Bounds::none()).unwrap();
    assert!((x[(0, 0)] - 3.0).abs() < 1e-3);
}
