//! End-to-end tests: build problems, check them and extract matrices.
//!
//! Scenarios are defined as data and run programmatically.

use quadmodel::prelude::*;

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-9;

/// An extraction scenario.
struct TestCase {
    name: &'static str,
    /// Builds the problem and returns it with the expected `(A, b)` of the
    /// inequality system.
    build: fn() -> (Problem, DMatrix<f64>, DVector<f64>),
}

/// Three variables bounded below by -1, as in the classic LP example:
/// maximize 4x1 + 3x2 + 5x3 subject to three `<=` rows.
fn lp_example() -> (Problem, VarVector) {
    let mut p = Problem::new("lp-example");
    let x = p.add_variable_vector_classic(3, -1.0, f64::INFINITY, VarKind::Continuous);
    let (x1, x2, x3) = (&x.as_slice()[0], &x.as_slice()[1], &x.as_slice()[2]);

    p.add_constraint((x1 + 2.0 * x2 + 2.0 * x3).less_eq(4.0)).expect("known variables");
    p.add_constraint((3.0 * x1 + 4.0 * x3).less_eq(6.0)).expect("known variables");
    p.add_constraint((2.0 * x1 + x2 + 4.0 * x3).less_eq(8.0)).expect("known variables");
    p.set_objective(4.0 * x1 + 3.0 * x2 + 5.0 * x3, ObjectiveSense::Maximize)
        .expect("scalar objective");
    (p, x)
}

fn inequality_test_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            name: "lp_example",
            build: || {
                let (p, _) = lp_example();
                (
                    p,
                    DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 2.0, 3.0, 0.0, 4.0, 2.0, 1.0, 4.0]),
                    DVector::from_vec(vec![4.0, 6.0, 8.0]),
                )
            },
        },
        TestCase {
            name: "non_negativity_rows",
            build: || {
                // x_i >= 0 turns into -x_i <= 0 below the original rows
                let (mut p, x) = lp_example();
                for v in x.iter() {
                    p.add_constraint(ScalarExpr::from(v).greater_eq(0.0)).expect("known variables");
                }
                (
                    p,
                    DMatrix::from_row_slice(
                        6,
                        3,
                        &[
                            1.0, 2.0, 2.0, //
                            3.0, 0.0, 4.0, //
                            2.0, 1.0, 4.0, //
                            -1.0, 0.0, 0.0, //
                            0.0, -1.0, 0.0, //
                            0.0, 0.0, -1.0,
                        ],
                    ),
                    DVector::from_vec(vec![4.0, 6.0, 8.0, 0.0, 0.0, 0.0]),
                )
            },
        },
        TestCase {
            name: "matrix_times_vector",
            build: || {
                // A x <= b as a single vector constraint
                let mut p = Problem::new("vector");
                let x = p.add_variable_vector(3);
                let a = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 1.0, 0.0, 2.0, 0.0]);
                let ax = MatrixExpr::from(a.clone())
                    .multiply_vector(&VectorExpr::from_vars(x))
                    .expect("compatible shapes");
                let b = VectorExpr::constant(vec![1.0, 2.0]);
                p.add_constraint(ax.less_eq(&b).expect("same shape")).expect("known variables");
                (p, a, DVector::from_vec(vec![1.0, 2.0]))
            },
        },
        TestCase {
            name: "vector_greater_eq_with_offset",
            build: || {
                // x + 1 >= y  ->  -x + y <= 1 per row
                let mut p = Problem::new("offset");
                let x = p.add_variable_vector(2);
                let y = p.add_variable_vector(2);
                let lhs = VectorExpr::from_vars(x)
                    .plus(&VectorExpr::ones(2))
                    .expect("same shape");
                let c = lhs.greater_eq(&VectorExpr::from_vars(y)).expect("same shape");
                p.add_constraint(c).expect("known variables");
                (
                    p,
                    DMatrix::from_row_slice(
                        2,
                        4,
                        &[-1.0, 0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 1.0],
                    ),
                    DVector::from_vec(vec![1.0, 1.0]),
                )
            },
        },
    ]
}

#[test]
fn test_inequality_extraction() {
    for case in inequality_test_cases() {
        let (p, a, b) = (case.build)();

        assert!(p.is_linear(), "Problem '{}' should be linear", case.name);

        let sys = p.linear_inequality_matrices();
        assert!(sys.is_ok(), "Problem '{}' should extract: {:?}", case.name, sys.err());
        let sys = sys.expect("checked above");

        assert_eq!(
            sys.ncols(),
            p.num_variables(),
            "Problem '{}' should have one column per variable",
            case.name
        );
        assert_eq!(sys.a, a, "Problem '{}': wrong A", case.name);
        assert_eq!(sys.b, b, "Problem '{}': wrong b", case.name);
    }
}

#[test]
fn test_lp_example_has_no_equalities() {
    let (p, _) = lp_example();
    assert!(p.check().is_ok());
    let eq = p.linear_equality_matrices().expect("extract");
    assert!(eq.is_empty());
    assert_eq!(eq.ncols(), 3);
    assert!(matches!(
        p.require_equality_matrices(),
        Err(ModelError::NoEqualityConstraintsFound)
    ));
}

#[test]
fn test_lp_example_standard_form() {
    let (p, _) = lp_example();
    let form = p.linear_program().expect("linear problem");
    assert_eq!(form.objective.l, DVector::from_vec(vec![4.0, 3.0, 5.0]));
    assert_eq!(form.objective.sense, ObjectiveSense::Maximize);
    assert_eq!(form.lower, DVector::from_element(3, -1.0));
    assert!(form.upper.iter().all(|u| u.is_infinite()));
    assert!(!form.is_mixed_integer());
}

#[test]
fn test_quadratic_objective() {
    let mut p = Problem::new("qp");
    let x = p.add_real_variable();
    let y = p.add_real_variable();
    let (sx, sy) = (ScalarExpr::from(&x), ScalarExpr::from(&y));

    let x2 = sx.multiply(&sx).expect("degree 2");
    let y2 = sy.multiply(&sy).expect("degree 2");
    let obj = x2 + y2 + &x + &y + 3.14;
    p.set_objective(obj.clone(), ObjectiveSense::Minimize).expect("scalar objective");

    assert!(!p.is_linear());
    assert!(p.check().is_ok());

    assert_eq!(obj.quadratic_coefficients(), DMatrix::identity(2, 2));
    assert_eq!(obj.coefficients(), DVector::from_vec(vec![1.0, 1.0]));
    assert!((obj.constant() - 3.14).abs() < TOL);

    let terms = p.objective_terms().expect("objective set");
    assert_eq!(terms.q, DMatrix::identity(2, 2));
    assert_eq!(terms.l, DVector::from_vec(vec![1.0, 1.0]));
    assert!((terms.c - 3.14).abs() < TOL);
}

#[test]
fn test_check_wraps_malformed_constraint() {
    let mut p = Problem::new("malformed");
    let x = p.add_real_variable();
    p.set_objective(&x, ObjectiveSense::Find).expect("scalar objective");
    let bad = ScalarLinear {
        l: DVector::from_vec(vec![1.0, 1.0]),
        x: VarVector::new(vec![x.clone()]),
        c: 0.0,
    };
    p.add_constraint(ScalarExpr::Linear(bad).less_eq(1.0)).expect("known variables");

    let err = p.check().expect_err("malformed constraint");
    match err {
        ModelError::NotWellDefined { ref context, ref source } => {
            assert_eq!(context, "constraint 0");
            assert_eq!(source.code(), "MALFORMED_EXPRESSION");
        }
        other => panic!("Expected NotWellDefined, got {other:?}"),
    }
}

#[test]
fn test_evaluate_solution() {
    let mut p = Problem::new("eval");
    let x = p.add_variable_vector(2);
    let (x0, x1) = (&x.as_slice()[0], &x.as_slice()[1]);
    let e = 2.0 * x0 + x1 + 1.0;

    let solution = Solution::new(SolutionStatus::Optimal)
        .with_value(x0.id, 2.0)
        .with_value(x1.id, 3.0);
    assert_eq!(evaluate(&solution, &e).expect("all values present"), 8.0);
    assert_eq!(value_of(&solution, x1).expect("present"), 3.0);
}

#[test]
fn test_malformed_expression_errors_instead_of_panicking() {
    let mut p = Problem::new("malformed");
    let x = p.add_variable_vector(2);
    let bad = ScalarExpr::Linear(ScalarLinear {
        l: DVector::from_element(1, 1.0),
        x: x.clone(),
        c: 0.0,
    });
    p.add_constraint(bad.less_eq(1.0)).expect("known variables");

    let err = p.linear_inequality_matrices().expect_err("malformed row");
    assert!(
        matches!(&err, ModelError::NotWellDefined { source, .. } if source.code() == "MALFORMED_EXPRESSION"),
        "Unexpected error: {err:?}"
    );

    let solution = x
        .iter()
        .fold(Solution::new(SolutionStatus::Optimal), |s, v| s.with_value(v.id, 1.0));
    assert!(matches!(
        evaluate(&solution, &bad),
        Err(ModelError::MalformedExpression(_))
    ));
}
