//! # quadmodel
//!
//! An algebraic modeling core for mixed-integer linear and quadratic
//! programs.
//!
//! quadmodel lets you create decision variables inside a `Problem`, combine
//! them into scalar and vector expressions of degree at most two, state
//! constraints, set an objective, and then extract the dense matrices a
//! solver consumes.
//!
//! ## Quick Start
//!
//! ```ignore
//! use quadmodel::prelude::*;
//!
//! let mut problem = Problem::new("lp");
//! let x = problem.add_variable_vector_classic(3, -1.0, f64::INFINITY, VarKind::Continuous);
//!
//! let a = MatrixExpr::from(DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 2.0]));
//! let lhs = a.multiply_vector(&VectorExpr::from_vars(x.clone()))?;
//! problem.add_constraint(lhs.less_eq(&VectorExpr::constant(vec![4.0]))?)?;
//!
//! let c = VectorExpr::constant(vec![4.0, 3.0, 5.0]).transpose();
//! problem.set_objective(c.inner(&VectorExpr::from_vars(x))?, ObjectiveSense::Maximize)?;
//!
//! assert!(problem.is_linear());
//! let system = problem.linear_inequality_matrices()?;
//! ```
//!
//! ## Expression algebra
//!
//! - **Scalars**: constant, variable, `L'x + C`, `x'Qx + L'x + C`
//! - **Vectors**: constant, variables, `Lx + C`, each with a column/row tag
//! - **Matrices**: constant or variable grids
//!
//! Addition and constant scaling never fail on scalars and are available as
//! operators. Products may exceed degree two and return `Result`.
//!
//! ## Architecture
//!
//! - **Tagged variants** with exhaustive matching on operand pairs
//! - **Alignment** rewrites both operands onto the union of their variables
//! - **Extraction** stacks linear constraints into `A x <= b` and `C x = d`
//! - **Solver boundary** is a trait; no back-end ships with the crate

pub mod canon;
pub mod constraints;
pub mod error;
pub mod expr;
pub mod problem;
pub mod solver;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use quadmodel::prelude::*;
/// ```
pub mod prelude {
    // Expression types
    pub use crate::expr::{
        comparison, multiply, sum, Expression, MatrixExpr, Orientation, ScalarExpr, ScalarLinear,
        ScalarQuadratic, Shape, VarId, VarKind, VarMatrix, VarVector, Variable, VariableBuilder,
        VectorExpr, VectorKind, VectorLinear,
    };

    // Constraints
    pub use crate::constraints::{
        Constraint, ConstraintSense, Implication, ScalarConstraint, VectorConstraint,
    };

    // Problem
    pub use crate::problem::{Objective, ObjectiveSense, Problem};

    // Extraction
    pub use crate::canon::{LinearSystem, ObjectiveTerms, StandardForm};

    // Solver
    pub use crate::solver::{evaluate, value_of, Settings, Solution, SolutionStatus, Solver};

    // Errors
    pub use crate::error::{ModelError, NonLinearCause, Result};

    // Dense primitives
    pub use nalgebra::{DMatrix, DVector};
}

// Re-export main types at crate root
pub use error::{ModelError, Result};
pub use problem::Problem;
pub use solver::{Solution, SolutionStatus};
