//! Error types for quadmodel.

use std::fmt;

use thiserror::Error;

use crate::expr::{Orientation, Shape, VarId};

/// Which part of a problem keeps it from being linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonLinearCause {
    /// The objective is quadratic.
    Objective,
    /// The constraint at this insertion index is quadratic.
    Constraint(usize),
    /// Linearity cannot be decided, e.g. no objective has been set.
    NotWellDefined,
}

impl fmt::Display for NonLinearCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NonLinearCause::Objective => write!(f, "objective is not linear"),
            NonLinearCause::Constraint(i) => write!(f, "constraint {i} is not linear"),
            NonLinearCause::NotWellDefined => write!(f, "problem is not well defined"),
        }
    }
}

/// Error type for quadmodel operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Shapes of the operands are incompatible.
    #[error("Dimension mismatch in {operation}: {lhs} vs {rhs}")]
    DimensionMismatch {
        operation: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// Vector orientations are incompatible.
    #[error("Orientation mismatch in {operation}: {lhs} vs {rhs}")]
    OrientationMismatch {
        operation: &'static str,
        lhs: Orientation,
        rhs: Orientation,
    },

    /// Product would have polynomial degree of three or more.
    #[error("Degree exceeded: degree {lhs} times degree {rhs} is above 2")]
    DegreeExceeded { lhs: u8, rhs: u8 },

    /// Operand kind is not accepted by the operation.
    #[error("Unexpected input: {0}")]
    UnexpectedInput(String),

    /// The operation is well formed but not modeled.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A variable is missing from the target variable set.
    #[error("Variable {0} not found")]
    VariableNotFound(VarId),

    /// Expression internals are inconsistent.
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),

    /// A variable has inverted bounds or a binary variable is not on [0, 1].
    #[error("Invalid bounds for variable {id}: [{lower}, {upper}]")]
    InvalidVariableBounds { id: VarId, lower: f64, upper: f64 },

    /// `check()` was called on a problem with no objective.
    #[error("No objective defined")]
    NoObjectiveDefined,

    /// The objective expression is not scalar.
    #[error("Objective must be scalar, got shape {0}")]
    ObjectiveNotScalar(Shape),

    /// No linear equality constraints exist.
    #[error("No equality constraints found")]
    NoEqualityConstraintsFound,

    /// No linear inequality constraints exist.
    #[error("No inequality constraints found")]
    NoInequalityConstraintsFound,

    /// A linear pipeline met a non-linear part.
    #[error("Problem is not linear: {cause}")]
    ProblemNotLinear { cause: NonLinearCause },

    /// Objective or problem failed its structural check.
    #[error("Not well defined ({context}): {source}")]
    NotWellDefined {
        context: String,
        #[source]
        source: Box<ModelError>,
    },

    /// Failure reported across the solver boundary.
    #[error("Solver error: {0}")]
    SolverError(String),
}

impl ModelError {
    /// Returns a stable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            ModelError::OrientationMismatch { .. } => "ORIENTATION_MISMATCH",
            ModelError::DegreeExceeded { .. } => "DEGREE_EXCEEDED",
            ModelError::UnexpectedInput(_) => "UNEXPECTED_INPUT",
            ModelError::NotImplemented(_) => "NOT_IMPLEMENTED",
            ModelError::VariableNotFound(_) => "VARIABLE_NOT_FOUND",
            ModelError::MalformedExpression(_) => "MALFORMED_EXPRESSION",
            ModelError::InvalidVariableBounds { .. } => "INVALID_VARIABLE_BOUNDS",
            ModelError::NoObjectiveDefined => "NO_OBJECTIVE_DEFINED",
            ModelError::ObjectiveNotScalar(_) => "OBJECTIVE_NOT_SCALAR",
            ModelError::NoEqualityConstraintsFound => "NO_EQUALITY_CONSTRAINTS_FOUND",
            ModelError::NoInequalityConstraintsFound => "NO_INEQUALITY_CONSTRAINTS_FOUND",
            ModelError::ProblemNotLinear { .. } => "PROBLEM_NOT_LINEAR",
            ModelError::NotWellDefined { .. } => "NOT_WELL_DEFINED",
            ModelError::SolverError(_) => "SOLVER_ERROR",
        }
    }

    pub(crate) fn not_well_defined(context: impl Into<String>, source: ModelError) -> Self {
        ModelError::NotWellDefined {
            context: context.into(),
            source: Box::new(source),
        }
    }
}

/// Result type for quadmodel operations.
pub type Result<T> = std::result::Result<T, ModelError>;
