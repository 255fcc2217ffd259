//! The umbrella expression type and the free-function algebra.
//!
//! `Expression` lets callers mix scalars, vectors and matrices in one call
//! site; every operation dispatches to the concrete type's method.

use nalgebra::{DMatrix, DVector};

use super::matrix::MatrixExpr;
use super::scalar::{ScalarExpr, ScalarLinear, ScalarQuadratic};
use super::shape::Shape;
use super::variable::{VarId, VarMatrix, VarVector, Variable};
use super::vector::{VectorExpr, VectorLinear};
use crate::constraints::{Constraint, ConstraintSense};
use crate::error::{ModelError, Result};

/// Any expression of the algebra.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Scalar(ScalarExpr),
    Vector(VectorExpr),
    Matrix(MatrixExpr),
}

impl Expression {
    pub fn dimensions(&self) -> Shape {
        match self {
            Expression::Scalar(s) => s.dimensions(),
            Expression::Vector(v) => v.dimensions(),
            Expression::Matrix(m) => m.dimensions(),
        }
    }

    pub fn variables(&self) -> VarVector {
        match self {
            Expression::Scalar(s) => s.variables(),
            Expression::Vector(v) => v.variables(),
            Expression::Matrix(m) => m.variables(),
        }
    }

    pub fn variable_ids(&self) -> Vec<VarId> {
        self.variables().ids()
    }

    pub fn num_vars(&self) -> usize {
        self.variables().len()
    }

    pub fn check(&self) -> Result<()> {
        match self {
            Expression::Scalar(s) => s.check(),
            Expression::Vector(v) => v.check(),
            Expression::Matrix(m) => m.check(),
        }
    }

    /// Transpose; scalars are returned unchanged.
    pub fn transpose(&self) -> Expression {
        match self {
            Expression::Scalar(s) => Expression::Scalar(s.clone()),
            Expression::Vector(v) => Expression::Vector(v.transpose()),
            Expression::Matrix(m) => Expression::Matrix(m.transpose()),
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarExpr> {
        match self {
            Expression::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&VectorExpr> {
        match self {
            Expression::Vector(v) => Some(v),
            _ => None,
        }
    }

    fn mismatch(&self, operation: &'static str, rhs: &Expression) -> ModelError {
        ModelError::DimensionMismatch {
            operation,
            lhs: self.dimensions(),
            rhs: rhs.dimensions(),
        }
    }

    /// Addition of operands of the same kind.
    pub fn plus(&self, rhs: &Expression) -> Result<Expression> {
        match (self, rhs) {
            (Expression::Scalar(a), Expression::Scalar(b)) => Ok(Expression::Scalar(a.plus(b))),
            (Expression::Vector(a), Expression::Vector(b)) => Ok(Expression::Vector(a.plus(b)?)),
            (Expression::Matrix(a), Expression::Matrix(b)) => Ok(Expression::Matrix(a.plus(b)?)),
            _ => Err(self.mismatch("plus", rhs)),
        }
    }

    /// Product under the degree-2 ceiling.
    pub fn multiply(&self, rhs: &Expression) -> Result<Expression> {
        use Expression::{Matrix, Scalar, Vector};
        match (self, rhs) {
            (Scalar(a), Scalar(b)) => Ok(Scalar(a.multiply(b)?)),
            (Scalar(s), Vector(v)) | (Vector(v), Scalar(s)) => Ok(Vector(v.scale_by(s)?)),
            (Vector(a), Vector(b)) => Ok(Scalar(a.inner(b)?)),
            (Matrix(m), Vector(v)) => Ok(Vector(m.multiply_vector(v)?)),
            (Vector(v), Matrix(m)) => Ok(Vector(v.multiply_matrix(m)?)),
            (Matrix(a), Matrix(b)) => Ok(Matrix(a.multiply(b)?)),
            (Scalar(ScalarExpr::Constant(k)), Matrix(m)) | (Matrix(m), Scalar(ScalarExpr::Constant(k))) => {
                Ok(Matrix(m.scale(*k)?))
            }
            (Scalar(_), Matrix(_)) | (Matrix(_), Scalar(_)) => Err(ModelError::NotImplemented(
                "product of a non-constant scalar and a matrix".into(),
            )),
        }
    }

    /// Build a constraint `self <sense> rhs`.
    pub fn comparison(&self, rhs: &Expression, sense: ConstraintSense) -> Result<Constraint> {
        match (self, rhs) {
            (Expression::Scalar(a), Expression::Scalar(b)) => {
                Ok(Constraint::Scalar(a.comparison(b, sense)))
            }
            (Expression::Vector(a), Expression::Vector(b)) => {
                Ok(Constraint::Vector(a.comparison(b, sense)?))
            }
            (Expression::Matrix(_), _) | (_, Expression::Matrix(_)) => Err(
                ModelError::UnexpectedInput("matrix expressions cannot be compared".into()),
            ),
            _ => Err(self.mismatch("comparison", rhs)),
        }
    }

    pub fn less_eq(&self, rhs: &Expression) -> Result<Constraint> {
        self.comparison(rhs, ConstraintSense::LessEq)
    }

    pub fn greater_eq(&self, rhs: &Expression) -> Result<Constraint> {
        self.comparison(rhs, ConstraintSense::GreaterEq)
    }

    pub fn equals(&self, rhs: &Expression) -> Result<Constraint> {
        self.comparison(rhs, ConstraintSense::Equal)
    }
}

/// Sum of any number of operands. The empty sum is the constant zero.
///
/// The first failing addition is returned as is.
pub fn sum<I, E>(operands: I) -> Result<Expression>
where
    I: IntoIterator<Item = E>,
    E: Into<Expression>,
{
    let mut iter = operands.into_iter();
    let Some(first) = iter.next() else {
        return Ok(Expression::Scalar(ScalarExpr::zero()));
    };
    iter.try_fold(first.into(), |acc, e| acc.plus(&e.into()))
}

/// Product of two operands of any kind.
pub fn multiply(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Result<Expression> {
    lhs.into().multiply(&rhs.into())
}

/// Constraint `lhs <sense> rhs` for operands of any kind.
pub fn comparison(
    lhs: impl Into<Expression>,
    rhs: impl Into<Expression>,
    sense: ConstraintSense,
) -> Result<Constraint> {
    lhs.into().comparison(&rhs.into(), sense)
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::Scalar(ScalarExpr::Constant(value))
    }
}

impl From<i32> for Expression {
    fn from(value: i32) -> Self {
        Expression::Scalar(ScalarExpr::from(value))
    }
}

impl From<Variable> for Expression {
    fn from(v: Variable) -> Self {
        Expression::Scalar(ScalarExpr::Variable(v))
    }
}

impl From<&Variable> for Expression {
    fn from(v: &Variable) -> Self {
        Expression::Scalar(ScalarExpr::Variable(v.clone()))
    }
}

impl From<ScalarExpr> for Expression {
    fn from(s: ScalarExpr) -> Self {
        Expression::Scalar(s)
    }
}

impl From<&ScalarExpr> for Expression {
    fn from(s: &ScalarExpr) -> Self {
        Expression::Scalar(s.clone())
    }
}

impl From<ScalarLinear> for Expression {
    fn from(lin: ScalarLinear) -> Self {
        Expression::Scalar(ScalarExpr::Linear(lin))
    }
}

impl From<ScalarQuadratic> for Expression {
    fn from(quad: ScalarQuadratic) -> Self {
        Expression::Scalar(ScalarExpr::Quadratic(quad))
    }
}

impl From<VarVector> for Expression {
    fn from(vars: VarVector) -> Self {
        Expression::Vector(VectorExpr::from_vars(vars))
    }
}

impl From<&VarVector> for Expression {
    fn from(vars: &VarVector) -> Self {
        Expression::Vector(VectorExpr::from_vars(vars.clone()))
    }
}

impl From<DVector<f64>> for Expression {
    fn from(values: DVector<f64>) -> Self {
        Expression::Vector(VectorExpr::from(values))
    }
}

impl From<VectorLinear> for Expression {
    fn from(lin: VectorLinear) -> Self {
        Expression::Vector(VectorExpr::linear(lin))
    }
}

impl From<VectorExpr> for Expression {
    fn from(v: VectorExpr) -> Self {
        Expression::Vector(v)
    }
}

impl From<&VectorExpr> for Expression {
    fn from(v: &VectorExpr) -> Self {
        Expression::Vector(v.clone())
    }
}

impl From<DMatrix<f64>> for Expression {
    fn from(m: DMatrix<f64>) -> Self {
        Expression::Matrix(MatrixExpr::Constant(m))
    }
}

impl From<VarMatrix> for Expression {
    fn from(m: VarMatrix) -> Self {
        Expression::Matrix(MatrixExpr::Variables(m))
    }
}

impl From<MatrixExpr> for Expression {
    fn from(m: MatrixExpr) -> Self {
        Expression::Matrix(m)
    }
}
