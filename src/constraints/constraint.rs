//! Constraint types for optimization problems.
//!
//! A constraint relates two expressions of the same kind through a sense:
//! - `ScalarConstraint`: `lhs <sense> rhs` for scalar expressions
//! - `VectorConstraint`: element-wise over vector expressions of equal length
//!   and orientation
//!
//! Linear constraints map to rows `a' x <sense> b` over a caller-supplied
//! column ordering, which is how the extraction routines build `A x <= b`.

use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::expr::{
    positions_by, scatter_columns, scatter_vector, union, ScalarExpr, VarId, VarVector, VectorExpr,
    VectorKind,
};
use crate::error::{ModelError, Result};

/// Relation between the two sides of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintSense {
    LessEq,
    GreaterEq,
    Equal,
}

impl ConstraintSense {
    pub fn is_inequality(&self) -> bool {
        !matches!(self, ConstraintSense::Equal)
    }
}

impl fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintSense::LessEq => write!(f, "<="),
            ConstraintSense::GreaterEq => write!(f, ">="),
            ConstraintSense::Equal => write!(f, "="),
        }
    }
}

/// `lhs <sense> rhs` over scalar expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarConstraint {
    pub lhs: ScalarExpr,
    pub rhs: ScalarExpr,
    pub sense: ConstraintSense,
}

impl ScalarConstraint {
    pub fn new(lhs: ScalarExpr, rhs: ScalarExpr, sense: ConstraintSense) -> Self {
        ScalarConstraint { lhs, rhs, sense }
    }

    /// Both sides have degree at most one.
    pub fn is_linear(&self) -> bool {
        self.lhs.is_linear() && self.rhs.is_linear()
    }

    pub fn check(&self) -> Result<()> {
        self.lhs.check()?;
        self.rhs.check()
    }

    pub fn variables(&self) -> VarVector {
        union(&self.lhs.variables(), &self.rhs.variables())
    }

    pub fn variable_ids(&self) -> Vec<VarId> {
        self.variables().ids()
    }

    /// Move every variable term to the left; the right side becomes a constant.
    pub fn simplify(&self) -> ScalarConstraint {
        let lhs = if self.rhs.num_vars() == 0 {
            self.lhs.clone()
        } else {
            self.lhs.minus(&self.rhs.without_constant())
        };
        ScalarConstraint {
            lhs,
            rhs: ScalarExpr::Constant(self.rhs.constant()),
            sense: self.sense,
        }
    }

    /// Row `(a, b)` with `a' x <sense> b` over `columns`.
    ///
    /// `columns` must contain every variable of the constraint.
    pub fn linear_row(&self, columns: &VarVector) -> Result<(DVector<f64>, f64)> {
        self.linear_row_by(columns.len(), |id| columns.index_of(id))
    }

    /// Row `(a, b)` of width `width`, placing each variable at the column
    /// reported by `column_of`.
    pub fn linear_row_by<F>(&self, width: usize, column_of: F) -> Result<(DVector<f64>, f64)>
    where
        F: Fn(VarId) -> Option<usize>,
    {
        self.check()?;
        let lin = self.lhs.minus(&self.rhs).to_linear().ok_or_else(|| {
            ModelError::UnexpectedInput("quadratic constraint has no linear row".into())
        })?;
        let pos = positions_by(&lin.x, |id| column_of(id).filter(|&j| j < width))?;
        Ok((scatter_vector(&lin.l, &pos, width), -lin.c))
    }

    /// Evaluate both sides and test the relation, with tolerance `tol`.
    pub fn is_satisfied_with<F>(&self, value_of: F, tol: f64) -> Result<bool>
    where
        F: Fn(VarId) -> Option<f64>,
    {
        let lhs = self.lhs.evaluate_with(&value_of)?;
        let rhs = self.rhs.evaluate_with(&value_of)?;
        Ok(holds(lhs, rhs, self.sense, tol))
    }
}

fn holds(lhs: f64, rhs: f64, sense: ConstraintSense, tol: f64) -> bool {
    match sense {
        ConstraintSense::LessEq => lhs <= rhs + tol,
        ConstraintSense::GreaterEq => lhs >= rhs - tol,
        ConstraintSense::Equal => (lhs - rhs).abs() <= tol,
    }
}

/// Element-wise `lhs <sense> rhs` over vector expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorConstraint {
    pub lhs: VectorExpr,
    pub rhs: VectorExpr,
    pub sense: ConstraintSense,
}

impl VectorConstraint {
    /// Create without validation; use `VectorExpr::comparison` for checked
    /// construction.
    pub fn new(lhs: VectorExpr, rhs: VectorExpr, sense: ConstraintSense) -> Self {
        VectorConstraint { lhs, rhs, sense }
    }

    pub fn len(&self) -> usize {
        self.lhs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lhs.is_empty()
    }

    /// Vector expressions never exceed degree one.
    pub fn is_linear(&self) -> bool {
        true
    }

    pub fn check(&self) -> Result<()> {
        self.lhs.check()?;
        self.rhs.check()?;
        if self.lhs.orientation != self.rhs.orientation {
            return Err(ModelError::OrientationMismatch {
                operation: "comparison",
                lhs: self.lhs.orientation,
                rhs: self.rhs.orientation,
            });
        }
        if self.lhs.len() != self.rhs.len() {
            return Err(ModelError::DimensionMismatch {
                operation: "comparison",
                lhs: self.lhs.dimensions(),
                rhs: self.rhs.dimensions(),
            });
        }
        Ok(())
    }

    pub fn variables(&self) -> VarVector {
        union(&self.lhs.variables(), &self.rhs.variables())
    }

    pub fn variable_ids(&self) -> Vec<VarId> {
        self.variables().ids()
    }

    /// Row `i` as a scalar constraint.
    pub fn at(&self, i: usize) -> Option<ScalarConstraint> {
        Some(ScalarConstraint::new(self.lhs.at(i)?, self.rhs.at(i)?, self.sense))
    }

    /// Move every variable term to the left; the right side becomes a
    /// constant vector.
    pub fn simplify(&self) -> Result<VectorConstraint> {
        let lhs = if self.rhs.num_vars() == 0 {
            self.lhs.clone()
        } else {
            self.lhs.minus(&self.rhs.without_constant())?
        };
        Ok(VectorConstraint {
            lhs,
            rhs: VectorExpr {
                kind: VectorKind::Constant(self.rhs.constant_part()),
                orientation: self.rhs.orientation,
            },
            sense: self.sense,
        })
    }

    /// Rows `(A, b)` with `A x <sense> b` over `columns`.
    pub fn linear_rows(&self, columns: &VarVector) -> Result<(DMatrix<f64>, DVector<f64>)> {
        self.linear_rows_by(columns.len(), |id| columns.index_of(id))
    }

    /// Rows `(A, b)` with `width` columns, placing each variable at the column
    /// reported by `column_of`.
    pub fn linear_rows_by<F>(&self, width: usize, column_of: F) -> Result<(DMatrix<f64>, DVector<f64>)>
    where
        F: Fn(VarId) -> Option<usize>,
    {
        self.check()?;
        let lin = self.lhs.minus(&self.rhs)?.to_linear();
        let pos = positions_by(&lin.x, |id| column_of(id).filter(|&j| j < width))?;
        Ok((scatter_columns(&lin.l, &pos, width), -lin.c))
    }

    pub fn is_satisfied_with<F>(&self, value_of: F, tol: f64) -> Result<bool>
    where
        F: Fn(VarId) -> Option<f64>,
    {
        let lhs = self.lhs.evaluate_with(&value_of)?;
        let rhs = self.rhs.evaluate_with(&value_of)?;
        Ok(lhs.iter().zip(rhs.iter()).all(|(l, r)| holds(*l, *r, self.sense, tol)))
    }
}

/// A constraint in an optimization problem.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Scalar(ScalarConstraint),
    Vector(VectorConstraint),
}

impl Constraint {
    pub fn sense(&self) -> ConstraintSense {
        match self {
            Constraint::Scalar(c) => c.sense,
            Constraint::Vector(c) => c.sense,
        }
    }

    pub fn is_linear(&self) -> bool {
        match self {
            Constraint::Scalar(c) => c.is_linear(),
            Constraint::Vector(c) => c.is_linear(),
        }
    }

    pub fn check(&self) -> Result<()> {
        match self {
            Constraint::Scalar(c) => c.check(),
            Constraint::Vector(c) => c.check(),
        }
    }

    /// Number of rows this constraint contributes when extracted.
    pub fn num_rows(&self) -> usize {
        match self {
            Constraint::Scalar(_) => 1,
            Constraint::Vector(c) => c.len(),
        }
    }

    pub fn variables(&self) -> VarVector {
        match self {
            Constraint::Scalar(c) => c.variables(),
            Constraint::Vector(c) => c.variables(),
        }
    }

    /// Get all variable IDs in this constraint.
    pub fn variable_ids(&self) -> Vec<VarId> {
        self.variables().ids()
    }

    pub fn simplify(&self) -> Result<Constraint> {
        match self {
            Constraint::Scalar(c) => Ok(Constraint::Scalar(c.simplify())),
            Constraint::Vector(c) => Ok(Constraint::Vector(c.simplify()?)),
        }
    }

    pub fn is_satisfied_with<F>(&self, value_of: F, tol: f64) -> Result<bool>
    where
        F: Fn(VarId) -> Option<f64>,
    {
        match self {
            Constraint::Scalar(c) => c.is_satisfied_with(value_of, tol),
            Constraint::Vector(c) => c.is_satisfied_with(value_of, tol),
        }
    }
}

impl From<ScalarConstraint> for Constraint {
    fn from(c: ScalarConstraint) -> Self {
        Constraint::Scalar(c)
    }
}

impl From<VectorConstraint> for Constraint {
    fn from(c: VectorConstraint) -> Self {
        Constraint::Vector(c)
    }
}
