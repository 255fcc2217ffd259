//! Extraction of linear constraint systems.
//!
//! Builds dense `A x <= b` and `C x = d` over the problem's variable
//! ordering: column `j` is the variable with id `j`, found through the
//! problem's reverse index. Rows are stacked with
//! scalar constraints first, then vector constraints, each group in
//! insertion order. `>=` rows are negated into `<=` form.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace};

use crate::constraints::{Constraint, ConstraintSense};
use crate::error::{ModelError, Result};
use crate::problem::Problem;

/// Dense linear system `A x <sense> b`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    /// Constraint matrix A (m x n).
    pub a: DMatrix<f64>,
    /// Right-hand side b (m).
    pub b: DVector<f64>,
}

impl LinearSystem {
    /// A system with no rows over `width` columns.
    pub fn empty(width: usize) -> Self {
        LinearSystem {
            a: DMatrix::zeros(0, width),
            b: DVector::zeros(0),
        }
    }

    pub fn nrows(&self) -> usize {
        self.a.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.a.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.a.nrows() == 0
    }

    /// Largest violation of `A x <= b` at `x` (zero when satisfied).
    pub fn max_violation_le(&self, x: &DVector<f64>) -> f64 {
        (&self.a * x - &self.b).iter().fold(0.0, |m, r| m.max(*r))
    }

    /// Largest `|A x - b|` at `x`.
    pub fn max_residual_eq(&self, x: &DVector<f64>) -> f64 {
        (&self.a * x - &self.b).iter().fold(0.0, |m, r| m.max(r.abs()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SystemKind {
    Inequality,
    Equality,
}

impl SystemKind {
    fn as_str(self) -> &'static str {
        match self {
            SystemKind::Inequality => "inequality",
            SystemKind::Equality => "equality",
        }
    }

    /// Row multiplier for a constraint of `sense`, `None` if it does not
    /// belong to this system.
    fn sign(self, sense: ConstraintSense) -> Option<f64> {
        match (self, sense) {
            (SystemKind::Inequality, ConstraintSense::LessEq) => Some(1.0),
            (SystemKind::Inequality, ConstraintSense::GreaterEq) => Some(-1.0),
            (SystemKind::Equality, ConstraintSense::Equal) => Some(1.0),
            (SystemKind::Inequality, ConstraintSense::Equal)
            | (SystemKind::Equality, ConstraintSense::LessEq | ConstraintSense::GreaterEq) => None,
        }
    }
}

fn extract(problem: &Problem, kind: SystemKind) -> Result<LinearSystem> {
    let width = problem.num_variables();
    let column_of = |id| problem.column_of(id);

    let mut scalar_rows: Vec<(DVector<f64>, f64)> = Vec::new();
    let mut vector_blocks: Vec<(DMatrix<f64>, DVector<f64>)> = Vec::new();

    for (i, constraint) in problem.constraints().iter().enumerate() {
        if !constraint.is_linear() {
            trace!(
                component = "canon",
                operation = kind.as_str(),
                index = i,
                "Skipping non-linear constraint"
            );
            continue;
        }
        let Some(sign) = kind.sign(constraint.sense()) else {
            trace!(
                component = "canon",
                operation = kind.as_str(),
                index = i,
                sense = %constraint.sense(),
                "Skipping constraint of other sense"
            );
            continue;
        };
        let context = || format!("constraint {i}");
        match constraint {
            Constraint::Scalar(c) => {
                let (a, b) = c
                    .linear_row_by(width, column_of)
                    .map_err(|e| ModelError::not_well_defined(context(), e))?;
                scalar_rows.push((a * sign, b * sign));
            }
            Constraint::Vector(c) => {
                let (a, b) = c
                    .linear_rows_by(width, column_of)
                    .map_err(|e| ModelError::not_well_defined(context(), e))?;
                vector_blocks.push((a * sign, b * sign));
            }
        }
    }

    let rows = scalar_rows.len() + vector_blocks.iter().map(|(_, b)| b.len()).sum::<usize>();
    let mut a = DMatrix::zeros(rows, width);
    let mut b = DVector::zeros(rows);

    for (r, (row, rhs)) in scalar_rows.iter().enumerate() {
        a.set_row(r, &row.transpose());
        b[r] = *rhs;
    }
    let mut offset = scalar_rows.len();
    for (block, rhs) in &vector_blocks {
        let k = rhs.len();
        a.view_mut((offset, 0), (k, width)).copy_from(block);
        b.rows_mut(offset, k).copy_from(rhs);
        offset += k;
    }

    debug!(
        component = "canon",
        operation = kind.as_str(),
        status = "success",
        scalar_rows = scalar_rows.len(),
        vector_blocks = vector_blocks.len(),
        rows,
        cols = width,
        "Extracted linear system"
    );

    Ok(LinearSystem { a, b })
}

impl Problem {
    /// `A x <= b` from every linear `<=` and `>=` constraint.
    ///
    /// Returns a system with no rows when there are none.
    pub fn linear_inequality_matrices(&self) -> Result<LinearSystem> {
        extract(self, SystemKind::Inequality)
    }

    /// `C x = d` from every linear `=` constraint.
    ///
    /// Returns a system with no rows when there are none.
    pub fn linear_equality_matrices(&self) -> Result<LinearSystem> {
        extract(self, SystemKind::Equality)
    }

    /// Like [`Problem::linear_inequality_matrices`], but fails with
    /// `NoInequalityConstraintsFound` on an empty system.
    pub fn require_inequality_matrices(&self) -> Result<LinearSystem> {
        let system = self.linear_inequality_matrices()?;
        if system.is_empty() {
            return Err(ModelError::NoInequalityConstraintsFound);
        }
        Ok(system)
    }

    /// Like [`Problem::linear_equality_matrices`], but fails with
    /// `NoEqualityConstraintsFound` on an empty system.
    pub fn require_equality_matrices(&self) -> Result<LinearSystem> {
        let system = self.linear_equality_matrices()?;
        if system.is_empty() {
            return Err(ModelError::NoEqualityConstraintsFound);
        }
        Ok(system)
    }
}
