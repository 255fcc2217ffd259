//! Objective terms and the bundled standard form handed to solvers.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::extract::LinearSystem;
use crate::error::{ModelError, Result};
use crate::expr::VarKind;
use crate::problem::{ObjectiveSense, Problem};

/// Objective `x' Q x + L' x + C` over the problem's variable ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectiveTerms {
    /// Quadratic cost (n x n, symmetric).
    pub q: DMatrix<f64>,
    /// Linear cost (n).
    pub l: DVector<f64>,
    /// Constant offset.
    pub c: f64,
    pub sense: ObjectiveSense,
}

impl ObjectiveTerms {
    pub fn is_linear(&self) -> bool {
        self.q.iter().all(|v| *v == 0.0)
    }

    /// Objective value at `x`.
    pub fn evaluate(&self, x: &DVector<f64>) -> f64 {
        (&self.q * x).dot(x) + self.l.dot(x) + self.c
    }
}

/// Everything a matrix-based solver needs.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardForm {
    pub objective: ObjectiveTerms,
    /// `A x <= b`.
    pub inequalities: LinearSystem,
    /// `C x = d`.
    pub equalities: LinearSystem,
    /// Variable lower bounds.
    pub lower: DVector<f64>,
    /// Variable upper bounds.
    pub upper: DVector<f64>,
    pub kinds: Vec<VarKind>,
}

impl StandardForm {
    pub fn num_variables(&self) -> usize {
        self.kinds.len()
    }

    /// True when some variable is binary or integer.
    pub fn is_mixed_integer(&self) -> bool {
        self.kinds.iter().any(|k| *k != VarKind::Continuous)
    }
}

impl Problem {
    /// Objective terms over the problem-wide column ordering.
    pub fn objective_terms(&self) -> Result<ObjectiveTerms> {
        let objective = self.objective().ok_or(ModelError::NoObjectiveDefined)?;
        let quad = objective
            .expr
            .to_quadratic()
            .rewrite_onto(self.variables())
            .map_err(|e| ModelError::not_well_defined("objective", e))?;
        Ok(ObjectiveTerms {
            q: quad.q,
            l: quad.l,
            c: quad.c,
            sense: objective.sense,
        })
    }

    /// Check the problem and bundle objective, constraint systems, bounds
    /// and kinds. Every constraint must be linear; the objective may be
    /// quadratic.
    pub fn standard_form(&self) -> Result<StandardForm> {
        self.check()?;
        self.ensure_linear_constraints()?;
        self.assemble()
    }

    /// Like [`Problem::standard_form`], but the objective must be linear too.
    pub fn linear_program(&self) -> Result<StandardForm> {
        self.check()?;
        self.ensure_linear()?;
        self.assemble()
    }

    fn assemble(&self) -> Result<StandardForm> {
        let vars = self.variables();
        let form = StandardForm {
            objective: self.objective_terms()?,
            inequalities: self.linear_inequality_matrices()?,
            equalities: self.linear_equality_matrices()?,
            lower: DVector::from_iterator(vars.len(), vars.iter().map(|v| v.lower)),
            upper: DVector::from_iterator(vars.len(), vars.iter().map(|v| v.upper)),
            kinds: vars.iter().map(|v| v.kind).collect(),
        };
        debug!(
            component = "canon",
            operation = "standard_form",
            status = "success",
            variables = form.num_variables(),
            inequalities = form.inequalities.nrows(),
            equalities = form.equalities.nrows(),
            quadratic = !form.objective.is_linear(),
            "Assembled standard form"
        );
        Ok(form)
    }
}
