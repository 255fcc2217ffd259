//! Problem definition: variable store, constraints and objective.
//!
//! A `Problem` owns the variables it creates and assigns them dense ids
//! `0, 1, ..., N-1`. Constraints and the objective may only reference those
//! variables. The problem is then checked, tested for linearity, extracted
//! into matrices (see [`crate::canon`]) or pushed into a [`Solver`].
//!
//! ```ignore
//! let mut problem = Problem::new("lp");
//! let x = problem.add_variable_vector_classic(3, -1.0, f64::INFINITY, VarKind::Continuous);
//! problem.add_constraint(VectorExpr::from_vars(x.clone()).less_eq(&VectorExpr::ones(3))?)?;
//! problem.set_objective(x.clone(), ObjectiveSense::Maximize)?;
//! let system = problem.linear_inequality_matrices()?;
//! ```

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::constraints::{Constraint, Implication};
use crate::error::{ModelError, NonLinearCause, Result};
use crate::expr::{
    Expression, ScalarExpr, VarId, VarKind, VarMatrix, VarVector, Variable, VariableBuilder,
};
use crate::solver::Solver;

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ObjectiveSense {
    #[default]
    Minimize,
    Maximize,
    /// Feasibility only; the objective expression is ignored by solvers.
    Find,
}

impl fmt::Display for ObjectiveSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectiveSense::Minimize => write!(f, "minimize"),
            ObjectiveSense::Maximize => write!(f, "maximize"),
            ObjectiveSense::Find => write!(f, "find"),
        }
    }
}

/// Objective of an optimization problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub expr: ScalarExpr,
    pub sense: ObjectiveSense,
}

impl Objective {
    pub fn new(expr: impl Into<ScalarExpr>, sense: ObjectiveSense) -> Self {
        Objective {
            expr: expr.into(),
            sense,
        }
    }

    pub fn is_linear(&self) -> bool {
        self.expr.is_linear()
    }

    pub fn check(&self) -> Result<()> {
        self.expr.check()
    }
}

/// An optimization problem.
#[derive(Debug, Clone, Default)]
pub struct Problem {
    name: String,
    variables: VarVector,
    column_of: HashMap<VarId, usize>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
}

impl Problem {
    pub fn new(name: impl Into<String>) -> Self {
        Problem {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All variables, in creation order. This is the column ordering of
    /// every extracted matrix.
    pub fn variables(&self) -> &VarVector {
        &self.variables
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.column_of(id).and_then(|j| self.variables.at(j))
    }

    /// Column index of a variable in extracted matrices.
    pub fn column_of(&self, id: VarId) -> Option<usize> {
        self.column_of.get(&id).copied()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    // ------------------------------------------------------------------
    // Variable store
    // ------------------------------------------------------------------

    /// Add a variable with the given bounds and kind.
    ///
    /// Bounds are validated by [`Problem::check`], not here.
    pub fn add_variable(&mut self, lower: f64, upper: f64, kind: VarKind) -> Variable {
        self.add_variable_with(VariableBuilder::continuous().bounds(lower, upper).kind(kind))
    }

    /// Add a variable described by a builder.
    pub fn add_variable_with(&mut self, builder: VariableBuilder) -> Variable {
        let id = VarId::new(self.variables.len() as u64);
        let var = builder.build(id);
        debug!(
            component = "problem",
            operation = "add_variable",
            status = "success",
            id = id.raw(),
            lower = var.lower,
            upper = var.upper,
            kind = ?var.kind,
            "Adding variable"
        );
        self.column_of.insert(id, self.variables.len());
        self.variables.push(var.clone());
        var
    }

    /// Unbounded continuous variable.
    pub fn add_real_variable(&mut self) -> Variable {
        self.add_variable_with(VariableBuilder::continuous())
    }

    pub fn add_binary_variable(&mut self) -> Variable {
        self.add_variable_with(VariableBuilder::binary())
    }

    /// Unbounded integer variable.
    pub fn add_integer_variable(&mut self) -> Variable {
        self.add_variable_with(VariableBuilder::integer())
    }

    /// `n` unbounded continuous variables.
    pub fn add_variable_vector(&mut self, n: usize) -> VarVector {
        (0..n).map(|_| self.add_real_variable()).collect()
    }

    pub fn add_variable_vector_classic(
        &mut self,
        n: usize,
        lower: f64,
        upper: f64,
        kind: VarKind,
    ) -> VarVector {
        (0..n).map(|_| self.add_variable(lower, upper, kind)).collect()
    }

    pub fn add_binary_variable_vector(&mut self, n: usize) -> VarVector {
        (0..n).map(|_| self.add_binary_variable()).collect()
    }

    /// `rows x cols` variables, created row by row.
    pub fn add_variable_matrix(
        &mut self,
        rows: usize,
        cols: usize,
        lower: f64,
        upper: f64,
        kind: VarKind,
    ) -> VarMatrix {
        let data = (0..rows * cols)
            .map(|_| self.add_variable(lower, upper, kind))
            .collect();
        VarMatrix::from_row_major(rows, cols, data)
    }

    pub fn add_binary_variable_matrix(&mut self, rows: usize, cols: usize) -> VarMatrix {
        self.add_variable_matrix(rows, cols, 0.0, 1.0, VarKind::Binary)
    }

    fn ensure_known(&self, vars: &VarVector) -> Result<()> {
        match vars.iter().find(|v| !self.column_of.contains_key(&v.id)) {
            Some(v) => Err(ModelError::VariableNotFound(v.id)),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Constraints and objective
    // ------------------------------------------------------------------

    /// Append a constraint and return its index.
    pub fn add_constraint(&mut self, constraint: impl Into<Constraint>) -> Result<usize> {
        let constraint = constraint.into();
        self.ensure_known(&constraint.variables())?;
        debug!(
            component = "problem",
            operation = "add_constraint",
            status = "success",
            index = self.constraints.len(),
            rows = constraint.num_rows(),
            sense = %constraint.sense(),
            linear = constraint.is_linear(),
            "Adding constraint"
        );
        self.constraints.push(constraint);
        Ok(self.constraints.len() - 1)
    }

    /// Set the objective. The expression must be scalar.
    pub fn set_objective(&mut self, expr: impl Into<Expression>, sense: ObjectiveSense) -> Result<()> {
        let expr = match expr.into() {
            Expression::Scalar(s) => s,
            other => return Err(ModelError::ObjectiveNotScalar(other.dimensions())),
        };
        self.ensure_known(&expr.variables())?;
        debug!(
            component = "problem",
            operation = "set_objective",
            status = "success",
            sense = %sense,
            degree = expr.degree(),
            "Setting objective"
        );
        self.objective = Some(Objective { expr, sense });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Structural validation: objective set and well formed, variable bounds
    /// consistent, every constraint well formed.
    pub fn check(&self) -> Result<()> {
        let objective = self.objective.as_ref().ok_or(ModelError::NoObjectiveDefined)?;
        objective
            .check()
            .map_err(|e| ModelError::not_well_defined("objective", e))?;

        if let Some(v) = self.variables.iter().find(|v| !v.has_valid_bounds()) {
            return Err(ModelError::InvalidVariableBounds {
                id: v.id,
                lower: v.lower,
                upper: v.upper,
            });
        }

        for (i, c) in self.constraints.iter().enumerate() {
            c.check()
                .map_err(|e| ModelError::not_well_defined(format!("constraint {i}"), e))?;
        }
        Ok(())
    }

    /// True when the objective (if any) and every constraint are linear.
    pub fn is_linear(&self) -> bool {
        self.objective.as_ref().map_or(true, Objective::is_linear)
            && self.constraints.iter().all(Constraint::is_linear)
    }

    /// Report the first non-linear part of the problem.
    pub fn ensure_linear(&self) -> Result<()> {
        let objective = self.objective.as_ref().ok_or(ModelError::ProblemNotLinear {
            cause: NonLinearCause::NotWellDefined,
        })?;
        if !objective.is_linear() {
            return Err(ModelError::ProblemNotLinear {
                cause: NonLinearCause::Objective,
            });
        }
        self.ensure_linear_constraints()
    }

    pub(crate) fn ensure_linear_constraints(&self) -> Result<()> {
        match self.constraints.iter().position(|c| !c.is_linear()) {
            Some(i) => Err(ModelError::ProblemNotLinear {
                cause: NonLinearCause::Constraint(i),
            }),
            None => Ok(()),
        }
    }

    /// Ask `oracle` whether the other constraints already imply constraint
    /// `index`.
    pub fn constraint_is_redundant_given_others(
        &self,
        index: usize,
        oracle: &impl Implication,
    ) -> Result<bool> {
        let conclusion = self.constraints.get(index).ok_or_else(|| {
            ModelError::UnexpectedInput(format!(
                "constraint index {index} out of range for {} constraints",
                self.constraints.len()
            ))
        })?;
        let premises: Vec<Constraint> = self
            .constraints
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, c)| c.clone())
            .collect();
        oracle.implies(&premises, conclusion)
    }

    // ------------------------------------------------------------------
    // Solver boundary
    // ------------------------------------------------------------------

    /// Check the problem, then push variables, constraints and objective
    /// into `solver`, in that order.
    pub fn load_into(&self, solver: &mut impl Solver) -> Result<()> {
        self.check()?;
        solver.add_variables(self.variables.as_slice())?;
        for c in &self.constraints {
            solver.add_constraint(c)?;
        }
        if let Some(objective) = &self.objective {
            solver.set_objective(objective)?;
        }
        debug!(
            component = "problem",
            operation = "load_into",
            status = "success",
            variables = self.variables.len(),
            constraints = self.constraints.len(),
            "Loaded problem into solver"
        );
        Ok(())
    }
}
