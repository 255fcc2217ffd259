//! Solutions returned across the solver boundary.

use std::collections::HashMap;

use nalgebra::DVector;

use super::status::SolutionStatus;
use crate::constraints::Constraint;
use crate::error::{ModelError, Result};
use crate::expr::{ScalarExpr, VarId, Variable, VectorExpr};

/// Values a solver assigned to the problem's variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Primal value of every variable, by id.
    pub values: HashMap<VarId, f64>,
    /// Objective value at `values`.
    pub optimal_value: f64,
    pub status: SolutionStatus,
}

impl Solution {
    pub fn new(status: SolutionStatus) -> Self {
        Solution {
            values: HashMap::new(),
            optimal_value: f64::NAN,
            status,
        }
    }

    /// Set the value of one variable.
    pub fn with_value(mut self, id: VarId, value: f64) -> Self {
        self.values.insert(id, value);
        self
    }

    pub fn with_optimal_value(mut self, value: f64) -> Self {
        self.optimal_value = value;
        self
    }

    /// Get the value of a variable.
    pub fn value_of(&self, var: &Variable) -> Result<f64> {
        self.values
            .get(&var.id)
            .copied()
            .ok_or(ModelError::VariableNotFound(var.id))
    }

    /// Substitute solved values into a scalar expression.
    pub fn evaluate(&self, expr: &ScalarExpr) -> Result<f64> {
        expr.evaluate_with(|id| self.values.get(&id).copied())
    }

    /// Substitute solved values into a vector expression.
    pub fn evaluate_vector(&self, expr: &VectorExpr) -> Result<DVector<f64>> {
        expr.evaluate_with(|id| self.values.get(&id).copied())
    }

    /// Check a constraint at the solved point, with tolerance `tol`.
    pub fn satisfies(&self, constraint: &Constraint, tol: f64) -> Result<bool> {
        constraint.is_satisfied_with(|id| self.values.get(&id).copied(), tol)
    }
}

/// Value of `var` in `solution`.
pub fn value_of(solution: &Solution, var: &Variable) -> Result<f64> {
    solution.value_of(var)
}

/// Value of `expr` in `solution`.
pub fn evaluate(solution: &Solution, expr: &ScalarExpr) -> Result<f64> {
    solution.evaluate(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::VarKind;

    fn var(id: u64) -> Variable {
        Variable::new(VarId::new(id), 0.0, 10.0, VarKind::Continuous)
    }

    fn solution() -> Solution {
        Solution::new(SolutionStatus::Optimal)
            .with_value(VarId::new(0), 2.0)
            .with_value(VarId::new(1), 3.0)
            .with_optimal_value(8.0)
    }

    #[test]
    fn test_value_of() {
        let s = solution();
        assert_eq!(value_of(&s, &var(1)).expect("present"), 3.0);
        assert!(matches!(
            s.value_of(&var(9)),
            Err(ModelError::VariableNotFound(id)) if id == VarId::new(9)
        ));
    }

    #[test]
    fn test_evaluate_affine() {
        // 2 x0 + x1 + 1 at {x0 = 2, x1 = 3}
        let e = 2.0 * &var(0) + &var(1) + 1.0;
        assert_eq!(evaluate(&solution(), &e).expect("present"), 8.0);
    }

    #[test]
    fn test_evaluate_quadratic() {
        let x = ScalarExpr::from(var(0));
        let y = ScalarExpr::from(var(1));
        let e = x.multiply(&y).expect("degree 2");
        assert_eq!(solution().evaluate(&e).expect("present"), 6.0);
    }

    #[test]
    fn test_evaluate_vector() {
        let v = VectorExpr::from_vars(vec![var(1), var(0)].into());
        let out = solution().evaluate_vector(&v).expect("present");
        assert_eq!(out, DVector::from_vec(vec![3.0, 2.0]));
    }

    #[test]
    fn test_satisfies() {
        let c = Constraint::from(ScalarExpr::from(var(0)).less_eq(&ScalarExpr::from(var(1))));
        assert!(solution().satisfies(&c, 1e-9).expect("present"));
    }
}
