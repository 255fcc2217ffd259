//! Solver boundary.
//!
//! This module provides:
//! - The `Solver` trait a back-end implements to receive a problem
//! - `Settings` forwarded to a solver before optimizing
//! - `Solution` and `SolutionStatus` returned by `optimize`
//!
//! No back-end ships with the crate.

pub mod settings;
pub mod solution;
pub mod status;

pub use settings::Settings;
pub use solution::{evaluate, value_of, Solution};
pub use status::SolutionStatus;

use crate::constraints::Constraint;
use crate::error::Result;
use crate::expr::Variable;
use crate::problem::Objective;

/// A back-end that accepts variables, constraints and an objective, then
/// optimizes.
///
/// [`crate::problem::Problem::load_into`] pushes a checked problem through
/// this interface.
pub trait Solver {
    fn add_variable(&mut self, var: &Variable) -> Result<()>;

    fn add_variables(&mut self, vars: &[Variable]) -> Result<()> {
        for var in vars {
            self.add_variable(var)?;
        }
        Ok(())
    }

    fn add_constraint(&mut self, constraint: &Constraint) -> Result<()>;

    fn set_objective(&mut self, objective: &Objective) -> Result<()>;

    fn show_log(&mut self, on: bool) -> Result<()>;

    /// Time limit in seconds.
    fn set_time_limit(&mut self, seconds: f64) -> Result<()>;

    fn optimize(&mut self) -> Result<Solution>;

    /// Release back-end resources.
    fn delete(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::expr::ScalarExpr;
    use crate::problem::{ObjectiveSense, Problem};

    /// Records what it receives and answers with every variable at its lower
    /// bound.
    #[derive(Default)]
    struct Recorder {
        vars: Vec<Variable>,
        constraints: usize,
        objective: Option<Objective>,
        log: bool,
        time_limit: Option<f64>,
    }

    impl Solver for Recorder {
        fn add_variable(&mut self, var: &Variable) -> Result<()> {
            self.vars.push(var.clone());
            Ok(())
        }

        fn add_constraint(&mut self, _constraint: &Constraint) -> Result<()> {
            self.constraints += 1;
            Ok(())
        }

        fn set_objective(&mut self, objective: &Objective) -> Result<()> {
            self.objective = Some(objective.clone());
            Ok(())
        }

        fn show_log(&mut self, on: bool) -> Result<()> {
            self.log = on;
            Ok(())
        }

        fn set_time_limit(&mut self, seconds: f64) -> Result<()> {
            self.time_limit = Some(seconds);
            Ok(())
        }

        fn optimize(&mut self) -> Result<Solution> {
            let objective = self
                .objective
                .as_ref()
                .ok_or_else(|| ModelError::SolverError("no objective".into()))?;
            let mut solution = Solution::new(SolutionStatus::Optimal);
            for v in &self.vars {
                solution.values.insert(v.id, v.lower);
            }
            solution.optimal_value = solution.evaluate(&objective.expr)?;
            Ok(solution)
        }
    }

    #[test]
    fn test_load_and_optimize() {
        let mut p = Problem::new("load");
        let x = p.add_variable_vector_classic(2, 1.0, 5.0, crate::expr::VarKind::Integer);
        let sum = x.iter().fold(ScalarExpr::zero(), |acc, v| acc + v);
        p.add_constraint(sum.less_eq(8.0)).expect("known");
        p.set_objective(sum.clone(), ObjectiveSense::Minimize).expect("scalar");

        let mut solver = Recorder::default();
        Settings::new()
            .with_show_log(true)
            .with_time_limit(30.0)
            .apply(&mut solver)
            .expect("valid settings");
        p.load_into(&mut solver).expect("well defined");

        assert_eq!(solver.vars.len(), 2);
        assert_eq!(solver.constraints, 1);
        assert!(solver.log);
        assert_eq!(solver.time_limit, Some(30.0));

        let solution = solver.optimize().expect("objective set");
        assert!(solution.status.is_optimal());
        assert_eq!(solution.optimal_value, 2.0);
        assert!(solver.delete().is_ok());
    }

    #[test]
    fn test_load_requires_objective() {
        let mut p = Problem::new("empty");
        p.add_real_variable();
        let mut solver = Recorder::default();
        assert!(matches!(
            p.load_into(&mut solver),
            Err(ModelError::NoObjectiveDefined)
        ));
        assert!(solver.vars.is_empty());
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.show_log);
        assert_eq!(settings.time_limit, None);

        let mut solver = Recorder::default();
        settings.apply(&mut solver).expect("valid settings");
        assert_eq!(solver.time_limit, None);
        assert!(Settings::new()
            .with_time_limit(-1.0)
            .apply(&mut solver)
            .is_err());
    }

    #[test]
    fn test_invalid_settings_leave_solver_untouched() {
        let mut solver = Recorder::default();
        for limit in [0.0, -5.0, f64::NAN] {
            let settings = Settings::new().with_show_log(true).with_time_limit(limit);
            assert!(
                matches!(settings.validate(), Err(ModelError::SolverError(_))),
                "limit {limit} should be rejected"
            );
            assert!(settings.apply(&mut solver).is_err());
            assert!(!solver.log, "limit {limit} should not forward show_log");
            assert_eq!(solver.time_limit, None);
        }
    }
}
