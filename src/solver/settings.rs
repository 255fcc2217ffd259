//! Solver options.

use tracing::debug;

use super::Solver;
use crate::error::{ModelError, Result};

/// Options forwarded to a [`Solver`] before optimizing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Print solver output.
    pub show_log: bool,
    /// Time limit in seconds; `None` means no limit.
    pub time_limit: Option<f64>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_show_log(mut self, show_log: bool) -> Self {
        self.show_log = show_log;
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn validate(&self) -> Result<()> {
        match self.time_limit {
            Some(seconds) if seconds.is_nan() || seconds <= 0.0 => Err(ModelError::SolverError(
                format!("time limit must be positive, got {seconds}"),
            )),
            _ => Ok(()),
        }
    }

    /// Forward every option to `solver`. Nothing is forwarded if an option
    /// is invalid.
    pub fn apply(&self, solver: &mut impl Solver) -> Result<()> {
        self.validate()?;
        solver.show_log(self.show_log)?;
        if let Some(seconds) = self.time_limit {
            solver.set_time_limit(seconds)?;
        }
        debug!(
            component = "solver",
            operation = "apply_settings",
            status = "success",
            show_log = self.show_log,
            time_limit = ?self.time_limit,
            "Applied solver settings"
        );
        Ok(())
    }
}
