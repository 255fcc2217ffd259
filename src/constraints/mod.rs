//! Constraints and the hook for deciding implication between them.

pub mod constraint;

pub use constraint::{Constraint, ConstraintSense, ScalarConstraint, VectorConstraint};

use crate::error::Result;

/// Decides whether a set of constraints implies another.
///
/// The crate ships no decision procedure; callers plug in their own (for
/// instance an LP-based check) through this trait.
pub trait Implication {
    fn implies(&self, premises: &[Constraint], conclusion: &Constraint) -> Result<bool>;
}
