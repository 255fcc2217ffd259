//! Canonicalization of a problem into dense matrices.
//!
//! This module converts a `Problem` into:
//! - `LinearSystem`s for `A x <= b` and `C x = d`
//! - `ObjectiveTerms` `(Q, L, C)` for the objective
//! - `StandardForm`, bundling both with variable bounds and kinds

pub mod extract;
pub mod standard_form;

pub use extract::LinearSystem;
pub use standard_form::{ObjectiveTerms, StandardForm};
