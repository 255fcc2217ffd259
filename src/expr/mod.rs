//! Expression types and the algebra over them.
//!
//! This module provides:
//! - `Variable`, `VarVector`, `VarMatrix` and `VariableBuilder`
//! - `ScalarExpr` - constant, variable, linear or quadratic scalar
//! - `VectorExpr` - constant, variable or linear vector with an orientation
//! - `MatrixExpr` - constant or variable matrix
//! - `Expression` - umbrella over the three, with `sum`, `multiply`, `comparison`
//! - Alignment of coefficient data onto a shared variable ordering

pub mod align;
pub mod expression;
pub mod matrix;
mod ops;
pub mod scalar;
pub mod shape;
pub mod variable;
pub mod vector;

// Re-export main types
pub use align::{align, positions_by, positions_in, union, Alignment};
pub(crate) use align::{scatter_columns, scatter_vector};
pub use expression::{comparison, multiply, sum, Expression};
pub use matrix::MatrixExpr;
pub use scalar::{ScalarExpr, ScalarLinear, ScalarQuadratic};
pub use shape::{Orientation, Shape};
pub use variable::{VarId, VarKind, VarMatrix, VarVector, Variable, VariableBuilder};
pub use vector::{VectorExpr, VectorKind, VectorLinear};
