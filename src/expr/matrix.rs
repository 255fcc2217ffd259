//! Matrix expressions.
//!
//! Only constant matrices take part in arithmetic. A matrix of variables can
//! be built, inspected and transposed, but any product that would produce a
//! matrix of expressions is rejected.

use nalgebra::DMatrix;

use super::shape::{Orientation, Shape};
use super::variable::{VarId, VarMatrix, VarVector};
use super::vector::{VectorExpr, VectorKind, VectorLinear};
use crate::error::{ModelError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum MatrixExpr {
    Constant(DMatrix<f64>),
    Variables(VarMatrix),
}

impl MatrixExpr {
    pub fn dimensions(&self) -> Shape {
        match self {
            MatrixExpr::Constant(m) => Shape::matrix(m.nrows(), m.ncols()),
            MatrixExpr::Variables(v) => Shape::matrix(v.nrows(), v.ncols()),
        }
    }

    pub fn variables(&self) -> VarVector {
        match self {
            MatrixExpr::Constant(_) => VarVector::default(),
            MatrixExpr::Variables(v) => v.flatten().unique(),
        }
    }

    pub fn variable_ids(&self) -> Vec<VarId> {
        self.variables().ids()
    }

    pub fn num_vars(&self) -> usize {
        self.variables().len()
    }

    pub fn check(&self) -> Result<()> {
        Ok(())
    }

    pub fn transpose(&self) -> MatrixExpr {
        match self {
            MatrixExpr::Constant(m) => MatrixExpr::Constant(m.transpose()),
            MatrixExpr::Variables(v) => MatrixExpr::Variables(v.transpose()),
        }
    }

    fn constant_operand(&self, operation: &str) -> Result<&DMatrix<f64>> {
        match self {
            MatrixExpr::Constant(m) => Ok(m),
            MatrixExpr::Variables(_) => Err(ModelError::NotImplemented(format!(
                "{operation} on a matrix of variables"
            ))),
        }
    }

    pub fn plus(&self, rhs: &MatrixExpr) -> Result<MatrixExpr> {
        let (a, b) = (self.constant_operand("plus")?, rhs.constant_operand("plus")?);
        if a.shape() != b.shape() {
            return Err(ModelError::DimensionMismatch {
                operation: "plus",
                lhs: self.dimensions(),
                rhs: rhs.dimensions(),
            });
        }
        Ok(MatrixExpr::Constant(a + b))
    }

    pub fn scale(&self, k: f64) -> Result<MatrixExpr> {
        Ok(MatrixExpr::Constant(self.constant_operand("scale")? * k))
    }

    /// Matrix product of two constant matrices.
    pub fn multiply(&self, rhs: &MatrixExpr) -> Result<MatrixExpr> {
        let (a, b) = (self.constant_operand("multiply")?, rhs.constant_operand("multiply")?);
        if a.ncols() != b.nrows() {
            return Err(ModelError::DimensionMismatch {
                operation: "multiply",
                lhs: self.dimensions(),
                rhs: rhs.dimensions(),
            });
        }
        Ok(MatrixExpr::Constant(a * b))
    }

    /// `A v` for a column vector expression `v`.
    pub fn multiply_vector(&self, v: &VectorExpr) -> Result<VectorExpr> {
        let a = self.constant_operand("multiply")?;
        if v.orientation != Orientation::Column {
            return Err(ModelError::OrientationMismatch {
                operation: "multiply",
                lhs: Orientation::Column,
                rhs: v.orientation,
            });
        }
        if a.ncols() != v.len() {
            return Err(ModelError::DimensionMismatch {
                operation: "multiply",
                lhs: self.dimensions(),
                rhs: v.dimensions(),
            });
        }
        let kind = match &v.kind {
            VectorKind::Constant(k) => VectorKind::Constant(a * k),
            VectorKind::Variables(_) | VectorKind::Linear(_) => {
                let lin = v.to_linear();
                VectorKind::Linear(VectorLinear {
                    l: a * &lin.l,
                    x: lin.x,
                    c: a * &lin.c,
                })
            }
        };
        Ok(VectorExpr {
            kind,
            orientation: Orientation::Column,
        })
    }

    /// `v' A` for a row vector expression `v'`, computed as `(A' v)'`.
    pub fn left_multiply(&self, v: &VectorExpr) -> Result<VectorExpr> {
        if v.orientation != Orientation::Row {
            return Err(ModelError::OrientationMismatch {
                operation: "multiply",
                lhs: v.orientation,
                rhs: Orientation::Column,
            });
        }
        let a = self.constant_operand("multiply")?;
        if a.nrows() != v.len() {
            return Err(ModelError::DimensionMismatch {
                operation: "multiply",
                lhs: v.dimensions(),
                rhs: self.dimensions(),
            });
        }
        Ok(self.transpose().multiply_vector(&v.transpose())?.transpose())
    }
}

impl From<DMatrix<f64>> for MatrixExpr {
    fn from(m: DMatrix<f64>) -> Self {
        MatrixExpr::Constant(m)
    }
}

impl From<VarMatrix> for MatrixExpr {
    fn from(v: VarMatrix) -> Self {
        MatrixExpr::Variables(v)
    }
}
