//! Vector expressions of degree at most one.
//!
//! A vector expression is one of:
//! - `Constant(k)`: a constant vector
//! - `Variables(v)`: a vector of variables (repeats allowed)
//! - `Linear`: `L x + C` with `L` of size `n x |x|`
//!
//! and carries an [`Orientation`] tag. Addition and comparison need equal
//! orientations; products need a row on the left and a column on the right.

use nalgebra::{DMatrix, DVector};

use super::align::{align, positions_in, scatter_columns};
use super::matrix::MatrixExpr;
use super::scalar::{ScalarExpr, ScalarLinear, ScalarQuadratic};
use super::shape::{Orientation, Shape};
use super::variable::{VarId, VarVector};
use crate::constraints::{ConstraintSense, VectorConstraint};
use crate::error::{ModelError, Result};

/// Affine vector expression `L x + C`.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorLinear {
    /// Coefficients, `n x |x|`.
    pub l: DMatrix<f64>,
    /// Variables, without repeats.
    pub x: VarVector,
    /// Constant offset of length `n`.
    pub c: DVector<f64>,
}

impl VectorLinear {
    /// Create a linear vector expression, validating its invariants.
    pub fn new(l: DMatrix<f64>, x: VarVector, c: DVector<f64>) -> Result<Self> {
        let lin = VectorLinear { l, x, c };
        lin.check()?;
        Ok(lin)
    }

    /// Promote a variable vector: row `i` selects `vars[i]`.
    pub fn from_variables(vars: &VarVector) -> Self {
        let al = align(vars, &VarVector::default());
        let mut l = DMatrix::zeros(vars.len(), al.vars.len());
        for (i, &j) in al.lhs.iter().enumerate() {
            l[(i, j)] = 1.0;
        }
        VectorLinear {
            l,
            x: al.vars,
            c: DVector::zeros(vars.len()),
        }
    }

    pub fn from_constant(c: &DVector<f64>) -> Self {
        VectorLinear {
            l: DMatrix::zeros(c.len(), 0),
            x: VarVector::default(),
            c: c.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.c.is_empty()
    }

    pub fn check(&self) -> Result<()> {
        if self.l.nrows() != self.c.len() {
            return Err(ModelError::MalformedExpression(format!(
                "L has {} rows for a constant of length {}",
                self.l.nrows(),
                self.c.len()
            )));
        }
        if self.l.ncols() != self.x.len() {
            return Err(ModelError::MalformedExpression(format!(
                "L has {} columns for {} variables",
                self.l.ncols(),
                self.x.len()
            )));
        }
        if self.x.has_duplicates() {
            return Err(ModelError::MalformedExpression(
                "variable vector repeats a variable".into(),
            ));
        }
        Ok(())
    }

    /// Rewrite onto a larger variable ordering without changing the value.
    pub fn rewrite_onto(&self, target: &VarVector) -> Result<VectorLinear> {
        self.check()?;
        let pos = positions_in(&self.x, target)?;
        Ok(VectorLinear {
            l: scatter_columns(&self.l, &pos, target.len()),
            x: target.clone(),
            c: self.c.clone(),
        })
    }

    pub fn plus(&self, rhs: &VectorLinear) -> Result<VectorLinear> {
        if self.len() != rhs.len() {
            return Err(ModelError::DimensionMismatch {
                operation: "plus",
                lhs: Shape::column(self.len()),
                rhs: Shape::column(rhs.len()),
            });
        }
        let al = align(&self.x, &rhs.x);
        let n = al.vars.len();
        Ok(VectorLinear {
            l: scatter_columns(&self.l, &al.lhs, n) + scatter_columns(&rhs.l, &al.rhs, n),
            x: al.vars,
            c: &self.c + &rhs.c,
        })
    }

    pub fn scale(&self, k: f64) -> VectorLinear {
        VectorLinear {
            l: &self.l * k,
            x: self.x.clone(),
            c: &self.c * k,
        }
    }

    /// Row `i` as a scalar expression over the same variables.
    pub fn row(&self, i: usize) -> Option<ScalarLinear> {
        if i >= self.len() {
            return None;
        }
        Some(ScalarLinear {
            l: self.l.row(i).transpose(),
            x: self.x.clone(),
            c: self.c[i],
        })
    }
}

/// Variant data of a vector expression.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorKind {
    Constant(DVector<f64>),
    Variables(VarVector),
    Linear(VectorLinear),
}

/// A vector expression with its orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorExpr {
    pub kind: VectorKind,
    pub orientation: Orientation,
}

impl VectorExpr {
    /// A constant column vector.
    pub fn constant(values: Vec<f64>) -> Self {
        Self::column(VectorKind::Constant(DVector::from_vec(values)))
    }

    pub fn zeros(n: usize) -> Self {
        Self::column(VectorKind::Constant(DVector::zeros(n)))
    }

    pub fn ones(n: usize) -> Self {
        Self::column(VectorKind::Constant(DVector::from_element(n, 1.0)))
    }

    /// A column vector of variables.
    pub fn from_vars(vars: VarVector) -> Self {
        Self::column(VectorKind::Variables(vars))
    }

    /// A linear column vector expression.
    pub fn linear(lin: VectorLinear) -> Self {
        Self::column(VectorKind::Linear(lin))
    }

    fn column(kind: VectorKind) -> Self {
        VectorExpr {
            kind,
            orientation: Orientation::Column,
        }
    }

    pub fn len(&self) -> usize {
        match &self.kind {
            VectorKind::Constant(c) => c.len(),
            VectorKind::Variables(v) => v.len(),
            VectorKind::Linear(lin) => lin.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, VectorKind::Constant(_))
    }

    pub fn dimensions(&self) -> Shape {
        self.orientation.shape(self.len())
    }

    /// Flip the orientation tag.
    pub fn transpose(&self) -> VectorExpr {
        VectorExpr {
            kind: self.kind.clone(),
            orientation: self.orientation.flip(),
        }
    }

    /// Distinct variables, in first-occurrence order.
    pub fn variables(&self) -> VarVector {
        match &self.kind {
            VectorKind::Constant(_) => VarVector::default(),
            VectorKind::Variables(v) => v.unique(),
            VectorKind::Linear(lin) => lin.x.clone(),
        }
    }

    pub fn variable_ids(&self) -> Vec<VarId> {
        self.variables().ids()
    }

    pub fn num_vars(&self) -> usize {
        self.variables().len()
    }

    /// Element `i` as a scalar expression.
    pub fn at(&self, i: usize) -> Option<ScalarExpr> {
        match &self.kind {
            VectorKind::Constant(c) => c.get(i).map(|k| ScalarExpr::Constant(*k)),
            VectorKind::Variables(v) => v.at(i).map(|var| ScalarExpr::Variable(var.clone())),
            VectorKind::Linear(lin) => lin.row(i).map(ScalarExpr::Linear),
        }
    }

    /// Promote to `VectorLinear`.
    pub fn to_linear(&self) -> VectorLinear {
        match &self.kind {
            VectorKind::Constant(c) => VectorLinear::from_constant(c),
            VectorKind::Variables(v) => VectorLinear::from_variables(v),
            VectorKind::Linear(lin) => lin.clone(),
        }
    }

    /// Coefficient matrix `L`, aligned with `variables()`.
    pub fn linear_coeff(&self) -> DMatrix<f64> {
        self.to_linear().l
    }

    /// Constant offset `C`.
    pub fn constant_part(&self) -> DVector<f64> {
        match &self.kind {
            VectorKind::Constant(c) => c.clone(),
            VectorKind::Variables(v) => DVector::zeros(v.len()),
            VectorKind::Linear(lin) => lin.c.clone(),
        }
    }

    /// Same expression with its constant offset removed.
    pub fn without_constant(&self) -> VectorExpr {
        let kind = match &self.kind {
            VectorKind::Constant(c) => VectorKind::Constant(DVector::zeros(c.len())),
            VectorKind::Variables(v) => VectorKind::Variables(v.clone()),
            VectorKind::Linear(lin) => VectorKind::Linear(VectorLinear {
                c: DVector::zeros(lin.len()),
                ..lin.clone()
            }),
        };
        VectorExpr {
            kind,
            orientation: self.orientation,
        }
    }

    pub fn check(&self) -> Result<()> {
        match &self.kind {
            VectorKind::Constant(_) | VectorKind::Variables(_) => Ok(()),
            VectorKind::Linear(lin) => lin.check(),
        }
    }

    /// Rewrite onto `target`, which must contain every variable of `self`.
    pub fn rewrite_onto(&self, target: &VarVector) -> Result<VectorLinear> {
        self.to_linear().rewrite_onto(target)
    }

    fn ensure_compatible(&self, operation: &'static str, rhs: &VectorExpr) -> Result<()> {
        if self.orientation != rhs.orientation {
            return Err(ModelError::OrientationMismatch {
                operation,
                lhs: self.orientation,
                rhs: rhs.orientation,
            });
        }
        if self.len() != rhs.len() {
            return Err(ModelError::DimensionMismatch {
                operation,
                lhs: self.dimensions(),
                rhs: rhs.dimensions(),
            });
        }
        Ok(())
    }

    /// Element-wise addition.
    pub fn plus(&self, rhs: &VectorExpr) -> Result<VectorExpr> {
        use VectorKind::{Constant, Linear, Variables};

        self.ensure_compatible("plus", rhs)?;
        let kind = match (&self.kind, &rhs.kind) {
            (Constant(a), Constant(b)) => Constant(a + b),
            (Constant(k), Variables(v)) | (Variables(v), Constant(k)) => Linear(VectorLinear {
                c: k.clone(),
                ..VectorLinear::from_variables(v)
            }),
            (Constant(k), Linear(lin)) | (Linear(lin), Constant(k)) => Linear(VectorLinear {
                c: &lin.c + k,
                ..lin.clone()
            }),
            (Variables(_) | Linear(_), Variables(_) | Linear(_)) => {
                Linear(self.to_linear().plus(&rhs.to_linear())?)
            }
        };
        Ok(VectorExpr {
            kind,
            orientation: self.orientation,
        })
    }

    pub fn minus(&self, rhs: &VectorExpr) -> Result<VectorExpr> {
        self.plus(&rhs.neg())
    }

    pub fn neg(&self) -> VectorExpr {
        self.scale(-1.0)
    }

    /// Multiply every element by a constant.
    pub fn scale(&self, k: f64) -> VectorExpr {
        let kind = match &self.kind {
            VectorKind::Constant(c) => VectorKind::Constant(c * k),
            VectorKind::Variables(v) => VectorKind::Linear(VectorLinear::from_variables(v).scale(k)),
            VectorKind::Linear(lin) => VectorKind::Linear(lin.scale(k)),
        };
        VectorExpr {
            kind,
            orientation: self.orientation,
        }
    }

    /// Multiply every element by a scalar expression.
    ///
    /// Only products that stay affine are modeled: a constant times anything,
    /// or an affine scalar times a constant vector.
    pub fn scale_by(&self, s: &ScalarExpr) -> Result<VectorExpr> {
        match s {
            ScalarExpr::Constant(k) => Ok(self.scale(*k)),
            ScalarExpr::Variable(_) | ScalarExpr::Linear(_) => match &self.kind {
                VectorKind::Constant(kv) => {
                    let lin = s.to_linear().ok_or_else(|| {
                        ModelError::MalformedExpression("affine scalar without linear form".into())
                    })?;
                    Ok(VectorExpr {
                        kind: VectorKind::Linear(VectorLinear {
                            l: kv * lin.l.transpose(),
                            x: lin.x,
                            c: kv * lin.c,
                        }),
                        orientation: self.orientation,
                    })
                }
                VectorKind::Variables(_) | VectorKind::Linear(_) => Err(ModelError::NotImplemented(
                    "product of a non-constant scalar and a non-constant vector".into(),
                )),
            },
            ScalarExpr::Quadratic(_) => match &self.kind {
                VectorKind::Constant(_) => Err(ModelError::NotImplemented(
                    "quadratic vector expressions".into(),
                )),
                VectorKind::Variables(_) | VectorKind::Linear(_) => {
                    Err(ModelError::DegreeExceeded { lhs: 2, rhs: 1 })
                }
            },
        }
    }

    /// Inner product of a row vector with a column vector.
    ///
    /// The result is constant, linear or quadratic depending on how many
    /// operands carry variables.
    pub fn inner(&self, rhs: &VectorExpr) -> Result<ScalarExpr> {
        match (self.orientation, rhs.orientation) {
            (Orientation::Row, Orientation::Column) => {}
            (Orientation::Column, Orientation::Row) => {
                return Err(ModelError::NotImplemented(
                    "column times row yields a matrix of expressions".into(),
                ))
            }
            (lhs, rhs) => {
                return Err(ModelError::OrientationMismatch {
                    operation: "multiply",
                    lhs,
                    rhs,
                })
            }
        }
        if self.len() != rhs.len() {
            return Err(ModelError::DimensionMismatch {
                operation: "multiply",
                lhs: self.dimensions(),
                rhs: rhs.dimensions(),
            });
        }

        if let (VectorKind::Constant(a), VectorKind::Constant(b)) = (&self.kind, &rhs.kind) {
            return Ok(ScalarExpr::Constant(a.dot(b)));
        }

        // (L1 x + c1)'(L2 x + c2) over the shared ordering.
        let (p, q) = (self.to_linear(), rhs.to_linear());
        let al = align(&p.x, &q.x);
        let n = al.vars.len();
        let l1 = scatter_columns(&p.l, &al.lhs, n);
        let l2 = scatter_columns(&q.l, &al.rhs, n);
        let l = l1.tr_mul(&q.c) + l2.tr_mul(&p.c);
        let c = p.c.dot(&q.c);

        if self.is_constant() || rhs.is_constant() {
            return Ok(ScalarExpr::Linear(ScalarLinear { l, x: al.vars, c }));
        }
        let m = l1.tr_mul(&l2);
        let sym = (&m + m.transpose()) * 0.5;
        Ok(ScalarExpr::Quadratic(ScalarQuadratic {
            q: sym,
            l,
            x: al.vars,
            c,
        }))
    }

    /// Row vector times a matrix expression.
    pub fn multiply_matrix(&self, m: &MatrixExpr) -> Result<VectorExpr> {
        m.left_multiply(self)
    }

    /// Build `self <sense> rhs`; orientations and lengths must match.
    pub fn comparison(&self, rhs: &VectorExpr, sense: ConstraintSense) -> Result<VectorConstraint> {
        self.ensure_compatible("comparison", rhs)?;
        Ok(VectorConstraint::new(self.clone(), rhs.clone(), sense))
    }

    pub fn less_eq(&self, rhs: &VectorExpr) -> Result<VectorConstraint> {
        self.comparison(rhs, ConstraintSense::LessEq)
    }

    pub fn greater_eq(&self, rhs: &VectorExpr) -> Result<VectorConstraint> {
        self.comparison(rhs, ConstraintSense::GreaterEq)
    }

    pub fn equals(&self, rhs: &VectorExpr) -> Result<VectorConstraint> {
        self.comparison(rhs, ConstraintSense::Equal)
    }

    /// Value of every element given a value for every variable.
    pub fn evaluate_with<F>(&self, value_of: F) -> Result<DVector<f64>>
    where
        F: Fn(VarId) -> Option<f64>,
    {
        self.check()?;
        let lin = self.to_linear();
        let values = lin
            .x
            .iter()
            .map(|v| value_of(v.id).ok_or(ModelError::VariableNotFound(v.id)))
            .collect::<Result<Vec<f64>>>()?;
        Ok(&lin.l * DVector::from_vec(values) + lin.c)
    }

    /// Check that both expressions have the same orientation and denote the
    /// same affine map, up to `tol`.
    pub fn is_equivalent_to(&self, other: &VectorExpr, tol: f64) -> bool {
        if self.orientation != other.orientation || self.len() != other.len() {
            return false;
        }
        if self.check().is_err() || other.check().is_err() {
            return false;
        }
        let (a, b) = (self.to_linear(), other.to_linear());
        let al = align(&a.x, &b.x);
        let n = al.vars.len();
        let dl = scatter_columns(&a.l, &al.lhs, n) - scatter_columns(&b.l, &al.rhs, n);
        let dc = &a.c - &b.c;
        dl.iter().chain(dc.iter()).all(|d| d.abs() <= tol)
    }
}

impl From<VarVector> for VectorExpr {
    fn from(vars: VarVector) -> Self {
        VectorExpr::from_vars(vars)
    }
}

impl From<DVector<f64>> for VectorExpr {
    fn from(values: DVector<f64>) -> Self {
        VectorExpr::column(VectorKind::Constant(values))
    }
}

impl From<VectorLinear> for VectorExpr {
    fn from(lin: VectorLinear) -> Self {
        VectorExpr::linear(lin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::variable::{VarKind, Variable};

    const TOL: f64 = 1e-12;

    fn var(id: u64) -> Variable {
        Variable::new(VarId::new(id), f64::NEG_INFINITY, f64::INFINITY, VarKind::Continuous)
    }

    fn vars(ids: &[u64]) -> VarVector {
        ids.iter().map(|&i| var(i)).collect()
    }

    #[test]
    fn test_constant_plus_constant() {
        let a = VectorExpr::constant(vec![1.0, 2.0]);
        let b = VectorExpr::constant(vec![3.0, 4.0]);
        assert_eq!(a.plus(&b).expect("same shape"), VectorExpr::constant(vec![4.0, 6.0]));
    }

    #[test]
    fn test_constant_plus_variables_is_identity_map() {
        let k = VectorExpr::constant(vec![1.0, 2.0, 3.0]);
        let x = VectorExpr::from_vars(vars(&[0, 1, 2]));
        let sum = k.plus(&x).expect("same shape");
        let VectorKind::Linear(lin) = &sum.kind else {
            panic!("Expected Linear");
        };
        assert_eq!(lin.l, DMatrix::identity(3, 3));
        assert_eq!(lin.c, DVector::from_vec(vec![1.0, 2.0, 3.0]));
        assert_eq!(lin.x.ids(), vars(&[0, 1, 2]).ids());
    }

    #[test]
    fn test_variables_plus_variables_union() {
        let a = VectorExpr::from_vars(vars(&[0, 1]));
        let b = VectorExpr::from_vars(vars(&[1, 2]));
        let sum = a.plus(&b).expect("same shape");
        assert_eq!(sum.variable_ids(), vars(&[0, 1, 2]).ids());
        assert_eq!(
            sum.linear_coeff(),
            DMatrix::from_row_slice(2, 3, &[1.0, 1.0, 0.0, 0.0, 1.0, 1.0])
        );
        assert_eq!(sum.constant_part(), DVector::zeros(2));
    }

    #[test]
    fn test_repeated_variables_accumulate() {
        let a = VectorExpr::from_vars(vars(&[0, 0]));
        let b = VectorExpr::from_vars(vars(&[0, 1]));
        let sum = a.plus(&b).expect("same shape");
        assert_eq!(
            sum.linear_coeff(),
            DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 1.0, 1.0])
        );
    }

    #[test]
    fn test_length_mismatch() {
        let a = VectorExpr::from_vars(vars(&[0, 1]));
        let b = VectorExpr::from_vars(vars(&[0, 1, 2]));
        assert!(matches!(
            a.plus(&b),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_orientation_mismatch() {
        let a = VectorExpr::from_vars(vars(&[0, 1]));
        let b = VectorExpr::constant(vec![1.0, 1.0]).transpose();
        assert!(matches!(
            a.plus(&b),
            Err(ModelError::OrientationMismatch { .. })
        ));
        assert!(matches!(
            a.less_eq(&b),
            Err(ModelError::OrientationMismatch { .. })
        ));
    }

    #[test]
    fn test_transpose_involution() {
        let a = VectorExpr::from_vars(vars(&[0, 1]));
        assert_eq!(a.transpose().orientation, Orientation::Row);
        assert_eq!(a.transpose().dimensions(), Shape::row(2));
        assert_eq!(a.transpose().transpose(), a);
    }

    #[test]
    fn test_at() {
        let x = VectorExpr::from_vars(vars(&[4, 5]));
        let sum = x.plus(&VectorExpr::constant(vec![1.0, 2.0])).expect("same shape");
        let e = sum.at(1).expect("in range");
        assert!(e.is_equivalent_to(&ScalarExpr::Variable(var(5)).plus(&ScalarExpr::Constant(2.0)), TOL));
        assert!(sum.at(2).is_none());
        assert_eq!(x.at(0), Some(ScalarExpr::Variable(var(4))));
    }

    #[test]
    fn test_scale_by_variable() {
        let k = VectorExpr::constant(vec![2.0, 3.0]);
        let e = k.scale_by(&ScalarExpr::Variable(var(7))).expect("affine");
        assert_eq!(e.linear_coeff(), DMatrix::from_row_slice(2, 1, &[2.0, 3.0]));

        let x = VectorExpr::from_vars(vars(&[0, 1]));
        assert!(matches!(
            x.scale_by(&ScalarExpr::Variable(var(7))),
            Err(ModelError::NotImplemented(_))
        ));
        let sq = ScalarExpr::Variable(var(7))
            .multiply(&ScalarExpr::Variable(var(7)))
            .expect("degree 2");
        assert!(matches!(
            x.scale_by(&sq),
            Err(ModelError::DegreeExceeded { .. })
        ));
    }

    #[test]
    fn test_inner_constant_with_variables() {
        let c = VectorExpr::constant(vec![4.0, 3.0, 5.0]).transpose();
        let x = VectorExpr::from_vars(vars(&[0, 1, 2]));
        let e = c.inner(&x).expect("row times column");
        assert_eq!(e.degree(), 1);
        assert_eq!(e.coefficients(), DVector::from_vec(vec![4.0, 3.0, 5.0]));
    }

    #[test]
    fn test_inner_variables_is_sum_of_squares() {
        let x = VectorExpr::from_vars(vars(&[0, 1]));
        let e = x.transpose().inner(&x).expect("row times column");
        assert_eq!(e.degree(), 2);
        assert_eq!(e.quadratic_coefficients(), DMatrix::identity(2, 2));
        assert!(e.check().is_ok());
    }

    #[test]
    fn test_inner_orientation_rules() {
        let x = VectorExpr::from_vars(vars(&[0, 1]));
        assert!(matches!(x.inner(&x), Err(ModelError::OrientationMismatch { .. })));
        assert!(matches!(
            x.inner(&x.transpose()),
            Err(ModelError::NotImplemented(_))
        ));
        let y = VectorExpr::from_vars(vars(&[0, 1, 2]));
        assert!(matches!(
            x.transpose().inner(&y),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_evaluate_with() {
        let x = VectorExpr::from_vars(vars(&[0, 1]));
        let e = x.scale(2.0).plus(&VectorExpr::constant(vec![1.0, -1.0])).expect("same shape");
        let v = e.evaluate_with(|id| Some(id.raw() as f64 + 1.0)).expect("values");
        assert_eq!(v, DVector::from_vec(vec![3.0, 3.0]));
    }

    #[test]
    fn test_rewrite_onto() {
        let x = VectorExpr::from_vars(vars(&[2, 0]));
        let lin = x.rewrite_onto(&vars(&[0, 1, 2])).expect("superset");
        assert_eq!(
            lin.l,
            DMatrix::from_row_slice(2, 3, &[0.0, 0.0, 1.0, 1.0, 0.0, 0.0])
        );
        assert!(matches!(
            x.rewrite_onto(&vars(&[0])),
            Err(ModelError::VariableNotFound(_))
        ));
    }

    #[test]
    fn test_check_malformed() {
        let lin = VectorLinear {
            l: DMatrix::zeros(2, 3),
            x: vars(&[0, 1]),
            c: DVector::zeros(2),
        };
        let e = VectorExpr::linear(lin);
        assert!(e.check().is_err());
        assert!(matches!(
            e.evaluate_with(|_| Some(1.0)),
            Err(ModelError::MalformedExpression(_))
        ));
        assert!(matches!(
            e.rewrite_onto(&vars(&[0, 1, 2])),
            Err(ModelError::MalformedExpression(_))
        ));
        assert!(!e.is_equivalent_to(&e, TOL));
    }
}
