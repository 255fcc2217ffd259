//! Scalar expressions of degree at most two.
//!
//! The closed variant set is:
//! - `Constant(k)`
//! - `Variable(v)` (coefficient 1, offset 0)
//! - `Linear`: `L'x + C`
//! - `Quadratic`: `x'Qx + L'x + C`, with `Q` stored dense and symmetric
//!
//! Every binary operation dispatches on the `(lhs, rhs)` variant pair and
//! promotes to the smallest variant able to hold the result.

use nalgebra::{DMatrix, DVector};

use super::align::{align, positions_in, scatter_square, scatter_vector};
use super::shape::Shape;
use super::variable::{VarId, VarVector, Variable};
use crate::constraints::{ConstraintSense, ScalarConstraint};
use crate::error::{ModelError, Result};

const SYMMETRY_TOL: f64 = 1e-9;

/// Affine scalar expression `L'x + C`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarLinear {
    /// Coefficients, one per entry of `x`.
    pub l: DVector<f64>,
    /// Variables, without repeats.
    pub x: VarVector,
    /// Constant offset.
    pub c: f64,
}

impl ScalarLinear {
    /// Create a linear expression, validating its invariants.
    pub fn new(l: DVector<f64>, x: VarVector, c: f64) -> Result<Self> {
        let lin = ScalarLinear { l, x, c };
        lin.check()?;
        Ok(lin)
    }

    /// `1 * v + 0`.
    pub fn from_variable(v: &Variable) -> Self {
        ScalarLinear {
            l: DVector::from_element(1, 1.0),
            x: VarVector::new(vec![v.clone()]),
            c: 0.0,
        }
    }

    /// A constant with no variables.
    pub fn from_constant(c: f64) -> Self {
        ScalarLinear {
            l: DVector::zeros(0),
            x: VarVector::default(),
            c,
        }
    }

    pub fn check(&self) -> Result<()> {
        if self.l.len() != self.x.len() {
            return Err(ModelError::MalformedExpression(format!(
                "L has {} entries for {} variables",
                self.l.len(),
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
    pub fn rewrite_onto(&self, target: &VarVector) -> Result<ScalarLinear> {
        self.check()?;
        let pos = positions_in(&self.x, target)?;
        Ok(self.scattered(&pos, target.clone()))
    }

    fn scattered(&self, positions: &[usize], vars: VarVector) -> ScalarLinear {
        ScalarLinear {
            l: scatter_vector(&self.l, positions, vars.len()),
            x: vars,
            c: self.c,
        }
    }

    pub fn plus(&self, rhs: &ScalarLinear) -> ScalarLinear {
        let al = align(&self.x, &rhs.x);
        let n = al.vars.len();
        let l = scatter_vector(&self.l, &al.lhs, n) + scatter_vector(&rhs.l, &al.rhs, n);
        ScalarLinear {
            l,
            x: al.vars,
            c: self.c + rhs.c,
        }
    }

    pub fn scale(&self, k: f64) -> ScalarLinear {
        ScalarLinear {
            l: &self.l * k,
            x: self.x.clone(),
            c: self.c * k,
        }
    }

    /// Product of two affine expressions.
    ///
    /// For unified coefficients `a` and `b`, the term `a_i b_j x_i x_j` lands on
    /// the diagonal when `i == j` and is split in halves over `[i, j]` and
    /// `[j, i]` otherwise, so `Q` stays symmetric.
    pub fn times(&self, rhs: &ScalarLinear) -> ScalarQuadratic {
        let al = align(&self.x, &rhs.x);
        let n = al.vars.len();
        let a = scatter_vector(&self.l, &al.lhs, n);
        let b = scatter_vector(&rhs.l, &al.rhs, n);

        let mut q = DMatrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                let p = a[i] * b[j];
                if p == 0.0 {
                    continue;
                }
                if i == j {
                    q[(i, i)] += p;
                } else {
                    q[(i, j)] += 0.5 * p;
                    q[(j, i)] += 0.5 * p;
                }
            }
        }

        let l = &a * rhs.c + &b * self.c;
        ScalarQuadratic {
            q,
            l,
            x: al.vars,
            c: self.c * rhs.c,
        }
    }
}

/// Quadratic scalar expression `x'Qx + L'x + C`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarQuadratic {
    /// Symmetric quadratic coefficients, `|x| x |x|`.
    pub q: DMatrix<f64>,
    /// Linear coefficients, one per entry of `x`.
    pub l: DVector<f64>,
    /// Variables, without repeats.
    pub x: VarVector,
    /// Constant offset.
    pub c: f64,
}

impl ScalarQuadratic {
    /// Create a quadratic expression, validating its invariants.
    pub fn new(q: DMatrix<f64>, l: DVector<f64>, x: VarVector, c: f64) -> Result<Self> {
        let quad = ScalarQuadratic { q, l, x, c };
        quad.check()?;
        Ok(quad)
    }

    /// Promote an affine expression (zero `Q`).
    pub fn from_linear(lin: &ScalarLinear) -> Self {
        let n = lin.x.len();
        ScalarQuadratic {
            q: DMatrix::zeros(n, n),
            l: lin.l.clone(),
            x: lin.x.clone(),
            c: lin.c,
        }
    }

    pub fn check(&self) -> Result<()> {
        let n = self.x.len();
        if self.q.nrows() != n || self.q.ncols() != n {
            return Err(ModelError::MalformedExpression(format!(
                "Q is {}x{} for {} variables",
                self.q.nrows(),
                self.q.ncols(),
                n
            )));
        }
        if self.l.len() != n {
            return Err(ModelError::MalformedExpression(format!(
                "L has {} entries for {} variables",
                self.l.len(),
                n
            )));
        }
        if self.x.has_duplicates() {
            return Err(ModelError::MalformedExpression(
                "variable vector repeats a variable".into(),
            ));
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (self.q[(i, j)], self.q[(j, i)]);
                if (a - b).abs() > SYMMETRY_TOL * (1.0 + a.abs().max(b.abs())) {
                    return Err(ModelError::MalformedExpression(format!(
                        "Q is not symmetric at ({i}, {j})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Rewrite onto a larger variable ordering without changing the value.
    pub fn rewrite_onto(&self, target: &VarVector) -> Result<ScalarQuadratic> {
        self.check()?;
        let pos = positions_in(&self.x, target)?;
        Ok(self.scattered(&pos, target.clone()))
    }

    fn scattered(&self, positions: &[usize], vars: VarVector) -> ScalarQuadratic {
        let n = vars.len();
        ScalarQuadratic {
            q: scatter_square(&self.q, positions, n),
            l: scatter_vector(&self.l, positions, n),
            x: vars,
            c: self.c,
        }
    }

    pub fn plus(&self, rhs: &ScalarQuadratic) -> ScalarQuadratic {
        let al = align(&self.x, &rhs.x);
        let lhs = self.scattered(&al.lhs, al.vars.clone());
        let rhs = rhs.scattered(&al.rhs, al.vars);
        ScalarQuadratic {
            q: lhs.q + rhs.q,
            l: lhs.l + rhs.l,
            x: lhs.x,
            c: lhs.c + rhs.c,
        }
    }

    pub fn scale(&self, k: f64) -> ScalarQuadratic {
        ScalarQuadratic {
            q: &self.q * k,
            l: &self.l * k,
            x: self.x.clone(),
            c: self.c * k,
        }
    }
}

/// A scalar expression of degree at most two.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarExpr {
    /// A constant value.
    Constant(f64),
    /// A single decision variable.
    Variable(Variable),
    /// An affine expression.
    Linear(ScalarLinear),
    /// A quadratic expression.
    Quadratic(ScalarQuadratic),
}

impl ScalarExpr {
    pub fn zero() -> Self {
        ScalarExpr::Constant(0.0)
    }

    /// Polynomial degree by variant: 0, 1 or 2.
    pub fn degree(&self) -> u8 {
        match self {
            ScalarExpr::Constant(_) => 0,
            ScalarExpr::Variable(_) | ScalarExpr::Linear(_) => 1,
            ScalarExpr::Quadratic(_) => 2,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, ScalarExpr::Constant(_))
    }

    pub fn is_linear(&self) -> bool {
        self.degree() <= 1
    }

    pub fn dimensions(&self) -> Shape {
        Shape::scalar()
    }

    /// The variable vector of this expression (empty for constants).
    pub fn variables(&self) -> VarVector {
        match self {
            ScalarExpr::Constant(_) => VarVector::default(),
            ScalarExpr::Variable(v) => VarVector::new(vec![v.clone()]),
            ScalarExpr::Linear(lin) => lin.x.clone(),
            ScalarExpr::Quadratic(quad) => quad.x.clone(),
        }
    }

    /// Ids of the variables, in expression order.
    pub fn variable_ids(&self) -> Vec<VarId> {
        self.variables().ids()
    }

    pub fn num_vars(&self) -> usize {
        match self {
            ScalarExpr::Constant(_) => 0,
            ScalarExpr::Variable(_) => 1,
            ScalarExpr::Linear(lin) => lin.x.len(),
            ScalarExpr::Quadratic(quad) => quad.x.len(),
        }
    }

    /// Linear coefficients, aligned with `variables()`.
    pub fn coefficients(&self) -> DVector<f64> {
        match self {
            ScalarExpr::Constant(_) => DVector::zeros(0),
            ScalarExpr::Variable(_) => DVector::from_element(1, 1.0),
            ScalarExpr::Linear(lin) => lin.l.clone(),
            ScalarExpr::Quadratic(quad) => quad.l.clone(),
        }
    }

    /// Quadratic coefficients, aligned with `variables()` (zero unless quadratic).
    pub fn quadratic_coefficients(&self) -> DMatrix<f64> {
        match self {
            ScalarExpr::Quadratic(quad) => quad.q.clone(),
            other => {
                let n = other.num_vars();
                DMatrix::zeros(n, n)
            }
        }
    }

    pub fn constant(&self) -> f64 {
        match self {
            ScalarExpr::Constant(k) => *k,
            ScalarExpr::Variable(_) => 0.0,
            ScalarExpr::Linear(lin) => lin.c,
            ScalarExpr::Quadratic(quad) => quad.c,
        }
    }

    /// Same expression with its constant term removed.
    pub fn without_constant(&self) -> ScalarExpr {
        match self {
            ScalarExpr::Constant(_) => ScalarExpr::Constant(0.0),
            ScalarExpr::Variable(v) => ScalarExpr::Variable(v.clone()),
            ScalarExpr::Linear(lin) => ScalarExpr::Linear(ScalarLinear {
                c: 0.0,
                ..lin.clone()
            }),
            ScalarExpr::Quadratic(quad) => ScalarExpr::Quadratic(ScalarQuadratic {
                c: 0.0,
                ..quad.clone()
            }),
        }
    }

    /// Promote to `ScalarLinear`; `None` for quadratics.
    pub fn to_linear(&self) -> Option<ScalarLinear> {
        match self {
            ScalarExpr::Constant(k) => Some(ScalarLinear::from_constant(*k)),
            ScalarExpr::Variable(v) => Some(ScalarLinear::from_variable(v)),
            ScalarExpr::Linear(lin) => Some(lin.clone()),
            ScalarExpr::Quadratic(_) => None,
        }
    }

    /// Promote to `ScalarQuadratic`.
    pub fn to_quadratic(&self) -> ScalarQuadratic {
        match self {
            ScalarExpr::Quadratic(quad) => quad.clone(),
            ScalarExpr::Constant(k) => ScalarQuadratic::from_linear(&ScalarLinear::from_constant(*k)),
            ScalarExpr::Variable(v) => ScalarQuadratic::from_linear(&ScalarLinear::from_variable(v)),
            ScalarExpr::Linear(lin) => ScalarQuadratic::from_linear(lin),
        }
    }

    pub fn check(&self) -> Result<()> {
        match self {
            ScalarExpr::Constant(_) | ScalarExpr::Variable(_) => Ok(()),
            ScalarExpr::Linear(lin) => lin.check(),
            ScalarExpr::Quadratic(quad) => quad.check(),
        }
    }

    /// Rewrite onto `target`, which must contain every variable of `self`.
    ///
    /// The result is `Linear` for degree 0 and 1 and `Quadratic` for degree 2.
    pub fn rewrite_onto(&self, target: &VarVector) -> Result<ScalarExpr> {
        match self {
            ScalarExpr::Quadratic(quad) => Ok(ScalarExpr::Quadratic(quad.rewrite_onto(target)?)),
            other => {
                let lin = other.to_linear().ok_or_else(|| {
                    ModelError::MalformedExpression("non-quadratic expression without linear form".into())
                })?;
                Ok(ScalarExpr::Linear(lin.rewrite_onto(target)?))
            }
        }
    }

    /// Polynomial addition.
    pub fn plus(&self, rhs: &ScalarExpr) -> ScalarExpr {
        use ScalarExpr::{Constant, Linear, Quadratic};
        match (self, rhs) {
            (Constant(a), Constant(b)) => Constant(a + b),
            (Constant(k), ScalarExpr::Variable(v)) | (ScalarExpr::Variable(v), Constant(k)) => {
                Linear(ScalarLinear {
                    c: *k,
                    ..ScalarLinear::from_variable(v)
                })
            }
            (Constant(k), Linear(lin)) | (Linear(lin), Constant(k)) => Linear(ScalarLinear {
                c: lin.c + k,
                ..lin.clone()
            }),
            (Constant(k), Quadratic(quad)) | (Quadratic(quad), Constant(k)) => {
                Quadratic(ScalarQuadratic {
                    c: quad.c + k,
                    ..quad.clone()
                })
            }
            (Quadratic(a), Quadratic(b)) => Quadratic(a.plus(b)),
            (Quadratic(quad), other) => Quadratic(quad.plus(&other.to_quadratic())),
            (other, Quadratic(quad)) => Quadratic(other.to_quadratic().plus(quad)),
            (ScalarExpr::Variable(_) | Linear(_), ScalarExpr::Variable(_) | Linear(_)) => {
                let (a, b) = (self.linear_part(), rhs.linear_part());
                Linear(a.plus(&b))
            }
        }
    }

    pub fn minus(&self, rhs: &ScalarExpr) -> ScalarExpr {
        self.plus(&rhs.neg())
    }

    pub fn neg(&self) -> ScalarExpr {
        self.scale(-1.0)
    }

    /// Multiply by a constant.
    pub fn scale(&self, k: f64) -> ScalarExpr {
        match self {
            ScalarExpr::Constant(a) => ScalarExpr::Constant(a * k),
            ScalarExpr::Variable(v) => ScalarExpr::Linear(ScalarLinear::from_variable(v).scale(k)),
            ScalarExpr::Linear(lin) => ScalarExpr::Linear(lin.scale(k)),
            ScalarExpr::Quadratic(quad) => ScalarExpr::Quadratic(quad.scale(k)),
        }
    }

    /// Polynomial multiplication under the degree-2 ceiling.
    pub fn multiply(&self, rhs: &ScalarExpr) -> Result<ScalarExpr> {
        use ScalarExpr::{Constant, Linear, Quadratic};
        match (self, rhs) {
            (Constant(a), Constant(b)) => Ok(Constant(a * b)),
            (Constant(k), other) | (other, Constant(k)) => Ok(other.scale(*k)),
            (Quadratic(_), _) | (_, Quadratic(_)) => Err(ModelError::DegreeExceeded {
                lhs: self.degree(),
                rhs: rhs.degree(),
            }),
            (ScalarExpr::Variable(_) | Linear(_), ScalarExpr::Variable(_) | Linear(_)) => {
                Ok(Quadratic(self.linear_part().times(&rhs.linear_part())))
            }
        }
    }

    /// Build `self <sense> rhs`.
    pub fn comparison(&self, rhs: impl Into<ScalarExpr>, sense: ConstraintSense) -> ScalarConstraint {
        ScalarConstraint::new(self.clone(), rhs.into(), sense)
    }

    pub fn less_eq(&self, rhs: impl Into<ScalarExpr>) -> ScalarConstraint {
        self.comparison(rhs, ConstraintSense::LessEq)
    }

    pub fn greater_eq(&self, rhs: impl Into<ScalarExpr>) -> ScalarConstraint {
        self.comparison(rhs, ConstraintSense::GreaterEq)
    }

    pub fn equals(&self, rhs: impl Into<ScalarExpr>) -> ScalarConstraint {
        self.comparison(rhs, ConstraintSense::Equal)
    }

    /// Value of the expression given a value for every variable.
    pub fn evaluate_with<F>(&self, value_of: F) -> Result<f64>
    where
        F: Fn(VarId) -> Option<f64>,
    {
        self.check()?;
        let values = self
            .variables()
            .iter()
            .map(|v| value_of(v.id).ok_or(ModelError::VariableNotFound(v.id)))
            .collect::<Result<Vec<f64>>>()?;
        let x = DVector::from_vec(values);

        Ok(match self {
            ScalarExpr::Constant(k) => *k,
            ScalarExpr::Variable(_) => x[0],
            ScalarExpr::Linear(lin) => lin.l.dot(&x) + lin.c,
            ScalarExpr::Quadratic(quad) => (&quad.q * &x).dot(&x) + quad.l.dot(&x) + quad.c,
        })
    }

    /// Check that both expressions denote the same polynomial, up to `tol`.
    ///
    /// Variable order and the split of off-diagonal terms in `Q` do not matter.
    pub fn is_equivalent_to(&self, other: &ScalarExpr, tol: f64) -> bool {
        if self.check().is_err() || other.check().is_err() {
            return false;
        }
        let (a, b) = (self.to_quadratic(), other.to_quadratic());
        let al = align(&a.x, &b.x);
        let a = a.scattered(&al.lhs, al.vars.clone());
        let b = b.scattered(&al.rhs, al.vars);

        let sym = |q: &DMatrix<f64>| (q + q.transpose()) * 0.5;
        let close = |d: f64| d.abs() <= tol;

        close(a.c - b.c)
            && (&a.l - &b.l).iter().all(|d| close(*d))
            && (sym(&a.q) - sym(&b.q)).iter().all(|d| close(*d))
    }

    fn linear_part(&self) -> ScalarLinear {
        match self {
            ScalarExpr::Constant(k) => ScalarLinear::from_constant(*k),
            ScalarExpr::Variable(v) => ScalarLinear::from_variable(v),
            ScalarExpr::Linear(lin) => lin.clone(),
            ScalarExpr::Quadratic(quad) => ScalarLinear {
                l: quad.l.clone(),
                x: quad.x.clone(),
                c: quad.c,
            },
        }
    }
}

impl From<f64> for ScalarExpr {
    fn from(value: f64) -> Self {
        ScalarExpr::Constant(value)
    }
}

impl From<i32> for ScalarExpr {
    fn from(value: i32) -> Self {
        ScalarExpr::Constant(value as f64)
    }
}

impl From<Variable> for ScalarExpr {
    fn from(v: Variable) -> Self {
        ScalarExpr::Variable(v)
    }
}

impl From<&Variable> for ScalarExpr {
    fn from(v: &Variable) -> Self {
        ScalarExpr::Variable(v.clone())
    }
}

impl From<ScalarLinear> for ScalarExpr {
    fn from(lin: ScalarLinear) -> Self {
        ScalarExpr::Linear(lin)
    }
}

impl From<ScalarQuadratic> for ScalarExpr {
    fn from(quad: ScalarQuadratic) -> Self {
        ScalarExpr::Quadratic(quad)
    }
}

impl From<&ScalarExpr> for ScalarExpr {
    fn from(expr: &ScalarExpr) -> Self {
        expr.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::variable::VarKind;

    const TOL: f64 = 1e-12;

    fn var(id: u64) -> Variable {
        Variable::new(VarId::new(id), f64::NEG_INFINITY, f64::INFINITY, VarKind::Continuous)
    }

    fn sx(id: u64) -> ScalarExpr {
        ScalarExpr::Variable(var(id))
    }

    #[test]
    fn test_constant_plus_constant() {
        assert_eq!(ScalarExpr::Constant(2.0).plus(&ScalarExpr::Constant(3.5)), ScalarExpr::Constant(5.5));
    }

    #[test]
    fn test_constant_plus_variable() {
        let e = ScalarExpr::Constant(3.0).plus(&sx(0));
        match e {
            ScalarExpr::Linear(lin) => {
                assert_eq!(lin.l, DVector::from_element(1, 1.0));
                assert_eq!(lin.x.ids(), vec![VarId::new(0)]);
                assert_eq!(lin.c, 3.0);
            }
            other => panic!("Expected Linear, got {other:?}"),
        }
    }

    #[test]
    fn test_same_variable_twice() {
        let e = sx(4).plus(&sx(4));
        let ScalarExpr::Linear(lin) = e else {
            panic!("Expected Linear");
        };
        assert_eq!(lin.x.len(), 1);
        assert_eq!(lin.l[0], 2.0);
    }

    #[test]
    fn test_distinct_variables() {
        let e = sx(0).plus(&sx(1));
        assert_eq!(e.coefficients(), DVector::from_vec(vec![1.0, 1.0]));
        assert_eq!(e.variable_ids(), vec![VarId::new(0), VarId::new(1)]);
        assert_eq!(e.constant(), 0.0);
    }

    #[test]
    fn test_alignment_on_addition() {
        let e1 = sx(0).plus(&sx(1));
        let e2 = sx(1).plus(&sx(2));
        let sum = e1.plus(&e2);
        assert_eq!(sum.variable_ids(), vec![VarId::new(0), VarId::new(1), VarId::new(2)]);
        assert_eq!(sum.coefficients(), DVector::from_vec(vec![1.0, 2.0, 1.0]));
        assert_eq!(sum.constant(), 0.0);
    }

    #[test]
    fn test_constant_plus_quadratic_shifts_offset() {
        let q = sx(0).multiply(&sx(0)).expect("degree 2");
        let e = q.plus(&ScalarExpr::Constant(1.5));
        assert_eq!(e.degree(), 2);
        assert_eq!(e.constant(), 1.5);
    }

    #[test]
    fn test_variable_squared() {
        let e = sx(0).multiply(&sx(0)).expect("degree 2");
        let ScalarExpr::Quadratic(quad) = e else {
            panic!("Expected Quadratic");
        };
        assert_eq!(quad.q, DMatrix::from_element(1, 1, 1.0));
        assert_eq!(quad.l, DVector::zeros(1));
    }

    #[test]
    fn test_distinct_variable_product_is_symmetric() {
        let e = sx(0).multiply(&sx(1)).expect("degree 2");
        let ScalarExpr::Quadratic(quad) = e else {
            panic!("Expected Quadratic");
        };
        assert_eq!(quad.q, DMatrix::from_row_slice(2, 2, &[0.0, 0.5, 0.5, 0.0]));
        assert!(quad.check().is_ok());
    }

    #[test]
    fn test_linear_times_linear() {
        // (2x + 1)(3y - 2) = 6xy - 4x + 3y - 2
        let a = sx(0).scale(2.0).plus(&ScalarExpr::Constant(1.0));
        let b = sx(1).scale(3.0).plus(&ScalarExpr::Constant(-2.0));
        let ScalarExpr::Quadratic(quad) = a.multiply(&b).expect("degree 2") else {
            panic!("Expected Quadratic");
        };
        assert_eq!(quad.q, DMatrix::from_row_slice(2, 2, &[0.0, 3.0, 3.0, 0.0]));
        assert_eq!(quad.l, DVector::from_vec(vec![-4.0, 3.0]));
        assert_eq!(quad.c, -2.0);
    }

    #[test]
    fn test_square_of_affine() {
        // (x + 1)^2 = x^2 + 2x + 1
        let e = sx(0).plus(&ScalarExpr::Constant(1.0));
        let ScalarExpr::Quadratic(quad) = e.multiply(&e).expect("degree 2") else {
            panic!("Expected Quadratic");
        };
        assert_eq!(quad.q[(0, 0)], 1.0);
        assert_eq!(quad.l[0], 2.0);
        assert_eq!(quad.c, 1.0);
    }

    #[test]
    fn test_degree_exceeded() {
        let e = sx(0).plus(&ScalarExpr::Constant(1.0));
        let sq = e.multiply(&e).expect("degree 2");
        let err = sq.multiply(&sx(0)).unwrap_err();
        assert!(matches!(err, ModelError::DegreeExceeded { lhs: 2, rhs: 1 }));
        let err = sx(1).multiply(&sq).unwrap_err();
        assert!(matches!(err, ModelError::DegreeExceeded { lhs: 1, rhs: 2 }));
        assert!(sq.multiply(&ScalarExpr::Constant(2.0)).is_ok());
    }

    #[test]
    fn test_scale_quadratic() {
        let sq = sx(0).multiply(&sx(1)).expect("degree 2");
        let scaled = ScalarExpr::Constant(4.0).multiply(&sq).expect("constant factor");
        assert_eq!(scaled.quadratic_coefficients()[(0, 1)], 2.0);
    }

    #[test]
    fn test_rewrite_onto() {
        let e = sx(2).scale(3.0).plus(&ScalarExpr::Constant(1.0));
        let target: VarVector = vec![var(0), var(1), var(2)].into();
        let r = e.rewrite_onto(&target).expect("superset");
        assert_eq!(r.coefficients(), DVector::from_vec(vec![0.0, 0.0, 3.0]));
        assert_eq!(r.constant(), 1.0);

        let same = r.rewrite_onto(&target).expect("identity");
        assert_eq!(same, r);

        let err = e.rewrite_onto(&vec![var(0)].into()).unwrap_err();
        assert!(matches!(err, ModelError::VariableNotFound(id) if id == VarId::new(2)));
    }

    #[test]
    fn test_rewrite_quadratic() {
        let q = sx(1).multiply(&sx(0)).expect("degree 2");
        let target: VarVector = vec![var(0), var(5), var(1)].into();
        let r = q.rewrite_onto(&target).expect("superset");
        let m = r.quadratic_coefficients();
        assert_eq!(m[(0, 2)], 0.5);
        assert_eq!(m[(2, 0)], 0.5);
        assert_eq!(m[(1, 1)], 0.0);
        assert!(r.is_equivalent_to(&q, TOL));
    }

    #[test]
    fn test_check_rejects_malformed() {
        let lin = ScalarLinear {
            l: DVector::from_vec(vec![1.0, 2.0]),
            x: vec![var(0)].into(),
            c: 0.0,
        };
        let e = ScalarExpr::Linear(lin);
        assert!(matches!(e.check(), Err(ModelError::MalformedExpression(_))));
        assert!(matches!(
            e.evaluate_with(|_| Some(1.0)),
            Err(ModelError::MalformedExpression(_))
        ));
        assert!(matches!(
            e.rewrite_onto(&vec![var(0), var(1)].into()),
            Err(ModelError::MalformedExpression(_))
        ));

        let asym = ScalarQuadratic::new(
            DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 0.0, 1.0]),
            DVector::zeros(2),
            vec![var(0), var(1)].into(),
            0.0,
        );
        assert!(asym.is_err());
    }

    #[test]
    fn test_evaluate_with() {
        // 2x0 + x1 + 1 at (2, 3) = 8
        let e = sx(0).scale(2.0).plus(&sx(1)).plus(&ScalarExpr::Constant(1.0));
        let v = e
            .evaluate_with(|id| match id.raw() {
                0 => Some(2.0),
                1 => Some(3.0),
                _ => None,
            })
            .expect("all values present");
        assert!((v - 8.0).abs() < TOL);

        let q = sx(0).multiply(&sx(1)).expect("degree 2");
        let v = q.evaluate_with(|id| Some(id.raw() as f64 + 2.0)).expect("values");
        assert!((v - 6.0).abs() < TOL);

        assert!(matches!(
            e.evaluate_with(|_| None),
            Err(ModelError::VariableNotFound(_))
        ));
    }

    #[test]
    fn test_without_constant() {
        let e = sx(0).plus(&ScalarExpr::Constant(7.0));
        assert_eq!(e.without_constant().constant(), 0.0);
        assert_eq!(e.without_constant().coefficients(), e.coefficients());
    }

    #[test]
    fn test_equivalence_ignores_order() {
        let a = sx(0).plus(&sx(1));
        let b = sx(1).plus(&sx(0));
        assert_ne!(a, b);
        assert!(a.is_equivalent_to(&b, TOL));
        assert!(!a.is_equivalent_to(&sx(0), TOL));
    }
}
