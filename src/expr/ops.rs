//! Operator overloading for the infallible scalar algebra.
//!
//! `+`, `-`, unary `-` and scaling by `f64` never fail on scalar expressions,
//! so they are exposed as operators on `ScalarExpr` and `Variable`. Products
//! of two expressions can exceed the degree ceiling and stay methods.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::scalar::ScalarExpr;
use super::variable::Variable;

// ============================================================================
// ScalarExpr
// ============================================================================

impl Neg for ScalarExpr {
    type Output = ScalarExpr;

    fn neg(self) -> ScalarExpr {
        ScalarExpr::neg(&self)
    }
}

impl Neg for &ScalarExpr {
    type Output = ScalarExpr;

    fn neg(self) -> ScalarExpr {
        ScalarExpr::neg(self)
    }
}

impl<R: Into<ScalarExpr>> Add<R> for ScalarExpr {
    type Output = ScalarExpr;

    fn add(self, rhs: R) -> ScalarExpr {
        self.plus(&rhs.into())
    }
}

impl<R: Into<ScalarExpr>> Add<R> for &ScalarExpr {
    type Output = ScalarExpr;

    fn add(self, rhs: R) -> ScalarExpr {
        self.plus(&rhs.into())
    }
}

impl<R: Into<ScalarExpr>> Sub<R> for ScalarExpr {
    type Output = ScalarExpr;

    fn sub(self, rhs: R) -> ScalarExpr {
        self.minus(&rhs.into())
    }
}

impl<R: Into<ScalarExpr>> Sub<R> for &ScalarExpr {
    type Output = ScalarExpr;

    fn sub(self, rhs: R) -> ScalarExpr {
        self.minus(&rhs.into())
    }
}

impl Mul<f64> for ScalarExpr {
    type Output = ScalarExpr;

    fn mul(self, rhs: f64) -> ScalarExpr {
        self.scale(rhs)
    }
}

impl Mul<f64> for &ScalarExpr {
    type Output = ScalarExpr;

    fn mul(self, rhs: f64) -> ScalarExpr {
        self.scale(rhs)
    }
}

impl Mul<ScalarExpr> for f64 {
    type Output = ScalarExpr;

    fn mul(self, rhs: ScalarExpr) -> ScalarExpr {
        rhs.scale(self)
    }
}

impl Mul<&ScalarExpr> for f64 {
    type Output = ScalarExpr;

    fn mul(self, rhs: &ScalarExpr) -> ScalarExpr {
        rhs.scale(self)
    }
}

impl Div<f64> for ScalarExpr {
    type Output = ScalarExpr;

    fn div(self, rhs: f64) -> ScalarExpr {
        self.scale(1.0 / rhs)
    }
}

impl Div<f64> for &ScalarExpr {
    type Output = ScalarExpr;

    fn div(self, rhs: f64) -> ScalarExpr {
        self.scale(1.0 / rhs)
    }
}

// ============================================================================
// Variable
// ============================================================================

impl Neg for &Variable {
    type Output = ScalarExpr;

    fn neg(self) -> ScalarExpr {
        ScalarExpr::from(self).neg()
    }
}

impl<R: Into<ScalarExpr>> Add<R> for &Variable {
    type Output = ScalarExpr;

    fn add(self, rhs: R) -> ScalarExpr {
        ScalarExpr::from(self).plus(&rhs.into())
    }
}

impl<R: Into<ScalarExpr>> Sub<R> for &Variable {
    type Output = ScalarExpr;

    fn sub(self, rhs: R) -> ScalarExpr {
        ScalarExpr::from(self).minus(&rhs.into())
    }
}

impl Mul<f64> for &Variable {
    type Output = ScalarExpr;

    fn mul(self, rhs: f64) -> ScalarExpr {
        ScalarExpr::from(self).scale(rhs)
    }
}

impl Mul<&Variable> for f64 {
    type Output = ScalarExpr;

    fn mul(self, rhs: &Variable) -> ScalarExpr {
        ScalarExpr::from(rhs).scale(self)
    }
}

// ============================================================================
// f64 on the left
// ============================================================================

impl Add<ScalarExpr> for f64 {
    type Output = ScalarExpr;

    fn add(self, rhs: ScalarExpr) -> ScalarExpr {
        ScalarExpr::Constant(self).plus(&rhs)
    }
}

impl Add<&ScalarExpr> for f64 {
    type Output = ScalarExpr;

    fn add(self, rhs: &ScalarExpr) -> ScalarExpr {
        ScalarExpr::Constant(self).plus(rhs)
    }
}

impl Sub<&ScalarExpr> for f64 {
    type Output = ScalarExpr;

    fn sub(self, rhs: &ScalarExpr) -> ScalarExpr {
        ScalarExpr::Constant(self).minus(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::variable::{VarId, VarKind};

    const TOL: f64 = 1e-12;

    fn var(id: u64) -> Variable {
        Variable::new(VarId::new(id), f64::NEG_INFINITY, f64::INFINITY, VarKind::Continuous)
    }

    #[test]
    fn test_add() {
        let (x, y) = (var(0), var(1));
        let e = &x + &y;
        assert_eq!(e.degree(), 1);
        assert_eq!(e.num_vars(), 2);
    }

    #[test]
    fn test_sub_cancels() {
        let x = var(0);
        let e = &x - &x;
        assert!(e.is_equivalent_to(&ScalarExpr::zero(), TOL));
    }

    #[test]
    fn test_neg() {
        let x = var(0);
        let e = -&x;
        assert_eq!(e.coefficients()[0], -1.0);
    }

    #[test]
    fn test_scalar_mul() {
        let x = var(0);
        let e = 2.0 * &x + 1.0;
        assert_eq!(e.coefficients()[0], 2.0);
        assert_eq!(e.constant(), 1.0);

        let e = (&x * 4.0) / 2.0;
        assert_eq!(e.coefficients()[0], 2.0);
    }

    #[test]
    fn test_constant_on_left() {
        let x = ScalarExpr::from(var(0));
        let e = 3.0 - &x;
        assert_eq!(e.constant(), 3.0);
        assert_eq!(e.coefficients()[0], -1.0);
        assert_eq!((1.0 + x).constant(), 1.0);
    }
}
