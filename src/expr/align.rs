//! Alignment of coefficient data onto a shared variable ordering.
//!
//! Binary operations on expressions over different variable vectors first
//! compute the union `X = unique(concat(X1, X2))` in first-occurrence order,
//! then scatter each operand's coefficients into the positions its variables
//! take in `X`.

use std::collections::HashMap;

use nalgebra::{DMatrix, DVector};

use super::variable::{VarId, VarVector};
use crate::error::{ModelError, Result};

/// Union of two variable vectors with the position of every source element.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// The shared ordering.
    pub vars: VarVector,
    /// `lhs[k]` is the index in `vars` of the k-th lhs variable.
    pub lhs: Vec<usize>,
    /// `rhs[k]` is the index in `vars` of the k-th rhs variable.
    pub rhs: Vec<usize>,
}

/// Compute the shared ordering of two variable vectors.
pub fn align(lhs: &VarVector, rhs: &VarVector) -> Alignment {
    let mut vars = VarVector::default();
    let mut index: HashMap<VarId, usize> = HashMap::with_capacity(lhs.len() + rhs.len());

    let mut place = |vars: &mut VarVector, src: &VarVector| -> Vec<usize> {
        src.iter()
            .map(|v| {
                *index.entry(v.id).or_insert_with(|| {
                    vars.push(v.clone());
                    vars.len() - 1
                })
            })
            .collect()
    };

    let lhs_pos = place(&mut vars, lhs);
    let rhs_pos = place(&mut vars, rhs);

    Alignment {
        vars,
        lhs: lhs_pos,
        rhs: rhs_pos,
    }
}

/// Union of two variable vectors in first-occurrence order.
pub fn union(lhs: &VarVector, rhs: &VarVector) -> VarVector {
    align(lhs, rhs).vars
}

/// Position of every `source` variable inside `target`.
///
/// Fails with `VariableNotFound` if `target` lacks one of them.
pub fn positions_in(source: &VarVector, target: &VarVector) -> Result<Vec<usize>> {
    let mut index: HashMap<VarId, usize> = HashMap::with_capacity(target.len());
    for (i, v) in target.iter().enumerate() {
        index.entry(v.id).or_insert(i);
    }
    positions_by(source, |id| index.get(&id).copied())
}

/// Position of every `source` variable as reported by `column_of`.
pub fn positions_by<F>(source: &VarVector, column_of: F) -> Result<Vec<usize>>
where
    F: Fn(VarId) -> Option<usize>,
{
    source
        .iter()
        .map(|v| column_of(v.id).ok_or(ModelError::VariableNotFound(v.id)))
        .collect()
}

/// Scatter a coefficient vector onto a vector of length `n`.
pub(crate) fn scatter_vector(values: &DVector<f64>, positions: &[usize], n: usize) -> DVector<f64> {
    let mut out = DVector::zeros(n);
    for (k, &j) in positions.iter().enumerate() {
        out[j] += values[k];
    }
    out
}

/// Scatter a square coefficient matrix onto an `n x n` matrix.
pub(crate) fn scatter_square(q: &DMatrix<f64>, positions: &[usize], n: usize) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(n, n);
    for (k, &j) in positions.iter().enumerate() {
        for (l, &m) in positions.iter().enumerate() {
            out[(j, m)] += q[(k, l)];
        }
    }
    out
}

/// Scatter the columns of a coefficient matrix onto `n` columns; rows are kept.
pub(crate) fn scatter_columns(l: &DMatrix<f64>, positions: &[usize], n: usize) -> DMatrix<f64> {
    let mut out = DMatrix::zeros(l.nrows(), n);
    for (k, &j) in positions.iter().enumerate() {
        for i in 0..l.nrows() {
            out[(i, j)] += l[(i, k)];
        }
    }
    out
}
