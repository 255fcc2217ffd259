//! Decision variables and ordered collections of them.

use std::collections::HashSet;
use std::fmt;

/// Identifier of a variable, dense within its owning problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    pub fn new(raw: u64) -> Self {
        VarId(raw)
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VarKind {
    #[default]
    Continuous,
    Binary,
    Integer,
}

/// A decision variable.
///
/// Variables are plain values: copies held by expressions refer to the same
/// unknown through their `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Unique identifier within the owning problem.
    pub id: VarId,
    /// Lower bound (may be `-inf`).
    pub lower: f64,
    /// Upper bound (may be `+inf`).
    pub upper: f64,
    /// Continuous, binary or integer.
    pub kind: VarKind,
    /// Optional name for display.
    pub name: Option<String>,
}

impl Variable {
    pub fn new(id: VarId, lower: f64, upper: f64, kind: VarKind) -> Self {
        Variable {
            id,
            lower,
            upper,
            kind,
            name: None,
        }
    }

    /// Check the bound invariants: `lower <= upper`, binaries on `[0, 1]`.
    pub fn has_valid_bounds(&self) -> bool {
        if self.lower.is_nan() || self.upper.is_nan() || self.lower > self.upper {
            return false;
        }
        match self.kind {
            VarKind::Binary => self.lower == 0.0 && self.upper == 1.0,
            VarKind::Continuous | VarKind::Integer => true,
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "x{}", self.id),
        }
    }
}

/// Builder for creating variables with various attributes.
#[derive(Debug, Clone)]
pub struct VariableBuilder {
    lower: f64,
    upper: f64,
    kind: VarKind,
    name: Option<String>,
}

impl Default for VariableBuilder {
    fn default() -> Self {
        Self::continuous()
    }
}

impl VariableBuilder {
    /// An unbounded continuous variable.
    pub fn continuous() -> Self {
        VariableBuilder {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
            kind: VarKind::Continuous,
            name: None,
        }
    }

    /// A binary variable on `[0, 1]`.
    pub fn binary() -> Self {
        VariableBuilder {
            lower: 0.0,
            upper: 1.0,
            kind: VarKind::Binary,
            name: None,
        }
    }

    /// An unbounded integer variable.
    pub fn integer() -> Self {
        VariableBuilder {
            kind: VarKind::Integer,
            ..Self::continuous()
        }
    }

    pub fn lower(mut self, lower: f64) -> Self {
        self.lower = lower;
        self
    }

    pub fn upper(mut self, upper: f64) -> Self {
        self.upper = upper;
        self
    }

    pub fn kind(mut self, kind: VarKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn bounds(self, lower: f64, upper: f64) -> Self {
        self.lower(lower).upper(upper)
    }

    /// Set the name of the variable.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn build(self, id: VarId) -> Variable {
        Variable {
            id,
            lower: self.lower,
            upper: self.upper,
            kind: self.kind,
            name: self.name,
        }
    }
}

/// An ordered sequence of variables. Elements may repeat.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VarVector(Vec<Variable>);

impl VarVector {
    pub fn new(vars: Vec<Variable>) -> Self {
        VarVector(vars)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn at(&self, i: usize) -> Option<&Variable> {
        self.0.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Variable] {
        &self.0
    }

    /// Ids in element order, repeats included.
    pub fn ids(&self) -> Vec<VarId> {
        self.0.iter().map(|v| v.id).collect()
    }

    /// First position of the variable with this id.
    pub fn index_of(&self, id: VarId) -> Option<usize> {
        self.0.iter().position(|v| v.id == id)
    }

    pub fn contains(&self, id: VarId) -> bool {
        self.index_of(id).is_some()
    }

    /// Copy without repeated variables, keeping first occurrences.
    pub fn unique(&self) -> VarVector {
        let mut seen = HashSet::with_capacity(self.0.len());
        self.0
            .iter()
            .filter(|v| seen.insert(v.id))
            .cloned()
            .collect()
    }

    pub fn has_duplicates(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.0.len());
        !self.0.iter().all(|v| seen.insert(v.id))
    }

    pub(crate) fn push(&mut self, var: Variable) {
        self.0.push(var);
    }
}

impl From<Vec<Variable>> for VarVector {
    fn from(vars: Vec<Variable>) -> Self {
        VarVector(vars)
    }
}

impl FromIterator<Variable> for VarVector {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        VarVector(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a VarVector {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A two-dimensional grid of variables, stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct VarMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Variable>,
}

impl VarMatrix {
    /// Build from rows; every row must have the same length.
    pub fn from_rows(rows: Vec<Vec<Variable>>) -> Option<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(VarMatrix {
            rows: rows.len(),
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// `data.len()` must equal `rows * cols`.
    pub(crate) fn from_row_major(rows: usize, cols: usize, data: Vec<Variable>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        VarMatrix { rows, cols, data }
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    pub fn at(&self, i: usize, j: usize) -> Option<&Variable> {
        if i < self.rows && j < self.cols {
            self.data.get(i * self.cols + j)
        } else {
            None
        }
    }

    pub fn row(&self, i: usize) -> Option<VarVector> {
        if i >= self.rows {
            return None;
        }
        Some(self.data[i * self.cols..(i + 1) * self.cols].iter().cloned().collect())
    }

    pub fn column(&self, j: usize) -> Option<VarVector> {
        if j >= self.cols {
            return None;
        }
        Some((0..self.rows).map(|i| self.data[i * self.cols + j].clone()).collect())
    }

    pub fn transpose(&self) -> VarMatrix {
        let data = (0..self.cols)
            .flat_map(|j| (0..self.rows).map(move |i| (i, j)))
            .map(|(i, j)| self.data[i * self.cols + j].clone())
            .collect();
        VarMatrix {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// All elements in row-major order.
    pub fn flatten(&self) -> VarVector {
        VarVector(self.data.clone())
    }
}
