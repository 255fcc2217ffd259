//! Shape and orientation of expressions.
//!
//! Every expression has a two-dimensional shape:
//! - a scalar is `(1, 1)`
//! - a column vector of length n is `(n, 1)`
//! - a row vector of length n is `(1, n)`
//! - a matrix is `(rows, cols)`

use std::fmt;

/// Orientation tag carried by every vector expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Column vector (the default).
    #[default]
    Column,
    /// Row vector, i.e. a transposed column.
    Row,
}

impl Orientation {
    /// The opposite orientation.
    pub fn flip(self) -> Self {
        match self {
            Orientation::Column => Orientation::Row,
            Orientation::Row => Orientation::Column,
        }
    }

    /// Shape of a vector of length `n` with this orientation.
    pub fn shape(self, n: usize) -> Shape {
        match self {
            Orientation::Column => Shape::column(n),
            Orientation::Row => Shape::row(n),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Column => write!(f, "column"),
            Orientation::Row => write!(f, "row"),
        }
    }
}

/// Shape of an expression as (rows, cols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    /// The shape of a scalar.
    pub fn scalar() -> Self {
        Shape { rows: 1, cols: 1 }
    }

    /// Shape of a column vector.
    pub fn column(n: usize) -> Self {
        Shape { rows: n, cols: 1 }
    }

    /// Shape of a row vector.
    pub fn row(n: usize) -> Self {
        Shape { rows: 1, cols: n }
    }

    /// Shape of a matrix.
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Shape { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    /// Get the transposed shape.
    pub fn transpose(&self) -> Self {
        Shape {
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Check if matrix multiplication is valid and return result shape.
    pub fn matmul(&self, other: &Shape) -> Option<Shape> {
        if self.cols == other.rows {
            Some(Shape::matrix(self.rows, other.cols))
        } else {
            None
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::scalar()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((rows, cols): (usize, usize)) -> Self {
        Shape::matrix(rows, cols)
    }
}
