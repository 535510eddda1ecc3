use std::fmt;

use crate::error::{Error, Result};

// Shape - the ordered list of axis sizes of a tensor.
//
// A Shape is a pure value object: created once, never mutated, compared
// structurally. It answers three questions:
//   1. How many elements does the tensor hold (product of all sizes)?
//   2. What are the canonical row-major strides for that many axes?
//   3. Can two shapes be combined under the broadcasting rule?
//
// The empty shape [] is the scalar shape and holds exactly one element.
// A zero axis size is legal and makes the tensor empty.

/// N-dimensional shape of a tensor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shape(Vec<usize>);

impl Shape {
    /// Create a shape from a list of axis sizes.
    pub fn new(dims: Vec<usize>) -> Self {
        Shape(dims)
    }

    /// The scalar shape: zero axes, one element.
    pub fn scalar() -> Self {
        Shape(Vec::new())
    }

    /// The axis sizes as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    /// Number of axes (0 for a scalar, 1 for a vector, 2 for a matrix, ...).
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// Total number of elements: the product of all axis sizes.
    ///
    /// The scalar shape has one element; any zero-sized axis makes the
    /// whole tensor empty.
    pub fn size(&self) -> usize {
        if self.0.is_empty() {
            1
        } else {
            self.0.iter().product()
        }
    }

    /// Size of one axis, checked against the rank.
    pub fn dim(&self, d: usize) -> Result<usize> {
        self.0.get(d).copied().ok_or(Error::DimOutOfRange {
            dim: d,
            rank: self.rank(),
        })
    }

    /// Canonical row-major strides for this shape: the last axis varies
    /// fastest.
    ///
    /// For shape [2, 3, 4] the strides are [12, 4, 1]: one step along axis 0
    /// jumps 3*4 buffer slots, one step along axis 2 jumps a single slot.
    pub fn default_strides(&self) -> Vec<usize> {
        let rank = self.rank();
        let mut strides = vec![0usize; rank];
        if rank > 0 {
            strides[rank - 1] = 1;
            for i in (0..rank - 1).rev() {
                strides[i] = strides[i + 1] * self.0[i + 1];
            }
        }
        strides
    }

    /// Unify two shapes under the broadcasting rule.
    ///
    /// Axes are aligned from the right; a missing leading axis counts as
    /// size 1. Two sizes are compatible when they are equal or one of them
    /// is 1, and the unified size is the non-1 one. The unified rank is the
    /// larger of the two ranks, so a leading 1-axis contributed by the
    /// higher-rank operand survives:
    ///
    ///   [3, 4] and [4]       -> [3, 4]
    ///   [2, 1] and [1, 3]    -> [2, 3]
    ///   [2, 3] and [1, 1, 1] -> [1, 2, 3]
    ///   [3] and [4]          -> error
    pub fn broadcast(lhs: &Shape, rhs: &Shape) -> Result<Shape> {
        let l = lhs.dims();
        let r = rhs.dims();
        let max_rank = l.len().max(r.len());
        let mut unified = Vec::with_capacity(max_rank);

        for i in 0..max_rank {
            // Walk backwards from the trailing axis; out of range means
            // an implicit size-1 padding axis.
            let ld = if i < l.len() { l[l.len() - 1 - i] } else { 1 };
            let rd = if i < r.len() { r[r.len() - 1 - i] } else { 1 };

            if ld == rd {
                unified.push(ld);
            } else if ld == 1 {
                unified.push(rd);
            } else if rd == 1 {
                unified.push(ld);
            } else {
                return Err(Error::BroadcastMismatch {
                    lhs: lhs.clone(),
                    rhs: rhs.clone(),
                });
            }
        }

        unified.reverse();
        Ok(Shape::new(unified))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}

// From conversions so call sites can write Shape::from((2, 3)) or pass
// a literal tuple straight into a constructor taking impl Into<Shape>.

impl From<()> for Shape {
    fn from(_: ()) -> Self {
        Shape::scalar()
    }
}

impl From<usize> for Shape {
    fn from(d: usize) -> Self {
        Shape(vec![d])
    }
}

impl From<(usize,)> for Shape {
    fn from((d0,): (usize,)) -> Self {
        Shape(vec![d0])
    }
}

impl From<(usize, usize)> for Shape {
    fn from((d0, d1): (usize, usize)) -> Self {
        Shape(vec![d0, d1])
    }
}

impl From<(usize, usize, usize)> for Shape {
    fn from((d0, d1, d2): (usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2])
    }
}

impl From<(usize, usize, usize, usize)> for Shape {
    fn from((d0, d1, d2, d3): (usize, usize, usize, usize)) -> Self {
        Shape(vec![d0, d1, d2, d3])
    }
}

impl From<Vec<usize>> for Shape {
    fn from(v: Vec<usize>) -> Self {
        Shape(v)
    }
}

impl From<&[usize]> for Shape {
    fn from(s: &[usize]) -> Self {
        Shape(s.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(s: [usize; N]) -> Self {
        Shape(s.to_vec())
    }
}
