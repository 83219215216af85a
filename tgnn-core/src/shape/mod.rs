//! Shape and index algebra over row-major (last axis fastest) flat buffers.
//!
//! Strides are always derived from the dimensions, never stored: the stride of
//! axis `i` is the product of every dimension after `i`. [`flatten`] and
//! [`unflatten`] are exact inverses for every valid position.

mod iter;

use std::fmt;

use smallvec::SmallVec;

use crate::error::{Result, TensorError};

pub use iter::{AxisIter, ShapeIter};

/// A multi-index into a shape, one coordinate per axis.
pub type Position = Vec<usize>;

/// Ordered, non-empty sequence of strictly positive dimension sizes.
///
/// Rank-0 values are represented as shape `[1]`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Shape {
    dims: SmallVec<[usize; 4]>,
}

impl Shape {
    /// Creates a shape, rejecting an empty list or any zero dimension.
    pub fn new(dims: &[usize]) -> Result<Self> {
        if dims.is_empty() || dims.contains(&0) {
            return Err(TensorError::InvalidShape {
                dims: dims.to_vec(),
            });
        }
        Ok(Self {
            dims: SmallVec::from_slice(dims),
        })
    }

    /// The shape `[1]`.
    #[must_use]
    pub fn scalar() -> Self {
        Self {
            dims: SmallVec::from_slice(&[1]),
        }
    }

    /// Dimension sizes.
    #[must_use]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Number of axes.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total number of positions (product of the dimensions).
    #[must_use]
    pub fn numel(&self) -> usize {
        self.dims.iter().product()
    }

    /// Size of `axis`, or `None` past the last axis.
    #[must_use]
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    /// `true` for the shape `[1]`.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.dims.as_slice() == [1]
    }

    /// Row-major strides derived from the dimensions.
    #[must_use]
    pub fn strides(&self) -> SmallVec<[usize; 4]> {
        let mut strides = SmallVec::from_elem(1usize, self.rank());
        for i in (0..self.rank().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// `true` iff `pos` has one coordinate per axis and each is within its axis.
    #[must_use]
    pub fn is_valid(&self, pos: &[usize]) -> bool {
        pos.len() == self.rank() && pos.iter().zip(self.dims.iter()).all(|(p, d)| p < d)
    }

    /// Like [`Shape::is_valid`], but reports why a position is rejected.
    ///
    /// # Errors
    ///
    /// - [`TensorError::RankMismatch`] when `pos.len() != self.rank()`.
    /// - [`TensorError::IndexOutOfBounds`] when a coordinate is past its axis.
    pub fn validate(&self, pos: &[usize]) -> Result<()> {
        if pos.len() != self.rank() {
            return Err(TensorError::RankMismatch {
                position: pos.to_vec(),
                shape: self.dims.to_vec(),
            });
        }
        if !self.is_valid(pos) {
            return Err(TensorError::IndexOutOfBounds {
                position: pos.to_vec(),
                shape: self.dims.to_vec(),
            });
        }
        Ok(())
    }

    /// Flat offset of `pos`; see [`flatten`].
    pub fn flatten(&self, pos: &[usize]) -> Result<usize> {
        flatten(pos, self)
    }

    /// Position of a flat offset; see [`unflatten`].
    #[must_use]
    pub fn unflatten(&self, offset: usize) -> Position {
        unflatten(offset, self)
    }

    /// Offset of a position already known to have the right rank.
    pub(crate) fn offset_of(&self, pos: &[usize]) -> usize {
        let mut offset = 0;
        let mut stride = 1;
        for (p, d) in pos.iter().zip(self.dims.iter()).rev() {
            offset += p * stride;
            stride *= d;
        }
        offset
    }

    /// Every position in row-major order.
    #[must_use]
    pub fn iter(&self) -> ShapeIter {
        ShapeIter::new(self.clone(), 0)
    }

    /// Row-major positions starting at `start` (inclusive).
    pub fn iter_from(&self, start: &[usize]) -> Result<ShapeIter> {
        self.validate(start)?;
        Ok(ShapeIter::new(self.clone(), self.offset_of(start)))
    }

    /// Positions obtained by varying only `pos[axis]` over `0..self[axis]`.
    ///
    /// # Errors
    ///
    /// - [`TensorError::InvalidAxis`] when `axis >= self.rank()`.
    /// - Any error of [`Shape::validate`] for `pos`.
    pub fn iter_dimension(&self, pos: &[usize], axis: usize) -> Result<AxisIter> {
        if axis >= self.rank() {
            return Err(TensorError::InvalidAxis {
                axis,
                rank: self.rank(),
            });
        }
        self.validate(pos)?;
        Ok(AxisIter::new(pos.to_vec(), axis, self.dims[axis]))
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.dims.as_slice())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.dims.as_slice())
    }
}

impl TryFrom<&[usize]> for Shape {
    type Error = TensorError;

    fn try_from(dims: &[usize]) -> Result<Self> {
        Shape::new(dims)
    }
}

impl TryFrom<Vec<usize>> for Shape {
    type Error = TensorError;

    fn try_from(dims: Vec<usize>) -> Result<Self> {
        Shape::new(&dims)
    }
}

/// Row-major offset of `pos` in `shape`.
///
/// Coordinates are not bounds-checked; use [`Shape::validate`] for that.
///
/// # Errors
///
/// [`TensorError::RankMismatch`] when `pos.len() != shape.rank()`.
///
/// # Example
///
/// ```
/// use tgnn_core::shape::{flatten, Shape};
///
/// let shape = Shape::new(&[2, 2, 2]).unwrap();
/// assert_eq!(flatten(&[0, 1, 1], &shape).unwrap(), 3);
/// assert_eq!(flatten(&[1, 0, 0], &shape).unwrap(), 4);
/// ```
pub fn flatten(pos: &[usize], shape: &Shape) -> Result<usize> {
    if pos.len() != shape.rank() {
        return Err(TensorError::RankMismatch {
            position: pos.to_vec(),
            shape: shape.dims().to_vec(),
        });
    }
    Ok(shape.offset_of(pos))
}

/// Row-major position of `offset` in `shape`.
///
/// Exact inverse of [`flatten`] for every `offset < shape.numel()`; larger
/// offsets wrap on the leading axis.
#[must_use]
pub fn unflatten(mut offset: usize, shape: &Shape) -> Position {
    let mut pos = vec![0; shape.rank()];
    for (slot, &d) in pos.iter_mut().zip(shape.dims()).rev() {
        *slot = offset % d;
        offset /= d;
    }
    pos
}

/// Result shape of an elementwise op under the restricted broadcast rule.
///
/// Identical shapes combine pairwise. A `[1]` operand on either side takes the
/// other operand's shape. Otherwise the lower-rank operand (the left one when
/// ranks tie) must match the trailing axes of the other operand, right-aligned;
/// the result has the other operand's shape. No dimension is ever expanded
/// from 1 on both sides.
///
/// # Errors
///
/// [`TensorError::Broadcast`] naming both shapes.
pub fn broadcast_shape(lhs: &Shape, rhs: &Shape) -> Result<Shape> {
    if lhs == rhs || rhs.is_scalar() {
        return Ok(lhs.clone());
    }
    if lhs.is_scalar() {
        return Ok(rhs.clone());
    }
    let (high, low) = if lhs.rank() > rhs.rank() {
        (lhs, rhs)
    } else {
        (rhs, lhs)
    };
    if high.dims().ends_with(low.dims()) {
        return Ok(high.clone());
    }
    Err(TensorError::Broadcast {
        lhs: lhs.dims().to_vec(),
        rhs: rhs.dims().to_vec(),
    })
}

/// Result shape of a batched matrix product, both ranks at least 2.
///
/// The contracted axes are `lhs[-1]` and `rhs[-2]`. The batch axes (all but the
/// last two) of the shorter operand must equal the trailing batch axes of the
/// longer one. The result is `longer_batch ++ [lhs[-2], rhs[-1]]`; when `lhs`
/// is the longer operand this is `lhs` with its last axis replaced by `rhs[-1]`.
///
/// # Errors
///
/// [`TensorError::Matmul`] naming both shapes.
///
/// # Example
///
/// ```
/// use tgnn_core::shape::{matmul_shape, Shape};
///
/// let a = Shape::new(&[10, 3, 4]).unwrap();
/// let b = Shape::new(&[10, 4, 5]).unwrap();
/// assert_eq!(matmul_shape(&a, &b).unwrap().dims(), &[10, 3, 5]);
/// ```
pub fn matmul_shape(lhs: &Shape, rhs: &Shape) -> Result<Shape> {
    let err = || TensorError::Matmul {
        lhs: lhs.dims().to_vec(),
        rhs: rhs.dims().to_vec(),
    };
    let (a, b) = (lhs.dims(), rhs.dims());
    if a.len() < 2 || b.len() < 2 {
        return Err(err());
    }
    if a[a.len() - 1] != b[b.len() - 2] {
        return Err(err());
    }
    let batch_a = &a[..a.len() - 2];
    let batch_b = &b[..b.len() - 2];
    let batch = if batch_a.len() >= batch_b.len() {
        if !batch_a.ends_with(batch_b) {
            return Err(err());
        }
        batch_a
    } else {
        if !batch_b.ends_with(batch_a) {
            return Err(err());
        }
        batch_b
    };

    let mut dims = batch.to_vec();
    dims.push(a[a.len() - 2]);
    dims.push(b[b.len() - 1]);
    Shape::new(&dims)
}

/// For one output position of `lhs @ rhs`, the `(lhs_pos, rhs_pos)` pairs to
/// multiply and sum, in contraction order.
///
/// `out` must be a valid position of `matmul_shape(lhs, rhs)`.
pub(crate) fn matmul_pairs(lhs: &Shape, rhs: &Shape, out: &[usize]) -> Vec<(Position, Position)> {
    let (a, b) = (lhs.dims(), rhs.dims());
    let k = a[a.len() - 1];
    let n = out.len();
    let (row, col) = (out[n - 2], out[n - 1]);
    let batch = &out[..n - 2];
    let batch_a = &batch[batch.len() - (a.len() - 2)..];
    let batch_b = &batch[batch.len() - (b.len() - 2)..];

    (0..k)
        .map(|i| {
            let mut pa = batch_a.to_vec();
            pa.extend([row, i]);
            let mut pb = batch_b.to_vec();
            pb.extend([i, col]);
            (pa, pb)
        })
        .collect()
}
