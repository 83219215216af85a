//! Error types for tensor and shape operations.
//!
//! Every failure is local and synchronous: the operation that detects an invalid
//! shape, position or operator combination returns a [`TensorError`] immediately.
//! Numeric domain problems (log of a non-positive value, division by zero) are not
//! errors; they surface as IEEE special values in the result.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = TensorError> = std::result::Result<T, E>;

/// Coarse classification of a [`TensorError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rank or dimension mismatch (construction, broadcasting, matmul, slicing).
    Shape,
    /// A position outside the bounds of a shape.
    Index,
    /// An operator reached in a context that has no defined rule.
    UnsupportedOperation,
}

/// Errors that can occur in shape, tensor and function operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TensorError {
    /// A shape with no dimensions, or with a zero-sized dimension.
    #[error("invalid shape {dims:?}: dimensions must be non-empty and strictly positive")]
    InvalidShape { dims: Vec<usize> },

    /// Sibling sub-arrays of a nested literal have different shapes.
    #[error("ragged literal at depth {depth}: expected sub-shape {expected:?}, found {found:?}")]
    RaggedLiteral {
        depth: usize,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A nested literal deeper than the supported maximum.
    #[error("literal of rank {rank} exceeds the maximum supported rank {max}")]
    LiteralTooDeep { rank: usize, max: usize },

    /// Flat data length disagrees with the product of the shape.
    #[error("length mismatch: shape {shape:?} holds {expected} elements, got {actual}")]
    LengthMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// A position has a different number of coordinates than the shape has axes.
    #[error("rank mismatch: position {position:?} does not address shape {shape:?}")]
    RankMismatch {
        position: Vec<usize>,
        shape: Vec<usize>,
    },

    /// A position coordinate lies outside its axis.
    #[error("index out of bounds: position {position:?} for shape {shape:?}")]
    IndexOutOfBounds {
        position: Vec<usize>,
        shape: Vec<usize>,
    },

    /// Elementwise operands that cannot be broadcast together.
    #[error("cannot broadcast shapes {lhs:?} and {rhs:?}")]
    Broadcast { lhs: Vec<usize>, rhs: Vec<usize> },

    /// Matrix multiplication operands with incompatible shapes.
    #[error("invalid shapes for matmul: a({lhs:?}), b({rhs:?})")]
    Matmul { lhs: Vec<usize>, rhs: Vec<usize> },

    /// A slice specification that does not fit the tensor.
    #[error("invalid slice {ranges:?} for shape {shape:?}: {reason}")]
    InvalidSlice {
        ranges: Vec<(usize, usize)>,
        shape: Vec<usize>,
        reason: &'static str,
    },

    /// An axis argument that is not smaller than the rank.
    #[error("axis {axis} out of range for tensor of rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// An operator applied in a combination that has no defined rule.
    #[error("unsupported operation {op}: {detail}")]
    Unsupported { op: &'static str, detail: String },
}

impl TensorError {
    /// Returns the taxonomy bucket this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            TensorError::IndexOutOfBounds { .. } => ErrorKind::Index,
            TensorError::Unsupported { .. } => ErrorKind::UnsupportedOperation,
            TensorError::InvalidShape { .. }
            | TensorError::RaggedLiteral { .. }
            | TensorError::LiteralTooDeep { .. }
            | TensorError::LengthMismatch { .. }
            | TensorError::RankMismatch { .. }
            | TensorError::Broadcast { .. }
            | TensorError::Matmul { .. }
            | TensorError::InvalidSlice { .. }
            | TensorError::InvalidAxis { .. } => ErrorKind::Shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_groups_variants() {
        let e = TensorError::Broadcast {
            lhs: vec![2, 3],
            rhs: vec![4],
        };
        assert_eq!(e.kind(), ErrorKind::Shape);

        let e = TensorError::IndexOutOfBounds {
            position: vec![3],
            shape: vec![3],
        };
        assert_eq!(e.kind(), ErrorKind::Index);

        let e = TensorError::Unsupported {
            op: "matmul",
            detail: "rank 1 with rank 2".to_string(),
        };
        assert_eq!(e.kind(), ErrorKind::UnsupportedOperation);
    }

    #[test]
    fn messages_name_both_shapes() {
        let e = TensorError::Matmul {
            lhs: vec![10, 3, 4],
            rhs: vec![10, 3, 5],
        };
        let s = e.to_string();
        assert!(s.contains("[10, 3, 4]"));
        assert!(s.contains("[10, 3, 5]"));
    }
}
