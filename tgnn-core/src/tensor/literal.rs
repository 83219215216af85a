//! Nested-array literals: shape inference and row-major flattening.

use crate::error::{Result, TensorError};

/// Deepest literal nesting accepted by [`Tensor::new`](super::Tensor::new).
pub const MAX_LITERAL_RANK: usize = 4;

/// A value that can be ingested as a tensor literal.
///
/// Implemented for the numeric cells `f64` and `u8`, and for `Vec<T>`, `[T]`
/// and `[T; N]` of any literal `T`. Sibling sub-arrays must agree on their
/// inferred shape.
pub trait NdLiteral {
    /// Inferred dimensions, outermost first; empty for a single cell.
    ///
    /// `depth` is the nesting level of `self`, used in error reports.
    fn infer_dims(&self, depth: usize) -> Result<Vec<usize>>;

    /// Appends every cell in row-major order.
    fn flatten_into(&self, out: &mut Vec<f64>);
}

impl NdLiteral for f64 {
    fn infer_dims(&self, _depth: usize) -> Result<Vec<usize>> {
        Ok(Vec::new())
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        out.push(*self);
    }
}

impl NdLiteral for u8 {
    fn infer_dims(&self, _depth: usize) -> Result<Vec<usize>> {
        Ok(Vec::new())
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        out.push(f64::from(*self));
    }
}

impl<T: NdLiteral> NdLiteral for [T] {
    fn infer_dims(&self, depth: usize) -> Result<Vec<usize>> {
        let Some((first, rest)) = self.split_first() else {
            return Err(TensorError::InvalidShape { dims: vec![0] });
        };
        let inner = first.infer_dims(depth + 1)?;
        for sibling in rest {
            let found = sibling.infer_dims(depth + 1)?;
            if found != inner {
                return Err(TensorError::RaggedLiteral {
                    depth,
                    expected: inner,
                    found,
                });
            }
        }
        let mut dims = Vec::with_capacity(inner.len() + 1);
        dims.push(self.len());
        dims.extend(inner);
        Ok(dims)
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        for item in self {
            item.flatten_into(out);
        }
    }
}

impl<T: NdLiteral> NdLiteral for Vec<T> {
    fn infer_dims(&self, depth: usize) -> Result<Vec<usize>> {
        self.as_slice().infer_dims(depth)
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        self.as_slice().flatten_into(out);
    }
}

impl<T: NdLiteral, const N: usize> NdLiteral for [T; N] {
    fn infer_dims(&self, depth: usize) -> Result<Vec<usize>> {
        self.as_slice().infer_dims(depth)
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        self.as_slice().flatten_into(out);
    }
}

/// Infers the shape of `literal` and flattens it, enforcing the depth limit.
///
/// A bare cell becomes shape `[1]`.
pub(crate) fn parse<L: NdLiteral + ?Sized>(literal: &L) -> Result<(Vec<usize>, Vec<f64>)> {
    let mut dims = literal.infer_dims(0)?;
    if dims.len() > MAX_LITERAL_RANK {
        return Err(TensorError::LiteralTooDeep {
            rank: dims.len(),
            max: MAX_LITERAL_RANK,
        });
    }
    if dims.is_empty() {
        dims.push(1);
    }
    let mut values = Vec::with_capacity(dims.iter().product());
    literal.flatten_into(&mut values);
    Ok((dims, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_rectangular_shapes() {
        let (dims, values) = parse(&[[1.0, 2.0], [2.0, 3.0], [3.0, 4.0]]).unwrap();
        assert_eq!(dims, vec![3, 2]);
        assert_eq!(values, vec![1.0, 2.0, 2.0, 3.0, 3.0, 4.0]);

        let (dims, _) = parse(&vec![vec![vec![0u8; 4]; 3]; 2]).unwrap();
        assert_eq!(dims, vec![2, 3, 4]);
    }

    #[test]
    fn scalar_becomes_rank_one() {
        let (dims, values) = parse(&7.5).unwrap();
        assert_eq!(dims, vec![1]);
        assert_eq!(values, vec![7.5]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = parse(&vec![vec![1.0, 2.0], vec![2.0]]).unwrap_err();
        assert_eq!(
            err,
            TensorError::RaggedLiteral {
                depth: 0,
                expected: vec![2],
                found: vec![1],
            }
        );
    }

    #[test]
    fn ragged_inner_block_is_rejected() {
        let lit = vec![
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![vec![1.0, 2.0], vec![3.0]],
        ];
        let err = parse(&lit).unwrap_err();
        assert!(matches!(err, TensorError::RaggedLiteral { depth: 1, .. }));
    }

    #[test]
    fn empty_sub_array_is_invalid_shape() {
        let lit: Vec<Vec<f64>> = vec![vec![], vec![]];
        assert!(matches!(parse(&lit), Err(TensorError::InvalidShape { .. })));
        let lit: Vec<f64> = Vec::new();
        assert!(matches!(parse(&lit), Err(TensorError::InvalidShape { .. })));
    }

    #[test]
    fn depth_five_is_too_deep() {
        let lit = [[[[[1.0]]]]];
        assert_eq!(
            parse(&lit).unwrap_err(),
            TensorError::LiteralTooDeep { rank: 5, max: 4 }
        );
    }

    #[test]
    fn u8_cells_convert_to_f64() {
        let (_, values) = parse(&[0u8, 128, 255]).unwrap();
        assert_eq!(values, vec![0.0, 128.0, 255.0]);
    }
}
