//! Reductions and normalisations built from scalar-node arithmetic.
//!
//! Nothing here computes plain floats: every result cell is a fresh graph node,
//! so gradients flow back through softmax into the input cells.

use tracing::debug_span;

use crate::autograd::{Exp, Log, Var};
use crate::error::{Result, TensorError};
use crate::tensor::Tensor;

/// Left fold `v0 + v1 + ..` with no zero node; `None` for an empty slice.
pub fn sum(values: &[Var]) -> Option<Var> {
    let (first, rest) = values.split_first()?;
    Some(rest.iter().fold(first.clone(), |acc, v| &acc + v))
}

/// `sum(values) / n`; `None` for an empty slice.
pub fn mean(values: &[Var]) -> Option<Var> {
    let total = sum(values)?;
    Some(&total / &Var::new(values.len() as f64))
}

/// `exp(x) / sum(exp(row))` for every cell, where the row is taken along `axis`.
///
/// Not stabilised against overflow: large inputs give `inf`/`NaN` like the
/// naive formula.
///
/// # Errors
///
/// [`TensorError::InvalidAxis`] when `axis >= t.rank()`.
///
/// # Example
///
/// ```
/// use tgnn_core::{functions::softmax, Tensor};
///
/// let t = Tensor::ones(&[2, 4]).unwrap();
/// let s = softmax(&t, 1).unwrap();
/// assert_eq!(s, Tensor::full(0.25, &[2, 4]).unwrap());
/// ```
pub fn softmax(t: &Tensor, axis: usize) -> Result<Tensor> {
    if axis >= t.rank() {
        return Err(TensorError::InvalidAxis {
            axis,
            rank: t.rank(),
        });
    }
    let _span = debug_span!("softmax", axis, shape = ?t.shape()).entered();

    let shape = t.shape();
    let data = shape
        .iter()
        .map(|pos| {
            let row: Vec<_> = shape.iter_dimension(&pos, axis)?.collect();
            let exps: Vec<Var> = t.gather(&row)?.iter().map(|v| v.exp()).collect();
            let total = sum(&exps).ok_or(TensorError::InvalidAxis {
                axis,
                rank: t.rank(),
            })?;
            Ok(&t.at(&pos)?.exp() / &total)
        })
        .collect::<Result<Vec<_>>>()?;
    Tensor::from_nodes(data, shape.clone())
}

/// `ln(softmax(t, axis))`, composed cell by cell.
pub fn log_softmax(t: &Tensor, axis: usize) -> Result<Tensor> {
    Ok(softmax(t, axis)?.map(|v| v.log()))
}
