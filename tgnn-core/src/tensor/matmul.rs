//! Batched matrix multiplication.

use tracing::instrument;

use super::Tensor;
use crate::autograd::Var;
use crate::error::{Result, TensorError};
use crate::shape::{matmul_pairs, matmul_shape};

impl Tensor {
    /// Matrix product over the last two axes, batched over the leading ones.
    ///
    /// - Rank 1 with rank 1 of equal length: the cellwise product, same shape.
    ///   No summation happens in this case.
    /// - Both ranks at least 2: see [`matmul_shape`] for the shape rule. Each
    ///   output cell is the running sum `p0 + p1 + ..` of the products along the
    ///   contracted axis.
    ///
    /// # Errors
    ///
    /// - [`TensorError::Matmul`] for incompatible shapes.
    /// - [`TensorError::Unsupported`] when exactly one operand has rank 1.
    ///
    /// # Example
    ///
    /// ```
    /// use tgnn_core::Tensor;
    ///
    /// let a = Tensor::new(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// let b = Tensor::new(&[[3.0, 4.0, 5.0], [6.0, 7.0, 8.0]]).unwrap();
    /// let c = a.matmul(&b).unwrap();
    /// assert_eq!(c.values(), vec![15.0, 18.0, 21.0, 33.0, 40.0, 47.0]);
    /// ```
    #[instrument(level = "debug", skip_all, fields(lhs = ?self.shape, rhs = ?rhs.shape))]
    pub fn matmul(&self, rhs: &Tensor) -> Result<Tensor> {
        match (self.rank(), rhs.rank()) {
            (1, 1) => {
                if self.shape != rhs.shape {
                    return Err(TensorError::Matmul {
                        lhs: self.dims().to_vec(),
                        rhs: rhs.dims().to_vec(),
                    });
                }
                self.mul(rhs)
            }
            (1, _) | (_, 1) => Err(TensorError::Unsupported {
                op: "matmul",
                detail: format!(
                    "rank-1 operand with higher rank: {:?} @ {:?}",
                    self.dims(),
                    rhs.dims()
                ),
            }),
            _ => self.batched_matmul(rhs),
        }
    }

    fn batched_matmul(&self, rhs: &Tensor) -> Result<Tensor> {
        let out = matmul_shape(&self.shape, &rhs.shape)?;
        let data = out
            .iter()
            .map(|pos| {
                let mut products = matmul_pairs(&self.shape, &rhs.shape, &pos)
                    .into_iter()
                    .map(|(pa, pb)| &self.data[self.offset_of(&pa)] * &rhs.data[rhs.offset_of(&pb)]);
                let first = products.next().ok_or_else(|| TensorError::Matmul {
                    lhs: self.dims().to_vec(),
                    rhs: rhs.dims().to_vec(),
                })?;
                Ok(products.fold(first, |acc, p: Var| &acc + &p))
            })
            .collect::<Result<Vec<_>>>()?;
        Tensor::from_nodes(data, out)
    }
}
