//! Elementwise arithmetic with restricted broadcasting, and in-place scalar ops.

use tracing::trace;

use super::Tensor;
use crate::autograd::{ScalarNode, Var};
use crate::error::Result;
use crate::shape::broadcast_shape;

impl Tensor {
    /// Cellwise `self + rhs`.
    ///
    /// Shapes must be equal, or one side must be `[1]` or a right-aligned
    /// suffix of the other. The smaller side is reused cyclically in row-major
    /// order; there is no NumPy-style expansion of size-1 axes.
    ///
    /// # Example
    ///
    /// ```
    /// use tgnn_core::Tensor;
    ///
    /// let a = Tensor::new(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// let b = Tensor::new(&[1.0, 2.0, 3.0]).unwrap();
    /// let c = a.add(&b).unwrap();
    /// assert_eq!(c, Tensor::new(&[[2.0, 4.0, 6.0], [5.0, 7.0, 9.0]]).unwrap());
    /// ```
    pub fn add(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_broadcast(rhs, "add", |a, b| a + b)
    }

    /// Cellwise `self - rhs`; broadcasting as in [`Tensor::add`].
    pub fn sub(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_broadcast(rhs, "sub", |a, b| a - b)
    }

    /// Cellwise `self * rhs`; broadcasting as in [`Tensor::add`].
    pub fn mul(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_broadcast(rhs, "mul", |a, b| a * b)
    }

    /// Cellwise `self / rhs`; broadcasting as in [`Tensor::add`].
    pub fn div(&self, rhs: &Tensor) -> Result<Tensor> {
        self.zip_broadcast(rhs, "div", |a, b| a / b)
    }

    fn zip_broadcast(
        &self,
        rhs: &Tensor,
        op: &'static str,
        f: impl Fn(&Var, &Var) -> Var,
    ) -> Result<Tensor> {
        let shape = broadcast_shape(&self.shape, &rhs.shape)?;
        trace!(op, lhs = ?self.shape, rhs = ?rhs.shape, "elementwise");

        let (nl, nr) = (self.data.len(), rhs.data.len());
        let data = (0..shape.numel())
            .map(|i| f(&self.data[i % nl], &rhs.data[i % nr]))
            .collect();
        Tensor::from_nodes(data, shape)
    }

    /// Adds `v` to every cell's value in place. No graph nodes are created.
    pub fn add_scalar(&self, v: f64) -> &Self {
        for node in &self.data {
            node.set_value(node.value() + v);
        }
        self
    }

    /// Multiplies every cell's value by `v` in place.
    pub fn mul_scalar(&self, v: f64) -> &Self {
        for node in &self.data {
            node.set_value(node.value() * v);
        }
        self
    }

    /// Divides every cell's value by `v` in place (as multiplication by `1 / v`).
    pub fn div_scalar(&self, v: f64) -> &Self {
        self.mul_scalar(1.0 / v)
    }
}
