//! N-dimensional tensor of scalar nodes.
//!
//! A [`Tensor`] is a flat row-major buffer of [`Var`] handles plus a [`Shape`].
//! Every arithmetic operation builds new nodes, so gradients flow from any cell
//! of a result back into the cells it was computed from. Cloning or slicing a
//! tensor shares the underlying nodes.

mod display;
mod literal;
mod matmul;
mod ops;
mod slice;

use std::fmt;

use approx::AbsDiffEq;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::autograd::{ScalarNode, Var};
use crate::error::{Result, TensorError};
use crate::functions;
use crate::shape::{Position, Shape};

pub use literal::{NdLiteral, MAX_LITERAL_RANK};

/// Absolute tolerance used by `==` on tensors.
pub const EQ_TOLERANCE: f64 = 1e-3;

/// Homogeneous N-d container of scalar nodes.
///
/// Invariant: `data.len() == shape.numel()`.
#[derive(Clone)]
pub struct Tensor {
    data: Vec<Var>,
    shape: Shape,
}

impl Tensor {
    /// Builds a tensor of fresh leaf nodes from a nested literal of depth 1 to 4.
    ///
    /// # Errors
    ///
    /// - [`TensorError::RaggedLiteral`] when sibling sub-arrays disagree.
    /// - [`TensorError::InvalidShape`] for an empty sub-array.
    /// - [`TensorError::LiteralTooDeep`] past depth 4.
    ///
    /// # Example
    ///
    /// ```
    /// use tgnn_core::Tensor;
    ///
    /// let t = Tensor::new(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
    /// assert_eq!(t.shape().dims(), &[2, 3]);
    /// assert_eq!(t.values(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// ```
    pub fn new<L: NdLiteral + ?Sized>(literal: &L) -> Result<Self> {
        let (dims, values) = literal::parse(literal)?;
        Self::from_vec(values, &dims)
    }

    /// Builds a tensor of fresh leaf nodes from flat row-major values.
    pub fn from_vec(values: Vec<f64>, dims: &[usize]) -> Result<Self> {
        let data = values.into_iter().map(Var::new).collect();
        Self::from_nodes(data, Shape::new(dims)?)
    }

    /// Wraps existing nodes without copying them.
    ///
    /// # Errors
    ///
    /// [`TensorError::LengthMismatch`] when `data.len() != shape.numel()`.
    pub fn from_nodes(data: Vec<Var>, shape: Shape) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(TensorError::LengthMismatch {
                shape: shape.dims().to_vec(),
                expected: shape.numel(),
                actual: data.len(),
            });
        }
        Ok(Self { data, shape })
    }

    /// Tensor of `dims` where every cell is a fresh leaf holding `value`.
    pub fn full(value: f64, dims: &[usize]) -> Result<Self> {
        let shape = Shape::new(dims)?;
        let data = (0..shape.numel()).map(|_| Var::new(value)).collect();
        Ok(Self { data, shape })
    }

    /// All-zero tensor.
    pub fn zeros(dims: &[usize]) -> Result<Self> {
        Self::full(0.0, dims)
    }

    /// All-one tensor.
    pub fn ones(dims: &[usize]) -> Result<Self> {
        Self::full(1.0, dims)
    }

    /// Standard-normal samples from the thread RNG.
    pub fn randn(dims: &[usize]) -> Result<Self> {
        Self::randn_with(&mut rand::rng(), dims)
    }

    /// Standard-normal samples from `rng`, for reproducible initialisation.
    pub fn randn_with<R: Rng + ?Sized>(rng: &mut R, dims: &[usize]) -> Result<Self> {
        let shape = Shape::new(dims)?;
        let data = (0..shape.numel())
            .map(|_| {
                let sample: f64 = StandardNormal.sample(rng);
                Var::new(sample)
            })
            .collect();
        Ok(Self { data, shape })
    }

    /// The tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Axis lengths, outermost first.
    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    /// Number of axes.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: shapes have no zero dimensions.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cells in row-major order.
    pub fn data(&self) -> &[Var] {
        &self.data
    }

    /// Forward values in row-major order.
    pub fn values(&self) -> Vec<f64> {
        self.data.iter().map(Var::value).collect()
    }

    /// Gradients in row-major order.
    pub fn grad(&self) -> Vec<f64> {
        self.data.iter().map(Var::grad).collect()
    }

    /// The node at `pos`.
    ///
    /// # Errors
    ///
    /// [`TensorError::RankMismatch`] or [`TensorError::IndexOutOfBounds`].
    pub fn at(&self, pos: &[usize]) -> Result<&Var> {
        self.shape.validate(pos)?;
        Ok(&self.data[self.shape.offset_of(pos)])
    }

    /// The forward value at `pos`.
    pub fn value_at(&self, pos: &[usize]) -> Result<f64> {
        self.at(pos).map(Var::value)
    }

    /// Handles to the nodes at each of `positions`, in order.
    pub fn gather(&self, positions: &[Position]) -> Result<Vec<Var>> {
        positions.iter().map(|p| self.at(p).cloned()).collect()
    }

    /// Resets the gradient of every cell to zero. Ancestors are untouched.
    pub fn zero_grad(&self) {
        for v in &self.data {
            v.set_grad(0.0);
        }
    }

    /// Same-shape tensor with `f` applied to every cell.
    pub fn map(&self, f: impl FnMut(&Var) -> Var) -> Tensor {
        Tensor {
            data: self.data.iter().map(f).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Running sum of every cell, first to last; see [`functions::sum`].
    pub fn sum(&self) -> Var {
        // shapes have no zero axis, so there is always a first cell
        functions::sum(&self.data).unwrap_or_else(|| Var::new(0.0))
    }

    /// `sum() / len()`; see [`functions::mean`].
    pub fn mean(&self) -> Var {
        functions::mean(&self.data).unwrap_or_else(|| Var::new(0.0))
    }

    pub(crate) fn offset_of(&self, pos: &[usize]) -> usize {
        self.shape.offset_of(pos)
    }
}

impl AbsDiffEq for Tensor {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        EQ_TOLERANCE
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.shape == other.shape
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a.value() - b.value()).abs() <= epsilon)
    }
}

/// Approximate: identical shapes and every value within [`EQ_TOLERANCE`].
impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, EQ_TOLERANCE)
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("values", &self.values())
            .finish()
    }
}
