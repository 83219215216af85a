//! Autograd: scalar computation graph with reverse-mode differentiation.
//!
//! Arithmetic on [`Var`] handles computes the forward value immediately and
//! records the producing [`Op`] with links back to its operands. The graph is a
//! DAG: an operand may feed any number of consumers. [`ScalarNode::backward`]
//! hands the graph to the [`Engine`], which distributes the root's gradient to
//! every ancestor using the chain rule.

mod engine;
mod var;
#[cfg(test)]
mod tests;

pub use engine::{Engine, LogGradRule};
pub use var::{Op, Var};

/// Trait for raising a node to a constant power (e.g. `(&a).pow(2.0)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking.
    #[must_use]
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// Trait for the exponential of a node (e.g. `(&a).exp()`).
pub trait Exp {
    /// Result of the exponential.
    type Output;

    /// Returns `exp(self)` with gradient tracking.
    #[must_use]
    fn exp(self) -> Self::Output;
}

/// Trait for the natural log of a node (e.g. `(&a).log()`).
pub trait Log {
    /// Result of the log.
    type Output;

    /// Returns `ln(self)` with gradient tracking. Non-positive inputs give NaN or -inf.
    #[must_use]
    fn log(self) -> Self::Output;
}

/// A differentiable scalar in the computation graph.
pub trait ScalarNode: Clone {
    /// Returns the forward value.
    fn value(&self) -> f64;

    /// Returns the gradient accumulated by the last backward pass.
    fn grad(&self) -> f64;

    /// Runs backpropagation from this node with seed gradient 1.
    fn backward(&self);

    /// Resets the gradient of this node and every ancestor to zero.
    fn zero_grad(&self);
}
