//! Parameter update rules.
//!
//! An optimizer owns handles to the leaf nodes it updates. It reads each
//! parameter's gradient after a backward pass and writes a new value back
//! through [`Var::set_value`](crate::autograd::Var::set_value).

mod momentum;

pub use momentum::Momentum;

/// One update rule over a fixed list of parameters.
pub trait Optimizer {
    /// Applies one update using the gradients currently stored on the parameters.
    fn step(&mut self);

    /// Resets every parameter's gradient to zero.
    fn zero_grad(&self);
}
