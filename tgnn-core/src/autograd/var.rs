//! Scalar node: a forward value, its gradient, and the operation that produced it.

use crate::autograd::{Engine, Exp, Log, Pow, ScalarNode};
use std::cell::RefCell;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

/// The operation that produced a node, holding shared links to its operands.
///
/// The variant set is closed; every traversal matches it exhaustively.
#[derive(Clone)]
pub enum Op {
    /// Created from a literal; no operands.
    Leaf,
    /// `left + right`.
    Add(Var, Var),
    /// `left * right`.
    Mul(Var, Var),
    /// `base ^ exponent` with a constant exponent.
    Pow(Var, f64),
    /// `e ^ operand`.
    Exp(Var),
    /// `ln(operand)`.
    Log(Var),
    /// `max(0, operand)`.
    Relu(Var),
}

impl Op {
    /// Short name of the operation.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Op::Leaf => "leaf",
            Op::Add(..) => "add",
            Op::Mul(..) => "mul",
            Op::Pow(..) => "pow",
            Op::Exp(_) => "exp",
            Op::Log(_) => "log",
            Op::Relu(_) => "relu",
        }
    }

    /// Operand nodes, left to right.
    pub(crate) fn operands(&self) -> impl Iterator<Item = &Var> {
        let (first, second) = match self {
            Op::Leaf => (None, None),
            Op::Add(l, r) | Op::Mul(l, r) => (Some(l), Some(r)),
            Op::Pow(v, _) | Op::Exp(v) | Op::Log(v) | Op::Relu(v) => (Some(v), None),
        };
        first.into_iter().chain(second)
    }
}

/// Internal node state.
struct Node {
    /// Forward value, fixed at construction except through [`Var::set_value`].
    value: f64,
    /// d(root)/d(this); written during backward and reset.
    grad: f64,
    origin: Op,
}

impl Drop for Node {
    // Unlinks uniquely owned operands iteratively so that dropping a long chain
    // does not recurse once per node.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        take_operands(&mut self.origin, &mut pending);
        while let Some(var) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(var.0) {
                let mut node = cell.into_inner();
                take_operands(&mut node.origin, &mut pending);
            }
        }
    }
}

fn take_operands(origin: &mut Op, out: &mut Vec<Var>) {
    match std::mem::replace(origin, Op::Leaf) {
        Op::Leaf => {}
        Op::Add(l, r) | Op::Mul(l, r) => {
            out.push(l);
            out.push(r);
        }
        Op::Pow(v, _) | Op::Exp(v) | Op::Log(v) | Op::Relu(v) => out.push(v),
    }
}

/// Handle to a scalar node in the computation graph.
///
/// Cloning a `Var` clones the handle, not the node: both handles observe the
/// same gradient. Nodes only link backward to the operands they were built
/// from, so a graph is reclaimed as soon as its last handle is dropped.
///
/// # Example
///
/// ```
/// use tgnn_core::autograd::{ScalarNode, Var};
///
/// let a = Var::new(2.0);
/// let b = Var::new(3.0);
/// let c = &a * &b;
/// c.backward();
/// assert_eq!(c.value(), 6.0);
/// assert_eq!(a.grad(), 3.0);
/// assert_eq!(b.grad(), 2.0);
/// ```
#[derive(Clone)]
pub struct Var(Rc<RefCell<Node>>);

impl Var {
    /// Creates a leaf node with the given value and zero gradient.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Var::with_origin(value, Op::Leaf)
    }

    fn with_origin(value: f64, origin: Op) -> Self {
        Var(Rc::new(RefCell::new(Node {
            value,
            grad: 0.0,
            origin,
        })))
    }

    /// Overwrites the forward value.
    ///
    /// This is the write path for parameter updates between backward passes;
    /// nodes already built from this one keep their old values.
    pub fn set_value(&self, value: f64) {
        self.0.borrow_mut().value = value;
    }

    /// Returns a clone of the operation that produced this node.
    #[must_use]
    pub fn origin(&self) -> Op {
        self.0.borrow().origin.clone()
    }

    /// Name of the producing operation (`"leaf"` for literals).
    #[must_use]
    pub fn op_name(&self) -> &'static str {
        self.0.borrow().origin.name()
    }

    /// `true` if this node was created from a literal.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.0.borrow().origin, Op::Leaf)
    }

    /// `true` if both handles point at the same node.
    #[must_use]
    pub fn ptr_eq(&self, other: &Var) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn id(&self) -> *const () {
        Rc::as_ptr(&self.0).cast()
    }

    pub(crate) fn set_grad(&self, g: f64) {
        self.0.borrow_mut().grad = g;
    }

    pub(crate) fn add_grad(&self, g: f64) {
        self.0.borrow_mut().grad += g;
    }

    /// ReLU: `max(0, self)`.
    #[must_use]
    pub fn relu(&self) -> Var {
        let v = self.value();
        let value = if v < 0.0 { 0.0 } else { v };
        Var::with_origin(value, Op::Relu(self.clone()))
    }
}

impl ScalarNode for Var {
    fn value(&self) -> f64 {
        self.0.borrow().value
    }

    fn grad(&self) -> f64 {
        self.0.borrow().grad
    }

    fn backward(&self) {
        Engine::default().propagate(self, 1.0);
    }

    fn zero_grad(&self) {
        Engine::default().zero_grad(self);
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("Var")
            .field("value", &node.value)
            .field("grad", &node.grad)
            .field("op", &node.origin.name())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// std::ops: x + y, x - y, x * y, x / y, -x
// -----------------------------------------------------------------------------

impl Add for &Var {
    type Output = Var;

    fn add(self, rhs: Self) -> Var {
        Var::with_origin(self.value() + rhs.value(), Op::Add(self.clone(), rhs.clone()))
    }
}

impl Sub for &Var {
    type Output = Var;

    fn sub(self, rhs: Self) -> Var {
        self + &(-rhs)
    }
}

impl Mul for &Var {
    type Output = Var;

    fn mul(self, rhs: Self) -> Var {
        Var::with_origin(self.value() * rhs.value(), Op::Mul(self.clone(), rhs.clone()))
    }
}

impl Div for &Var {
    type Output = Var;

    fn div(self, rhs: Self) -> Var {
        self * &rhs.pow(-1.0)
    }
}

impl Neg for &Var {
    type Output = Var;

    fn neg(self) -> Var {
        self * &Var::new(-1.0)
    }
}

// -----------------------------------------------------------------------------
// Pow, Exp, Log: (&a).pow(p), (&a).exp(), (&a).log()
// -----------------------------------------------------------------------------

impl Pow<f64> for &Var {
    type Output = Var;

    fn pow(self, exp: f64) -> Var {
        Var::with_origin(self.value().powf(exp), Op::Pow(self.clone(), exp))
    }
}

impl Exp for &Var {
    type Output = Var;

    fn exp(self) -> Var {
        Var::with_origin(self.value().exp(), Op::Exp(self.clone()))
    }
}

impl Log for &Var {
    type Output = Var;

    fn log(self) -> Var {
        Var::with_origin(self.value().ln(), Op::Log(self.clone()))
    }
}
