//! Backward traversal: chain rule from a root node to every ancestor.
//!
//! Both traversals use an explicit stack, so graph depth is bounded by heap
//! memory rather than the call stack.

use std::collections::HashSet;

use tracing::{debug_span, trace};

use super::var::{Op, Var};
use super::ScalarNode;

/// How the gradient of `ln(v)` reaches `v`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogGradRule {
    /// `v.grad += incoming / v.value`, like every other operator.
    #[default]
    Accumulate,
    /// `v.grad = 1 / v.value`, ignoring the incoming gradient and any earlier
    /// contributions. Agrees with `Accumulate` only when the log node is the root.
    Assign,
}

/// Reverse-mode autodiff engine.
///
/// # Example
///
/// ```
/// use tgnn_core::autograd::{Engine, Pow, ScalarNode, Var};
///
/// let x = Var::new(3.0);
/// let y = (&x).pow(2.0);
/// Engine::default().propagate(&y, 1.0);
/// assert_eq!(x.grad(), 6.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    log_rule: LogGradRule,
}

impl Engine {
    /// Creates an engine with the default (accumulating) log rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given log rule.
    #[must_use]
    pub fn with_log_rule(log_rule: LogGradRule) -> Self {
        Self { log_rule }
    }

    /// The configured log rule.
    #[must_use]
    pub fn log_rule(&self) -> LogGradRule {
        self.log_rule
    }

    /// Sets `root.grad = seed` and accumulates contributions into every ancestor.
    ///
    /// Nodes are visited in reverse topological order, so each node has received
    /// every contribution from its consumers before it distributes its own
    /// gradient. Each operand edge is visited exactly once; an operand reached
    /// through several edges sums their contributions.
    pub fn propagate(&self, root: &Var, seed: f64) {
        let order = topological_order(root);
        let _span = debug_span!("backward", nodes = order.len(), seed).entered();

        root.set_grad(seed);
        for node in order.iter().rev() {
            let g = node.grad();
            let origin = node.origin();
            trace!(op = origin.name(), grad = g, "propagate");
            match origin {
                Op::Leaf => {}
                Op::Add(l, r) => {
                    l.add_grad(g);
                    r.add_grad(g);
                }
                Op::Mul(l, r) => {
                    l.add_grad(r.value() * g);
                    r.add_grad(l.value() * g);
                }
                Op::Pow(v, p) => {
                    v.add_grad(p * v.value().powf(p - 1.0) * g);
                }
                Op::Exp(v) => {
                    v.add_grad(v.value().exp() * g);
                }
                Op::Log(v) => match self.log_rule {
                    LogGradRule::Accumulate => v.add_grad(g / v.value()),
                    LogGradRule::Assign => v.set_grad(1.0 / v.value()),
                },
                Op::Relu(v) => {
                    if node.value() > 0.0 {
                        v.add_grad(g);
                    }
                }
            }
        }
    }

    /// Sets the gradient of `root` and every ancestor to exactly zero.
    pub fn zero_grad(&self, root: &Var) {
        let mut visited = HashSet::new();
        let mut stack = vec![root.clone()];
        while let Some(node) = stack.pop() {
            if !visited.insert(node.id()) {
                continue;
            }
            node.set_grad(0.0);
            stack.extend(node.origin().operands().cloned());
        }
    }
}

/// Every node reachable from `root`, each once, operands before consumers.
fn topological_order(root: &Var) -> Vec<Var> {
    let mut order = Vec::new();
    let mut visited = HashSet::new();
    // (node, operands already pushed)
    let mut stack = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            order.push(node);
            continue;
        }
        if !visited.insert(node.id()) {
            continue;
        }
        let origin = node.origin();
        stack.push((node, true));
        for operand in origin.operands() {
            if !visited.contains(&operand.id()) {
                stack.push((operand.clone(), false));
            }
        }
    }
    order
}
