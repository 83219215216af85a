use tracing::debug_span;

use super::Optimizer;
use crate::autograd::{ScalarNode, Var};

/// SGD with momentum.
///
/// Per parameter: `velocity = velocity * momentum + lr * grad`, then
/// `value -= velocity`.
#[derive(Debug)]
pub struct Momentum {
    params: Vec<Var>,
    velocity: Vec<f64>,
    lr: f64,
    momentum: f64,
    steps: usize,
}

impl Momentum {
    /// Creates the optimizer with zero initial velocity.
    #[must_use]
    pub fn new(params: Vec<Var>, lr: f64, momentum: f64) -> Self {
        let velocity = vec![0.0; params.len()];
        Self {
            params,
            velocity,
            lr,
            momentum,
            steps: 0,
        }
    }

    pub fn params(&self) -> &[Var] {
        &self.params
    }

    pub fn velocity(&self) -> &[f64] {
        &self.velocity
    }

    /// Number of completed steps.
    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Optimizer for Momentum {
    fn step(&mut self) {
        let _span = debug_span!(
            "momentum_step",
            step = self.steps,
            params = self.params.len()
        )
        .entered();
        for (p, v) in self.params.iter().zip(self.velocity.iter_mut()) {
            *v = *v * self.momentum + self.lr * p.grad();
            p.set_value(p.value() - *v);
        }
        self.steps += 1;
    }

    fn zero_grad(&self) {
        for p in &self.params {
            p.set_grad(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autograd::Pow;
    use approx::assert_abs_diff_eq;

    #[test]
    fn step_applies_velocity() {
        let w = Var::new(1.0);
        let mut opt = Momentum::new(vec![w.clone()], 0.1, 0.5);

        // loss = w^2, grad = 2w
        let loss = (&w).pow(2.0);
        loss.backward();
        opt.step();
        // v = 0.1 * 2 = 0.2
        assert_abs_diff_eq!(w.value(), 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(opt.velocity()[0], 0.2, epsilon = 1e-12);

        opt.zero_grad();
        assert_eq!(w.grad(), 0.0);

        let loss = (&w).pow(2.0);
        loss.backward();
        opt.step();
        // v = 0.2 * 0.5 + 0.1 * 1.6 = 0.26
        assert_abs_diff_eq!(w.value(), 0.54, epsilon = 1e-12);
        assert_eq!(opt.steps(), 2);
    }

    #[test]
    fn zero_momentum_is_plain_sgd() {
        let w = Var::new(3.0);
        let mut opt = Momentum::new(vec![w.clone()], 0.25, 0.0);
        for _ in 0..3 {
            let loss = (&w).pow(2.0);
            loss.backward();
            opt.step();
            opt.zero_grad();
        }
        // w *= (1 - 2 * 0.25) each step
        assert_abs_diff_eq!(w.value(), 3.0 * 0.125, epsilon = 1e-12);
    }

    #[test]
    fn converges_on_a_quadratic() {
        let w = Var::new(5.0);
        let mut opt = Momentum::new(vec![w.clone()], 0.05, 0.9);
        for _ in 0..300 {
            let loss = (&(&w - &Var::new(2.0))).pow(2.0);
            loss.backward();
            opt.step();
            opt.zero_grad();
        }
        assert_abs_diff_eq!(w.value(), 2.0, epsilon = 1e-3);
    }
}
