//! Tests for scalar nodes and the backward engine.
//!
//! Covers each operator's local derivative, accumulation through shared
//! operands, zeroing, both log rules, and deep graphs.

use approx::assert_abs_diff_eq;

use crate::autograd::{Engine, Exp, Log, LogGradRule, Op, Pow, ScalarNode, Var};

#[test]
fn add_of_self_accumulates() {
    let a = Var::new(3.0);
    let d = &a + &a;
    d.backward();
    assert_eq!(a.grad(), 2.0);
}

#[test]
fn neg_backward() {
    let a = Var::new(3.0);
    let b = -&a;
    assert_eq!(b.value(), -3.0);
    b.backward();
    assert_eq!(a.grad(), -1.0);
}

#[test]
fn sub_backward() {
    let a = Var::new(1.0);
    let b = Var::new(2.0);
    let d = &a - &b;
    d.backward();
    assert_eq!(a.grad(), 1.0);
    assert_eq!(b.grad(), -1.0);
}

#[test]
fn mul_backward() {
    let a = Var::new(2.0);
    let b = Var::new(3.0);
    let c = &a * &b;
    assert_eq!(c.value(), 6.0);
    c.backward();
    assert_eq!(a.grad(), 3.0);
    assert_eq!(b.grad(), 2.0);
}

#[test]
fn div_backward() {
    let a = Var::new(6.0);
    let b = Var::new(2.0);
    let c = &a / &b;
    assert_eq!(c.value(), 3.0);
    c.backward();
    assert_eq!(a.grad(), 0.5);
    // d/db (a/b) = -a/b^2
    assert_eq!(b.grad(), -1.5);
}

#[test]
fn pow_backward() {
    let a = Var::new(2.0);
    let b = (&a).pow(3.0);
    assert_abs_diff_eq!(b.value(), 8.0, epsilon = 1e-10);
    b.backward();
    assert_abs_diff_eq!(a.grad(), 12.0, epsilon = 1e-10);
}

#[test]
fn exp_backward() {
    let a = Var::new(1.0);
    let b = a.exp();
    assert_abs_diff_eq!(b.value(), std::f64::consts::E, epsilon = 1e-10);
    b.backward();
    assert_abs_diff_eq!(a.grad(), std::f64::consts::E, epsilon = 1e-10);
}

#[test]
fn log_backward() {
    let a = Var::new(std::f64::consts::E);
    let b = a.log();
    assert_abs_diff_eq!(b.value(), 1.0, epsilon = 1e-10);
    b.backward();
    assert_abs_diff_eq!(a.grad(), 1.0 / std::f64::consts::E, epsilon = 1e-10);
}

#[test]
fn log_of_non_positive_is_not_an_error() {
    assert!(Var::new(-1.0).log().value().is_nan());
    assert_eq!(Var::new(0.0).log().value(), f64::NEG_INFINITY);
}

#[test]
fn composite_expression() {
    // f = (a * (b - c))^2 + d
    let a = Var::new(3.0);
    let b = Var::new(5.0);
    let c = Var::new(7.0);
    let d = Var::new(9.0);
    let f = &(&a * &(&b - &c)).pow(2.0) + &d;
    assert_eq!(f.value(), 45.0);

    f.backward();
    assert_eq!(a.grad(), 24.0);
    assert_eq!(b.grad(), -36.0);
    assert_eq!(c.grad(), 36.0);
    assert_eq!(d.grad(), 1.0);

    f.zero_grad();
    assert_eq!(f.grad(), 0.0);
    assert_eq!(a.grad(), 0.0);
    assert_eq!(b.grad(), 0.0);
    assert_eq!(c.grad(), 0.0);
    assert_eq!(d.grad(), 0.0);
}

#[test]
fn relu_positive_and_negative() {
    let a = Var::new(3.0);
    let b = a.relu();
    b.backward();
    assert_eq!(b.value(), 3.0);
    assert_eq!(a.grad(), 1.0);

    let a = Var::new(-3.0);
    let b = a.relu();
    b.backward();
    assert_eq!(b.value(), 0.0);
    assert_eq!(a.grad(), 0.0);
}

#[test]
fn shared_interior_node_counts_each_edge_once() {
    // c = a * b is used twice: d = c + c = 2ab, dd/da = 2b.
    let a = Var::new(3.0);
    let b = Var::new(4.0);
    let c = &a * &b;
    let d = &c + &c;
    d.backward();
    assert_eq!(c.grad(), 2.0);
    assert_eq!(a.grad(), 8.0);
    assert_eq!(b.grad(), 6.0);
}

#[test]
fn diamond_graph() {
    // y = exp(x) * exp(x) with two separate exp nodes and one shared x
    let x = Var::new(0.5);
    let y = &x.exp() * &x.exp();
    y.backward();
    assert_abs_diff_eq!(x.grad(), 2.0 * (1.0f64).exp(), epsilon = 1e-12);
}

#[test]
fn zero_grad_reaches_every_ancestor() {
    let a = Var::new(2.0);
    let b = Var::new(3.0);
    let hidden = (&a * &b).exp();
    let out = &hidden.log() + &a.relu();
    out.backward();
    assert_ne!(a.grad(), 0.0);

    out.zero_grad();
    for v in [&a, &b, &hidden, &out] {
        assert_eq!(v.grad(), 0.0);
    }
}

#[test]
fn repeated_cycles_after_reset_match() {
    let w = Var::new(1.5);
    let mut grads = Vec::new();
    for _ in 0..3 {
        let x = Var::new(2.0);
        let loss = (&(&w * &x) - &Var::new(1.0)).pow(2.0);
        loss.backward();
        grads.push(w.grad());
        loss.zero_grad();
    }
    // d/dw (wx - 1)^2 = 2(wx - 1)x = 2 * 2 * 2
    assert_eq!(grads, vec![8.0, 8.0, 8.0]);
}

#[test]
fn log_rules_agree_at_the_root() {
    for rule in [LogGradRule::Accumulate, LogGradRule::Assign] {
        let a = Var::new(4.0);
        let b = &a * &a;
        let c = b.log();
        Engine::with_log_rule(rule).propagate(&c, 1.0);
        // d/da ln(a^2) = 2/a
        assert_abs_diff_eq!(a.grad(), 0.5, epsilon = 1e-12);
    }
}

#[test]
fn log_rules_differ_below_the_root() {
    // y = 3 * ln(a): the chain rule gives 3/a.
    let a = Var::new(2.0);
    let y = &Var::new(3.0) * &a.log();
    Engine::default().propagate(&y, 1.0);
    assert_abs_diff_eq!(a.grad(), 1.5, epsilon = 1e-12);

    let a = Var::new(2.0);
    let y = &Var::new(3.0) * &a.log();
    Engine::with_log_rule(LogGradRule::Assign).propagate(&y, 1.0);
    assert_abs_diff_eq!(a.grad(), 0.5, epsilon = 1e-12);
}

#[test]
fn propagate_uses_seed() {
    let a = Var::new(2.0);
    let b = &a * &Var::new(5.0);
    Engine::new().propagate(&b, 0.5);
    assert_eq!(b.grad(), 0.5);
    assert_eq!(a.grad(), 2.5);
}

#[test]
fn origin_records_operands() {
    let a = Var::new(1.0);
    let b = Var::new(2.0);
    let c = &a + &b;
    assert!(a.is_leaf());
    assert!(!c.is_leaf());
    assert_eq!(c.op_name(), "add");
    match c.origin() {
        Op::Add(l, r) => {
            assert!(l.ptr_eq(&a));
            assert!(r.ptr_eq(&b));
        }
        _ => panic!("expected add"),
    }
    assert_eq!((&a).pow(2.0).op_name(), "pow");
    assert_eq!(a.relu().op_name(), "relu");
}

#[test]
fn operands_are_not_mutated_by_construction() {
    let a = Var::new(2.0);
    let _ = &a * &Var::new(3.0);
    let _ = a.exp();
    assert_eq!(a.value(), 2.0);
    assert_eq!(a.grad(), 0.0);
}

#[test]
fn deep_chain_backward_and_drop() {
    let x = Var::new(1.0);
    let mut acc = Var::new(0.0);
    for _ in 0..200_000 {
        acc = &acc + &x;
    }
    assert_eq!(acc.value(), 200_000.0);
    acc.backward();
    assert_eq!(x.grad(), 200_000.0);
    acc.zero_grad();
    assert_eq!(x.grad(), 0.0);
    drop(acc);
}

#[test]
fn set_value_only_touches_the_node() {
    let a = Var::new(1.0);
    let b = &a + &Var::new(1.0);
    a.set_value(10.0);
    assert_eq!(a.value(), 10.0);
    assert_eq!(b.value(), 2.0);
}

#[test]
fn display_and_debug() {
    let a = Var::new(1.5);
    assert_eq!(a.to_string(), "1.5");
    let dbg = format!("{:?}", a.exp());
    assert!(dbg.contains("exp"));
}
