//! Compares backward-pass gradients of composite tensor graphs against
//! central-difference numerical gradients.

use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, SeedableRng};

use tgnn_core::autograd::Exp;
use tgnn_core::functions::{log_softmax, softmax};
use tgnn_core::{Result, ScalarNode, Shape, Tensor, Var};

const H: f64 = 1e-6;

/// Evaluates `f` on fresh leaves built from `values`, returning the root value
/// and the analytic gradient of every input.
fn analytic(
    values: &[f64],
    dims: &[usize],
    f: &dyn Fn(&Tensor) -> Result<Var>,
) -> (f64, Vec<f64>) {
    let x = Tensor::from_vec(values.to_vec(), dims).unwrap();
    let root = f(&x).unwrap();
    root.backward();
    (root.value(), x.grad())
}

fn numeric(
    values: &[f64],
    dims: &[usize],
    f: &dyn Fn(&Tensor) -> Result<Var>,
) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let mut plus = values.to_vec();
            let mut minus = values.to_vec();
            plus[i] += H;
            minus[i] -= H;
            let fp = f(&Tensor::from_vec(plus, dims).unwrap()).unwrap().value();
            let fm = f(&Tensor::from_vec(minus, dims).unwrap()).unwrap().value();
            (fp - fm) / (2.0 * H)
        })
        .collect()
}

fn check(values: &[f64], dims: &[usize], f: &dyn Fn(&Tensor) -> Result<Var>) {
    let (_, got) = analytic(values, dims, f);
    let want = numeric(values, dims, f);
    for (g, w) in got.iter().zip(&want) {
        assert_abs_diff_eq!(*g, *w, epsilon = 1e-5);
    }
}

fn random_values(seed: u64, dims: &[usize]) -> Vec<f64> {
    Tensor::randn_with(&mut StdRng::seed_from_u64(seed), dims)
        .unwrap()
        .values()
}

#[test]
fn matmul_then_weighted_sum() {
    let w = Tensor::new(&[[0.5, -1.0], [2.0, 0.25], [1.5, -0.75]]).unwrap();
    let f = move |x: &Tensor| -> Result<_> {
        let y = x.matmul(&w)?;
        Ok(y.mul(&y)?.sum())
    };
    check(&random_values(1, &[2, 3]), &[2, 3], &f);
}

#[test]
fn batched_matmul_with_shared_rhs() {
    let f = |x: &Tensor| -> Result<_> {
        let rhs = Tensor::new(&[[1.0, 0.5], [-0.5, 2.0]])?;
        let y = x.matmul(&rhs)?;
        Ok(y.map(|v| v.relu()).sum())
    };
    check(&random_values(2, &[3, 2, 2]), &[3, 2, 2], &f);
}

#[test]
fn softmax_along_each_axis() {
    for axis in 0..3 {
        let f = move |x: &Tensor| -> Result<_> {
            let weights = Tensor::new(&[1.0, -2.0, 3.0])?;
            let s = softmax(x, axis)?;
            Ok(s.mul(&weights)?.sum())
        };
        check(&random_values(3 + axis as u64, &[2, 2, 3]), &[2, 2, 3], &f);
    }
}

#[test]
fn cross_entropy_style_loss() {
    // mean over rows of -log_softmax(x @ w)[row, target[row]]
    let targets = [2usize, 0, 1, 1];
    let f = move |x: &Tensor| -> Result<_> {
        let w = Tensor::new(&[[0.3, -0.2, 0.1], [0.05, 0.4, -0.6]])?;
        let logp = log_softmax(&x.matmul(&w)?, 1)?;
        let picked: Vec<_> = targets
            .iter()
            .enumerate()
            .map(|(row, &t)| logp.at(&[row, t]).cloned())
            .collect::<Result<_>>()?;
        let nll = Tensor::from_nodes(picked, Shape::new(&[targets.len()])?)?;
        let neg = Tensor::new(&-1.0)?;
        Ok(nll.mul(&neg)?.mean())
    };
    check(&random_values(9, &[4, 2]), &[4, 2], &f);
}

#[test]
fn broadcast_division_and_slice() {
    let f = |x: &Tensor| -> Result<_> {
        let top = x.slice(&[0..1])?;
        let denom = Tensor::new(&[2.0, 4.0, 8.0])?;
        let ratio = top.div(&denom)?;
        let rest = x.slice(&[1..3, 1..3])?;
        Ok(&ratio.map(|v| v.exp()).sum() + &rest.mul(&rest)?.sum())
    };
    check(&random_values(4, &[3, 3]), &[3, 3], &f);
}
