//! # tgnn
//!
//! Fits `y = 1 + x + a x^2 + b x^3 + c x^4 + d x^5` to `e^x` with momentum SGD.
//! The true coefficients are the Taylor ones: `1/2!, 1/3!, 1/4!, 1/5!`.
//!
//! Run parameters come from `TGNN_*` environment variables (see
//! [`tgnn_core::config`]); log verbosity from `RUST_LOG` (default `info`).

use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tgnn_core::config::{self, Config};
use tgnn_core::functions::sum;
use tgnn_core::optim::{Momentum, Optimizer};
use tgnn_core::{ScalarNode, Tensor, Var};

/// Coefficients of `x^2 ..= x^5` in the Taylor series of `e^x`.
const TRUE_COEFFS: [f64; 4] = [1.0 / 2.0, 1.0 / 6.0, 1.0 / 24.0, 1.0 / 120.0];

// =============================================================================
// MODEL
// =============================================================================

/// `1 + x + sum_k coeffs[k] * x^(k + 2)` as a graph over the coefficient nodes.
fn taylor5(x: f64, coeffs: &[Var]) -> Var {
    let head = &Var::new(1.0) + &Var::new(x);
    coeffs.iter().zip(2..).fold(head, |acc, (c, k)| {
        let term = &Var::new(x.powi(k)) * c;
        &acc + &term
    })
}

/// Same polynomial on plain floats.
fn taylor5_value(x: f64, coeffs: &[f64]) -> f64 {
    1.0 + x + coeffs
        .iter()
        .zip(2..)
        .map(|(c, k)| c * x.powi(k))
        .sum::<f64>()
}

/// Sum of squared errors as a graph, plus the mean squared error.
fn loss(points: &[f64], coeffs: &[Var]) -> Option<(Var, f64)> {
    let residuals: Vec<Var> = points
        .iter()
        .map(|&x| {
            let r = &Var::new(x.exp()) - &taylor5(x, coeffs);
            &r * &r
        })
        .collect();
    let total = sum(&residuals)?;

    let values: Vec<f64> = coeffs.iter().map(Var::value).collect();
    let mse = points
        .iter()
        .map(|&x| (taylor5_value(x, &values) - x.exp()).powi(2))
        .sum::<f64>()
        / points.len() as f64;
    Some((total, mse))
}

// =============================================================================
// MAIN: config → logging → init → training loop → report
// =============================================================================

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg: Config = config::from_env()?;
    cfg.validate()?;
    info!(?cfg, "starting fit");

    let points = cfg.sample_points();
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let coeffs = Tensor::randn_with(&mut rng, &[TRUE_COEFFS.len()])?;
    let params = coeffs.data().to_vec();
    info!(init = ?coeffs.values(), samples = points.len(), "initialised coefficients");

    let mut optim = Momentum::new(params.clone(), cfg.learning_rate, cfg.momentum);
    for step in 0..cfg.num_steps {
        let Some((total, mse)) = loss(&points, &params) else {
            return Err("no sample points in range".into());
        };
        total.backward();
        optim.step();

        if step % cfg.loss_log_every == 0 {
            info!(
                step,
                loss = total.value(),
                mse,
                a = params[0].value(),
                b = params[1].value(),
                c = params[2].value(),
                d = params[3].value(),
                "progress"
            );
        }
        if !total.value().is_finite() {
            warn!(step, "loss diverged; lower TGNN_LEARNING_RATE");
            break;
        }
        optim.zero_grad();
    }

    for ((name, p), truth) in ["a", "b", "c", "d"].iter().zip(&params).zip(TRUE_COEFFS) {
        info!(coefficient = *name, fitted = p.value(), taylor = truth, "result");
    }
    Ok(())
}
