//! Configuration for the polynomial-fit demo run.
//!
//! Load from environment via [`from_env`] and validate with [`Config::validate`].
//! Default values and env key names live in the `constants` submodule.

mod builder;
mod constants;
mod error;

use constants::{
    DEFAULT_LEARNING_RATE, DEFAULT_LOSS_LOG_EVERY, DEFAULT_MOMENTUM, DEFAULT_NUM_STEPS,
    DEFAULT_RANGE_END, DEFAULT_RANGE_START, DEFAULT_RANGE_STEP, DEFAULT_SEED,
};

pub use builder::{env_key, env_parsed, from_env};
pub use error::ConfigError;

/// Parameters of a training run.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Seed for coefficient initialisation.
    pub seed: u64,

    /// Momentum optimizer learning rate.
    pub learning_rate: f64,
    /// Momentum coefficient, in `[0, 1)`.
    pub momentum: f64,

    /// Number of optimizer steps.
    pub num_steps: usize,
    /// Log loss every this many steps.
    pub loss_log_every: usize,

    /// First sample point (inclusive).
    pub range_start: f64,
    /// Sampling stops before this point.
    pub range_end: f64,
    /// Distance between sample points.
    pub range_step: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: DEFAULT_MOMENTUM,
            num_steps: DEFAULT_NUM_STEPS,
            loss_log_every: DEFAULT_LOSS_LOG_EVERY,
            range_start: DEFAULT_RANGE_START,
            range_end: DEFAULT_RANGE_END,
            range_step: DEFAULT_RANGE_STEP,
        }
    }
}

impl Config {
    /// Returns `Ok(())` if every value is usable, or the first rule that fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_steps == 0 {
            return Err(ConfigError::Validation(
                "num_steps must be greater than 0".to_string(),
            ));
        }
        if self.loss_log_every == 0 {
            return Err(ConfigError::Validation(
                "loss_log_every must be greater than 0".to_string(),
            ));
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(ConfigError::Validation(format!(
                "momentum must be in [0, 1), got {}",
                self.momentum
            )));
        }
        if self.range_step.is_nan() || self.range_step <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "range_step must be positive, got {}",
                self.range_step
            )));
        }
        if self.range_start.is_nan() || self.range_start >= self.range_end {
            return Err(ConfigError::Validation(format!(
                "range_start ({}) must be less than range_end ({})",
                self.range_start, self.range_end
            )));
        }
        Ok(())
    }

    /// `range_start, range_start + step, ..` up to but excluding `range_end`.
    ///
    /// Points are computed by multiplication, not repeated addition, so they do
    /// not drift. Empty when the config does not validate.
    #[must_use]
    pub fn sample_points(&self) -> Vec<f64> {
        if self.validate().is_err() {
            return Vec::new();
        }
        (0u32..)
            .map(|i| self.range_start + f64::from(i) * self.range_step)
            .take_while(|&x| x < self.range_end)
            .collect()
    }
}
