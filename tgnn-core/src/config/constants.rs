//! Environment key names and default values for [`Config`](super::Config).

/// Prefix for every config environment variable (e.g. `TGNN_SEED`).
pub(crate) const ENV_PREFIX: &str = "TGNN_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_SEED: &str = "SEED";
pub(crate) const ENV_LEARNING_RATE: &str = "LEARNING_RATE";
pub(crate) const ENV_MOMENTUM: &str = "MOMENTUM";
pub(crate) const ENV_NUM_STEPS: &str = "NUM_STEPS";
pub(crate) const ENV_LOSS_LOG_EVERY: &str = "LOSS_LOG_EVERY";
pub(crate) const ENV_RANGE_START: &str = "RANGE_START";
pub(crate) const ENV_RANGE_END: &str = "RANGE_END";
pub(crate) const ENV_RANGE_STEP: &str = "RANGE_STEP";

// --- Default values ---

pub(crate) const DEFAULT_SEED: u64 = 42;
pub(crate) const DEFAULT_LEARNING_RATE: f64 = 1e-5;
pub(crate) const DEFAULT_MOMENTUM: f64 = 0.9;
pub(crate) const DEFAULT_NUM_STEPS: usize = 1000;
pub(crate) const DEFAULT_LOSS_LOG_EVERY: usize = 10;
pub(crate) const DEFAULT_RANGE_START: f64 = -3.0;
pub(crate) const DEFAULT_RANGE_END: f64 = 3.0;
pub(crate) const DEFAULT_RANGE_STEP: f64 = 0.5;
