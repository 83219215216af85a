//! Build [`Config`] from `TGNN_*` environment variables.

use super::constants::{
    ENV_LEARNING_RATE, ENV_LOSS_LOG_EVERY, ENV_MOMENTUM, ENV_NUM_STEPS, ENV_PREFIX,
    ENV_RANGE_END, ENV_RANGE_START, ENV_RANGE_STEP, ENV_SEED,
};
use super::Config;
use super::ConfigError;

/// Full environment variable name for a key suffix (`SEED` → `TGNN_SEED`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads `key` and parses it into `T`.
///
/// `Ok(None)` if unset, `ConfigError::Parse` if set but unparsable, and
/// `ConfigError::EnvVar` if set but not valid Unicode.
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let s = match std::env::var(key) {
        Ok(s) => s,
        Err(std::env::VarError::NotPresent) => return Ok(None),
        Err(e) => {
            return Err(ConfigError::EnvVar {
                key: key.to_string(),
                message: e.to_string(),
            })
        }
    };
    match s.parse() {
        Ok(t) => Ok(Some(t)),
        Err(e) => Err(ConfigError::Parse {
            key: key.to_string(),
            value: s,
            message: e.to_string(),
        }),
    }
}

/// Builds [`Config`] from the environment, using [`Config::default`] for unset keys.
///
/// Does not validate; call [`Config::validate`] on the result.
pub fn from_env() -> Result<Config, ConfigError> {
    let default = Config::default();

    let seed = env_parsed::<u64>(&env_key(ENV_SEED))?.unwrap_or(default.seed);
    let learning_rate =
        env_parsed::<f64>(&env_key(ENV_LEARNING_RATE))?.unwrap_or(default.learning_rate);
    let momentum = env_parsed::<f64>(&env_key(ENV_MOMENTUM))?.unwrap_or(default.momentum);
    let num_steps = env_parsed::<usize>(&env_key(ENV_NUM_STEPS))?.unwrap_or(default.num_steps);
    let loss_log_every =
        env_parsed::<usize>(&env_key(ENV_LOSS_LOG_EVERY))?.unwrap_or(default.loss_log_every);
    let range_start =
        env_parsed::<f64>(&env_key(ENV_RANGE_START))?.unwrap_or(default.range_start);
    let range_end = env_parsed::<f64>(&env_key(ENV_RANGE_END))?.unwrap_or(default.range_end);
    let range_step = env_parsed::<f64>(&env_key(ENV_RANGE_STEP))?.unwrap_or(default.range_step);

    Ok(Config {
        seed,
        learning_rate,
        momentum,
        num_steps,
        loss_log_every,
        range_start,
        range_end,
        range_step,
    })
}
