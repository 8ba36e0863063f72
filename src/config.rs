//! Service configuration from environment variables.
//!
//! `main` loads a `.env` file first (dotenvy), then reads the process
//! environment. Tests go through [`Config::from_lookup`] with a map instead.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use crate::constants::{
    DEFAULT_API_KEY, DEFAULT_BIND, DEFAULT_DATA_DIR, DEFAULT_SLOW_MS, DEFAULT_WORKERS,
};

pub const ENV_API_KEY: &str = "PINKBOMBS_API_KEY";
pub const ENV_BIND: &str = "PINKBOMBS_BIND";
pub const ENV_DATA_DIR: &str = "PINKBOMBS_DATA_DIR";
pub const ENV_WORKERS: &str = "PINKBOMBS_WORKERS";
pub const ENV_CORS_ORIGINS: &str = "PINKBOMBS_CORS_ORIGINS";
pub const ENV_REGISTRY: &str = "PINKBOMBS_REGISTRY";
pub const ENV_SLOW_MS: &str = "PINKBOMBS_SLOW_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub bind: String,
    pub data_dir: PathBuf,
    pub workers: usize,
    pub cors_origins: Vec<String>,
    pub registry_path: Option<PathBuf>,
    pub slow_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            bind: DEFAULT_BIND.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            workers: DEFAULT_WORKERS,
            cors_origins: Vec::new(),
            registry_path: None,
            slow_ms: DEFAULT_SLOW_MS,
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = match var(ENV_API_KEY) {
            Some(key) => key,
            None => {
                warn!("{ENV_API_KEY} not set, using the built-in development key");
                DEFAULT_API_KEY.to_string()
            }
        };

        let workers: usize = try_load(ENV_WORKERS, var(ENV_WORKERS), DEFAULT_WORKERS)?;
        if workers == 0 {
            return Err(ConfigError::Invalid {
                key: ENV_WORKERS,
                value: "0".to_string(),
                reason: "at least one worker is required".to_string(),
            });
        }

        Ok(Self {
            api_key,
            bind: var(ENV_BIND).unwrap_or_else(|| DEFAULT_BIND.to_string()),
            data_dir: var(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            workers,
            cors_origins: var(ENV_CORS_ORIGINS)
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
            registry_path: var(ENV_REGISTRY).map(PathBuf::from),
            slow_ms: try_load(ENV_SLOW_MS, var(ENV_SLOW_MS), DEFAULT_SLOW_MS)?,
        })
    }
}

fn try_load<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(value) => match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                warn!("Invalid {key} value: {e}");
                Err(ConfigError::Invalid {
                    key,
                    reason: e.to_string(),
                    value,
                })
            }
        },
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
