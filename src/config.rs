//! Runtime configuration from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::stores::DEFAULT_TOAST_DURATION;

pub const STORAGE_DIR_VAR: &str = "MOMBABY_STORAGE_DIR";
pub const TOAST_DURATION_VAR: &str = "MOMBABY_TOAST_DURATION_MS";
pub const CHECKOUT_LATENCY_VAR: &str = "MOMBABY_CHECKOUT_LATENCY_MS";
pub const STORAGE_QUOTA_VAR: &str = "MOMBABY_STORAGE_QUOTA_BYTES";

pub const DEFAULT_STORAGE_DIR: &str = ".mombaby";
pub const DEFAULT_CHECKOUT_LATENCY: Duration = Duration::from_millis(2000);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub toast_duration: Duration,
    pub checkout_latency: Duration,
    /// Largest single stored value, in bytes. `None` is unlimited.
    pub storage_quota: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            toast_duration: DEFAULT_TOAST_DURATION,
            checkout_latency: DEFAULT_CHECKOUT_LATENCY,
            storage_quota: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any variable source. Unset or blank variables
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();
        Ok(Self {
            storage_dir: get(STORAGE_DIR_VAR).map(PathBuf::from).unwrap_or(defaults.storage_dir),
            toast_duration: parse::<u64>(TOAST_DURATION_VAR, get(TOAST_DURATION_VAR))?
                .map(Duration::from_millis)
                .unwrap_or(defaults.toast_duration),
            checkout_latency: parse::<u64>(CHECKOUT_LATENCY_VAR, get(CHECKOUT_LATENCY_VAR))?
                .map(Duration::from_millis)
                .unwrap_or(defaults.checkout_latency),
            storage_quota: parse::<usize>(STORAGE_QUOTA_VAR, get(STORAGE_QUOTA_VAR))?,
        })
    }
}

fn parse<T: FromStr>(var: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError> {
    value.map(|v| v.parse().map_err(|_| ConfigError::Invalid { var, value: v })).transpose()
}
