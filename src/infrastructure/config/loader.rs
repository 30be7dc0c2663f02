use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::models::config::Config;

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "GHIA_";

/// Upper bound for `concurrency`
pub const MAX_CONCURRENCY: usize = 64;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GitHub token is missing (set github.token or GHIA_GITHUB__TOKEN)")]
    MissingToken,

    #[error("No assignment rules and no fallback label configured")]
    NothingToDo,

    #[error("Invalid concurrency: {0}. Must be between 1 and {MAX_CONCURRENCY}")]
    InvalidConcurrency(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Fallback label cannot be empty")]
    EmptyFallbackLabel,

    #[error("Invalid pattern for user '{user}' in rule '{line}': {source}")]
    InvalidPattern {
        user: String,
        line: String,
        #[source]
        source: regex::Error,
    },
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from an ordered list of YAML files
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. Each file in `paths`, later files overriding earlier ones
    /// 3. Environment variables (`GHIA_*` prefix, highest priority)
    ///
    /// A missing file is an error; figment would otherwise skip it silently.
    pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Config> {
        let config = Self::extract(paths)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load and merge without validating
    ///
    /// Used by commands that only need part of the configuration, such as
    /// printing the rule table without a token.
    pub fn extract<P: AsRef<Path>>(paths: &[P]) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")
    }

    /// Split a colon-separated list of paths, as found in `GHIA_CONFIG`
    pub fn split_path_list(list: &str) -> Vec<PathBuf> {
        list.split(':')
            .filter(|part| !part.trim().is_empty())
            .map(PathBuf::from)
            .collect()
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.github.token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }

        if let Some(label) = config.fallback_label() {
            if label.trim().is_empty() {
                return Err(ConfigError::EmptyFallbackLabel);
            }
        }

        if config.patterns.is_empty() && config.fallback.is_none() {
            return Err(ConfigError::NothingToDo);
        }

        if config.concurrency == 0 || config.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::InvalidConcurrency(config.concurrency));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
