use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::strategy::Strategy;

/// Main configuration structure for ghia
///
/// Assembled once at startup from YAML files and `GHIA_*` environment
/// variables, validated, then handed to the engine by value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// GitHub credentials and API endpoint
    #[serde(default)]
    pub github: GitHubConfig,

    /// Assignment rules: user login -> list of `selector:pattern` lines
    #[serde(default)]
    pub patterns: BTreeMap<String, Vec<String>>,

    /// Label applied when no user matches
    #[serde(default)]
    pub fallback: Option<FallbackConfig>,

    /// Assignment strategy
    #[serde(default)]
    pub strategy: Strategy,

    /// Compute everything but send no writes
    ///
    /// Accepts booleans as well as `1`/`0` and `yes`/`no`, as set in the
    /// environment.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub dry_run: bool,

    /// Maximum in-flight requests/reconciliations in concurrent mode
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Webhook server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

const fn default_concurrency() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            patterns: BTreeMap::new(),
            fallback: None,
            strategy: Strategy::default(),
            dry_run: false,
            concurrency: default_concurrency(),
            logging: LoggingConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Number(i64),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Number(value) => Ok(value != 0),
        Flag::Text(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "invalid flag value '{other}', expected true/false, yes/no or 1/0"
            ))),
        },
    }
}

impl Config {
    pub fn fallback_label(&self) -> Option<&str> {
        self.fallback.as_ref().map(|f| f.label.as_str())
    }
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Personal access token sent as `Authorization: token ...`
    #[serde(default)]
    pub token: String,

    /// Webhook secret; when absent webhook signatures are not checked
    #[serde(default)]
    pub secret: Option<String>,

    /// Base URL of the REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            secret: None,
            api_url: default_api_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Fallback labeling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    pub label: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for rolling JSON log files (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    #[default]
    Daily,
    Hourly,
    Never,
}

/// Webhook server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}
