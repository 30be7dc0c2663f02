//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading (several files, merged in order)
//! - Environment variable overrides (`GHIA_*`)
//! - Configuration validation
//! - Rule line compilation

pub mod loader;
pub mod rules;

pub use loader::{ConfigError, ConfigLoader};
pub use rules::compile_rule_line;
