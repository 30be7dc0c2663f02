//! Compilation of `selector:pattern` lines into a [`RuleSet`]

use regex::Regex;
use tracing::debug;

use super::loader::ConfigError;
use crate::domain::models::config::Config;
use crate::domain::models::rule::{Rule, RuleSet, Selector};

/// Split a rule line at its first `:`
///
/// Returns `None` for lines without a separator.
pub fn split_rule_line(line: &str) -> Option<(&str, &str)> {
    line.split_once(':')
}

/// Compile one rule line case-insensitively
///
/// `Ok(None)` means the line is malformed and should be dropped.
pub fn compile_rule_line(user: &str, line: &str) -> Result<Option<Rule>, ConfigError> {
    let Some((selector, pattern)) = split_rule_line(line) else {
        debug!(user, line, "dropping rule line without selector separator");
        return Ok(None);
    };

    let regex = Regex::new(&format!("(?i){pattern}")).map_err(|source| {
        ConfigError::InvalidPattern {
            user: user.to_string(),
            line: line.to_string(),
            source,
        }
    })?;

    Ok(Some(Rule::new(Selector::parse(selector.trim()), regex)))
}

impl RuleSet {
    /// Build the rule set from the `patterns` and `fallback` sections
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut rule_set = Self::new();

        for (user, lines) in &config.patterns {
            rule_set.add_user(user.as_str());
            for line in lines {
                if let Some(rule) = compile_rule_line(user, line)? {
                    rule_set.add_rule(user.as_str(), rule);
                }
            }
        }

        Ok(match config.fallback_label() {
            Some(label) => rule_set.with_fallback_label(label),
            None => rule_set,
        })
    }
}
