//! `ghia rules`: show the compiled assignment rules.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::cli::display::{label, list_table, output, render_list, CommandOutput};
use crate::domain::models::RuleSet;
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// File with assignment rules configuration
    #[arg(short = 'r', long)]
    pub config_rules: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct RulesOutput {
    pub rules: BTreeMap<String, Vec<RuleOutput>>,
    pub fallback_label: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RuleOutput {
    pub selector: String,
    pub pattern: String,
}

impl From<&RuleSet> for RulesOutput {
    fn from(rule_set: &RuleSet) -> Self {
        let rules = rule_set
            .users()
            .map(|(user, rules)| {
                let rules = rules
                    .iter()
                    .map(|rule| {
                        let line = rule.line();
                        let pattern = line
                            .split_once(':')
                            .map_or_else(String::new, |(_, pattern)| pattern.to_string());
                        RuleOutput {
                            selector: rule.selector.to_string(),
                            pattern,
                        }
                    })
                    .collect();
                (user.to_string(), rules)
            })
            .collect();

        Self {
            rules,
            fallback_label: rule_set.fallback_label().map(ToString::to_string),
        }
    }
}

impl CommandOutput for RulesOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["user", "selector", "pattern"]);
        let mut total = 0;
        for (user, rules) in &self.rules {
            for rule in rules {
                table.add_row(vec![user.as_str(), rule.selector.as_str(), rule.pattern.as_str()]);
                total += 1;
            }
        }

        let mut rendered = render_list("rule", &table, total);
        if let Some(fallback) = &self.fallback_label {
            rendered.push_str(&format!("\n\n{} {fallback}", label("Fallback label")));
        }
        rendered
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: RulesArgs, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::extract(&[&args.config_rules])?;
    let rule_set = RuleSet::from_config(&config).context("Failed to compile assignment rules")?;

    output(&RulesOutput::from(&rule_set), json_mode);
    Ok(())
}
