pub mod config;
pub mod issue;
pub mod reconciliation;
pub mod repo_slug;
pub mod rule;
pub mod strategy;

pub use config::{
    Config, FallbackConfig, GitHubConfig, LogFormat, LoggingConfig, RotationPolicy, ServerConfig,
};
pub use issue::{Issue, IssueState, Label, User};
pub use reconciliation::{
    AssigneeChange, ChangeKind, FallbackOutcome, ReconcileOutcome, ReconciliationResult,
};
pub use repo_slug::{RepoSlug, RepoSlugError};
pub use rule::{Rule, RuleSet, Selector};
pub use strategy::Strategy;
