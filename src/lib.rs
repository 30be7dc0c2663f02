//! ghia - GitHub Issue Assigner
//!
//! Assigns GitHub issues to users according to per-user regular-expression
//! rules, either in batch over whole repositories or one issue at a time
//! from webhook deliveries. Issues nobody matches can receive a fallback
//! label.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, typed errors and the `IssueTracker` port
//! - **Service Layer** (`services`): matching, assignment resolution,
//!   reconciliation, pagination, batch driving and webhook admission
//! - **Infrastructure Layer** (`infrastructure`): GitHub REST client,
//!   configuration, logging and the axum webhook server
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ghia::{GitHubClient, IssueFetcher, FetchMode, ReconcileSettings, Reconciler, RuleSet};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ghia::ConfigLoader::load_files(&["auth.yaml", "rules.yaml"])?;
//!     let tracker = Arc::new(GitHubClient::new(config.github.token.clone())?);
//!     let rules = Arc::new(RuleSet::from_config(&config)?);
//!     let reconciler = Reconciler::new(tracker.clone(), rules, ReconcileSettings::default());
//!     let fetcher = IssueFetcher::new(tracker, FetchMode::Sequential);
//!     for issue in fetcher.fetch(&"octo/hello".parse()?).await? {
//!         let result = reconciler.reconcile(&issue).await;
//!         println!("#{} {:?}", result.number, result.outcome);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::error::{FetchError, TrackerError};
pub use domain::models::{
    Config, Issue, ReconcileOutcome, ReconciliationResult, RepoSlug, Rule, RuleSet, Selector,
    Strategy,
};
pub use domain::ports::{IssuePage, IssueTracker, PageLinks};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::github::{GitHubClient, GitHubClientConfig};
pub use services::{
    BatchRunner, FetchMode, IssueFetcher, ReconcileSettings, Reconciler, Verdict, WebhookGate,
};
