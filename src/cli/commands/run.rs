//! `ghia run`: reconcile every open issue of the given repositories.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::display::{diff_marker, error_tag, fallback_tag, output, CommandOutput};
use crate::cli::BatchFailed;
use crate::domain::error::FetchError;
use crate::domain::models::{Config, RepoSlug, RuleSet, Strategy};
use crate::domain::ports::IssueTracker;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::github::{GitHubClient, GitHubClientConfig};
use crate::infrastructure::logging::LoggerImpl;
use crate::services::{
    BatchEvent, BatchRunner, BatchSummary, FetchMode, IssueFetcher, IssueReport,
    ReconcileSettings, Reconciler,
};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// How to handle assignment collisions (append, set, change)
    #[arg(short, long)]
    pub strategy: Option<Strategy>,

    /// Run without making any changes
    #[arg(short, long)]
    pub dry_run: bool,

    /// Fetch pages and reconcile issues concurrently
    #[arg(short = 'x', long = "async")]
    pub concurrent: bool,

    /// File with authorization configuration
    #[arg(short = 'a', long)]
    pub config_auth: PathBuf,

    /// File with assignment rules configuration
    #[arg(short = 'r', long)]
    pub config_rules: PathBuf,

    /// Repositories to process, as owner/repository
    #[arg(required = true)]
    pub reposlugs: Vec<RepoSlug>,
}

/// One line of human output and the stream it belongs on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    fn print(&self) {
        match self {
            Self::Stdout(line) => println!("{line}"),
            Self::Stderr(line) => eprintln!("{line}"),
        }
    }

    fn text(&self) -> &str {
        match self {
            Self::Stdout(line) | Self::Stderr(line) => line,
        }
    }
}

/// Human output for one reconciled issue
pub fn render_issue(report: &IssueReport) -> Vec<OutputLine> {
    let reference = report.reference();
    let result = &report.result;
    let mut lines = vec![OutputLine::Stdout(format!(
        "-> {reference} ({})",
        report.html_url
    ))];

    if let Some(fallback) = &result.fallback {
        lines.push(OutputLine::Stdout(format!(
            "   {}: {} label \"{}\"",
            fallback_tag(),
            if fallback.already_present {
                "already has"
            } else {
                "added"
            },
            fallback.label
        )));
        if !fallback.ok {
            lines.push(update_error(&reference));
        }
    }

    if result.write_attempted && !result.write_succeeded {
        lines.push(update_error(&reference));
    }

    lines.extend(
        result
            .diff()
            .into_iter()
            .map(|change| {
                OutputLine::Stdout(format!("   {} {}", diff_marker(change.kind), change.user))
            }),
    );

    lines
}

fn update_error(reference: &str) -> OutputLine {
    OutputLine::Stderr(format!(
        "   {}: Could not update issue {reference}",
        error_tag()
    ))
}

/// Human output for a repository whose issues could not be listed
pub fn render_fetch_failure(err: &FetchError) -> OutputLine {
    OutputLine::Stderr(format!(
        "{}: Could not list issues for repository {}",
        error_tag(),
        err.repo()
    ))
}

pub fn render_event(event: &BatchEvent) -> Vec<OutputLine> {
    match event {
        BatchEvent::Issue(report) => render_issue(report),
        BatchEvent::RepoFailed(err) => vec![render_fetch_failure(err)],
    }
}

#[derive(Debug, Serialize)]
pub struct FailedRepository {
    pub repo: RepoSlug,
    pub status: Option<u16>,
    pub error: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RunOutput {
    pub issues: Vec<IssueReport>,
    pub failed_repositories: Vec<FailedRepository>,
    pub summary: BatchSummary,
}

impl RunOutput {
    fn record(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Issue(report) => self.issues.push(report.clone()),
            BatchEvent::RepoFailed(err) => self.failed_repositories.push(FailedRepository {
                repo: err.repo().clone(),
                status: err.status(),
                error: err.to_string(),
            }),
        }
    }
}

impl CommandOutput for RunOutput {
    fn to_human(&self) -> String {
        self.issues
            .iter()
            .flat_map(render_issue)
            .map(|line| line.text().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn load_config(args: &RunArgs) -> Result<Config> {
    let mut config = ConfigLoader::extract(&[&args.config_auth, &args.config_rules])?;
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    ConfigLoader::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

pub async fn execute(args: RunArgs, json_mode: bool) -> Result<()> {
    let config = load_config(&args)?;
    let _logger = LoggerImpl::init(&config.logging)?;

    let rules = RuleSet::from_config(&config).context("Failed to compile assignment rules")?;
    let client = GitHubClient::with_config(GitHubClientConfig::from(&config.github))?;
    let tracker: Arc<dyn IssueTracker> = Arc::new(client);

    let mode = if args.concurrent {
        FetchMode::Concurrent {
            max_in_flight: config.concurrency,
        }
    } else {
        FetchMode::Sequential
    };
    let settings = ReconcileSettings {
        strategy: config.strategy,
        dry_run: config.dry_run,
    };
    let reconciler = Arc::new(Reconciler::new(tracker.clone(), Arc::new(rules), settings));
    let runner = BatchRunner::new(IssueFetcher::new(tracker, mode), reconciler);

    let mut run_output = RunOutput::default();
    let summary = runner
        .run(&args.reposlugs, |event| {
            if json_mode {
                run_output.record(event);
            } else {
                render_event(event).iter().for_each(OutputLine::print);
            }
        })
        .await;

    if json_mode {
        run_output.summary = summary.clone();
        output(&run_output, true);
    }

    if summary.success() {
        Ok(())
    } else {
        Err(BatchFailed {
            repositories_failed: summary.repositories_failed,
            issues_failed: summary.issues_failed,
        }
        .into())
    }
}
