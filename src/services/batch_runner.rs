use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::issue_fetcher::{FetchMode, IssueFetcher};
use super::reconciler::Reconciler;
use crate::domain::error::FetchError;
use crate::domain::models::{Issue, ReconciliationResult, RepoSlug};

/// Reconciliation result of one issue, with the context needed to print it
#[derive(Debug, Clone, Serialize)]
pub struct IssueReport {
    pub repo: RepoSlug,
    pub html_url: String,
    pub result: ReconciliationResult,
}

impl IssueReport {
    /// `owner/repo#number`
    pub fn reference(&self) -> String {
        format!("{}#{}", self.repo, self.result.number)
    }
}

/// Progress notification emitted while a batch runs
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Issue(IssueReport),
    RepoFailed(FetchError),
}

/// Aggregate outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub repositories: usize,
    pub repositories_failed: usize,
    pub issues_processed: usize,
    pub issues_failed: usize,
}

impl BatchSummary {
    pub const fn success(&self) -> bool {
        self.repositories_failed == 0 && self.issues_failed == 0
    }

    fn record(&mut self, event: &BatchEvent) {
        match event {
            BatchEvent::Issue(report) => {
                self.issues_processed += 1;
                if !report.result.ok() {
                    self.issues_failed += 1;
                }
            }
            BatchEvent::RepoFailed(_) => self.repositories_failed += 1,
        }
    }
}

/// Walks the open issues of several repositories through the reconciler
///
/// In concurrent mode each repository's pages are fetched in parallel and
/// issues are reconciled in parallel; events then arrive in completion order.
/// Repositories are fetched one at a time so that at most `max_in_flight`
/// requests are outstanding at any point.
pub struct BatchRunner {
    fetcher: IssueFetcher,
    reconciler: Arc<Reconciler>,
}

impl BatchRunner {
    pub const fn new(fetcher: IssueFetcher, reconciler: Arc<Reconciler>) -> Self {
        Self {
            fetcher,
            reconciler,
        }
    }

    pub async fn run<F>(&self, repos: &[RepoSlug], mut on_event: F) -> BatchSummary
    where
        F: FnMut(&BatchEvent),
    {
        let mut summary = BatchSummary {
            repositories: repos.len(),
            ..BatchSummary::default()
        };
        let mut emit = |event: BatchEvent| {
            summary.record(&event);
            on_event(&event);
        };

        match self.fetcher.mode() {
            FetchMode::Sequential => {
                for repo in repos {
                    match self.fetcher.fetch(repo).await {
                        Ok(issues) => {
                            for issue in issues.iter().filter(|i| !i.is_closed()) {
                                emit(BatchEvent::Issue(self.process(repo, issue).await));
                            }
                        }
                        Err(err) => emit(BatchEvent::RepoFailed(err)),
                    }
                }
            }
            FetchMode::Concurrent { max_in_flight } => {
                let limit = max_in_flight.max(1);
                let mut pending = Vec::new();
                for repo in repos {
                    match self.fetcher.fetch(repo).await {
                        Ok(issues) => pending.extend(
                            issues
                                .into_iter()
                                .filter(|i| !i.is_closed())
                                .map(|issue| (repo, issue)),
                        ),
                        Err(err) => emit(BatchEvent::RepoFailed(err)),
                    }
                }

                let mut reports = stream::iter(pending)
                    .map(|(repo, issue)| async move { self.process(repo, &issue).await })
                    .buffer_unordered(limit);
                while let Some(report) = reports.next().await {
                    emit(BatchEvent::Issue(report));
                }
            }
        }

        if summary.success() {
            info!(?summary, "batch finished");
        } else {
            warn!(?summary, "batch finished with failures");
        }
        summary
    }

    async fn process(&self, repo: &RepoSlug, issue: &Issue) -> IssueReport {
        IssueReport {
            repo: repo.clone(),
            html_url: issue.html_url.clone(),
            result: self.reconciler.reconcile(issue).await,
        }
    }
}
