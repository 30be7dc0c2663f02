use async_trait::async_trait;

use crate::domain::error::TrackerError;
use crate::domain::models::{Issue, RepoSlug};

/// Pagination relations taken from a response's `Link` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub next: Option<String>,
    pub last: Option<String>,
}

/// One page of the issue listing
#[derive(Debug, Clone, Default)]
pub struct IssuePage {
    pub issues: Vec<Issue>,
    pub links: PageLinks,
}

/// Remote issue tracker the reconciliation engine talks to
///
/// Implementations must be safe to share between concurrent reconciliations;
/// the engine never holds state across calls.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// URL of the first page of a repository's issue listing
    fn issues_url(&self, repo: &RepoSlug) -> String;

    /// Fetch one page of issues
    ///
    /// # Returns
    /// * `Ok(IssuePage)` with the page's issues and its pagination links
    /// * `Err(TrackerError::Status)` on a non-2xx response
    async fn fetch_issue_page(&self, url: &str) -> Result<IssuePage, TrackerError>;

    /// Replace the assignee list of an issue
    async fn update_assignees(&self, issue: &Issue, assignees: &[String]) -> Result<(), TrackerError>;

    /// Replace the label list of an issue
    async fn update_labels(&self, issue: &Issue, labels: &[String]) -> Result<(), TrackerError>;

    /// Login of the account the credentials belong to
    async fn current_login(&self) -> Result<String, TrackerError>;
}
