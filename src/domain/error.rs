use thiserror::Error;

use super::models::RepoSlug;

/// Errors raised by an issue tracker adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The remote answered with a non-2xx status
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    /// Request could not be sent or the connection failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl TrackerError {
    /// HTTP status, when the failure came from a response
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fatal failure while listing a repository's issues
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Could not list issues for repository {repo}: HTTP {status}")]
    Status { repo: RepoSlug, status: u16 },

    #[error("Could not list issues for repository {repo}: {reason}")]
    Failed { repo: RepoSlug, reason: String },
}

impl FetchError {
    pub(crate) fn from_tracker(repo: &RepoSlug, err: TrackerError) -> Self {
        match err {
            TrackerError::Status { status, .. } => Self::Status {
                repo: repo.clone(),
                status,
            },
            other => Self::Failed {
                repo: repo.clone(),
                reason: other.to_string(),
            },
        }
    }

    pub const fn repo(&self) -> &RepoSlug {
        match self {
            Self::Status { repo, .. } | Self::Failed { repo, .. } => repo,
        }
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Failed { .. } => None,
        }
    }
}
