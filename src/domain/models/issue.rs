use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Open/closed state of an issue as reported by GitHub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Label attached to an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

/// GitHub account referenced from an issue (assignee)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

/// A GitHub issue, in the shape returned by the REST API
///
/// Only the fields the assigner reads are modelled; everything else in the
/// payload is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number within its repository
    pub number: u64,

    /// Open or closed
    pub state: IssueState,

    /// Issue title
    pub title: String,

    /// Issue body; GitHub sends `null` for issues without a description
    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub labels: Vec<Label>,

    #[serde(default)]
    pub assignees: Vec<User>,

    /// API URL of the issue resource, target of every PATCH
    pub url: String,

    /// Browser URL, used for operator-facing output
    pub html_url: String,

    /// API URL of the owning repository
    #[serde(default)]
    pub repository_url: Option<String>,
}

impl Issue {
    /// Body text, with a missing body treated as empty
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self.state, IssueState::Closed)
    }

    /// Logins of the current assignees
    pub fn assignee_logins(&self) -> BTreeSet<String> {
        self.assignees.iter().map(|u| u.login.clone()).collect()
    }

    /// Label names in the order GitHub returned them
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }

    /// `owner/repo#number` reference, derived from the repository URL
    ///
    /// Falls back to `#number` when the payload carries no repository URL.
    pub fn reference(&self) -> String {
        self.repository_url
            .as_deref()
            .and_then(|url| url.split_once("/repos/"))
            .map_or_else(
                || format!("#{}", self.number),
                |(_, slug)| format!("{slug}#{}", self.number),
            )
    }
}
