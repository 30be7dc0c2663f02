//! In-memory issue tracker used by the service unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::error::TrackerError;
use crate::domain::models::{Issue, RepoSlug};
use crate::domain::ports::{IssuePage, IssueTracker};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Assignees(u64, Vec<String>),
    Labels(u64, Vec<String>),
}

/// Tracker serving canned pages and recording every write
#[derive(Default)]
pub struct RecordingTracker {
    pages: HashMap<String, Result<IssuePage, TrackerError>>,
    write_failure: Option<u16>,
    writes: Mutex<Vec<WriteCall>>,
    fetched: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl RecordingTracker {
    pub fn failing_writes(status: u16) -> Self {
        Self {
            write_failure: Some(status),
            ..Self::default()
        }
    }

    pub fn with_page(mut self, url: &str, page: IssuePage) -> Self {
        self.pages.insert(url.to_string(), Ok(page));
        self
    }

    pub fn with_failed_page(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(
            url.to_string(),
            Err(TrackerError::Status {
                status,
                body: String::new(),
            }),
        );
        self
    }

    /// Highest number of page fetches observed running at once
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().expect("writes lock").clone()
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().expect("fetched lock").clone()
    }

    fn record(&self, call: WriteCall) -> Result<(), TrackerError> {
        self.writes.lock().expect("writes lock").push(call);
        match self.write_failure {
            Some(status) => Err(TrackerError::Status {
                status,
                body: "rejected".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IssueTracker for RecordingTracker {
    fn issues_url(&self, repo: &RepoSlug) -> String {
        format!("https://api.test/repos/{repo}/issues")
    }

    async fn fetch_issue_page(&self, url: &str) -> Result<IssuePage, TrackerError> {
        self.fetched.lock().expect("fetched lock").push(url.to_string());
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        // Give sibling fetches a chance to start before this one finishes.
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.pages.get(url).cloned().unwrap_or_else(|| {
            Err(TrackerError::Status {
                status: 404,
                body: format!("no page for {url}"),
            })
        })
    }

    async fn update_assignees(&self, issue: &Issue, assignees: &[String]) -> Result<(), TrackerError> {
        self.record(WriteCall::Assignees(issue.number, assignees.to_vec()))
    }

    async fn update_labels(&self, issue: &Issue, labels: &[String]) -> Result<(), TrackerError> {
        self.record(WriteCall::Labels(issue.number, labels.to_vec()))
    }

    async fn current_login(&self) -> Result<String, TrackerError> {
        Ok("ghia-bot".to_string())
    }
}
