use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{FallbackOutcome, Issue};
use crate::domain::ports::IssueTracker;

/// Adds the fallback label to issues nobody could be assigned to
pub struct FallbackLabeler {
    tracker: Arc<dyn IssueTracker>,
}

impl FallbackLabeler {
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    /// Ensure `label` is present on `issue`
    ///
    /// Sends at most one label write. In dry-run mode nothing is sent and the
    /// outcome reports the label as (would-be) applied. A failed write is
    /// reported through `ok`, never as an error.
    pub async fn apply(&self, issue: &Issue, label: &str, dry_run: bool) -> FallbackOutcome {
        if issue.has_label(label) {
            return FallbackOutcome {
                label: label.to_string(),
                applied: false,
                already_present: true,
                ok: true,
            };
        }

        if dry_run {
            return FallbackOutcome {
                label: label.to_string(),
                applied: true,
                already_present: false,
                ok: true,
            };
        }

        let mut labels = issue.label_names();
        labels.push(label.to_string());

        let ok = match self.tracker.update_labels(issue, &labels).await {
            Ok(()) => {
                info!(issue = %issue.reference(), label, "fallback label added");
                true
            }
            Err(err) => {
                warn!(issue = %issue.reference(), label, error = %err, "failed to add fallback label");
                false
            }
        };

        FallbackOutcome {
            label: label.to_string(),
            applied: ok,
            already_present: false,
            ok,
        }
    }
}
