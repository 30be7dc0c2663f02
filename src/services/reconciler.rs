use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::assignment_resolver;
use super::fallback_labeler::FallbackLabeler;
use crate::domain::models::{Issue, ReconcileOutcome, ReconciliationResult, RuleSet, Strategy};
use crate::domain::ports::IssueTracker;

/// Process-wide reconciliation settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSettings {
    pub strategy: Strategy,
    pub dry_run: bool,
}

/// Brings one issue's assignees (and fallback label) in line with the rules
///
/// Stateless across issues; one instance is shared by every concurrent
/// reconciliation of a run.
pub struct Reconciler {
    tracker: Arc<dyn IssueTracker>,
    rules: Arc<RuleSet>,
    settings: ReconcileSettings,
    labeler: FallbackLabeler,
}

impl Reconciler {
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        rules: Arc<RuleSet>,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            labeler: FallbackLabeler::new(tracker.clone()),
            tracker,
            rules,
            settings,
        }
    }

    pub const fn settings(&self) -> ReconcileSettings {
        self.settings
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Reconcile a single issue
    ///
    /// Sends at most one label write followed by at most one assignee write.
    /// Write failures are reported in the result; they never abort the call.
    #[instrument(skip_all, fields(issue = %issue.reference()))]
    pub async fn reconcile(&self, issue: &Issue) -> ReconciliationResult {
        let old = issue.assignee_logins();

        if issue.is_closed() {
            debug!("skipping closed issue");
            return ReconciliationResult::untouched(issue.number, ReconcileOutcome::Closed, old);
        }

        if self.settings.strategy == Strategy::Set && !old.is_empty() {
            debug!("issue already assigned, set strategy leaves it alone");
            return ReconciliationResult::untouched(issue.number, ReconcileOutcome::Protected, old);
        }

        let new = assignment_resolver::resolve(issue, &old, &self.rules, self.settings.strategy);

        let fallback = match self.rules.fallback_label() {
            Some(label) if new.is_empty() => {
                Some(self.labeler.apply(issue, label, self.settings.dry_run).await)
            }
            _ => None,
        };

        let outcome = if new != old {
            ReconcileOutcome::Reassigned
        } else if fallback.is_some() {
            ReconcileOutcome::FallbackOnly
        } else {
            ReconcileOutcome::NoChange
        };

        let mut result = ReconciliationResult {
            number: issue.number,
            outcome,
            old_assignees: old.clone(),
            new_assignees: new.clone(),
            fallback,
            write_attempted: false,
            write_succeeded: false,
        };

        if self.settings.dry_run || new == old {
            return result;
        }

        result.write_attempted = true;
        result.write_succeeded = self.write_assignees(issue, &new).await;
        if !result.write_succeeded {
            result.outcome = ReconcileOutcome::WriteFailed;
            result.new_assignees = old;
        }
        result
    }

    async fn write_assignees(&self, issue: &Issue, assignees: &BTreeSet<String>) -> bool {
        let list: Vec<String> = assignees.iter().cloned().collect();
        match self.tracker.update_assignees(issue, &list).await {
            Ok(()) => {
                info!(assignees = ?list, "assignees updated");
                true
            }
            Err(err) => {
                warn!(error = %err, "could not update issue assignees");
                false
            }
        }
    }
}
