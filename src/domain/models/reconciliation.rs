use serde::Serialize;
use std::collections::BTreeSet;

/// Terminal state reached while reconciling one issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// Closed issues are skipped
    Closed,
    /// `set` strategy left an already-assigned issue untouched
    Protected,
    /// Computed assignees equal the current ones
    NoChange,
    /// Nobody matched; only the fallback label was considered
    FallbackOnly,
    /// Assignees differ from the current ones and were (or, in dry-run
    /// mode, would be) written
    Reassigned,
    /// Assignees differ but the write was rejected; nothing changed
    WriteFailed,
}

/// What the fallback labeler did (or would do) for an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackOutcome {
    pub label: String,
    /// Label was added, or would be in dry-run mode
    pub applied: bool,
    /// Label was already on the issue; nothing to do
    pub already_present: bool,
    pub ok: bool,
}

/// Structured result of reconciling one issue
///
/// `new_assignees` reflects the state actually in effect: when the assignee
/// write fails it equals `old_assignees`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciliationResult {
    pub number: u64,
    pub outcome: ReconcileOutcome,
    pub old_assignees: BTreeSet<String>,
    pub new_assignees: BTreeSet<String>,
    pub fallback: Option<FallbackOutcome>,
    pub write_attempted: bool,
    pub write_succeeded: bool,
}

impl ReconciliationResult {
    /// Result for an issue that needed no computation at all
    pub fn untouched(number: u64, outcome: ReconcileOutcome, assignees: BTreeSet<String>) -> Self {
        Self {
            number,
            outcome,
            old_assignees: assignees.clone(),
            new_assignees: assignees,
            fallback: None,
            write_attempted: false,
            write_succeeded: false,
        }
    }

    /// True when every attempted sub-operation succeeded
    pub fn ok(&self) -> bool {
        let fallback_ok = self.fallback.as_ref().is_none_or(|f| f.ok);
        let write_ok = !self.write_attempted || self.write_succeeded;
        fallback_ok && write_ok
    }

    pub fn fallback_applied(&self) -> bool {
        self.fallback.as_ref().is_some_and(|f| f.applied)
    }

    /// Per-user diff entries sorted case-insensitively
    pub fn diff(&self) -> Vec<AssigneeChange> {
        let mut users: Vec<&String> = self.old_assignees.union(&self.new_assignees).collect();
        users.sort_by_key(|u| u.to_lowercase());

        users
            .into_iter()
            .map(|user| {
                let kind = match (
                    self.old_assignees.contains(user),
                    self.new_assignees.contains(user),
                ) {
                    (true, false) => ChangeKind::Removed,
                    (false, true) => ChangeKind::Added,
                    _ => ChangeKind::Kept,
                };
                AssigneeChange {
                    user: user.clone(),
                    kind,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Kept,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssigneeChange {
    pub user: String,
    pub kind: ChangeKind,
}
