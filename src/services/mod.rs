//! Reconciliation engine
//!
//! Pure rule matching and assignee resolution, the per-issue reconciler,
//! paginated issue retrieval, the batch driver and the webhook gate.

pub mod assignment_resolver;
pub mod batch_runner;
pub mod fallback_labeler;
pub mod issue_fetcher;
pub mod matcher;
pub mod reconciler;
pub mod webhook_gate;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch_runner::{BatchEvent, BatchRunner, BatchSummary, IssueReport};
pub use fallback_labeler::FallbackLabeler;
pub use issue_fetcher::{FetchMode, IssueFetcher};
pub use reconciler::{ReconcileSettings, Reconciler};
pub use webhook_gate::{Rejection, Verdict, WebhookGate, WebhookRequest};
