//! Port interfaces (traits) for the domain layer
//!
//! These traits define the boundaries between the reconciliation engine and
//! the outside world, allowing infrastructure adapters to be swapped.

pub mod issue_tracker;

pub use issue_tracker::{IssuePage, IssueTracker, PageLinks};
