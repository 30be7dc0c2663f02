//! Domain layer for ghia
//!
//! Issues, rules, strategies and the reconciliation result types, plus the
//! port through which the engine reaches GitHub.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{FetchError, TrackerError};
