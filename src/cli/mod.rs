//! Command-line interface
//!
//! clap definitions, command implementations and output formatting.

pub mod commands;
pub mod display;
pub mod types;

pub use types::{Cli, Commands};

use console::style;
use thiserror::Error;

/// Process exit code for any failure
pub const FAILURE_EXIT_CODE: i32 = 10;

/// A batch ran to completion but some repositories or issues failed
///
/// The failures were already reported while the batch ran.
#[derive(Error, Debug)]
#[error("{repositories_failed} repositories and {issues_failed} issues failed")]
pub struct BatchFailed {
    pub repositories_failed: usize,
    pub issues_failed: usize,
}

/// Report an error and exit with [`FAILURE_EXIT_CODE`]
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if err.downcast_ref::<BatchFailed>().is_none() {
        if json_mode {
            let body = serde_json::json!({ "error": format!("{err:#}") });
            println!(
                "{}",
                serde_json::to_string_pretty(&body).unwrap_or_default()
            );
        } else {
            eprintln!("{} {err:#}", style("Error:").red().bold());
        }
    }
    std::process::exit(FAILURE_EXIT_CODE)
}
