//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};

use super::commands::rules::RulesArgs;
use super::commands::run::RunArgs;
use super::commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "ghia")]
#[command(about = "GitHub Issue Assigner - assigns issues to users by configured rules", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile all open issues of one or more repositories
    Run(RunArgs),

    /// Serve the webhook endpoint
    Serve(ServeArgs),

    /// Print the compiled assignment rules
    Rules(RulesArgs),
}
