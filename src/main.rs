//! ghia CLI entry point.

use clap::Parser;

use ghia::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => ghia::cli::commands::run::execute(args, cli.json).await,
        Commands::Serve(args) => ghia::cli::commands::serve::execute(args, cli.json).await,
        Commands::Rules(args) => ghia::cli::commands::rules::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        ghia::cli::handle_error(err, cli.json);
    }
}
