//! `ghia serve`: run the webhook server.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerImpl;
use crate::infrastructure::webhook::start_server;

/// Colon-separated configuration files used when `--config` is absent
pub const CONFIG_ENV: &str = "GHIA_CONFIG";

/// Enables dry-run for the server when present, whatever its value
pub const DRY_RUN_ENV: &str = "GHIA_DRYRUN";

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file; repeat to merge several (later files win)
    #[arg(short, long)]
    pub config: Vec<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

fn config_paths(args: &ServeArgs) -> Result<Vec<PathBuf>> {
    if !args.config.is_empty() {
        return Ok(args.config.clone());
    }

    let list = std::env::var(CONFIG_ENV)
        .with_context(|| format!("No configuration given: pass --config or set {CONFIG_ENV}"))?;
    let paths = ConfigLoader::split_path_list(&list);
    if paths.is_empty() {
        anyhow::bail!("{CONFIG_ENV} does not name any configuration file");
    }
    Ok(paths)
}

fn load_config(args: &ServeArgs) -> Result<Config> {
    let mut config = ConfigLoader::load_files(&config_paths(args)?)?;
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if std::env::var_os(DRY_RUN_ENV).is_some() {
        config.dry_run = true;
    }
    Ok(config)
}

pub async fn execute(args: ServeArgs, _json_mode: bool) -> Result<()> {
    let config = load_config(&args)?;
    let _logger = LoggerImpl::init(&config.logging)?;

    start_server(config).await
}
