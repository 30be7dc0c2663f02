//! Webhook HTTP server
//!
//! `GET /` serves a JSON status document, `POST /` receives GitHub
//! `issues` deliveries.

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tracing::info;

use super::handlers::{handle_status, handle_webhook, AppState, ServiceStatus};
use crate::domain::models::{Config, RuleSet};
use crate::domain::ports::IssueTracker;
use crate::infrastructure::github::{GitHubClient, GitHubClientConfig};
use crate::services::{ReconcileSettings, Reconciler, WebhookGate};

impl AppState {
    /// Assemble server state, resolving the token's login via the tracker
    pub async fn from_config(config: &Config, tracker: Arc<dyn IssueTracker>) -> Result<Self> {
        let rules = RuleSet::from_config(config).context("Failed to compile assignment rules")?;

        let login = tracker
            .current_login()
            .await
            .context("Failed to resolve the GitHub login for the configured token")?;

        let settings = ReconcileSettings {
            strategy: config.strategy,
            dry_run: config.dry_run,
        };
        let reconciler = Arc::new(Reconciler::new(tracker, Arc::new(rules), settings));
        let gate = WebhookGate::new(config.github.secret.clone());
        let status = ServiceStatus::new(login, &reconciler, &gate);

        Ok(Self {
            gate: Arc::new(gate),
            reconciler,
            status: Arc::new(status),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_status).post(handle_webhook))
        .with_state(state)
}

/// Start the webhook server and run until the listener fails
pub async fn start_server(config: Config) -> Result<()> {
    info!("Starting ghia webhook server");

    let client = GitHubClient::with_config(GitHubClientConfig::from(&config.github))?;
    let state = AppState::from_config(&config, Arc::new(client)).await?;
    info!(login = %state.status.login, "authenticated against GitHub");

    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Webhook server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
