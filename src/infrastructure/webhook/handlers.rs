use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::{RuleSet, Strategy};
use crate::services::{Reconciler, Rejection, Verdict, WebhookGate, WebhookRequest};

pub const EVENT_HEADER: &str = "x-github-event";
pub const SIGNATURE_256_HEADER: &str = "x-hub-signature-256";
pub const SIGNATURE_HEADER: &str = "x-hub-signature";

/// Document served on `GET /`
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub name: &'static str,
    pub version: &'static str,
    pub login: String,
    pub strategy: Strategy,
    pub dry_run: bool,
    pub fallback_label: Option<String>,
    pub secret_configured: bool,
    pub rules: BTreeMap<String, Vec<String>>,
}

impl ServiceStatus {
    pub fn new(login: impl Into<String>, reconciler: &Reconciler, gate: &WebhookGate) -> Self {
        let settings = reconciler.settings();
        let rules = reconciler.rules();
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            login: login.into(),
            strategy: settings.strategy,
            dry_run: settings.dry_run,
            fallback_label: rules.fallback_label().map(ToString::to_string),
            secret_configured: gate.verifies_signatures(),
            rules: rule_lines(rules),
        }
    }
}

fn rule_lines(rules: &RuleSet) -> BTreeMap<String, Vec<String>> {
    rules
        .users()
        .map(|(user, rules)| (user.to_string(), rules.iter().map(|r| r.line()).collect()))
        .collect()
}

/// Application state for the webhook server
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<WebhookGate>,
    pub reconciler: Arc<Reconciler>,
    pub status: Arc<ServiceStatus>,
}

pub async fn handle_status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(state.status.as_ref().clone())
}

pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let request = WebhookRequest {
        event: header(EVENT_HEADER),
        signature: header(SIGNATURE_256_HEADER).or_else(|| header(SIGNATURE_HEADER)),
        body: &body,
    };

    let issue = match state.gate.admit(&request) {
        Verdict::Rejected(rejection) => {
            let (status, message) = rejection_response(rejection);
            return (status, Json(json!({ "error": message }))).into_response();
        }
        Verdict::Ignored => {
            return (StatusCode::OK, Json(json!({ "status": "ignored" }))).into_response();
        }
        Verdict::Admit(issue) => issue,
    };

    let result = state.reconciler.reconcile(&issue).await;
    if result.ok() {
        info!(issue = %issue.reference(), outcome = ?result.outcome, "webhook issue reconciled");
        (StatusCode::OK, Json(json!({ "status": "ok", "result": result }))).into_response()
    } else {
        warn!(issue = %issue.reference(), "webhook issue reconciliation failed");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "status": "failed", "result": result })),
        )
            .into_response()
    }
}

const fn rejection_response(rejection: Rejection) -> (StatusCode, &'static str) {
    match rejection {
        Rejection::Forbidden => (StatusCode::FORBIDDEN, "invalid or missing signature"),
        Rejection::UnknownEvent => (StatusCode::NOT_FOUND, "unsupported event"),
        Rejection::MalformedPayload => (StatusCode::BAD_REQUEST, "malformed payload"),
    }
}
