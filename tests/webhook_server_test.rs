//! Integration tests for the webhook HTTP server
//!
//! Drives the axum router with `tower::ServiceExt::oneshot`; GitHub itself
//! (login lookup and issue writes) is a mock server.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{config_with_rules, issue_json, AUTH_HEADER};
use ghia::domain::models::FallbackConfig;
use ghia::infrastructure::webhook::{router, AppState};
use ghia::services::webhook_gate::{sign, SignatureAlgorithm};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const SECRET: &str = "webhook-secret";

async fn mock_login(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/user")
        .match_header("authorization", AUTH_HEADER)
        .with_status(200)
        .with_body(r#"{"login":"ghia-bot"}"#)
        .create_async()
        .await
}

async fn app(server: &mut ServerGuard, secret: Option<&str>) -> (Router, Mock) {
    let login = mock_login(server).await;

    let mut config = config_with_rules(&[("alice", &["title:bug", "label:network"])]);
    config.github.secret = secret.map(ToString::to_string);
    config.fallback = Some(FallbackConfig {
        label: "needs-triage".to_string(),
    });

    let tracker = Arc::new(common::client(&server.url()));
    let state = AppState::from_config(&config, tracker)
        .await
        .expect("state builds");
    (router(state), login)
}

fn delivery(event: &str, body: &str, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("x-github-event", event);
    if let Some(signature) = signature {
        builder = builder.header("x-hub-signature-256", signature);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn signed(body: &str) -> Option<String> {
    sign(SECRET.as_bytes(), body.as_bytes(), SignatureAlgorithm::Sha256)
        .map(|digest| format!("sha256={digest}"))
}

fn issues_event(server_url: &str, action: &str, title: &str) -> String {
    json!({
        "action": action,
        "issue": issue_json(server_url, 1, title, &[], &[]),
        "repository": { "full_name": "octo/hello" },
    })
    .to_string()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

#[tokio::test]
async fn test_status_document() {
    let mut server = Server::new_async().await;
    let (app, _login) = app(&mut server, Some(SECRET)).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::OK);
    let status = json_body(response).await;
    assert_eq!(status["name"], "ghia");
    assert_eq!(status["login"], "ghia-bot");
    assert_eq!(status["strategy"], "append");
    assert_eq!(status["dry_run"], false);
    assert_eq!(status["secret_configured"], true);
    assert_eq!(status["fallback_label"], "needs-triage");
    assert_eq!(status["rules"]["alice"], json!(["title:bug", "label:network"]));
}

#[tokio::test]
async fn test_startup_fails_when_login_lookup_fails() {
    let mut server = Server::new_async().await;
    let _login = server
        .mock("GET", "/user")
        .with_status(401)
        .with_body(r#"{"message":"Bad credentials"}"#)
        .create_async()
        .await;

    let config = config_with_rules(&[("alice", &["title:bug"])]);
    let tracker = Arc::new(common::client(&server.url()));

    assert!(AppState::from_config(&config, tracker).await.is_err());
}

#[tokio::test]
async fn test_missing_signature_is_forbidden() {
    let mut server = Server::new_async().await;
    let (app, _login) = app(&mut server, Some(SECRET)).await;

    let response = app
        .oneshot(delivery("ping", "{}", None))
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bad_signature_is_forbidden() {
    let mut server = Server::new_async().await;
    let (app, _login) = app(&mut server, Some(SECRET)).await;

    let response = app
        .oneshot(delivery("ping", "{}", signed("{ }")))
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signed_ping_is_ok() {
    let mut server = Server::new_async().await;
    let (app, _login) = app(&mut server, Some(SECRET)).await;

    let response = app
        .oneshot(delivery("ping", "{}", signed("{}")))
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unsigned_ping_without_secret_is_ok() {
    let mut server = Server::new_async().await;
    let (app, _login) = app(&mut server, None).await;

    let response = app
        .oneshot(delivery("ping", "{}", None))
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_event_is_not_found() {
    let mut server = Server::new_async().await;
    let (app, _login) = app(&mut server, None).await;

    let response = app
        .oneshot(delivery("push", "{}", None))
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_payload_is_bad_request() {
    let mut server = Server::new_async().await;
    let (app, _login) = app(&mut server, None).await;

    let response = app
        .oneshot(delivery("issues", "not json", None))
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_uninteresting_action_is_ignored() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let patch = server
        .mock("PATCH", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let (app, _login) = app(&mut server, None).await;

    let response = app
        .oneshot(delivery("issues", &issues_event(&url, "closed", "bug"), None))
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::OK);
    patch.assert_async().await;
}

#[tokio::test]
async fn test_opened_issue_is_reconciled() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let patch = server
        .mock("PATCH", "/repos/octo/hello/issues/1")
        .match_body(Matcher::Json(json!({ "assignees": ["alice"] })))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    let (app, _login) = app(&mut server, Some(SECRET)).await;

    let body = issues_event(&url, "opened", "Crash: bug in resolver");
    let response = app
        .oneshot(delivery("issues", &body, signed(&body)))
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::OK);
    patch.assert_async().await;
    let reply = json_body(response).await;
    assert_eq!(reply["result"]["outcome"], "reassigned");
}

#[tokio::test]
async fn test_failed_reconciliation_is_bad_request() {
    let mut server = Server::new_async().await;
    let url = server.url();
    let _patch = server
        .mock("PATCH", "/repos/octo/hello/issues/1")
        .with_status(500)
        .create_async()
        .await;
    let (app, _login) = app(&mut server, None).await;

    let response = app
        .oneshot(delivery("issues", &issues_event(&url, "edited", "bug"), None))
        .await
        .expect("request served");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let reply = json_body(response).await;
    assert_eq!(reply["status"], "failed");
    assert_eq!(reply["result"]["outcome"], "write_failed");
}
