//! Integration tests for batch runs over several repositories
//!
//! A repository that cannot be listed is reported and skipped; the others
//! are still processed, sequentially or concurrently.

mod common;

use common::{client, closed_issue_json, config_with_rules, issue_json, rule_set};
use ghia::services::BatchEvent;
use ghia::{BatchRunner, FetchMode, IssueFetcher, ReconcileSettings, Reconciler, RepoSlug, Strategy};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

async fn run(mode: FetchMode) {
    common::setup_test_logging();
    let mut server = Server::new_async().await;
    let url = server.url();

    let _issues = server
        .mock("GET", "/repos/octo/hello/issues")
        .with_status(200)
        .with_body(
            json!([
                issue_json(&url, 1, "bug in parser", &[], &[]),
                issue_json(&url, 2, "docs", &[], &[]),
                closed_issue_json(&url, 3, "bug, closed"),
            ])
            .to_string(),
        )
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/repos/octo/missing/issues")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/repos/octo/hello/issues/1")
        .match_body(Matcher::Json(json!({ "assignees": ["alice"] })))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let config = config_with_rules(&[("alice", &["title:bug"])]);
    let tracker = Arc::new(client(&url));
    let reconciler = Arc::new(Reconciler::new(
        tracker.clone(),
        Arc::new(rule_set(&config)),
        ReconcileSettings {
            strategy: Strategy::Append,
            dry_run: false,
        },
    ));
    let runner = BatchRunner::new(IssueFetcher::new(tracker, mode), reconciler);

    let repos: Vec<RepoSlug> = ["octo/missing", "octo/hello"]
        .iter()
        .map(|slug| slug.parse().expect("valid slug"))
        .collect();

    let mut processed = Vec::new();
    let mut failed_repos = Vec::new();
    let summary = runner
        .run(&repos, |event| match event {
            BatchEvent::Issue(report) => processed.push(report.result.number),
            BatchEvent::RepoFailed(err) => failed_repos.push(err.repo().to_string()),
        })
        .await;

    patch.assert_async().await;
    processed.sort_unstable();
    assert_eq!(processed, vec![1, 2], "closed issue is skipped");
    assert_eq!(failed_repos, vec!["octo/missing"]);
    assert_eq!(summary.repositories, 2);
    assert_eq!(summary.repositories_failed, 1);
    assert_eq!(summary.issues_processed, 2);
    assert_eq!(summary.issues_failed, 0);
    assert!(!summary.success());
}

#[tokio::test]
async fn test_sequential_batch_continues_after_failed_repository() {
    run(FetchMode::Sequential).await;
}

#[tokio::test]
async fn test_concurrent_batch_continues_after_failed_repository() {
    run(FetchMode::Concurrent { max_in_flight: 4 }).await;
}
