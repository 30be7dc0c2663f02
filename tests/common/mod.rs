//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files. Every test talks to a `mockito` server standing in for the
//! GitHub REST API.

#![allow(dead_code)]

use ghia::{Config, GitHubClient, GitHubClientConfig, RuleSet};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const TOKEN: &str = "test-token";
pub const AUTH_HEADER: &str = "token test-token";

/// Client pointed at the mock server
pub fn client(server_url: &str) -> GitHubClient {
    GitHubClient::with_config(GitHubClientConfig {
        token: TOKEN.to_string(),
        api_url: server_url.to_string(),
        timeout_secs: 5,
    })
    .expect("Failed to create client")
}

/// Issue as the REST API serializes it, with URLs on the mock server
pub fn issue_json(
    server_url: &str,
    number: u64,
    title: &str,
    assignees: &[&str],
    labels: &[&str],
) -> Value {
    json!({
        "number": number,
        "state": "open",
        "title": title,
        "body": null,
        "labels": labels.iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
        "assignees": assignees.iter().map(|login| json!({ "login": login })).collect::<Vec<_>>(),
        "url": format!("{server_url}/repos/octo/hello/issues/{number}"),
        "html_url": format!("https://github.com/octo/hello/issues/{number}"),
        "repository_url": format!("{server_url}/repos/octo/hello"),
        "comments": 0,
    })
}

pub fn closed_issue_json(server_url: &str, number: u64, title: &str) -> Value {
    let mut issue = issue_json(server_url, number, title, &[], &[]);
    issue["state"] = json!("closed");
    issue
}

/// Configuration with a token and the given `user -> [selector:pattern]` rules
pub fn config_with_rules(rules: &[(&str, &[&str])]) -> Config {
    let mut config = Config::default();
    config.github.token = TOKEN.to_string();
    config.patterns = rules
        .iter()
        .map(|(user, lines)| {
            (
                (*user).to_string(),
                lines.iter().map(ToString::to_string).collect(),
            )
        })
        .collect::<BTreeMap<_, _>>();
    config
}

pub fn rule_set(config: &Config) -> RuleSet {
    RuleSet::from_config(config).expect("rules compile")
}

/// `Link` header for page `page` of `last`, GitHub style
pub fn link_header(server_url: &str, page: u32, last: u32) -> String {
    let url = |n: u32| format!("{server_url}/repositories/1/issues?page={n}");
    let mut links = Vec::new();
    if page > 1 {
        links.push(format!("<{}>; rel=\"prev\"", url(page - 1)));
    }
    if page < last {
        links.push(format!("<{}>; rel=\"next\"", url(page + 1)));
        links.push(format!("<{}>; rel=\"last\"", url(last)));
    }
    if page > 1 {
        links.push(format!("<{}>; rel=\"first\"", url(1)));
    }
    links.join(", ")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
