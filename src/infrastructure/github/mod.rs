//! GitHub REST API adapter
//!
//! - `client`: reqwest-based implementation of the `IssueTracker` port
//! - `links`: `Link` header pagination parsing

pub mod client;
pub mod links;

pub use client::{GitHubClient, GitHubClientConfig};
pub use links::parse_link_header;
