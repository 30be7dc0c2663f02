//! Infrastructure layer module
//!
//! This module contains all infrastructure adapters and external integrations:
//! - GitHub REST client
//! - Configuration management
//! - Logging infrastructure
//! - Webhook HTTP server
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod github;
pub mod logging;
pub mod webhook;
