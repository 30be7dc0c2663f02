//! Webhook HTTP surface (axum)

pub mod handlers;
pub mod server;

pub use handlers::{AppState, ServiceStatus};
pub use server::{router, start_server};
