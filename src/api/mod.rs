//! HTTP API layer
//!
//! - Request/response types
//! - Axum handlers
//! - Server setup and routing

pub mod handlers;
pub mod server;
pub mod types;
