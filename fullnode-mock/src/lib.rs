/// Aptos Fullnode Mock Server Library
///
/// This crate provides both a standalone binary and library components
/// for mocking the Aptos fullnode v1 REST API with an in-memory ledger.

pub mod handlers;
pub mod ledger;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use ledger::MockLedger;
pub use server::{create_router, run_server};
pub use types::*;
