/// Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::{Arc, Mutex};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::ledger::MockLedger;

pub fn create_router(ledger: Arc<Mutex<MockLedger>>) -> Router {
    // Configure CORS to allow requests from wallet frontend/tests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Fullnode v1 endpoints
        .route("/v1", get(get_ledger_info))
        .route("/v1/accounts/:address", get(get_account))
        .route(
            "/v1/accounts/:address/resource/:resource_type",
            get(get_account_resource),
        )
        .route(
            "/v1/accounts/:address/transactions",
            get(get_account_transactions),
        )
        // Faucet endpoint
        .route("/mint", post(mint))
        // Test helper endpoints
        .route("/mock/transfer", post(mock_transfer))
        // Shared state
        .with_state(ledger)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(
    ledger: Arc<Mutex<MockLedger>>,
    host: String,
    port: u16,
) -> anyhow::Result<()> {
    let app = create_router(ledger);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Aptos fullnode mock listening on http://{}", addr);
    log::info!("💧 Faucet endpoint: POST /mint?amount=N&address=0x...");
    log::info!("🔁 Transfer helper: POST /mock/transfer");

    axum::serve(listener, app).await?;

    Ok(())
}
