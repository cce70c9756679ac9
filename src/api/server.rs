use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use crate::manager::WalletManager;

/// Build the wallet API router. Split out from [`start_server`] so tests can
/// serve it on an ephemeral port.
pub fn create_router(manager: Arc<WalletManager>) -> Router {
    Router::new()
        // Wallet lifecycle
        .route("/api/wallet/create", post(handlers::create_wallet_handler))
        .route("/api/wallet/import", post(handlers::import_wallet_handler))
        .route(
            "/api/wallet",
            get(handlers::get_wallet_handler).delete(handlers::clear_wallet_handler),
        )
        // Accounts
        .route(
            "/api/wallet/accounts",
            get(handlers::list_accounts_handler).post(handlers::add_account_handler),
        )
        .route(
            "/api/wallet/switch",
            post(handlers::switch_account_handler),
        )
        .route(
            "/api/wallet/account",
            get(handlers::current_account_handler),
        )
        // On-chain account data
        .route(
            "/api/account/:address/balance",
            get(handlers::get_balance_handler),
        )
        .route(
            "/api/account/:address/transactions",
            get(handlers::get_transactions_handler),
        )
        .route(
            "/api/account/:address/fund",
            post(handlers::fund_account_handler),
        )
        // UPI directory
        .route("/api/upi/register", post(handlers::register_upi_handler))
        .route(
            "/api/upi/resolve/:upi_id",
            get(handlers::resolve_upi_handler),
        )
        .route(
            "/api/upi/by-address/:address",
            get(handlers::upi_by_address_handler),
        )
        .route("/api/upi/search", get(handlers::search_upi_handler))
        .route("/api/upi", get(handlers::list_upi_handler))
        .route("/api/upi/:upi_id", delete(handlers::remove_upi_handler))
        // Rewards
        .route(
            "/api/rewards/:address/transaction",
            post(handlers::record_transaction_handler),
        )
        .route(
            "/api/rewards/:address",
            get(handlers::rewards_summary_handler),
        )
        .route(
            "/api/rewards/:address/offers/:offer_id/redeem",
            post(handlers::redeem_offer_handler),
        )
        // Market data
        .route("/api/market/price", get(handlers::market_price_handler))
        .route(
            "/api/market/sentiment",
            get(handlers::market_sentiment_handler),
        )
        // Health check
        .route("/health", get(handlers::health_handler))
        .with_state(manager)
}

pub async fn start_server(addr: &str) -> anyhow::Result<()> {
    let wallet_manager = Arc::new(WalletManager::new());

    // Configure CORS based on environment
    // Set ALLOWED_ORIGINS="https://your-app.vercel.app" for production
    // If not set, allows any origin (development mode)
    let cors = match std::env::var("ALLOWED_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            log::info!("CORS configured for origins: {}", origins);
            let origin_list: Vec<_> = origins
                .split(',')
                .map(|s| s.trim().parse().expect("Invalid CORS origin"))
                .collect();
            CorsLayer::new()
                .allow_origin(origin_list)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        _ => {
            log::warn!("CORS: Allowing all origins (development mode). Set ALLOWED_ORIGINS env var for production.");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let app = create_router(wallet_manager).layer(cors);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            log::info!("Received SIGTERM signal");
        },
    }

    log::info!("Shutdown signal received, exiting gracefully...");
}
