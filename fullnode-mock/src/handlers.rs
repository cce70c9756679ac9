/// Axum HTTP handlers for the fullnode mock endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::ledger::{MockLedger, APT_COIN_STORE};
use crate::types::*;

/// Shared application state
pub type AppState = Arc<Mutex<MockLedger>>;

/// Custom error type for handlers
pub enum ApiError {
    NotFound {
        error_code: &'static str,
        message: String,
    },
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound {
                error_code,
                message,
            } => (StatusCode::NOT_FOUND, error_code, message),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "invalid_input", message),
        };

        let body = NodeErrorResponse {
            message,
            error_code: error_code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn account_not_found(address: &str) -> ApiError {
    ApiError::NotFound {
        error_code: "account_not_found",
        message: format!("Account not found by Address({})", address),
    }
}

/// GET /v1
/// Returns the current ledger state
pub async fn get_ledger_info(State(ledger): State<AppState>) -> Json<LedgerInfoResponse> {
    let ledger = ledger.lock().expect("ledger mutex poisoned");
    Json(ledger.ledger_info())
}

/// GET /v1/accounts/{address}
/// Returns the on-chain account record
pub async fn get_account(
    State(ledger): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let ledger = ledger.lock().expect("ledger mutex poisoned");
    let account = ledger
        .account(&address)
        .ok_or_else(|| account_not_found(&address))?;
    Ok(Json(account))
}

/// GET /v1/accounts/{address}/resource/{resource_type}
/// Returns a single Move resource; only the APT CoinStore is modelled
pub async fn get_account_resource(
    State(ledger): State<AppState>,
    Path((address, resource_type)): Path<(String, String)>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let ledger = ledger.lock().expect("ledger mutex poisoned");

    let balance = ledger
        .balance(&address)
        .ok_or_else(|| account_not_found(&address))?;

    if resource_type != APT_COIN_STORE {
        return Err(ApiError::NotFound {
            error_code: "resource_not_found",
            message: format!("Resource not found: {}", resource_type),
        });
    }

    Ok(Json(ResourceResponse {
        resource_type,
        data: serde_json::json!({
            "coin": { "value": balance.to_string() },
            "frozen": false,
        }),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page_limit")]
    pub limit: usize,
    #[serde(default)]
    pub start: Option<u64>,
}

fn default_page_limit() -> usize {
    25
}

/// GET /v1/accounts/{address}/transactions
/// Returns the account's recorded transactions
pub async fn get_account_transactions(
    State(ledger): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<TransactionRecord>>, ApiError> {
    let ledger = ledger.lock().expect("ledger mutex poisoned");
    let transactions = ledger
        .transactions(&address, query.limit, query.start)
        .ok_or_else(|| account_not_found(&address))?;
    Ok(Json(transactions))
}

// ============================================================================
// FAUCET + TEST HELPER ENDPOINTS (not part of the fullnode API)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct MintQuery {
    pub amount: u64,
    pub address: String,
}

/// POST /mint
/// Faucet-style funding; returns the committed transaction hashes
pub async fn mint(
    State(ledger): State<AppState>,
    Query(query): Query<MintQuery>,
) -> Json<Vec<String>> {
    let mut ledger = ledger.lock().expect("ledger mutex poisoned");
    let record = ledger.fund(&query.address, query.amount);

    log::info!(
        "Minted {} octas to {} (version {})",
        query.amount,
        query.address,
        record.version
    );
    Json(vec![record.hash])
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: u64,
}

/// POST /mock/transfer
/// Move octas between accounts (helper endpoint for testing)
pub async fn mock_transfer(
    State(ledger): State<AppState>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<TransactionRecord>, ApiError> {
    let mut ledger = ledger.lock().expect("ledger mutex poisoned");
    let record = ledger
        .transfer(&req.from, &req.to, req.amount)
        .map_err(ApiError::BadRequest)?;
    Ok(Json(record))
}

/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
