use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Wallet already exists")]
    WalletExists,

    #[error("No wallet found")]
    WalletNotFound,

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("UPI handle not found: {0}")]
    UpiNotFound(String),

    #[error("UPI handle already registered: {0}")]
    UpiConflict(String),

    #[error("Offer not found: {0}")]
    OfferNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Node API error: {0}")]
    Node(String),

    #[error("Faucet error: {0}")]
    Faucet(String),

    #[error("Market data error: {0}")]
    Market(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            WalletError::WalletExists => (StatusCode::CONFLICT, self.to_string()),
            WalletError::UpiConflict(_) => (StatusCode::CONFLICT, self.to_string()),
            WalletError::WalletNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            WalletError::UpiNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            WalletError::OfferNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            WalletError::InvalidMnemonic(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            WalletError::Node(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            WalletError::Faucet(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            WalletError::Market(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            WalletError::Network(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
