use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::types::*;
use crate::aptos::TransactionEntry;
use crate::manager::WalletManager;
use crate::market::{AptPrice, MarketSentiment};
use crate::rewards::{RewardOutcome, RewardsSummary};
use crate::storage::{OfferNft, UpiMapping};

// ============================================================================
// Wallet Lifecycle
// ============================================================================

pub async fn create_wallet_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<WalletCreatedResponse>, crate::error::WalletError> {
    let created = manager.create_wallet()?;
    Ok(Json(created))
}

pub async fn import_wallet_handler(
    State(manager): State<Arc<WalletManager>>,
    Json(req): Json<ImportWalletRequest>,
) -> Result<Json<WalletCreatedResponse>, crate::error::WalletError> {
    let created = manager.import_wallet(&req.seed_phrase)?;
    Ok(Json(created))
}

pub async fn get_wallet_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<WalletSummary>, crate::error::WalletError> {
    let summary = manager.wallet_summary()?;
    Ok(Json(summary))
}

pub async fn clear_wallet_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<ClearWalletResponse>, crate::error::WalletError> {
    manager.clear_wallet()?;

    Ok(Json(ClearWalletResponse {
        status: "cleared".to_string(),
    }))
}

// ============================================================================
// Account Management
// ============================================================================

pub async fn add_account_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<AccountSummary>, crate::error::WalletError> {
    let account = manager.add_account()?;
    Ok(Json(account))
}

pub async fn list_accounts_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<Vec<AccountSummary>>, crate::error::WalletError> {
    let accounts = manager.list_accounts()?;
    Ok(Json(accounts))
}

pub async fn switch_account_handler(
    State(manager): State<Arc<WalletManager>>,
    Json(req): Json<SwitchAccountRequest>,
) -> Result<Json<AccountSummary>, crate::error::WalletError> {
    let account = manager.switch_account(req.account_index)?;
    Ok(Json(account))
}

pub async fn current_account_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<AccountSummary>, crate::error::WalletError> {
    let account = manager.current_account()?;
    Ok(Json(account))
}

// ============================================================================
// On-Chain Account Data
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_limit")]
    pub limit: u32,
    #[serde(default)]
    pub start: Option<u64>,
}

fn default_history_limit() -> u32 {
    25
}

pub async fn get_balance_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Result<Json<BalanceResponse>, crate::error::WalletError> {
    let balance = manager.get_balance(&address).await?;
    Ok(Json(balance))
}

pub async fn get_transactions_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<TransactionEntry>>, crate::error::WalletError> {
    let transactions = manager
        .get_transaction_history(&address, query.limit, query.start)
        .await?;
    Ok(Json(transactions))
}

pub async fn fund_account_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
    body: Option<Json<FundRequest>>,
) -> Result<Json<FundResponse>, crate::error::WalletError> {
    // Funding amount is optional; no body at all is also fine
    let amount_octas = body.and_then(|Json(req)| req.amount_octas);

    let funded = manager.fund_account(&address, amount_octas).await?;
    Ok(Json(funded))
}

// ============================================================================
// UPI Directory
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn register_upi_handler(
    State(manager): State<Arc<WalletManager>>,
    Json(req): Json<RegisterUpiRequest>,
) -> Result<Json<UpiMapping>, crate::error::WalletError> {
    let mapping = manager.register_upi(&req.upi_id, &req.address)?;
    Ok(Json(mapping))
}

pub async fn resolve_upi_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(upi_id): Path<String>,
) -> Result<Json<UpiMapping>, crate::error::WalletError> {
    let mapping = manager.resolve_upi(&upi_id)?;
    Ok(Json(mapping))
}

pub async fn upi_by_address_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Result<Json<Option<UpiMapping>>, crate::error::WalletError> {
    let mapping = manager.upi_for_address(&address)?;
    Ok(Json(mapping))
}

pub async fn search_upi_handler(
    State(manager): State<Arc<WalletManager>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UpiMapping>>, crate::error::WalletError> {
    let matches = manager.search_upi(&query.q)?;
    Ok(Json(matches))
}

pub async fn list_upi_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<Vec<UpiMapping>>, crate::error::WalletError> {
    let mappings = manager.list_upi()?;
    Ok(Json(mappings))
}

pub async fn remove_upi_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(upi_id): Path<String>,
) -> Result<Json<RemoveUpiResponse>, crate::error::WalletError> {
    manager.remove_upi(&upi_id)?;

    Ok(Json(RemoveUpiResponse {
        upi_id,
        status: "removed".to_string(),
    }))
}

// ============================================================================
// Rewards
// ============================================================================

pub async fn record_transaction_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Result<Json<RewardOutcome>, crate::error::WalletError> {
    let outcome = manager.record_reward_transaction(&address)?;
    Ok(Json(outcome))
}

pub async fn rewards_summary_handler(
    State(manager): State<Arc<WalletManager>>,
    Path(address): Path<String>,
) -> Result<Json<RewardsSummary>, crate::error::WalletError> {
    let summary = manager.rewards_summary(&address)?;
    Ok(Json(summary))
}

pub async fn redeem_offer_handler(
    State(manager): State<Arc<WalletManager>>,
    Path((address, offer_id)): Path<(String, String)>,
) -> Result<Json<OfferNft>, crate::error::WalletError> {
    let offer = manager.redeem_offer(&address, &offer_id)?;
    Ok(Json(offer))
}

// ============================================================================
// Market Data
// ============================================================================

pub async fn market_price_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<AptPrice>, crate::error::WalletError> {
    let price = manager.apt_price().await?;
    Ok(Json(price))
}

pub async fn market_sentiment_handler(
    State(manager): State<Arc<WalletManager>>,
) -> Result<Json<MarketSentiment>, crate::error::WalletError> {
    let sentiment = manager.market_sentiment().await?;
    Ok(Json(sentiment))
}

// ============================================================================
// Health
// ============================================================================

pub async fn health_handler(State(manager): State<Arc<WalletManager>>) -> Json<HealthResponse> {
    Json(manager.node_health().await)
}
