use crate::api::types::*;
use crate::aptos::{normalize_address, octas_to_apt, FaucetClient, NodeClient, TransactionEntry};
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::market::{AptPrice, MarketClient, MarketSentiment};
use crate::rewards::{
    record_transaction, redeem_offer, rewards_summary, RewardOutcome, RewardsSummary,
};
/// Wallet Manager - Orchestration Layer
///
/// Coordinates all wallet operations by delegating to specialized operation
/// modules and the node/faucet/market clients.
use crate::storage::{OfferNft, Storage, UpiMapping};
use crate::upi;
use crate::wallet::{
    account_ops::{add_account, current_account, list_accounts, switch_account},
    wallet_ops::{clear_wallet, create_wallet, import_wallet, wallet_summary},
};
use std::sync::{Mutex, MutexGuard};

/// Default faucet grant: 1 APT.
const DEFAULT_FUND_OCTAS: u64 = 100_000_000;

pub struct WalletManager {
    pub config: WalletConfig,
    pub storage: Storage,
    node: NodeClient,
    faucet: Option<FaucetClient>,
    market: MarketClient,
    write_lock: Mutex<()>,
}

impl WalletManager {
    // ============================================================================
    // Constructors
    // ============================================================================

    pub fn new() -> Self {
        // Load configuration from environment
        let config = WalletConfig::from_env();
        let storage = Storage::new_with_base_dir(config.data_dir.clone());
        Self::build(config, storage)
    }

    /// Create WalletManager with custom storage (for testing)
    pub fn new_with_storage(storage: Storage) -> Self {
        // Load configuration from environment (allows test to set env vars)
        let config = WalletConfig::from_env();
        Self::build(config, storage)
    }

    /// Create WalletManager with explicit configuration (for testing against
    /// mock upstreams)
    pub fn new_with_config(config: WalletConfig, storage: Storage) -> Self {
        Self::build(config, storage)
    }

    fn build(config: WalletConfig, storage: Storage) -> Self {
        let node = NodeClient::new(&config.node_url);
        let faucet = config.faucet_url.as_deref().map(FaucetClient::new);

        Self {
            config,
            storage,
            node,
            faucet,
            market: MarketClient::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Storage documents are read-modify-write, so every operation that may
    /// write one holds this guard. Directory lookups take it too: loading the
    /// UPI directory can rewrite it (legacy migration, corrupt re-init).
    ///
    /// A poisoned lock is recovered; the rename-based writes keep documents
    /// whole even if a previous holder panicked.
    fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ============================================================================
    // Wallet Lifecycle (delegates to wallet_ops)
    // ============================================================================

    pub fn create_wallet(&self) -> Result<WalletCreatedResponse, WalletError> {
        let _write = self.write_guard();
        create_wallet(&self.storage)
    }

    pub fn import_wallet(&self, seed_phrase: &str) -> Result<WalletCreatedResponse, WalletError> {
        let _write = self.write_guard();
        import_wallet(&self.storage, seed_phrase)
    }

    pub fn wallet_summary(&self) -> Result<WalletSummary, WalletError> {
        wallet_summary(&self.storage, self.config.network.as_str())
    }

    pub fn clear_wallet(&self) -> Result<(), WalletError> {
        let _write = self.write_guard();
        clear_wallet(&self.storage)
    }

    // ============================================================================
    // Account Management (delegates to account_ops)
    // ============================================================================

    pub fn add_account(&self) -> Result<AccountSummary, WalletError> {
        let _write = self.write_guard();
        add_account(&self.storage)
    }

    pub fn list_accounts(&self) -> Result<Vec<AccountSummary>, WalletError> {
        list_accounts(&self.storage)
    }

    pub fn switch_account(&self, index: usize) -> Result<AccountSummary, WalletError> {
        let _write = self.write_guard();
        switch_account(&self.storage, index)
    }

    pub fn current_account(&self) -> Result<AccountSummary, WalletError> {
        current_account(&self.storage)
    }

    // ============================================================================
    // On-Chain Account Data (node + faucet)
    // ============================================================================

    pub async fn get_balance(&self, address: &str) -> Result<BalanceResponse, WalletError> {
        let address = normalize_address(address)?;
        let octas = self.node.get_coin_balance(&address).await?;

        Ok(BalanceResponse {
            address,
            octas,
            apt: octas_to_apt(octas),
            network: self.config.network.as_str().to_string(),
        })
    }

    /// Transaction history for an address. An unreachable or failing node
    /// degrades to an empty history instead of an error.
    pub async fn get_transaction_history(
        &self,
        address: &str,
        limit: u32,
        start: Option<u64>,
    ) -> Result<Vec<TransactionEntry>, WalletError> {
        let address = normalize_address(address)?;

        match self.node.get_transactions(&address, limit, start).await {
            Ok(transactions) => Ok(transactions),
            Err(e) => {
                log::warn!("Transaction history unavailable for {}: {}", address, e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn fund_account(
        &self,
        address: &str,
        amount_octas: Option<u64>,
    ) -> Result<FundResponse, WalletError> {
        let address = normalize_address(address)?;
        let amount_octas = amount_octas.unwrap_or(DEFAULT_FUND_OCTAS);

        let faucet = self.faucet.as_ref().ok_or_else(|| {
            WalletError::Faucet(format!(
                "No faucet available on {}",
                self.config.network.as_str()
            ))
        })?;

        let funded = faucet.fund_account(&address, amount_octas).await;
        Ok(FundResponse {
            address,
            amount_octas,
            funded,
        })
    }

    // ============================================================================
    // UPI Directory (delegates to upi)
    // ============================================================================

    pub fn register_upi(&self, upi_id: &str, address: &str) -> Result<UpiMapping, WalletError> {
        let _write = self.write_guard();
        upi::register(&self.storage, upi_id, address)
    }

    pub fn resolve_upi(&self, upi_id: &str) -> Result<UpiMapping, WalletError> {
        let _write = self.write_guard();
        upi::resolve(&self.storage, upi_id)
    }

    pub fn upi_for_address(&self, address: &str) -> Result<Option<UpiMapping>, WalletError> {
        let _write = self.write_guard();
        upi::lookup_by_address(&self.storage, address)
    }

    pub fn search_upi(&self, query: &str) -> Result<Vec<UpiMapping>, WalletError> {
        let _write = self.write_guard();
        upi::search(&self.storage, query)
    }

    pub fn list_upi(&self) -> Result<Vec<UpiMapping>, WalletError> {
        let _write = self.write_guard();
        upi::list(&self.storage)
    }

    pub fn remove_upi(&self, upi_id: &str) -> Result<(), WalletError> {
        let _write = self.write_guard();
        upi::remove(&self.storage, upi_id)
    }

    // ============================================================================
    // Rewards (delegates to rewards engine)
    // ============================================================================

    pub fn record_reward_transaction(&self, address: &str) -> Result<RewardOutcome, WalletError> {
        let _write = self.write_guard();
        record_transaction(&self.storage, address)
    }

    pub fn rewards_summary(&self, address: &str) -> Result<RewardsSummary, WalletError> {
        rewards_summary(&self.storage, address)
    }

    pub fn redeem_offer(&self, address: &str, offer_id: &str) -> Result<OfferNft, WalletError> {
        let _write = self.write_guard();
        redeem_offer(&self.storage, address, offer_id)
    }

    // ============================================================================
    // Market Data (delegates to market client)
    // ============================================================================

    pub async fn apt_price(&self) -> Result<AptPrice, WalletError> {
        self.market.apt_price().await
    }

    pub async fn market_sentiment(&self) -> Result<MarketSentiment, WalletError> {
        self.market.sentiment().await
    }

    // ============================================================================
    // Health
    // ============================================================================

    pub async fn node_health(&self) -> HealthResponse {
        let ledger = match self.node.get_ledger_info().await {
            Ok(info) => Some(info),
            Err(e) => {
                log::warn!("Fullnode unreachable: {}", e);
                None
            }
        };

        HealthResponse {
            status: "ok".to_string(),
            network: self.config.network.as_str().to_string(),
            node_reachable: ledger.is_some(),
            ledger,
        }
    }
}

impl Default for WalletManager {
    fn default() -> Self {
        Self::new()
    }
}
