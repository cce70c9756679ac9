use serde::{Deserialize, Serialize};

use crate::aptos::LedgerInfo;
use crate::storage::WalletAccount;

#[derive(Debug, Deserialize)]
pub struct ImportWalletRequest {
    pub seed_phrase: String,
}

#[derive(Debug, Deserialize)]
pub struct SwitchAccountRequest {
    pub account_index: usize,
}

/// Public view of a derived account. The private key never leaves storage.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub address: String,
    pub public_key: String,
    pub account_index: u32,
}

impl From<&WalletAccount> for AccountSummary {
    fn from(account: &WalletAccount) -> Self {
        Self {
            address: account.address.clone(),
            public_key: account.public_key.clone(),
            account_index: account.account_index,
        }
    }
}

/// Returned once, on create or import. The seed phrase is shown here and
/// nowhere else.
#[derive(Debug, Serialize)]
pub struct WalletCreatedResponse {
    pub seed_phrase: String,
    pub account: AccountSummary,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct WalletSummary {
    pub network: String,
    pub created_at: String,
    pub account_count: usize,
    pub current_account_index: usize,
    pub current_address: Option<String>,
    pub accounts: Vec<AccountSummary>,
}

#[derive(Debug, Serialize)]
pub struct ClearWalletResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub octas: u64,
    pub apt: f64,
    pub network: String,
}

#[derive(Debug, Deserialize)]
pub struct FundRequest {
    pub amount_octas: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct FundResponse {
    pub address: String,
    pub amount_octas: u64,
    pub funded: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterUpiRequest {
    pub upi_id: String,
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveUpiResponse {
    pub upi_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub network: String,
    pub node_reachable: bool,
    /// Ledger info from the fullnode, absent when it is unreachable.
    pub ledger: Option<LedgerInfo>,
}
