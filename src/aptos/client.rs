/// Aptos fullnode REST client
///
/// Thin wrapper over the node's v1 API: ledger info, account lookup,
/// CoinStore balance and per-account transaction history.
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::WalletError;

/// Resource type holding an account's APT balance.
pub const APT_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct NodeClient {
    client: reqwest::Client,
    base_url: String,
}

/// Ledger state from `GET /v1`. The node reports u64 counters as JSON
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u8,
    pub ledger_version: String,
    pub block_height: String,
    #[serde(default)]
    pub epoch: Option<String>,
    #[serde(default)]
    pub node_role: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub sequence_number: String,
    pub authentication_key: String,
}

/// One committed transaction as the node reports it. Fields beyond the
/// common core vary by transaction type, so they stay optional and the
/// payload passes through untyped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEntry {
    #[serde(rename = "type")]
    pub tx_type: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub vm_status: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl NodeClient {
    pub fn new(node_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: node_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ledger state of the connected fullnode
    pub async fn get_ledger_info(&self) -> Result<LedgerInfo, WalletError> {
        let url = format!("{}/v1", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Node(format!(
                "Ledger info request failed with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| WalletError::Node(e.to_string()))
    }

    /// On-chain account record, or None if the chain has never seen the
    /// address.
    pub async fn get_account(&self, address: &str) -> Result<Option<AccountInfo>, WalletError> {
        let url = format!("{}/v1/accounts/{}", self.base_url, address);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(WalletError::Node(format!(
                "Account request failed with status {}",
                response.status()
            )));
        }

        let info = response
            .json()
            .await
            .map_err(|e| WalletError::Node(e.to_string()))?;
        Ok(Some(info))
    }

    /// APT balance in octas. Accounts without a CoinStore resource (never
    /// funded, or not on chain at all) read as zero.
    pub async fn get_coin_balance(&self, address: &str) -> Result<u64, WalletError> {
        let url = format!(
            "{}/v1/accounts/{}/resource/{}",
            self.base_url, address, APT_COIN_STORE
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(0);
        }
        if !response.status().is_success() {
            return Err(WalletError::Node(format!(
                "Balance request failed with status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WalletError::Node(e.to_string()))?;

        let octas = body["data"]["coin"]["value"]
            .as_str()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        Ok(octas)
    }

    /// Committed transactions for an account, oldest first within the
    /// requested page. Unknown accounts have no history.
    pub async fn get_transactions(
        &self,
        address: &str,
        limit: u32,
        start: Option<u64>,
    ) -> Result<Vec<TransactionEntry>, WalletError> {
        let mut url = format!(
            "{}/v1/accounts/{}/transactions?limit={}",
            self.base_url, address, limit
        );
        if let Some(start) = start {
            url.push_str(&format!("&start={}", start));
        }

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(WalletError::Node(format!(
                "Transaction history request failed with status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| WalletError::Node(e.to_string()))
    }
}
