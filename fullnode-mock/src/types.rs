/// Aptos fullnode API response types
///
/// These types match the fullnode v1 REST format so clients can consume them
/// transparently.

use serde::{Deserialize, Serialize};

/// Ledger state from GET /v1
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerInfoResponse {
    pub chain_id: u8,
    pub epoch: String,
    pub ledger_version: String,
    pub oldest_ledger_version: String,
    pub ledger_timestamp: String,
    pub node_role: String,
    pub block_height: String,
    pub oldest_block_height: String,
}

/// Account record from GET /v1/accounts/{address}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub sequence_number: String,
    pub authentication_key: String,
}

/// Move resource from GET /v1/accounts/{address}/resource/{resource_type}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceResponse {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: serde_json::Value,
}

/// One committed transaction, in the node's wire shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub version: String,
    pub hash: String,
    pub success: bool,
    pub vm_status: String,
    pub sender: String,
    pub gas_used: String,
    pub timestamp: String,
    pub payload: serde_json::Value,
}

/// Error body in the node's format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeErrorResponse {
    pub message: String,
    pub error_code: String,
}
