/// In-memory ledger state backing the mock endpoints

use serde_json::json;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::{AccountResponse, LedgerInfoResponse, TransactionRecord};

/// Devnet chain id
pub const CHAIN_ID: u8 = 4;

/// Resource type holding an account's APT balance
pub const APT_COIN_STORE: &str = "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>";

/// Pretend faucet account that signs mint transactions
const FAUCET_ADDRESS: &str = "0x000000000000000000000000000000000000000000000000000000000a550c18";

#[derive(Debug, Default)]
struct AccountState {
    balance: u64,
    sequence_number: u64,
    transactions: Vec<TransactionRecord>,
}

/// Mutable chain state. Each mint or transfer commits one transaction,
/// bumping the ledger version and block height.
#[derive(Debug, Default)]
pub struct MockLedger {
    accounts: HashMap<String, AccountState>,
    ledger_version: u64,
    block_height: u64,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger_info(&self) -> LedgerInfoResponse {
        LedgerInfoResponse {
            chain_id: CHAIN_ID,
            epoch: "2".to_string(),
            ledger_version: self.ledger_version.to_string(),
            oldest_ledger_version: "0".to_string(),
            ledger_timestamp: timestamp_micros(),
            node_role: "full_node".to_string(),
            block_height: self.block_height.to_string(),
            oldest_block_height: "0".to_string(),
        }
    }

    pub fn account(&self, address: &str) -> Option<AccountResponse> {
        let address = canonical_address(address);
        self.accounts.get(&address).map(|state| AccountResponse {
            sequence_number: state.sequence_number.to_string(),
            // Fresh accounts keep authentication key == address
            authentication_key: address.clone(),
        })
    }

    pub fn balance(&self, address: &str) -> Option<u64> {
        self.accounts
            .get(&canonical_address(address))
            .map(|state| state.balance)
    }

    /// Recorded history for an account. `start` indexes into the recorded
    /// list; the real node pages by sequence number.
    pub fn transactions(
        &self,
        address: &str,
        limit: usize,
        start: Option<u64>,
    ) -> Option<Vec<TransactionRecord>> {
        let state = self.accounts.get(&canonical_address(address))?;
        let start = start.unwrap_or(0) as usize;
        Some(
            state
                .transactions
                .iter()
                .skip(start)
                .take(limit)
                .cloned()
                .collect(),
        )
    }

    /// Credit an address from the faucet, creating the account on first
    /// funding. Returns the committed transaction.
    pub fn fund(&mut self, address: &str, amount: u64) -> TransactionRecord {
        let address = canonical_address(address);
        let version = self.commit();

        let record = TransactionRecord {
            tx_type: "user_transaction".to_string(),
            version: version.to_string(),
            hash: txn_hash(version),
            success: true,
            vm_status: "Executed successfully".to_string(),
            sender: FAUCET_ADDRESS.to_string(),
            gas_used: "0".to_string(),
            timestamp: timestamp_micros(),
            payload: json!({
                "type": "entry_function_payload",
                "function": "0x1::aptos_account::transfer",
                "arguments": [address, amount.to_string()],
            }),
        };

        let state = self.accounts.entry(address).or_default();
        state.balance += amount;
        state.transactions.push(record.clone());

        record
    }

    /// Move octas between accounts, recording the transaction in both
    /// histories.
    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: u64,
    ) -> Result<TransactionRecord, String> {
        let from = canonical_address(from);
        let to = canonical_address(to);

        let sender = self
            .accounts
            .get_mut(&from)
            .ok_or_else(|| format!("Sender account {} not found", from))?;
        if sender.balance < amount {
            return Err(format!(
                "Insufficient balance: {} has {} octas, needs {}",
                from, sender.balance, amount
            ));
        }

        sender.balance -= amount;
        sender.sequence_number += 1;

        let version = self.commit();
        let record = TransactionRecord {
            tx_type: "user_transaction".to_string(),
            version: version.to_string(),
            hash: txn_hash(version),
            success: true,
            vm_status: "Executed successfully".to_string(),
            sender: from.clone(),
            gas_used: "4".to_string(),
            timestamp: timestamp_micros(),
            payload: json!({
                "type": "entry_function_payload",
                "function": "0x1::aptos_account::transfer",
                "arguments": [to, amount.to_string()],
            }),
        };

        if let Some(state) = self.accounts.get_mut(&from) {
            state.transactions.push(record.clone());
        }
        let recipient = self.accounts.entry(to).or_default();
        recipient.balance += amount;
        recipient.transactions.push(record.clone());

        Ok(record)
    }

    fn commit(&mut self) -> u64 {
        self.ledger_version += 1;
        self.block_height += 1;
        self.ledger_version
    }
}

/// Lowercase, strip any 0x prefix and left-pad to the 64-hex-char canonical
/// form. Inputs that are not plain hex pass through lowercased, and simply
/// never match an account.
fn canonical_address(address: &str) -> String {
    let trimmed = address.trim().to_lowercase();
    let body = trimmed.strip_prefix("0x").unwrap_or(&trimmed);

    if body.len() <= 64 && body.chars().all(|c| c.is_ascii_hexdigit()) {
        format!("0x{:0>64}", body)
    } else {
        trimmed
    }
}

fn txn_hash(version: u64) -> String {
    let mut bytes = [0u8; 32];
    bytes[24..].copy_from_slice(&version.to_be_bytes());
    format!("0x{}", hex::encode(bytes))
}

fn timestamp_micros() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
