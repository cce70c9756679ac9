//! Data models for wallet storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::rewards::LoyaltyTier;

/// Current schema version of the UPI directory document.
pub const UPI_DIRECTORY_VERSION: u32 = 1;

/// A single derived account. Immutable once created; removed only by a full
/// wallet wipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletAccount {
    pub address: String,
    pub public_key: String,
    pub private_key: String,
    pub account_index: u32,
}

/// The wallet document (`cryptal_wallet.json`). One per data directory.
///
/// Invariant: `current_account_index` indexes an existing element of
/// `accounts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredWallet {
    pub seed_phrase: String,
    pub accounts: Vec<WalletAccount>,
    pub current_account_index: usize,
    pub created_at: DateTime<Utc>,
}

impl StoredWallet {
    pub fn current_account(&self) -> Option<&WalletAccount> {
        self.accounts.get(self.current_account_index)
    }
}

/// A UPI handle → address mapping. Handles are unique across the directory,
/// compared case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpiMapping {
    pub upi_id: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

/// The versioned UPI directory document (`cryptal_global_upi_directory.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpiDirectoryDoc {
    pub version: u32,
    pub mappings: Vec<UpiMapping>,
}

impl Default for UpiDirectoryDoc {
    fn default() -> Self {
        Self {
            version: UPI_DIRECTORY_VERSION,
            mappings: Vec::new(),
        }
    }
}

/// On-disk shape of the UPI directory: either the versioned document or the
/// legacy bare array it migrated from.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StoredUpiDirectory {
    Versioned(UpiDirectoryDoc),
    Legacy(Vec<UpiMapping>),
}

/// Per-address reward counters (`user_stats_<address>.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub address: String,
    pub transaction_count: u64,
    pub loyalty_nfts_minted: Vec<LoyaltyTier>,
    pub updated_at: DateTime<Utc>,
}

impl UserStats {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            transaction_count: 0,
            loyalty_nfts_minted: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

/// A minted loyalty record (`loyalty_nfts_<address>.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyNft {
    pub id: String,
    pub address: String,
    pub tier: LoyaltyTier,
    pub transaction_count_at_mint: u64,
    pub minted_at: DateTime<Utc>,
}

/// A minted offer record (`offer_nfts_<address>.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferNft {
    pub id: String,
    pub address: String,
    pub title: String,
    pub discount_percent: u8,
    pub expires_at: DateTime<Utc>,
    pub minted_at: DateTime<Utc>,
    pub redeemed: bool,
}
