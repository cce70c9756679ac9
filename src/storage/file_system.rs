use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use super::models::{
    LoyaltyNft, OfferNft, StoredUpiDirectory, StoredWallet, UpiDirectoryDoc, UpiMapping,
    UserStats,
};
use crate::error::StorageError;

const WALLET_KEY: &str = "cryptal_wallet";
const ACCOUNT_COUNT_KEY: &str = "cryptal_account_count";
const UPI_DIRECTORY_KEY: &str = "cryptal_global_upi_directory";
const LEGACY_UPI_DIRECTORY_KEY: &str = "upi_directory";

/// File-backed document store. Every logical storage key owns one JSON file
/// under the base directory; the daemon is the single writer, and each write
/// replaces the file in one rename.
#[derive(Clone)]
pub struct Storage {
    base_path: PathBuf,
}

impl Storage {
    /// Create a new storage instance with the default base directory
    /// ("./cryppal-data")
    pub fn new() -> Self {
        Self {
            base_path: PathBuf::from("./cryppal-data"),
        }
    }

    /// Create storage with custom base directory (for testing)
    pub fn new_with_base_dir(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the base directory path for wallet storage
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_path
    }

    fn doc_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn write_doc<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_path)?;
        let json = serde_json::to_string_pretty(value)?;

        // Write a sibling temp file and rename it into place, so a reader
        // never sees a partially written document.
        let tmp = self.doc_path(key).with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(tmp, self.doc_path(key))?;
        Ok(())
    }

    fn read_doc<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.doc_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        let value = serde_json::from_str(&contents)?;
        Ok(Some(value))
    }

    fn remove_doc(&self, key: &str) -> Result<(), StorageError> {
        let path = self.doc_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Wallet document
    // ------------------------------------------------------------------

    /// Check whether a wallet document exists (parseable or not).
    pub fn wallet_exists(&self) -> bool {
        self.doc_path(WALLET_KEY).exists()
    }

    pub fn save_wallet(&self, wallet: &StoredWallet) -> Result<(), StorageError> {
        self.write_doc(WALLET_KEY, wallet)
    }

    pub fn load_wallet(&self) -> Result<StoredWallet, StorageError> {
        let path = self.doc_path(WALLET_KEY);
        match self.read_doc(WALLET_KEY)? {
            Some(wallet) => Ok(wallet),
            None => Err(StorageError::FileNotFound(path.display().to_string())),
        }
    }

    pub fn delete_wallet(&self) -> Result<(), StorageError> {
        self.remove_doc(WALLET_KEY)
    }

    // ------------------------------------------------------------------
    // Account derivation counter
    // ------------------------------------------------------------------

    /// Load the number of accounts ever derived, or 0 if none.
    pub fn load_account_count(&self) -> Result<u32, StorageError> {
        Ok(self.read_doc(ACCOUNT_COUNT_KEY)?.unwrap_or(0))
    }

    pub fn save_account_count(&self, count: u32) -> Result<(), StorageError> {
        self.write_doc(ACCOUNT_COUNT_KEY, &count)
    }

    pub fn delete_account_count(&self) -> Result<(), StorageError> {
        self.remove_doc(ACCOUNT_COUNT_KEY)
    }

    // ------------------------------------------------------------------
    // UPI directory
    // ------------------------------------------------------------------

    /// Load whatever shape the directory is stored in under the current key.
    /// Returns `None` when no document exists; a parse failure is surfaced so
    /// the directory layer can decide to re-initialize.
    pub fn load_upi_directory(&self) -> Result<Option<StoredUpiDirectory>, StorageError> {
        self.read_doc(UPI_DIRECTORY_KEY)
    }

    /// Load the legacy single-array document, if it is still around.
    pub fn load_legacy_upi_directory(&self) -> Result<Option<Vec<UpiMapping>>, StorageError> {
        self.read_doc(LEGACY_UPI_DIRECTORY_KEY)
    }

    pub fn save_upi_directory(&self, doc: &UpiDirectoryDoc) -> Result<(), StorageError> {
        self.write_doc(UPI_DIRECTORY_KEY, doc)
    }

    pub fn remove_legacy_upi_directory(&self) -> Result<(), StorageError> {
        self.remove_doc(LEGACY_UPI_DIRECTORY_KEY)
    }

    // ------------------------------------------------------------------
    // Per-address reward documents
    // ------------------------------------------------------------------

    pub fn load_user_stats(&self, address: &str) -> Result<Option<UserStats>, StorageError> {
        self.read_doc(&format!("user_stats_{}", address))
    }

    pub fn save_user_stats(&self, stats: &UserStats) -> Result<(), StorageError> {
        self.write_doc(&format!("user_stats_{}", stats.address), stats)
    }

    pub fn load_loyalty_nfts(&self, address: &str) -> Result<Option<Vec<LoyaltyNft>>, StorageError> {
        self.read_doc(&format!("loyalty_nfts_{}", address))
    }

    pub fn save_loyalty_nfts(
        &self,
        address: &str,
        nfts: &[LoyaltyNft],
    ) -> Result<(), StorageError> {
        self.write_doc(&format!("loyalty_nfts_{}", address), &nfts)
    }

    pub fn load_offer_nfts(&self, address: &str) -> Result<Option<Vec<OfferNft>>, StorageError> {
        self.read_doc(&format!("offer_nfts_{}", address))
    }

    pub fn save_offer_nfts(&self, address: &str, nfts: &[OfferNft]) -> Result<(), StorageError> {
        self.write_doc(&format!("offer_nfts_{}", address), &nfts)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}
