/// Wallet lifecycle operations
///
/// Handles wallet creation, import, summary and wipe. One wallet per data
/// directory; accounts hang off it.
use bip39::Mnemonic;
use chrono::Utc;

use crate::api::types::{AccountSummary, WalletCreatedResponse, WalletSummary};
use crate::error::{StorageError, WalletError};
use crate::storage::{KeyManager, Storage, StoredWallet, WalletAccount};

/// Create a new wallet with a generated mnemonic
pub fn create_wallet(storage: &Storage) -> Result<WalletCreatedResponse, WalletError> {
    if storage.wallet_exists() {
        return Err(WalletError::WalletExists);
    }

    let mnemonic = KeyManager::generate()?;
    initialize_wallet(storage, mnemonic)
}

/// Import a wallet from an existing mnemonic
pub fn import_wallet(storage: &Storage, seed_phrase: &str) -> Result<WalletCreatedResponse, WalletError> {
    if storage.wallet_exists() {
        return Err(WalletError::WalletExists);
    }

    let mnemonic = KeyManager::from_mnemonic(seed_phrase.trim())?;
    initialize_wallet(storage, mnemonic)
}

/// Write the wallet document with its first derived account.
fn initialize_wallet(
    storage: &Storage,
    mnemonic: Mnemonic,
) -> Result<WalletCreatedResponse, WalletError> {
    let keys = KeyManager::derive_account(&mnemonic, 0)?;

    let account = WalletAccount {
        address: keys.address,
        public_key: keys.public_key,
        private_key: keys.private_key,
        account_index: 0,
    };
    let summary = AccountSummary::from(&account);

    let wallet = StoredWallet {
        seed_phrase: mnemonic.to_string(),
        accounts: vec![account],
        current_account_index: 0,
        created_at: Utc::now(),
    };

    storage.save_wallet(&wallet)?;
    storage.save_account_count(1)?;

    log::info!("Wallet initialized, first account {}", summary.address);

    Ok(WalletCreatedResponse {
        seed_phrase: wallet.seed_phrase,
        account: summary,
        created_at: wallet.created_at.to_rfc3339(),
    })
}

/// Wallet overview without key material
pub fn wallet_summary(storage: &Storage, network: &str) -> Result<WalletSummary, WalletError> {
    let wallet = load_wallet_doc(storage)?;

    Ok(WalletSummary {
        network: network.to_string(),
        created_at: wallet.created_at.to_rfc3339(),
        account_count: wallet.accounts.len(),
        current_account_index: wallet.current_account_index,
        current_address: wallet.current_account().map(|a| a.address.clone()),
        accounts: wallet.accounts.iter().map(AccountSummary::from).collect(),
    })
}

/// Delete the wallet document and account counter. The UPI directory and
/// reward records belong to addresses, not the wallet, and stay behind.
pub fn clear_wallet(storage: &Storage) -> Result<(), WalletError> {
    if !storage.wallet_exists() {
        return Err(WalletError::WalletNotFound);
    }

    log::warn!("Clearing wallet and account counter");
    storage.delete_wallet()?;
    storage.delete_account_count()?;

    Ok(())
}

/// Load the wallet document, mapping a missing file to WalletNotFound.
///
/// A document that exists but fails to parse is also reported as not found
/// rather than overwritten or wiped; the file stays on disk for manual
/// recovery, and create/import refuse to run while it is there.
pub(crate) fn load_wallet_doc(storage: &Storage) -> Result<StoredWallet, WalletError> {
    match storage.load_wallet() {
        Ok(wallet) => Ok(wallet),
        Err(StorageError::FileNotFound(_)) => Err(WalletError::WalletNotFound),
        Err(StorageError::Json(e)) => {
            log::error!("Wallet document is corrupt ({}); leaving it untouched", e);
            Err(WalletError::WalletNotFound)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());
        (dir, storage)
    }

    #[test]
    fn test_create_then_create_again_conflicts() {
        let (_dir, storage) = temp_storage();

        let created = create_wallet(&storage).unwrap();
        assert_eq!(created.account.account_index, 0);
        assert_eq!(created.seed_phrase.split_whitespace().count(), 12);

        assert!(matches!(
            create_wallet(&storage),
            Err(WalletError::WalletExists)
        ));
    }

    #[test]
    fn test_import_derives_same_account_as_before() {
        let (_dir, storage) = temp_storage();
        let created = create_wallet(&storage).unwrap();

        clear_wallet(&storage).unwrap();
        let imported = import_wallet(&storage, &created.seed_phrase).unwrap();

        assert_eq!(imported.account.address, created.account.address);
    }

    #[test]
    fn test_import_rejects_bad_phrase() {
        let (_dir, storage) = temp_storage();
        let result = import_wallet(&storage, "these are not twelve valid words at all");
        assert!(matches!(result, Err(WalletError::InvalidMnemonic(_))));
        assert!(!storage.wallet_exists());
    }

    #[test]
    fn test_summary_excludes_seed_phrase_material() {
        let (_dir, storage) = temp_storage();
        create_wallet(&storage).unwrap();

        let summary = wallet_summary(&storage, "devnet").unwrap();
        assert_eq!(summary.account_count, 1);
        assert_eq!(summary.current_account_index, 0);
        assert!(summary.current_address.is_some());

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("seed_phrase").is_none());
    }

    #[test]
    fn test_corrupt_wallet_reads_as_missing_but_blocks_create() {
        let (_dir, storage) = temp_storage();
        std::fs::create_dir_all(storage.base_dir()).unwrap();
        let path = storage.base_dir().join("cryptal_wallet.json");
        std::fs::write(&path, "{definitely not json").unwrap();

        assert!(matches!(
            wallet_summary(&storage, "devnet"),
            Err(WalletError::WalletNotFound)
        ));
        // the broken document is preserved and still occupies the slot
        assert!(matches!(
            create_wallet(&storage),
            Err(WalletError::WalletExists)
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{definitely not json");
    }

    #[test]
    fn test_clear_without_wallet_is_not_found() {
        let (_dir, storage) = temp_storage();
        assert!(matches!(
            clear_wallet(&storage),
            Err(WalletError::WalletNotFound)
        ));
    }
}
