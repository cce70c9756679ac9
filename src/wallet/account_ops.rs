/// Derived-account management
///
/// Accounts are derived at m/44'/637'/{index}'/0'/0' and only ever appended.
/// The account counter document hands out derivation indices so they stay
/// monotonic for the life of the wallet.
use super::wallet_ops::load_wallet_doc;
use crate::api::types::AccountSummary;
use crate::error::WalletError;
use crate::storage::{KeyManager, Storage, WalletAccount};

/// Derive the next account and append it to the wallet
pub fn add_account(storage: &Storage) -> Result<AccountSummary, WalletError> {
    let mut wallet = load_wallet_doc(storage)?;
    let mnemonic = KeyManager::from_mnemonic(&wallet.seed_phrase)?;

    // The counter can lag the account list if its document was removed by
    // hand; never hand out an index the wallet already holds.
    let next_index = storage
        .load_account_count()?
        .max(wallet.accounts.len() as u32);

    let keys = KeyManager::derive_account(&mnemonic, next_index)?;
    let account = WalletAccount {
        address: keys.address,
        public_key: keys.public_key,
        private_key: keys.private_key,
        account_index: next_index,
    };
    let summary = AccountSummary::from(&account);

    wallet.accounts.push(account);
    storage.save_wallet(&wallet)?;
    storage.save_account_count(next_index + 1)?;

    log::info!("Derived account {} at index {}", summary.address, next_index);
    Ok(summary)
}

/// All derived accounts, in derivation order
pub fn list_accounts(storage: &Storage) -> Result<Vec<AccountSummary>, WalletError> {
    let wallet = load_wallet_doc(storage)?;
    Ok(wallet.accounts.iter().map(AccountSummary::from).collect())
}

/// Switch the active account. Out-of-range indices are rejected and leave
/// the stored wallet untouched.
pub fn switch_account(storage: &Storage, index: usize) -> Result<AccountSummary, WalletError> {
    let mut wallet = load_wallet_doc(storage)?;

    if index >= wallet.accounts.len() {
        return Err(WalletError::InvalidInput(format!(
            "Account index {} out of range ({} accounts)",
            index,
            wallet.accounts.len()
        )));
    }

    wallet.current_account_index = index;
    storage.save_wallet(&wallet)?;

    log::info!("Switched to account index {}", index);
    Ok(AccountSummary::from(&wallet.accounts[index]))
}

/// The active account
pub fn current_account(storage: &Storage) -> Result<AccountSummary, WalletError> {
    let wallet = load_wallet_doc(storage)?;
    let account = wallet
        .current_account()
        .ok_or_else(|| WalletError::Internal("Wallet has no active account".to_string()))?;
    Ok(AccountSummary::from(account))
}
