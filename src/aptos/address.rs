use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::WalletError;

static ADDRESS_BODY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{1,64}$").expect("Invalid address regex"));

/// Canonicalize an account address: accept with or without the `0x` prefix,
/// validate the hex body, left-pad to 64 digits and lowercase.
///
/// Aptos treats `0x1` and its zero-padded form as the same account, so every
/// address used as a storage key or directory entry goes through this first.
pub fn normalize_address(address: &str) -> Result<String, WalletError> {
    let trimmed = address.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if !ADDRESS_BODY.is_match(body) {
        return Err(WalletError::InvalidInput(format!(
            "Invalid account address: {}",
            address
        )));
    }

    Ok(format!("0x{:0>64}", body.to_lowercase()))
}
