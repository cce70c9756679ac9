use bip39::Mnemonic;
use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use sha3::{Digest, Sha3_256};

use crate::error::WalletError;

type HmacSha512 = Hmac<Sha512>;

/// Aptos registered coin type (SLIP-44).
const APTOS_COIN_TYPE: u32 = 637;
const HARDENED_OFFSET: u32 = 0x8000_0000;
/// Domain-separation key for the SLIP-0010 ed25519 master node.
const ED25519_SEED_KEY: &[u8] = b"ed25519 seed";
/// Aptos authentication-key scheme byte for a single ed25519 key.
const SINGLE_KEY_SCHEME: u8 = 0x00;

pub struct KeyManager;

impl KeyManager {
    /// Generate a new random 12-word mnemonic
    pub fn generate() -> Result<Mnemonic, WalletError> {
        let entropy = rand::random::<[u8; 16]>();

        Mnemonic::from_entropy(&entropy)
            .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
    }

    /// Parse an existing mnemonic phrase
    pub fn from_mnemonic(words: &str) -> Result<Mnemonic, WalletError> {
        Mnemonic::parse(words).map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
    }

    /// Derive the account at m/44'/637'/{index}'/0'/0' from a mnemonic.
    /// Every step is hardened; ed25519 has no non-hardened derivation.
    pub fn derive_account(mnemonic: &Mnemonic, index: u32) -> Result<AccountKeys, WalletError> {
        let seed = mnemonic.to_seed("");

        let mut node = ExtendedKey::master(&seed)?;
        for segment in [44, APTOS_COIN_TYPE, index, 0, 0] {
            node = node.derive_child(segment)?;
        }

        let signing_key = SigningKey::from_bytes(&node.key);
        let verifying_key = signing_key.verifying_key();

        let address = Self::derive_address(verifying_key.as_bytes());
        let public_key = format!("0x{}", hex::encode(verifying_key.as_bytes()));
        let private_key = format!("0x{}", hex::encode(signing_key.to_bytes()));

        Ok(AccountKeys {
            address,
            public_key,
            private_key,
            account_index: index,
        })
    }

    /// Aptos account address: sha3-256 over the public key plus the scheme byte
    fn derive_address(public_key: &[u8; 32]) -> String {
        let mut hasher = Sha3_256::new();
        hasher.update(public_key);
        hasher.update([SINGLE_KEY_SCHEME]);
        format!("0x{}", hex::encode(hasher.finalize()))
    }
}

/// One node of the SLIP-0010 tree: private key half and chain code half of
/// the HMAC-SHA512 output.
struct ExtendedKey {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedKey {
    fn master(seed: &[u8]) -> Result<Self, WalletError> {
        Ok(Self::split(hmac_sha512(ED25519_SEED_KEY, seed)?))
    }

    fn derive_child(&self, index: u32) -> Result<Self, WalletError> {
        let hardened = index | HARDENED_OFFSET;

        let mut data = Vec::with_capacity(37);
        data.push(0u8);
        data.extend_from_slice(&self.key);
        data.extend_from_slice(&hardened.to_be_bytes());

        Ok(Self::split(hmac_sha512(&self.chain_code, &data)?))
    }

    fn split(digest: [u8; 64]) -> Self {
        let mut key = [0u8; 32];
        let mut chain_code = [0u8; 32];
        key.copy_from_slice(&digest[..32]);
        chain_code.copy_from_slice(&digest[32..]);
        Self { key, chain_code }
    }
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; 64], WalletError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| WalletError::Internal(format!("HMAC key setup failed: {}", e)))?;
    mac.update(data);

    let digest = mac.finalize().into_bytes();
    let mut out = [0u8; 64];
    out.copy_from_slice(&digest);
    Ok(out)
}

/// Key material for one derived account. Hex fields carry a 0x prefix.
pub struct AccountKeys {
    pub address: String,
    pub public_key: String,
    pub private_key: String,
    pub account_index: u32,
}
