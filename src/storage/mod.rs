//! Storage and persistence layer
//!
//! - File system operations (one JSON document per storage key)
//! - Key derivation
//! - Data models

mod file_system;
mod keys;
mod models;

pub use file_system::Storage;
pub use keys::{AccountKeys, KeyManager};
pub use models::{
    LoyaltyNft, OfferNft, StoredUpiDirectory, StoredWallet, UpiDirectoryDoc, UpiMapping,
    UserStats, WalletAccount, UPI_DIRECTORY_VERSION,
};
