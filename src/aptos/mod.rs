//! Aptos chain access
//!
//! - Fullnode REST client (ledger info, accounts, balances, history)
//! - Faucet client for devnet/testnet funding
//! - Address canonicalization and APT/octa conversions

mod address;
mod client;
mod faucet;
mod units;

pub use address::normalize_address;
pub use client::{AccountInfo, LedgerInfo, NodeClient, TransactionEntry, APT_COIN_STORE};
pub use faucet::FaucetClient;
pub use units::{apt_to_octas, octas_to_apt, OCTAS_PER_APT};
