//! Local Aptos wallet daemon.
//!
//! Holds a single BIP-39 wallet with SLIP-0010 derived accounts, serves
//! balances and history from an Aptos fullnode, keeps a directory of
//! UPI-style payment handles, and mints loyalty/offer NFT records as
//! transactions accumulate. All state lives in JSON documents on disk.

pub mod api;
pub mod aptos;
pub mod config;
pub mod error;
pub mod manager;
pub mod market;
pub mod rewards;
pub mod storage;
pub mod upi;
pub mod wallet;
