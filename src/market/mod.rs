//! Market data: APT spot price (CoinGecko) and the crypto Fear & Greed
//! index (alternative.me)

mod client;
mod types;

pub use client::MarketClient;
pub use types::{AptPrice, MarketSentiment};
