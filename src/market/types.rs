use chrono::{DateTime, Utc};
use serde::Serialize;

/// APT spot price as CoinGecko reports it.
#[derive(Debug, Clone, Serialize)]
pub struct AptPrice {
    pub usd: f64,
    pub usd_24h_change: Option<f64>,
    pub fetched_at: DateTime<Utc>,
}

/// Crypto Fear & Greed reading (0 = extreme fear, 100 = extreme greed).
#[derive(Debug, Clone, Serialize)]
pub struct MarketSentiment {
    pub value: u32,
    pub classification: String,
    pub fetched_at: DateTime<Utc>,
}
