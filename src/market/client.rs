use chrono::Utc;
use std::time::Duration;

use super::types::{AptPrice, MarketSentiment};
use crate::error::WalletError;

const COINGECKO_URL: &str = "https://api.coingecko.com/api/v3";
const FEAR_GREED_URL: &str = "https://api.alternative.me";
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MarketClient {
    client: reqwest::Client,
    price_url: String,
    sentiment_url: String,
}

impl MarketClient {
    pub fn new() -> Self {
        Self::new_with_urls(COINGECKO_URL, FEAR_GREED_URL)
    }

    /// Point both upstreams somewhere else (for testing)
    pub fn new_with_urls(price_url: &str, sentiment_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            price_url: price_url.trim_end_matches('/').to_string(),
            sentiment_url: sentiment_url.trim_end_matches('/').to_string(),
        }
    }

    /// APT spot price in USD with its 24h change
    pub async fn apt_price(&self) -> Result<AptPrice, WalletError> {
        let url = format!(
            "{}/simple/price?ids=aptos&vs_currencies=usd&include_24hr_change=true",
            self.price_url
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Market(format!(
                "Price request failed with status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WalletError::Market(e.to_string()))?;

        let usd = body["aptos"]["usd"]
            .as_f64()
            .ok_or_else(|| WalletError::Market("Price response missing aptos.usd".to_string()))?;

        Ok(AptPrice {
            usd,
            usd_24h_change: body["aptos"]["usd_24h_change"].as_f64(),
            fetched_at: Utc::now(),
        })
    }

    /// Latest Fear & Greed index entry. The upstream reports the value as a
    /// string.
    pub async fn sentiment(&self) -> Result<MarketSentiment, WalletError> {
        let url = format!("{}/fng/?limit=1", self.sentiment_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WalletError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Market(format!(
                "Sentiment request failed with status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WalletError::Market(e.to_string()))?;

        let entry = &body["data"][0];
        let value = entry["value"]
            .as_str()
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or_else(|| WalletError::Market("Sentiment response missing value".to_string()))?;
        let classification = entry["value_classification"]
            .as_str()
            .unwrap_or("Unknown")
            .to_string();

        Ok(MarketSentiment {
            value,
            classification,
            fetched_at: Utc::now(),
        })
    }
}

impl Default for MarketClient {
    fn default() -> Self {
        Self::new()
    }
}
