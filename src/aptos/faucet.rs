use std::time::Duration;

/// Faucets submit and wait for a funding transaction, so they get a longer
/// leash than the fullnode.
const FAUCET_TIMEOUT: Duration = Duration::from_secs(30);

pub struct FaucetClient {
    client: reqwest::Client,
    base_url: String,
}

impl FaucetClient {
    pub fn new(faucet_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FAUCET_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: faucet_url.trim_end_matches('/').to_string(),
        }
    }

    /// Ask the faucet to fund an address. Best effort: devnet faucets
    /// rate-limit and flake, so failure is logged and reported as `false`
    /// rather than returned as an error.
    pub async fn fund_account(&self, address: &str, amount_octas: u64) -> bool {
        let url = format!(
            "{}/mint?amount={}&address={}",
            self.base_url, amount_octas, address
        );

        match self.client.post(&url).send().await {
            Ok(response) if response.status().is_success() => {
                log::info!("Faucet funded {} with {} octas", address, amount_octas);
                true
            }
            Ok(response) => {
                log::warn!(
                    "Faucet returned status {} for {}",
                    response.status(),
                    address
                );
                false
            }
            Err(e) => {
                log::warn!("Faucet request failed for {}: {}", address, e);
                false
            }
        }
    }
}
