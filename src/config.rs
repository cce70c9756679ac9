/// Wallet configuration from environment variables
///
/// Controls the Aptos network, fullnode/faucet endpoints and the data
/// directory. Defaults to Devnet, which is where faucet-funded accounts live.
use std::env;
use std::path::PathBuf;

/// Aptos network the wallet talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AptosNetwork {
    Mainnet,
    Testnet,
    Devnet,
}

impl AptosNetwork {
    pub fn as_str(&self) -> &'static str {
        match self {
            AptosNetwork::Mainnet => "mainnet",
            AptosNetwork::Testnet => "testnet",
            AptosNetwork::Devnet => "devnet",
        }
    }

    /// Default fullnode REST endpoint for this network.
    pub fn default_node_url(&self) -> &'static str {
        match self {
            AptosNetwork::Mainnet => "https://fullnode.mainnet.aptoslabs.com",
            AptosNetwork::Testnet => "https://fullnode.testnet.aptoslabs.com",
            AptosNetwork::Devnet => "https://fullnode.devnet.aptoslabs.com",
        }
    }

    /// Default faucet endpoint, if the network has one.
    pub fn default_faucet_url(&self) -> Option<&'static str> {
        match self {
            AptosNetwork::Mainnet => None,
            AptosNetwork::Testnet => Some("https://faucet.testnet.aptoslabs.com"),
            AptosNetwork::Devnet => Some("https://faucet.devnet.aptoslabs.com"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WalletConfig {
    /// Aptos network type
    pub network: AptosNetwork,
    /// Fullnode REST API base URL
    pub node_url: String,
    /// Faucet base URL (None on networks without one)
    pub faucet_url: Option<String>,
    /// Directory holding the wallet's JSON documents
    pub data_dir: PathBuf,
}

impl WalletConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `APTOS_NETWORK`: "devnet" (default), "testnet" or "mainnet"
    /// - `NODE_URL`: fullnode endpoint override
    /// - `FAUCET_URL`: faucet endpoint override
    /// - `DATA_DIR`: wallet data directory (default "./cryppal-data")
    pub fn from_env() -> Self {
        let network_str = env::var("APTOS_NETWORK")
            .unwrap_or_else(|_| "devnet".to_string())
            .to_lowercase();

        let network = match network_str.as_str() {
            "mainnet" => {
                log::info!("🌐 Using MAINNET network");
                AptosNetwork::Mainnet
            }
            "testnet" => {
                log::info!("🌐 Using TESTNET network");
                AptosNetwork::Testnet
            }
            "devnet" | "" => {
                log::info!("🔧 Using DEVNET network");
                AptosNetwork::Devnet
            }
            other => {
                log::warn!("⚠️  Unknown network '{}', defaulting to Devnet", other);
                AptosNetwork::Devnet
            }
        };

        let node_url = env::var("NODE_URL").unwrap_or_else(|_| {
            let default_url = network.default_node_url().to_string();
            log::info!("📡 Fullnode URL: {} ({} default)", default_url, network.as_str());
            default_url
        });

        let faucet_url = match env::var("FAUCET_URL") {
            Ok(url) if !url.is_empty() => Some(url),
            _ => network.default_faucet_url().map(|u| u.to_string()),
        };
        match &faucet_url {
            Some(url) => log::info!("💧 Faucet URL: {}", url),
            None => log::info!("No faucet configured for {}", network.as_str()),
        }

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./cryppal-data"));

        Self {
            network,
            node_url,
            faucet_url,
            data_dir,
        }
    }
}

impl Default for WalletConfig {
    /// Default configuration (Devnet)
    fn default() -> Self {
        Self {
            network: AptosNetwork::Devnet,
            node_url: AptosNetwork::Devnet.default_node_url().to_string(),
            faucet_url: AptosNetwork::Devnet.default_faucet_url().map(|u| u.to_string()),
            data_dir: PathBuf::from("./cryppal-data"),
        }
    }
}
