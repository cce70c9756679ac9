#![allow(dead_code)]
/// Common test utilities for wallet integration tests
///
/// This module provides shared test infrastructure including:
/// - Test environment setup with temp-dir storage
/// - An in-process Aptos fullnode mock served on an ephemeral port

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use aptex_wallet::config::{AptosNetwork, WalletConfig};
use aptex_wallet::manager::WalletManager;
use aptex_wallet::storage::Storage;
use fullnode_mock::MockLedger;

/// Test environment with automatic cleanup
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub manager: WalletManager,
}

impl TestEnvironment {
    /// Environment whose node/faucet URLs point at a closed port. Fine for
    /// everything that never leaves the process.
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        log::info!("📁 Test directory: {:?}", temp_dir.path());

        let config = test_config(temp_dir.path().to_path_buf(), None);
        let storage = Storage::new_with_base_dir(temp_dir.path().to_path_buf());
        let manager = WalletManager::new_with_config(config, storage);

        Ok(Self { temp_dir, manager })
    }

    /// Environment wired to an in-process fullnode mock.
    pub async fn with_mock_node() -> anyhow::Result<(Self, MockNode)> {
        let node = MockNode::spawn().await?;

        let temp_dir = TempDir::new()?;
        log::info!("📁 Test directory: {:?}", temp_dir.path());

        let config = test_config(temp_dir.path().to_path_buf(), Some(node.url()));
        let storage = Storage::new_with_base_dir(temp_dir.path().to_path_buf());
        let manager = WalletManager::new_with_config(config, storage);

        Ok((Self { temp_dir, manager }, node))
    }

    /// Second manager over the same data directory, as after a daemon
    /// restart.
    pub fn reopen(&self) -> WalletManager {
        let config = test_config(self.temp_dir.path().to_path_buf(), None);
        let storage = Storage::new_with_base_dir(self.temp_dir.path().to_path_buf());
        WalletManager::new_with_config(config, storage)
    }
}

pub fn test_config(data_dir: PathBuf, node_url: Option<String>) -> WalletConfig {
    // Port 1 is never listening; tests that stay offline still get a URL
    let node_url = node_url.unwrap_or_else(|| "http://127.0.0.1:1".to_string());

    WalletConfig {
        network: AptosNetwork::Devnet,
        faucet_url: Some(node_url.clone()),
        node_url,
        data_dir,
    }
}

/// In-process fullnode mock with direct access to its ledger state
pub struct MockNode {
    pub addr: SocketAddr,
    pub ledger: Arc<Mutex<MockLedger>>,
}

impl MockNode {
    pub async fn spawn() -> anyhow::Result<Self> {
        let ledger = Arc::new(Mutex::new(MockLedger::new()));
        let router = fullnode_mock::create_router(ledger.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                log::error!("Mock fullnode server error: {}", e);
            }
        });

        log::info!("🚀 Mock fullnode listening on http://{}", addr);
        Ok(Self { addr, ledger })
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Credit an address directly on the mock ledger
    pub fn fund(&self, address: &str, octas: u64) {
        self.ledger
            .lock()
            .expect("ledger mutex poisoned")
            .fund(address, octas);
    }

    /// Move octas between two funded addresses on the mock ledger
    pub fn transfer(&self, from: &str, to: &str, octas: u64) {
        self.ledger
            .lock()
            .expect("ledger mutex poisoned")
            .transfer(from, to, octas)
            .expect("mock transfer failed");
    }
}

/// 12-word test vector; never holds funds on any real network
pub const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

pub fn init_test_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .is_test(true)
        .try_init()
        .ok();
}
