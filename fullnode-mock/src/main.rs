/// Aptos Fullnode Mock Server
///
/// A lightweight mock of the Aptos fullnode v1 REST API with an in-memory
/// ledger and a faucet endpoint. Designed for local testing and development.

mod handlers;
mod ledger;
mod server;
mod types;

use anyhow::{Context, Result};
use std::env;
use std::sync::{Arc, Mutex};

use ledger::MockLedger;
use server::run_server;

#[derive(Debug)]
struct Config {
    server_host: String,
    server_port: u16,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        Ok(Self {
            server_host,
            server_port,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Aptos fullnode mock server...");

    let config = Config::from_env().context("Failed to load configuration")?;

    log::info!(
        "Server will listen on {}:{}",
        config.server_host,
        config.server_port
    );

    let ledger = Arc::new(Mutex::new(MockLedger::new()));

    run_server(ledger, config.server_host, config.server_port)
        .await
        .context("Server error")?;

    Ok(())
}
