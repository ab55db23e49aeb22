/// Scan a mnemonic's addresses for ETH and ERC-20 balances
///
/// Requires `ETH_RPC` (environment or `.env`) pointing at an Alchemy-compatible
/// JSON-RPC endpoint. Prices come from CoinGecko.

use anyhow::Context;
use eth_seed_scanner::config::phrase_from_args;
use eth_seed_scanner::{
    Aggregator, CoinGeckoClient, ConsoleReporter, EndpointConfig, EthRpcClient, ScanConfig,
};
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG=debug for per-request output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(phrase) = phrase_from_args(env::args()) else {
        println!("Usage: scan-balances \"seed phrase here\"");
        std::process::exit(1);
    };

    // Configuration problems are fatal before anything is derived
    let endpoints = EndpointConfig::from_env().context("Failed to load configuration")?;
    let scan_config = ScanConfig::from_env().context("Failed to load scan settings")?;

    log::info!("🔗 RPC endpoint configured");

    let rpc = EthRpcClient::new(endpoints.rpc_url);
    let prices = CoinGeckoClient::new(endpoints.price_api_url, endpoints.price_api_key);

    let aggregator = Aggregator::new(scan_config, &rpc, &prices, &rpc)?;
    let mut reporter = ConsoleReporter::new();

    aggregator
        .scan_phrase(&phrase, &mut reporter)
        .await
        .context("Scan failed")?;

    Ok(())
}
