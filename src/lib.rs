//! eth-seed-scanner: BIP-39 seed phrase tooling for Ethereum
//!
//! Derives addresses from a mnemonic and scans them against a live node,
//! aggregating ETH and ERC-20 balances into a USD valuation.
//!
//! # Architecture
//!
//! - **Keys**: mnemonic validation and BIP-44 address derivation
//! - **RPC**: JSON-RPC node client (balances, token enumeration, ERC-20 metadata)
//! - **Prices**: CoinGecko client for ETH and token USD quotes
//! - **Scanner**: gap-limit scan loop, aggregation and reporting
//!
//! # Example
//!
//! ```ignore
//! use eth_seed_scanner::{Aggregator, CoinGeckoClient, ConsoleReporter, EthRpcClient, ScanConfig};
//!
//! let rpc = EthRpcClient::new("https://eth-mainnet.g.alchemy.com/v2/<key>");
//! let prices = CoinGeckoClient::default();
//! let aggregator = Aggregator::new(ScanConfig::default(), &rpc, &prices, &rpc)?;
//!
//! let summary = aggregator
//!     .scan_phrase("abandon abandon ... about", &mut ConsoleReporter::new())
//!     .await?;
//! println!("{} addresses scanned", summary.addresses_scanned);
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod keys;
pub mod prices;
pub mod rpc;
pub mod scanner;
pub mod units;

// Re-exports for convenience
pub use config::{EndpointConfig, ScanConfig};
pub use error::ScanError;
pub use keys::{checksum_address, lowercase_address, HdWallet, TemplateDeriver};
pub use prices::CoinGeckoClient;
pub use rpc::EthRpcClient;
pub use scanner::{
    AddressDeriver, AddressRecord, Aggregator, BalanceSnapshot, ChainProber, ConsoleReporter,
    MetadataResolver, NullReporter, PriceOracle, ScanReporter, ScanSummary, StopReason,
};

// Common result type
pub type Result<T> = std::result::Result<T, ScanError>;
