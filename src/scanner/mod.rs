//! Balance scanning
//!
//! - Gap-limit address discovery along a derivation path
//! - Native and token balance aggregation
//! - Batched USD pricing of aggregated tokens
//!
//! External services are reached through the capability traits below so the
//! aggregation loop can run against fixtures as well as a live node.

pub mod aggregator;
pub mod report;
pub mod types;

use alloy_primitives::Address;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::Result;

// Re-export main types
pub use aggregator::Aggregator;
pub use report::{ConsoleReporter, NullReporter, ScanReporter};
pub use types::{
    AddressOutcome, AddressRecord, BalanceSnapshot, PriceQuotes, ScanSummary, StopReason,
    TokenDelta, TokenMetadata, TokenTotals, TokenValuation, WalletTotals,
};

/// Deterministic index → address mapping
pub trait AddressDeriver {
    fn derive(&self, index: u32) -> Result<AddressRecord>;
}

/// Balance lookup for a single address
#[async_trait]
pub trait ChainProber: Send + Sync {
    async fn probe(&self, address: Address) -> Result<BalanceSnapshot>;
}

/// USD quotes for the native asset and for token contracts
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn native_usd_price(&self) -> Result<Decimal>;

    /// Quotes keyed by contract; contracts the service does not know are
    /// simply absent from the map
    async fn token_usd_prices(&self, contracts: &[Address]) -> Result<HashMap<Address, Decimal>>;
}

/// Token symbol and decimal scale lookup
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    async fn token_metadata(&self, contract: Address) -> Result<TokenMetadata>;
}
