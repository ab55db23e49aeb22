//! Common test utilities for scanner integration tests
//!
//! Deterministic stand-ins for the node, the price service and the metadata
//! lookups, plus a reporter that records everything it is shown.

#![allow(dead_code)]

use alloy_primitives::{Address, U256};
use async_trait::async_trait;
use eth_seed_scanner::scanner::{
    AddressDeriver, AddressOutcome, AddressRecord, BalanceSnapshot, ChainProber, MetadataResolver,
    PriceOracle, ScanReporter, ScanSummary, TokenDelta, TokenMetadata, TokenValuation,
};
use eth_seed_scanner::{ScanConfig, ScanError};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub const TEST_PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Fails the BIP-39 checksum (last word should be "about")
pub const BAD_CHECKSUM_PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";

pub fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("valid decimal")
}

pub fn addr(hex: &str) -> Address {
    Address::from_str(hex).expect("valid address")
}

/// Fake address for an index: the index big-endian in the last four bytes
pub fn fixture_address(index: u32) -> Address {
    let mut bytes = [0u8; 20];
    bytes[16..].copy_from_slice(&index.to_be_bytes());
    Address::from(bytes)
}

pub fn token(contract: Address, amount: u128) -> TokenDelta {
    TokenDelta {
        contract,
        amount: U256::from(amount),
    }
}

pub fn native(amount: &str) -> BalanceSnapshot {
    BalanceSnapshot {
        native: dec(amount),
        tokens: Vec::new(),
    }
}

pub fn tokens_only(deltas: Vec<TokenDelta>) -> BalanceSnapshot {
    BalanceSnapshot {
        native: Decimal::ZERO,
        tokens: deltas,
    }
}

pub fn small_config(gap_limit: u32, max_addresses: u32) -> ScanConfig {
    ScanConfig {
        gap_limit,
        max_addresses,
        ..Default::default()
    }
}

// ============================================================================
// Address deriver
// ============================================================================

#[derive(Default)]
pub struct FixtureDeriver {
    pub derived: Mutex<Vec<u32>>,
}

impl AddressDeriver for FixtureDeriver {
    fn derive(&self, index: u32) -> Result<AddressRecord, ScanError> {
        self.derived.lock().unwrap().push(index);
        Ok(AddressRecord {
            index,
            path: format!("fixture/{}", index),
            address: fixture_address(index),
        })
    }
}

// ============================================================================
// Chain balances
// ============================================================================

#[derive(Default)]
pub struct FixtureProber {
    snapshots: HashMap<Address, BalanceSnapshot>,
    every_address: Option<BalanceSnapshot>,
    fail_at: Option<Address>,
    pub queried: Mutex<Vec<Address>>,
}

impl FixtureProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, address: Address, snapshot: BalanceSnapshot) -> Self {
        self.snapshots.insert(address, snapshot);
        self
    }

    /// Same snapshot for every address not explicitly configured
    pub fn with_every_address(mut self, snapshot: BalanceSnapshot) -> Self {
        self.every_address = Some(snapshot);
        self
    }

    pub fn failing_at(mut self, address: Address) -> Self {
        self.fail_at = Some(address);
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.queried.lock().unwrap().len()
    }

    pub fn was_queried(&self, address: Address) -> bool {
        self.queried.lock().unwrap().contains(&address)
    }
}

#[async_trait]
impl ChainProber for FixtureProber {
    async fn probe(&self, address: Address) -> Result<BalanceSnapshot, ScanError> {
        self.queried.lock().unwrap().push(address);

        if self.fail_at == Some(address) {
            return Err(ScanError::TransientProbeFailure(format!(
                "connection reset while probing {}",
                address
            )));
        }

        Ok(self
            .snapshots
            .get(&address)
            .or(self.every_address.as_ref())
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Price oracle
// ============================================================================

pub struct FixtureOracle {
    native_price: Option<Decimal>,
    prices: HashMap<Address, Decimal>,
    /// 1-based batch numbers that fail
    failing_batches: HashSet<usize>,
    pub native_calls: AtomicUsize,
    pub batches: Mutex<Vec<Vec<Address>>>,
}

impl FixtureOracle {
    pub fn new(native_price: &str) -> Self {
        Self {
            native_price: Some(dec(native_price)),
            prices: HashMap::new(),
            failing_batches: HashSet::new(),
            native_calls: AtomicUsize::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            native_price: None,
            ..Self::new("0")
        }
    }

    pub fn with_price(mut self, contract: Address, price: &str) -> Self {
        self.prices.insert(contract, dec(price));
        self
    }

    pub fn failing_batch(mut self, batch_number: usize) -> Self {
        self.failing_batches.insert(batch_number);
        self
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl PriceOracle for FixtureOracle {
    async fn native_usd_price(&self) -> Result<Decimal, ScanError> {
        self.native_calls.fetch_add(1, Ordering::SeqCst);
        self.native_price
            .ok_or_else(|| ScanError::TransientProbeFailure("price service down".into()))
    }

    async fn token_usd_prices(
        &self,
        contracts: &[Address],
    ) -> Result<HashMap<Address, Decimal>, ScanError> {
        let batch_number = {
            let mut batches = self.batches.lock().unwrap();
            batches.push(contracts.to_vec());
            batches.len()
        };

        if self.failing_batches.contains(&batch_number) {
            return Err(ScanError::TransientProbeFailure("HTTP 429".into()));
        }

        Ok(contracts
            .iter()
            .filter_map(|contract| self.prices.get(contract).map(|price| (*contract, *price)))
            .collect())
    }
}

// ============================================================================
// Metadata resolver
// ============================================================================

#[derive(Default)]
pub struct FixtureResolver {
    metadata: HashMap<Address, TokenMetadata>,
    pub calls: Mutex<Vec<Address>>,
}

impl FixtureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, contract: Address, symbol: &str, decimals: u8) -> Self {
        self.metadata.insert(
            contract,
            TokenMetadata {
                symbol: symbol.to_string(),
                decimals,
            },
        );
        self
    }
}

#[async_trait]
impl MetadataResolver for FixtureResolver {
    async fn token_metadata(&self, contract: Address) -> Result<TokenMetadata, ScanError> {
        self.calls.lock().unwrap().push(contract);
        self.metadata
            .get(&contract)
            .cloned()
            .ok_or_else(|| ScanError::unknown_metadata(contract, "execution reverted"))
    }
}

// ============================================================================
// Reporter
// ============================================================================

#[derive(Default)]
pub struct RecordingReporter {
    pub started: bool,
    pub outcomes: Vec<AddressOutcome>,
    pub pricing_token_count: Option<usize>,
    pub valuations: Vec<TokenValuation>,
    pub finished: Option<ScanSummary>,
}

impl RecordingReporter {
    pub fn indices(&self) -> Vec<u32> {
        self.outcomes.iter().map(|o| o.record.index).collect()
    }

    pub fn outcome(&self, index: u32) -> &AddressOutcome {
        self.outcomes
            .iter()
            .find(|o| o.record.index == index)
            .expect("index was scanned")
    }
}

impl ScanReporter for RecordingReporter {
    fn scan_started(&mut self, _config: &ScanConfig) {
        self.started = true;
    }

    fn address_scanned(&mut self, outcome: &AddressOutcome) {
        self.outcomes.push(outcome.clone());
    }

    fn pricing_started(&mut self, token_count: usize) {
        self.pricing_token_count = Some(token_count);
    }

    fn token_valued(&mut self, valuation: &TokenValuation) {
        self.valuations.push(valuation.clone());
    }

    fn scan_finished(&mut self, summary: &ScanSummary) {
        self.finished = Some(summary.clone());
    }
}
