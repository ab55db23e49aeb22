// Scan data model
// All values live for one process run; nothing is persisted.

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

/// One derived address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub index: u32,
    /// Full derivation path the address came from
    pub path: String,
    pub address: Address,
}

/// Non-zero token balance reported for an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDelta {
    pub contract: Address,
    /// Amount in the token's smallest unit
    pub amount: U256,
}

/// Balances observed for one address
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSnapshot {
    /// Native balance in ether
    pub native: Decimal,
    pub tokens: Vec<TokenDelta>,
}

impl BalanceSnapshot {
    pub fn has_activity(&self) -> bool {
        self.native > Decimal::ZERO || self.tokens.iter().any(|t| !t.amount.is_zero())
    }
}

/// Cumulative raw token balances across all scanned addresses, keyed by contract
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenTotals(BTreeMap<Address, U256>);

impl TokenTotals {
    /// Add an amount; zero amounts are ignored and never create an entry.
    ///
    /// Sums saturate at `U256::MAX`.
    pub fn add(&mut self, contract: Address, amount: U256) -> bool {
        if amount.is_zero() {
            return false;
        }

        let total = self.0.entry(contract).or_default();
        *total = total.saturating_add(amount);
        true
    }

    pub fn get(&self, contract: &Address) -> Option<&U256> {
        self.0.get(contract)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contracts(&self) -> Vec<Address> {
        self.0.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &U256)> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WalletTotals {
    pub total_native: Decimal,
    pub total_usd: Decimal,
}

impl WalletTotals {
    /// Add a native balance at the given price and return its USD value.
    ///
    /// `None` on overflow; the totals are left untouched.
    pub fn add_native(&mut self, amount: Decimal, usd_price: Decimal) -> Option<Decimal> {
        let value = amount.checked_mul(usd_price)?;
        let total_native = self.total_native.checked_add(amount)?;
        let total_usd = self.total_usd.checked_add(value)?;

        self.total_native = total_native;
        self.total_usd = total_usd;
        Some(value)
    }

    /// Add a positive USD value; returns false (totals untouched) on overflow
    pub fn add_usd(&mut self, value: Decimal) -> bool {
        if value <= Decimal::ZERO {
            return true;
        }

        match self.total_usd.checked_add(value) {
            Some(total) => {
                self.total_usd = total;
                true
            }
            None => false,
        }
    }
}

/// What ended the scanning loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxAddresses,
    GapLimit,
}

/// Per-address result handed to the reporter
#[derive(Debug, Clone, PartialEq)]
pub struct AddressOutcome {
    pub record: AddressRecord,
    pub native: Decimal,
    pub native_usd: Decimal,
    /// Non-zero token balances seen at this address
    pub token_count: usize,
    pub active: bool,
    /// Consecutive empty addresses including this one
    pub empty_streak: u32,
}

/// Result of the batched token price lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceQuotes {
    pub priced: HashMap<Address, Decimal>,
    /// Contracts whose batch failed or that the price service did not quote
    pub unpriced: Vec<Address>,
}

impl PriceQuotes {
    pub fn price_of(&self, contract: &Address) -> Option<Decimal> {
        self.priced.get(contract).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub symbol: String,
    pub decimals: u8,
}

/// Final valuation of one aggregated token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValuation {
    Priced {
        contract: Address,
        symbol: String,
        decimals: u8,
        raw: U256,
        amount: Decimal,
        unit_price: Option<Decimal>,
        usd_value: Decimal,
    },
    Unknown {
        contract: Address,
        raw: U256,
        reason: String,
    },
}

impl TokenValuation {
    pub fn contract(&self) -> Address {
        match self {
            Self::Priced { contract, .. } | Self::Unknown { contract, .. } => *contract,
        }
    }

    pub fn raw(&self) -> U256 {
        match self {
            Self::Priced { raw, .. } | Self::Unknown { raw, .. } => *raw,
        }
    }

    pub fn usd_value(&self) -> Decimal {
        match self {
            Self::Priced { usd_value, .. } => *usd_value,
            Self::Unknown { .. } => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanSummary {
    pub addresses_scanned: u32,
    pub stop_reason: StopReason,
    pub native_usd_price: Decimal,
    pub totals: WalletTotals,
    pub token_totals: TokenTotals,
    pub valuations: Vec<TokenValuation>,
    pub unpriced_tokens: Vec<Address>,
}
