/// Scanner configuration
///
/// Endpoint settings come from environment variables (with `.env` support).
/// Scan tunables have compiled-in defaults that the environment may override.

use std::env;
use std::str::FromStr;

use crate::error::ScanError;
use crate::Result;

/// Stop after this many consecutive addresses without activity
pub const DEFAULT_GAP_LIMIT: u32 = 20;
/// Hard ceiling on scanned indices
pub const DEFAULT_MAX_ADDRESSES: u32 = 200;
/// Token contracts per price request
pub const DEFAULT_PRICE_BATCH_SIZE: usize = 20;
pub const DEFAULT_DERIVATION_PATH_TEMPLATE: &str = "m/44'/60'/0'/0/{index}";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Placeholder substituted with the scan index
pub const INDEX_PLACEHOLDER: &str = "{index}";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    pub gap_limit: u32,
    pub max_addresses: u32,
    pub price_batch_size: usize,
    pub derivation_path_template: String,
}

impl ScanConfig {
    /// Load scan tunables, starting from the defaults
    ///
    /// Environment variables (all optional):
    /// - `SCAN_GAP_LIMIT`
    /// - `SCAN_MAX_ADDRESSES`
    /// - `PRICE_BATCH_SIZE`
    /// - `DERIVATION_PATH_TEMPLATE`: must contain `{index}`
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            gap_limit: parse_or(&lookup, "SCAN_GAP_LIMIT", defaults.gap_limit)?,
            max_addresses: parse_or(&lookup, "SCAN_MAX_ADDRESSES", defaults.max_addresses)?,
            price_batch_size: parse_or(&lookup, "PRICE_BATCH_SIZE", defaults.price_batch_size)?,
            derivation_path_template: non_empty(&lookup, "DERIVATION_PATH_TEMPLATE")
                .unwrap_or(defaults.derivation_path_template),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gap_limit == 0 {
            return Err(ScanError::InvalidConfiguration(
                "gap limit must be at least 1".into(),
            ));
        }
        if self.price_batch_size == 0 {
            return Err(ScanError::InvalidConfiguration(
                "price batch size must be at least 1".into(),
            ));
        }
        if !self.derivation_path_template.contains(INDEX_PLACEHOLDER) {
            return Err(ScanError::InvalidConfiguration(format!(
                "derivation path template '{}' has no {} placeholder",
                self.derivation_path_template, INDEX_PLACEHOLDER
            )));
        }
        Ok(())
    }

    /// Full derivation path for a scan index
    pub fn path_for(&self, index: u32) -> String {
        self.derivation_path_template
            .replace(INDEX_PLACEHOLDER, &index.to_string())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            gap_limit: DEFAULT_GAP_LIMIT,
            max_addresses: DEFAULT_MAX_ADDRESSES,
            price_batch_size: DEFAULT_PRICE_BATCH_SIZE,
            derivation_path_template: DEFAULT_DERIVATION_PATH_TEMPLATE.to_string(),
        }
    }
}

/// External service endpoints
#[derive(Clone, Debug)]
pub struct EndpointConfig {
    /// JSON-RPC node URL
    pub rpc_url: String,
    /// Price API base URL
    pub price_api_url: String,
    /// Optional CoinGecko API key
    pub price_api_key: Option<String>,
}

impl EndpointConfig {
    /// Load endpoints from environment variables
    ///
    /// Environment variables:
    /// - `ETH_RPC`: JSON-RPC node URL (required)
    /// - `PRICE_API_URL`: price API base URL (optional, defaults to CoinGecko)
    /// - `COINGECKO_API_KEY`: sent as `x-cg-demo-api-key` when present
    ///
    /// # Examples
    ///
    /// ```bash
    /// ETH_RPC=https://eth-mainnet.g.alchemy.com/v2/<key> cargo run --bin scan-balances -- "seed words"
    /// ```
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let rpc_url = non_empty(&lookup, "ETH_RPC")
            .ok_or_else(|| ScanError::MissingConfiguration("ETH_RPC is not set".into()))?;

        let price_api_url = non_empty(&lookup, "PRICE_API_URL")
            .unwrap_or_else(|| DEFAULT_PRICE_API_URL.to_string());
        log::info!("💱 Price API: {}", price_api_url);

        let price_api_key = non_empty(&lookup, "COINGECKO_API_KEY");

        Ok(Self {
            rpc_url,
            price_api_url: price_api_url.trim_end_matches('/').to_string(),
            price_api_key,
        })
    }
}

/// Seed phrase from command-line arguments (program name first)
///
/// Words are joined so an unquoted phrase works. A missing or blank phrase
/// yields `None`.
pub fn phrase_from_args<I>(args: I) -> Option<String>
where
    I: IntoIterator<Item = String>,
{
    let phrase = args
        .into_iter()
        .skip(1)
        .map(|word| word.trim().to_string())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!phrase.is_empty()).then_some(phrase)
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup, key) {
        Some(raw) => raw.parse().map_err(|_| {
            ScanError::InvalidConfiguration(format!("{} has invalid value '{}'", key, raw))
        }),
        None => Ok(default),
    }
}
