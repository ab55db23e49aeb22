use alloy_primitives::Address;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::config::DEFAULT_PRICE_API_URL;
use crate::error::ScanError;
use crate::keys::lowercase_address;
use crate::scanner::PriceOracle;
use crate::Result;

/// CoinGecko id of the native asset
const NATIVE_ASSET_ID: &str = "ethereum";
/// CoinGecko asset platform for ERC-20 contracts
const TOKEN_PLATFORM: &str = "ethereum";
const VS_CURRENCY: &str = "usd";

/// `{ "<id or contract>": { "usd": 1234.5 } }`
type QuoteTable = HashMap<String, HashMap<String, f64>>;

pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::TransientProbeFailure(format!(
                "{} returned HTTP {}",
                path, status
            )));
        }

        Ok(response.json().await?)
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_API_URL, None)
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoClient {
    async fn native_usd_price(&self) -> Result<Decimal> {
        let table: QuoteTable = self
            .get(
                "/simple/price",
                &[("ids", NATIVE_ASSET_ID), ("vs_currencies", VS_CURRENCY)],
            )
            .await?;

        table
            .get(NATIVE_ASSET_ID)
            .and_then(|quote| quote.get(VS_CURRENCY))
            .ok_or_else(|| ScanError::MalformedResponse("no ETH/USD quote".into()))
            .and_then(|price| to_decimal(*price))
    }

    async fn token_usd_prices(&self, contracts: &[Address]) -> Result<HashMap<Address, Decimal>> {
        if contracts.is_empty() {
            return Ok(HashMap::new());
        }

        let joined = contracts
            .iter()
            .map(lowercase_address)
            .collect::<Vec<_>>()
            .join(",");
        let path = format!("/simple/token_price/{}", TOKEN_PLATFORM);
        let table: QuoteTable = self
            .get(
                &path,
                &[("contract_addresses", joined.as_str()), ("vs_currencies", VS_CURRENCY)],
            )
            .await?;

        quotes_from_table(table)
    }
}

fn quotes_from_table(table: QuoteTable) -> Result<HashMap<Address, Decimal>> {
    let mut prices = HashMap::with_capacity(table.len());

    for (key, quote) in table {
        let Ok(contract) = key.parse::<Address>() else {
            log::debug!("Ignoring price for unparseable contract {}", key);
            continue;
        };

        if let Some(price) = quote.get(VS_CURRENCY) {
            prices.insert(contract, to_decimal(*price)?);
        }
    }

    Ok(prices)
}

fn to_decimal(price: f64) -> Result<Decimal> {
    Decimal::try_from(price)
        .map_err(|e| ScanError::MalformedResponse(format!("price {}: {}", price, e)))
}
