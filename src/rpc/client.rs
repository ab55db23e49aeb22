use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use super::abi;
use super::types::*;
use crate::error::ScanError;
use crate::scanner::{BalanceSnapshot, ChainProber, MetadataResolver, TokenDelta, TokenMetadata};
use crate::units::{parse_hex_quantity, wei_to_ether};
use crate::Result;

/// JSON-RPC client for an Ethereum node
///
/// Token enumeration uses `alchemy_getTokenBalances`, so the node must be an
/// Alchemy endpoint or something that speaks the same extension.
pub struct EthRpcClient {
    client: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl EthRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and deserialize its `result`
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);

        log::debug!("→ {} #{}", method, id);

        let response = self.client.post(&self.url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::TransientProbeFailure(format!(
                "{} returned HTTP {}",
                method, status
            )));
        }

        let body: JsonRpcResponse = response.json().await?;

        if let Some(error) = body.error {
            return Err(ScanError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = body
            .result
            .ok_or_else(|| ScanError::MalformedResponse(format!("{} returned no result", method)))?;

        Ok(serde_json::from_value(result)?)
    }

    /// Native balance in wei at the latest block
    pub async fn get_balance(&self, address: Address) -> Result<U256> {
        let quantity: String = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_hex_quantity(&quantity)
    }

    /// ERC-20 balances held by an address
    pub async fn get_token_balances(
        &self,
        address: Address,
    ) -> Result<Vec<TokenBalanceEntry>> {
        let result: TokenBalancesResult = self
            .call("alchemy_getTokenBalances", json!([address, "erc20"]))
            .await?;
        Ok(result.token_balances)
    }

    /// Read-only contract call at the latest block
    pub async fn eth_call(&self, to: Address, data: &[u8]) -> Result<Bytes> {
        let data = format!("0x{}", hex::encode(data));
        self.call("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    pub async fn token_symbol(&self, contract: Address) -> Result<String> {
        let output = self.eth_call(contract, &abi::symbol_calldata()).await?;
        abi::decode_symbol(&output)
    }

    pub async fn token_decimals(&self, contract: Address) -> Result<u8> {
        let output = self.eth_call(contract, &abi::decimals_calldata()).await?;
        abi::decode_decimals(&output)
    }
}

#[async_trait]
impl ChainProber for EthRpcClient {
    async fn probe(&self, address: Address) -> Result<BalanceSnapshot> {
        let wei = self.get_balance(address).await?;
        let native = wei_to_ether(wei)?;

        let mut tokens = Vec::new();
        for entry in self.get_token_balances(address).await? {
            let Some(raw) = entry.token_balance else {
                log::debug!(
                    "No balance for {} at {}: {:?}",
                    entry.contract_address,
                    address,
                    entry.error
                );
                continue;
            };

            let amount = parse_hex_quantity(&raw)?;
            if amount.is_zero() {
                continue;
            }

            tokens.push(TokenDelta {
                contract: entry.contract_address,
                amount,
            });
        }

        Ok(BalanceSnapshot { native, tokens })
    }
}

#[async_trait]
impl MetadataResolver for EthRpcClient {
    async fn token_metadata(&self, contract: Address) -> Result<TokenMetadata> {
        let symbol = self
            .token_symbol(contract)
            .await
            .map_err(|e| ScanError::unknown_metadata(contract, format!("symbol(): {}", e)))?;

        let decimals = self
            .token_decimals(contract)
            .await
            .map_err(|e| ScanError::unknown_metadata(contract, format!("decimals(): {}", e)))?;

        Ok(TokenMetadata { symbol, decimals })
    }
}
