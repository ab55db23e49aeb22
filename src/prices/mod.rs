//! USD price lookups
//!
//! Single-asset ETH price and batched ERC-20 prices by contract address.

pub mod client;

pub use client::CoinGeckoClient;
