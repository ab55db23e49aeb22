// Ethereum node access
// JSON-RPC over HTTP: balances, token enumeration, ERC-20 metadata calls

pub mod abi;
pub mod client;
pub mod types;

pub use client::EthRpcClient;
pub use types::*;
