//! Error types for seed validation, derivation and balance scanning
//!
//! Fatal startup failures (bad phrase, missing endpoint) are kept apart from
//! per-call failures so callers can decide what to isolate and what to abort on.

use alloy_primitives::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// Phrase failed wordlist or checksum validation
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Required setting absent from the environment
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Derivation error: {0}")]
    Derivation(String),

    /// Node or price service unreachable, timed out, or answered with a non-2xx status
    #[error("Transient probe failure: {0}")]
    TransientProbeFailure(String),

    /// Node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Unknown token metadata for {contract}: {reason}")]
    UnknownTokenMetadata { contract: Address, reason: String },
}

impl ScanError {
    /// Whether a repeat of the same call could plausibly succeed.
    ///
    /// Nothing in this crate retries; the flag only informs reporting.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientProbeFailure(_) | Self::Rpc { .. })
    }

    pub fn unknown_metadata(contract: Address, reason: impl Into<String>) -> Self {
        Self::UnknownTokenMetadata {
            contract,
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for ScanError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ScanError::MalformedResponse(err.to_string())
        } else {
            ScanError::TransientProbeFailure(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::MalformedResponse(err.to_string())
    }
}
