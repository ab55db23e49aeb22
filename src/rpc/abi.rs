/// ERC-20 metadata calls
///
/// Calldata and return decoding come from the `sol!` interface below. The one
/// hand-decoded case is the legacy `bytes32` symbol.

use alloy_sol_types::{sol, SolCall};

use crate::error::ScanError;
use crate::Result;

sol! {
    interface IERC20Metadata {
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

const WORD: usize = 32;

pub fn symbol_calldata() -> Vec<u8> {
    IERC20Metadata::symbolCall {}.abi_encode()
}

pub fn decimals_calldata() -> Vec<u8> {
    IERC20Metadata::decimalsCall {}.abi_encode()
}

/// Decode a `decimals()` return value
pub fn decode_decimals(data: &[u8]) -> Result<u8> {
    IERC20Metadata::decimalsCall::abi_decode_returns(data, true)
        .map(|returned| returned._0)
        .map_err(|e| ScanError::MalformedResponse(format!("decimals(): {}", e)))
}

/// Decode a `symbol()` return value
///
/// Some older tokens return `bytes32` instead of `string`; a bare 32-byte word
/// is read as a zero-padded ASCII symbol.
pub fn decode_symbol(data: &[u8]) -> Result<String> {
    if data.len() == WORD {
        return decode_bytes32(data);
    }

    IERC20Metadata::symbolCall::abi_decode_returns(data, true)
        .map(|returned| returned._0)
        .map_err(|e| ScanError::MalformedResponse(format!("symbol(): {}", e)))
}

fn decode_bytes32(word: &[u8]) -> Result<String> {
    let end = word.iter().position(|b| *b == 0).unwrap_or(word.len());
    let text = std::str::from_utf8(&word[..end])
        .map_err(|e| ScanError::MalformedResponse(format!("symbol is not UTF-8: {}", e)))?;

    if text.is_empty() || !text.chars().all(|c| c.is_ascii_graphic()) {
        return Err(ScanError::MalformedResponse(
            "bytes32 symbol is not printable".into(),
        ));
    }

    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: u8) -> Vec<u8> {
        let mut word = vec![0u8; 32];
        word[31] = value;
        word
    }

    fn encode_string(text: &str) -> Vec<u8> {
        let mut data = word(0x20);
        data.extend(word(text.len() as u8));
        let mut body = text.as_bytes().to_vec();
        body.resize(32, 0);
        data.extend(body);
        data
    }

    #[test]
    fn test_calldata_selectors() {
        assert_eq!(hex::encode(symbol_calldata()), "95d89b41");
        assert_eq!(hex::encode(decimals_calldata()), "313ce567");
    }

    #[test]
    fn test_decode_decimals() {
        assert_eq!(decode_decimals(&word(18)).unwrap(), 18);
        assert_eq!(decode_decimals(&word(6)).unwrap(), 6);

        let mut too_big = word(0);
        too_big[30] = 1;
        assert!(decode_decimals(&too_big).is_err());
        assert!(decode_decimals(&[]).is_err());
    }

    #[test]
    fn test_decode_symbol() {
        assert_eq!(decode_symbol(&encode_string("USDC")).unwrap(), "USDC");
        assert_eq!(decode_symbol(&encode_string("")).unwrap(), "");
    }

    #[test]
    fn test_decode_bytes32_symbol() {
        let mut data = b"MKR".to_vec();
        data.resize(32, 0);
        assert_eq!(decode_symbol(&data).unwrap(), "MKR");

        assert!(decode_symbol(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_decode_symbol_bounds() {
        let mut data = encode_string("USDC");
        data.truncate(64);
        assert!(decode_symbol(&data).is_err());
        assert!(decode_symbol(&[]).is_err());
    }
}
