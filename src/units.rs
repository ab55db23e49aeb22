//! Amount conversions between on-chain integers and display decimals

use alloy_primitives::U256;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ScanError;
use crate::Result;

/// Decimal places of one ether in wei
pub const ETHER_DECIMALS: u8 = 18;

/// `rust_decimal` keeps at most 28 significant digits
const MAX_DECIMAL_DIGITS: usize = 28;

/// Parse a JSON-RPC hex quantity (`0x…`) into a 256-bit integer.
///
/// `0x` and any zero-padded form parse to zero.
pub fn parse_hex_quantity(value: &str) -> Result<U256> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(|| ScanError::MalformedResponse(format!("not a hex quantity: {}", value)))?;

    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 16)
        .map_err(|e| ScanError::MalformedResponse(format!("not a hex quantity: {}: {}", value, e)))
}

/// Convert wei to ether without losing precision.
pub fn wei_to_ether(wei: U256) -> Result<Decimal> {
    let mantissa = u128::try_from(wei)
        .ok()
        .and_then(|wei| i128::try_from(wei).ok())
        .ok_or_else(|| ScanError::MalformedResponse(format!("balance out of range: {} wei", wei)))?;

    Decimal::try_from_i128_with_scale(mantissa, ETHER_DECIMALS as u32)
        .map(|ether| ether.normalize())
        .map_err(|e| ScanError::MalformedResponse(format!("balance out of range: {}", e)))
}

/// Scale a raw token amount by its decimals.
///
/// Fraction digits beyond what a `Decimal` can hold are truncated. Returns
/// `None` when the integer part alone exceeds the representable range.
pub fn scale_units(raw: U256, decimals: u8) -> Option<Decimal> {
    let digits = raw.to_string();
    let decimals = decimals as usize;

    let (int_part, frac_part) = if digits.len() > decimals {
        let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
        (int_part.to_string(), frac_part.to_string())
    } else {
        ("0".to_string(), format!("{:0>width$}", digits, width = decimals))
    };

    let int_part = int_part.trim_start_matches('0');
    if int_part.len() > MAX_DECIMAL_DIGITS {
        return None;
    }

    let frac_budget = MAX_DECIMAL_DIGITS - int_part.len().max(1);
    let frac_part: String = frac_part.chars().take(frac_budget).collect();

    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let text = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    };

    Decimal::from_str(&text).ok().map(|value| value.normalize())
}

/// Render a USD value with two decimals.
pub fn format_usd(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}
