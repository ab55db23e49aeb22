/// Scan progress and summary output
///
/// Reporters only format values the aggregator already computed.

use rust_decimal::Decimal;

use super::types::{AddressOutcome, ScanSummary, StopReason, TokenValuation};
use crate::config::{ScanConfig, INDEX_PLACEHOLDER};
use crate::keys::checksum_address;
use crate::units::format_usd;

const RULE_WIDTH: usize = 38;

/// Hooks fired by the aggregator as the scan progresses
pub trait ScanReporter {
    fn scan_started(&mut self, _config: &ScanConfig) {}

    fn address_scanned(&mut self, _outcome: &AddressOutcome) {}

    fn pricing_started(&mut self, _token_count: usize) {}

    fn token_valued(&mut self, _valuation: &TokenValuation) {}

    fn scan_finished(&mut self, _summary: &ScanSummary) {}
}

/// Discards everything
#[derive(Debug, Default)]
pub struct NullReporter;

impl ScanReporter for NullReporter {}

/// Line-oriented console output
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    gap_limit: u32,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScanReporter for ConsoleReporter {
    fn scan_started(&mut self, config: &ScanConfig) {
        self.gap_limit = config.gap_limit;
        print_lines(&start_lines(config));
    }

    fn address_scanned(&mut self, outcome: &AddressOutcome) {
        print_lines(&address_lines(outcome, self.gap_limit));
    }

    fn pricing_started(&mut self, _token_count: usize) {
        println!("\n🧮 Pricing tokens...\n");
        println!("{}", banner("TOKENS (AGGREGATED)"));
    }

    fn token_valued(&mut self, valuation: &TokenValuation) {
        println!("{}", valuation_line(valuation));
    }

    fn scan_finished(&mut self, summary: &ScanSummary) {
        print_lines(&summary_lines(summary));
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn start_lines(config: &ScanConfig) -> Vec<String> {
    vec![
        "✅ Seed phrase valid".to_string(),
        format!(
            "📍 Path: {}",
            config.derivation_path_template.replace(INDEX_PLACEHOLDER, "i")
        ),
        format!(
            "🛑 Stop at address {} OR {} empty\n",
            config.max_addresses, config.gap_limit
        ),
    ]
}

pub fn address_lines(outcome: &AddressOutcome, gap_limit: u32) -> Vec<String> {
    let mut lines = vec![format!(
        "\n🔍 Address #{}: {}",
        outcome.record.index,
        checksum_address(&outcome.record.address)
    )];

    if outcome.native > Decimal::ZERO {
        lines.push(format!(
            "   ETH: {} (${})",
            outcome.native,
            format_usd(outcome.native_usd)
        ));
    }

    if outcome.token_count > 0 {
        lines.push(format!("   Tokens: {}", outcome.token_count));
    }

    if outcome.active {
        lines.push(format!(
            "   ✅ Address USD total: ${}",
            format_usd(outcome.native_usd)
        ));
    } else {
        lines.push(format!("   ❌ Empty ({}/{})", outcome.empty_streak, gap_limit));
    }

    lines
}

pub fn valuation_line(valuation: &TokenValuation) -> String {
    match valuation {
        TokenValuation::Priced {
            symbol,
            amount,
            usd_value,
            ..
        } => format!("{}: {} (${})", symbol, amount, format_usd(*usd_value)),
        TokenValuation::Unknown { contract, .. } => {
            format!("Unknown token: {}", checksum_address(contract))
        }
    }
}

pub fn summary_lines(summary: &ScanSummary) -> Vec<String> {
    let mut lines = Vec::new();

    if !summary.unpriced_tokens.is_empty() {
        let unpriced: Vec<String> = summary.unpriced_tokens.iter().map(checksum_address).collect();
        lines.push(format!(
            "⚠️  No USD price for {} token(s): {}",
            unpriced.len(),
            unpriced.join(", ")
        ));
    }

    let reason = match summary.stop_reason {
        StopReason::MaxAddresses => "address ceiling reached",
        StopReason::GapLimit => "gap limit reached",
    };

    lines.push("=".repeat(RULE_WIDTH));
    lines.push(format!(
        "📦 Addresses scanned: {} ({})",
        summary.addresses_scanned, reason
    ));
    lines.push(format!("ETH total: {}", summary.totals.total_native));
    lines.push(format!(
        "💰 TOTAL WALLET VALUE: ${}",
        format_usd(summary.totals.total_usd)
    ));
    lines.push("=".repeat(RULE_WIDTH));

    lines
}

fn banner(title: &str) -> String {
    let padding = RULE_WIDTH.saturating_sub(title.len() + 2);
    let left = padding / 2;
    format!(
        "{} {} {}",
        "=".repeat(left),
        title,
        "=".repeat(padding - left)
    )
}
