/// Gap-limit scan and balance aggregation
///
/// Walks the derivation path index by index until either the hard ceiling or
/// the gap limit is hit, then prices every token it collected.

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;

use super::report::ScanReporter;
use super::types::*;
use super::{AddressDeriver, ChainProber, MetadataResolver, PriceOracle};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::keys::{HdWallet, TemplateDeriver};
use crate::units::scale_units;
use crate::Result;

/// State left behind by the scanning loop
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgress {
    pub addresses_scanned: u32,
    pub empty_streak: u32,
    pub stop_reason: StopReason,
    pub totals: WalletTotals,
    pub token_totals: TokenTotals,
}

pub struct Aggregator<'a> {
    config: ScanConfig,
    prober: &'a dyn ChainProber,
    oracle: &'a dyn PriceOracle,
    resolver: &'a dyn MetadataResolver,
}

impl<'a> Aggregator<'a> {
    pub fn new(
        config: ScanConfig,
        prober: &'a dyn ChainProber,
        oracle: &'a dyn PriceOracle,
        resolver: &'a dyn MetadataResolver,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            prober,
            oracle,
            resolver,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Validate a phrase, then scan the addresses it derives
    ///
    /// An invalid phrase returns before any derivation or network call.
    pub async fn scan_phrase(
        &self,
        phrase: &str,
        reporter: &mut dyn ScanReporter,
    ) -> Result<ScanSummary> {
        let wallet = HdWallet::from_phrase(phrase)?;
        let deriver = TemplateDeriver::new(&wallet, &self.config);

        self.run(&deriver, reporter).await
    }

    /// Full pipeline: native price, address scan, token pricing
    pub async fn run(
        &self,
        deriver: &dyn AddressDeriver,
        reporter: &mut dyn ScanReporter,
    ) -> Result<ScanSummary> {
        reporter.scan_started(&self.config);

        let native_usd_price = self.oracle.native_usd_price().await?;
        log::debug!("ETH/USD price: {}", native_usd_price);

        let progress = self
            .scan_addresses(deriver, native_usd_price, reporter)
            .await?;

        log::info!(
            "Scan stopped after {} addresses ({:?}), {} distinct tokens",
            progress.addresses_scanned,
            progress.stop_reason,
            progress.token_totals.len()
        );

        reporter.pricing_started(progress.token_totals.len());

        let quotes = self
            .fetch_token_prices(&progress.token_totals.contracts())
            .await;

        let mut totals = progress.totals;
        let valuations = self
            .value_tokens(&progress.token_totals, &quotes, &mut totals, reporter)
            .await;

        let summary = ScanSummary {
            addresses_scanned: progress.addresses_scanned,
            stop_reason: progress.stop_reason,
            native_usd_price,
            totals,
            token_totals: progress.token_totals,
            valuations,
            unpriced_tokens: quotes.unpriced,
        };

        reporter.scan_finished(&summary);
        Ok(summary)
    }

    /// Scanning loop
    ///
    /// A balance lookup failure aborts the scan; totals accumulated so far are dropped
    /// with the error. So does a native balance whose USD value overflows.
    pub async fn scan_addresses(
        &self,
        deriver: &dyn AddressDeriver,
        native_usd_price: Decimal,
        reporter: &mut dyn ScanReporter,
    ) -> Result<ScanProgress> {
        let mut index = 0u32;
        let mut empty_streak = 0u32;
        let mut totals = WalletTotals::default();
        let mut token_totals = TokenTotals::default();

        while index < self.config.max_addresses && empty_streak < self.config.gap_limit {
            let record = deriver.derive(index)?;

            let snapshot = match self.prober.probe(record.address).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    log::error!("Probe failed at address #{} ({}): {}", index, record.address, e);
                    return Err(e);
                }
            };

            let mut active = false;
            let mut native_usd = Decimal::ZERO;

            if snapshot.native > Decimal::ZERO {
                native_usd = totals
                    .add_native(snapshot.native, native_usd_price)
                    .ok_or_else(|| {
                        ScanError::MalformedResponse(format!(
                            "{} ETH at {} overflows the USD total (address #{})",
                            snapshot.native, native_usd_price, index
                        ))
                    })?;
                active = true;
            }

            let mut token_count = 0;
            for delta in &snapshot.tokens {
                if token_totals.add(delta.contract, delta.amount) {
                    token_count += 1;
                    active = true;
                }
            }

            empty_streak = if active { 0 } else { empty_streak + 1 };

            reporter.address_scanned(&AddressOutcome {
                record,
                native: snapshot.native,
                native_usd,
                token_count,
                active,
                empty_streak,
            });

            index += 1;
        }

        // Ceiling wins when both conditions hold at once
        let stop_reason = if index >= self.config.max_addresses {
            StopReason::MaxAddresses
        } else {
            StopReason::GapLimit
        };

        Ok(ScanProgress {
            addresses_scanned: index,
            empty_streak,
            stop_reason,
            totals,
            token_totals,
        })
    }

    /// Price contracts in batches; failed batches are recorded as unpriced
    pub async fn fetch_token_prices(&self, contracts: &[Address]) -> PriceQuotes {
        let mut quotes = PriceQuotes::default();

        for batch in contracts.chunks(self.config.price_batch_size) {
            match self.oracle.token_usd_prices(batch).await {
                Ok(prices) => {
                    for contract in batch {
                        match prices.get(contract) {
                            Some(price) => {
                                quotes.priced.insert(*contract, *price);
                            }
                            None => quotes.unpriced.push(*contract),
                        }
                    }
                }
                Err(e) => {
                    log::warn!("⚠️  Price batch of {} tokens skipped: {}", batch.len(), e);
                    quotes.unpriced.extend_from_slice(batch);
                }
            }
        }

        quotes
    }

    async fn value_tokens(
        &self,
        token_totals: &TokenTotals,
        quotes: &PriceQuotes,
        totals: &mut WalletTotals,
        reporter: &mut dyn ScanReporter,
    ) -> Vec<TokenValuation> {
        let mut valuations = Vec::with_capacity(token_totals.len());

        for (contract, raw) in token_totals.iter() {
            let (contract, raw) = (*contract, *raw);

            let mut valuation = match self.resolver.token_metadata(contract).await {
                Ok(metadata) => value_token(contract, raw, metadata, quotes.price_of(&contract)),
                Err(e) => {
                    log::warn!("Token {} left unvalued: {}", contract, e);
                    TokenValuation::Unknown {
                        contract,
                        raw,
                        reason: e.to_string(),
                    }
                }
            };

            if !totals.add_usd(valuation.usd_value()) {
                log::warn!("Token {} left unvalued: USD total overflows", contract);
                valuation = TokenValuation::Unknown {
                    contract,
                    raw,
                    reason: format!(
                        "adding ${} overflows the wallet total",
                        valuation.usd_value()
                    ),
                };
            }

            reporter.token_valued(&valuation);
            valuations.push(valuation);
        }

        valuations
    }
}

fn value_token(
    contract: Address,
    raw: U256,
    metadata: TokenMetadata,
    unit_price: Option<Decimal>,
) -> TokenValuation {
    let unknown = |reason: String| TokenValuation::Unknown {
        contract,
        raw,
        reason,
    };

    let Some(amount) = scale_units(raw, metadata.decimals) else {
        return unknown(format!(
            "amount {} does not fit at {} decimals",
            raw, metadata.decimals
        ));
    };

    let Some(usd_value) = amount.checked_mul(unit_price.unwrap_or(Decimal::ZERO)) else {
        return unknown(format!("USD value of {} {} overflows", amount, metadata.symbol));
    };

    TokenValuation::Priced {
        contract,
        symbol: metadata.symbol,
        decimals: metadata.decimals,
        raw,
        amount,
        unit_price,
        usd_value,
    }
}
