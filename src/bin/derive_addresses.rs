/// Print the first addresses derived from a mnemonic
///
/// Usage:
/// ```bash
/// cargo run --bin derive-addresses -- "your twelve word mnemonic here"
/// ```

use anyhow::Context;
use eth_seed_scanner::config::phrase_from_args;
use eth_seed_scanner::keys::{DEFAULT_ACCOUNT_PATH, DERIVE_COUNT};
use eth_seed_scanner::{checksum_address, HdWallet};
use std::env;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Join all args after program name (handles unquoted phrases)
    let Some(phrase) = phrase_from_args(env::args()) else {
        println!("Usage: derive-addresses \"seed phrase here\"");
        std::process::exit(1);
    };

    let wallet = HdWallet::from_phrase(&phrase).context("Invalid seed phrase")?;

    println!("✅ Seed phrase valid\n");
    println!("Derivation path base:");
    println!("{}/0/i\n", DEFAULT_ACCOUNT_PATH);

    let records = wallet
        .derive_relative(DEFAULT_ACCOUNT_PATH, DERIVE_COUNT)
        .context("Failed to derive addresses")?;

    for record in records {
        println!("Index {}: {}", record.index, checksum_address(&record.address));
        log::debug!("  path {}", record.path);
    }

    Ok(())
}
